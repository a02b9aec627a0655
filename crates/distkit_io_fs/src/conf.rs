//! Publish defaults.

/// Source tree copied by a zero-argument build.
pub const C_DIR_SOURCE_DEFAULT: &str = "src";
/// Destination tree written by a zero-argument build.
pub const C_DIR_DESTINATION_DEFAULT: &str = "dist";
/// Completion notice printed after a successful publish.
pub const C_MSG_BUILD_COMPLETED: &str = "Build completed ✅";
