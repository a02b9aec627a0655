//! `distkit_io_fs` v1:
//! Directory publisher for the build step.
//!
//! - `copy`    : traversal and copy orchestration
//! - `publish` : configured `src` -> `dist` entry point
//! - `spec`    : enums/options/config/errors
//! - `report`  : run-time report model
//! - `conf`    : defaults
//! - `util`    : shared helper functions

pub mod conf;
pub mod copy;
pub mod publish;
pub mod report;
pub mod spec;
mod util;

pub use copy::copy_tree;
pub use publish::{publish, publish_with_options};
pub use report::{ReportCopy, ReportCopyBuilder};
pub use spec::{
    EnumCopyFileConflictStrategy, EnumCopySymlinkStrategy, FileSystemError, SpecCopyOptions,
    SpecPublishConfig,
};
