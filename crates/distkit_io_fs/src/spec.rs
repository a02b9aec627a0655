//! Publish/copy specification models and top-level error types.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::conf::{C_DIR_DESTINATION_DEFAULT, C_DIR_SOURCE_DEFAULT};

////////////////////////////////////////////////////////////////////////////////
// #region EnumsInit

/// Symlink handling policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnumCopySymlinkStrategy {
    /// Follow the link and copy the target bytes/entries.
    Dereference,
    /// Create a symbolic link at destination (do not copy target bytes).
    CopySymlinks,
    /// Ignore symlink entries.
    SkipSymlinks,
}

/// Existing destination file conflict policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnumCopyFileConflictStrategy {
    /// Keep destination file and skip current source file.
    Skip,
    /// Replace destination file with source file.
    Overwrite,
    /// Fail the run on the first existing destination file.
    Error,
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region StructsInit

/// Explicit source/destination pair for one publish run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpecPublishConfig {
    /// Directory tree to copy from.
    pub path_source: PathBuf,
    /// Directory tree to copy into; created with its ancestors if missing.
    pub path_destination: PathBuf,
}

impl SpecPublishConfig {
    pub fn new(path_source: impl Into<PathBuf>, path_destination: impl Into<PathBuf>) -> Self {
        Self {
            path_source: path_source.into(),
            path_destination: path_destination.into(),
        }
    }
}

impl Default for SpecPublishConfig {
    fn default() -> Self {
        Self::new(C_DIR_SOURCE_DEFAULT, C_DIR_DESTINATION_DEFAULT)
    }
}

/// Input options for `copy_tree`.
///
/// The default is a plain recursive merge: files are overwritten, existing
/// destination directories are reused, links are recreated as links.
#[derive(Debug, Clone)]
pub struct SpecCopyOptions {
    /// Glob patterns matched against entry basenames; matches are not copied.
    pub patterns_exclude: Option<Vec<String>>,
    /// Conflict behavior for destination files.
    pub rule_conflict_file: EnumCopyFileConflictStrategy,
    /// Symlink handling behavior.
    pub rule_symlink: EnumCopySymlinkStrategy,
    /// Carry access/modification times over to copied files.
    pub if_preserve_timestamps: bool,
    /// Refuse to write through symlinks already present in the destination,
    /// including a symlinked destination root.
    pub if_guard_destination_symlinks: bool,
}

impl Default for SpecCopyOptions {
    fn default() -> Self {
        Self {
            patterns_exclude: None,
            rule_conflict_file: EnumCopyFileConflictStrategy::Overwrite,
            rule_symlink: EnumCopySymlinkStrategy::CopySymlinks,
            if_preserve_timestamps: false,
            if_guard_destination_symlinks: false,
        }
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region Errors

/// Any failure reading the source tree or writing the destination tree.
///
/// The copy stops at the first error. Entries copied before it stay in place.
#[derive(Debug, Error)]
pub enum FileSystemError {
    /// Invalid exclude pattern.
    #[error("Invalid pattern in exclude list: {0}")]
    InvalidPattern(String),
    /// Source path does not exist.
    #[error("Source does not exist: {}", .0.display())]
    SourceNotFound(PathBuf),
    /// Source path exists but is not a directory.
    #[error("Source is not a directory: {}", .0.display())]
    SourceNotDirectory(PathBuf),
    /// Source directory or one of its entries could not be read.
    #[error("Failed to read source {}: {source}", path.display())]
    SourceUnreadable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    /// Source and destination overlap (`src` contains `dst` or vice versa).
    #[error(
        "Source and destination directories overlap: {} <-> {}",
        path_source.display(),
        path_destination.display()
    )]
    SourceDestinationOverlap {
        /// Normalized source directory.
        path_source: PathBuf,
        /// Normalized destination directory.
        path_destination: PathBuf,
    },
    /// Destination root could not be created or is not a directory.
    #[error("Failed to initialize destination {}: {message}", path.display())]
    DestinationInitFailed { path: PathBuf, message: String },
    /// Destination path escapes the root or traverses a symlink.
    #[error("Unsafe destination path {}: {reason}", path.display())]
    UnsafeDestination { path: PathBuf, reason: String },
    /// Destination entry exists and the file conflict rule is `Error`.
    #[error("Destination exists: {}", .0.display())]
    DestinationExists(PathBuf),
    /// Source and destination entry kinds disagree (file vs directory).
    #[error("Destination is a {found}, expected {expected}: {}", path.display())]
    EntryTypeConflict {
        path: PathBuf,
        expected: &'static str,
        found: &'static str,
    },
    /// Source entry is a FIFO, socket or device and cannot be copied.
    #[error("Cannot copy {kind}: {}", path.display())]
    UnsupportedEntry { path: PathBuf, kind: &'static str },
    /// Dereferenced symlink points nowhere.
    #[error("Broken symlink: {}", .0.display())]
    BrokenSymlink(PathBuf),
    /// Dereferenced directory symlink leads back into one of its own ancestors.
    #[error("Symlink loop detected: {}", .0.display())]
    SymlinkLoop(PathBuf),
    /// Copying one entry failed.
    #[error("Failed to copy {}: {source}", path.display())]
    EntryCopyFailed {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
