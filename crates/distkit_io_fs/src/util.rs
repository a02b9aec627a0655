use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use filetime::{FileTime, set_file_times};
use globset::{Glob, GlobSet, GlobSetBuilder};

use crate::spec::FileSystemError;

////////////////////////////////////////////////////////////////////////////////
// #region PatternMatching

pub(crate) fn compile_patterns_exclude(
    patterns: Option<&[String]>,
) -> Result<Option<GlobSet>, FileSystemError> {
    let Some(patterns) = patterns else {
        return Ok(None);
    };
    if patterns.is_empty() {
        return Ok(None);
    }

    let mut builder_glob = GlobSetBuilder::new();
    for pattern in patterns {
        let glob = Glob::new(pattern).map_err(|e| FileSystemError::InvalidPattern(e.to_string()))?;
        builder_glob.add(glob);
    }
    let set_glob = builder_glob
        .build()
        .map_err(|e| FileSystemError::InvalidPattern(e.to_string()))?;
    Ok(Some(set_glob))
}

pub(crate) fn should_exclude_by_patterns(name: &str, patterns_exclude: Option<&GlobSet>) -> bool {
    patterns_exclude.is_some_and(|set_glob| set_glob.is_match(name))
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region PathUtilities

fn _absolutize_path(path: &Path) -> PathBuf {
    if path.is_absolute() {
        return path.to_path_buf();
    }
    std::env::current_dir()
        .unwrap_or_else(|_| PathBuf::from("."))
        .join(path)
}

fn _normalize_path(path: &Path) -> PathBuf {
    if let Ok(resolved) = fs::canonicalize(path) {
        return resolved;
    }
    // Destination usually does not exist yet: resolve the deepest existing
    // ancestor and re-attach the missing tail.
    let path_abs = _absolutize_path(path);
    let mut path_cursor = path_abs.as_path();
    let mut l_tail = Vec::new();
    while let Some(parent) = path_cursor.parent() {
        if let Some(name) = path_cursor.file_name() {
            l_tail.push(name.to_os_string());
        }
        if let Ok(resolved) = fs::canonicalize(parent) {
            let mut path_out = resolved;
            for name in l_tail.iter().rev() {
                path_out.push(name);
            }
            return path_out;
        }
        path_cursor = parent;
    }
    path_abs
}

pub(crate) fn is_overlap(src: &Path, dst: &Path) -> bool {
    let src_resolved = _normalize_path(src);
    let dst_resolved = _normalize_path(dst);
    dst_resolved.starts_with(&src_resolved) || src_resolved.starts_with(&dst_resolved)
}

/// Reject destination paths that leave `path_dir_dst_root` or pass through a
/// symlink, so a pre-existing link in the destination cannot redirect writes.
///
/// With `if_allow_symlink_leaf` the final component may itself be a symlink
/// (it is about to be replaced by another link).
pub(crate) fn validate_destination_path_safety(
    path_dst_item: &Path,
    path_dir_dst_root: &Path,
    if_allow_symlink_leaf: bool,
) -> Result<(), FileSystemError> {
    let err_unsafe = |reason: String| FileSystemError::UnsafeDestination {
        path: path_dst_item.to_path_buf(),
        reason,
    };

    let path_dir_dst_root_abs = _absolutize_path(path_dir_dst_root);
    let path_dst_item_abs = _absolutize_path(path_dst_item);

    let path_parent_dst = path_dst_item_abs
        .parent()
        .ok_or_else(|| err_unsafe("no parent directory".to_string()))?;
    let path_parent_rel = path_parent_dst
        .strip_prefix(&path_dir_dst_root_abs)
        .map_err(|_| {
            err_unsafe(format!(
                "escapes destination root {}",
                path_dir_dst_root.display()
            ))
        })?;

    let mut path_cursor = path_dir_dst_root_abs.clone();
    for part_rel in path_parent_rel.components() {
        path_cursor.push(part_rel.as_os_str());
        match fs::symlink_metadata(&path_cursor) {
            Ok(meta_cursor) if meta_cursor.file_type().is_symlink() => {
                return Err(err_unsafe(format!(
                    "traverses symlink component {}",
                    path_cursor.display()
                )));
            }
            Ok(_) => {}
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => {
                return Err(FileSystemError::EntryCopyFailed {
                    path: path_cursor,
                    source: e,
                });
            }
        }
    }

    if if_allow_symlink_leaf {
        return Ok(());
    }
    match fs::symlink_metadata(&path_dst_item_abs) {
        Ok(meta_dst_item) if meta_dst_item.file_type().is_symlink() => {
            Err(err_unsafe("is an existing symlink".to_string()))
        }
        Ok(_) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(FileSystemError::EntryCopyFailed {
            path: path_dst_item.to_path_buf(),
            source: e,
        }),
    }
}

/// Map a source entry onto the destination tree, keeping its relative path.
pub(crate) fn derive_destination_path(
    path_src: &Path,
    path_dir_src: &Path,
    path_dir_dst: &Path,
) -> PathBuf {
    match path_src.strip_prefix(path_dir_src) {
        Ok(path_rel) => path_dir_dst.join(path_rel),
        Err(_) => path_dir_dst.join(path_src.file_name().unwrap_or_default()),
    }
}

/// Name the kind of a non-regular, non-directory entry for error messages.
pub(crate) fn describe_special_file(meta: &fs::Metadata) -> &'static str {
    #[cfg(unix)]
    {
        use std::os::unix::fs::FileTypeExt;

        let cfg_file_type = meta.file_type();
        if cfg_file_type.is_fifo() {
            return "FIFO";
        }
        if cfg_file_type.is_socket() {
            return "socket";
        }
        if cfg_file_type.is_block_device() || cfg_file_type.is_char_device() {
            return "device";
        }
    }
    #[cfg(not(unix))]
    let _ = meta;
    "special file"
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region EntryWriters

/// Copy one regular file, returning the number of bytes written.
///
/// `fs::copy` carries permission bits; timestamps are applied on request.
pub(crate) fn copy_file_with_metadata(
    path_file_src: &Path,
    path_file_dst: &Path,
    if_preserve_timestamps: bool,
) -> Result<u64, io::Error> {
    let n_bytes = fs::copy(path_file_src, path_file_dst)?;
    if if_preserve_timestamps {
        let stat_src = fs::metadata(path_file_src)?;
        set_file_times(
            path_file_dst,
            FileTime::from_last_access_time(&stat_src),
            FileTime::from_last_modification_time(&stat_src),
        )?;
    }
    Ok(n_bytes)
}

pub(crate) fn create_symbolic_link(path_src: &Path, path_dst: &Path) -> Result<(), io::Error> {
    let target = fs::read_link(path_src)?;

    #[cfg(unix)]
    {
        std::os::unix::fs::symlink(&target, path_dst)
    }
    #[cfg(windows)]
    {
        use std::os::windows::fs::{symlink_dir, symlink_file};
        if path_src.is_dir() {
            symlink_dir(&target, path_dst)
        } else {
            symlink_file(&target, path_dst)
        }
    }
    #[cfg(not(any(unix, windows)))]
    {
        let _ = (target, path_dst);
        Err(io::Error::new(
            io::ErrorKind::Unsupported,
            "Symbolic links are unsupported on this platform",
        ))
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use std::path::Path;

    use super::{compile_patterns_exclude, derive_destination_path, should_exclude_by_patterns};
    use crate::spec::FileSystemError;

    #[test]
    fn exclude_patterns_match_basenames() {
        let patterns = vec!["*.map".to_string(), ".DS_Store".to_string()];
        let set_glob = compile_patterns_exclude(Some(patterns.as_slice())).expect("compile");

        assert!(should_exclude_by_patterns("app.js.map", set_glob.as_ref()));
        assert!(should_exclude_by_patterns(".DS_Store", set_glob.as_ref()));
        assert!(!should_exclude_by_patterns("app.js", set_glob.as_ref()));
    }

    #[test]
    fn empty_pattern_list_excludes_nothing() {
        let set_glob = compile_patterns_exclude(Some([].as_slice())).expect("compile");
        assert!(set_glob.is_none());
        assert!(!should_exclude_by_patterns("anything", set_glob.as_ref()));
    }

    #[test]
    fn invalid_glob_is_reported() {
        let patterns = vec!["[".to_string()];
        let err = compile_patterns_exclude(Some(patterns.as_slice())).expect_err("must fail");
        assert!(matches!(err, FileSystemError::InvalidPattern(_)));
    }

    #[test]
    fn destination_path_keeps_relative_tree() {
        let path_dst = derive_destination_path(
            Path::new("/work/src/css/site.css"),
            Path::new("/work/src"),
            Path::new("/work/dist"),
        );
        assert_eq!(path_dst, Path::new("/work/dist/css/site.css"));
    }
}
