//! Filesystem tree traversal and copy orchestration.

use std::collections::HashSet;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use globset::GlobSet;
use log::debug;

use crate::report::{ReportCopy, ReportCopyBuilder};
use crate::spec::{
    EnumCopyFileConflictStrategy, EnumCopySymlinkStrategy, FileSystemError, SpecCopyOptions,
};
use crate::util::{
    compile_patterns_exclude, copy_file_with_metadata, create_symbolic_link,
    derive_destination_path, describe_special_file, is_overlap, should_exclude_by_patterns,
    validate_destination_path_safety,
};

#[derive(Debug, Clone)]
struct SpecDirEntry {
    path_dir_src_sub: PathBuf,
}

#[derive(Debug, Clone)]
struct SpecFileEntry {
    path_file_src: PathBuf,
    if_is_symlink: bool,
}

#[derive(Debug)]
struct SpecCopyContext {
    path_dir_src: PathBuf,
    path_dir_dst: PathBuf,
    spec_cp_options: SpecCopyOptions,
    patterns_exclude: Option<GlobSet>,
    builder_cp_report: ReportCopyBuilder,
    /// `(dev, ino)` of the directories on the current descent path.
    set_ancestor_dirs: HashSet<(u64, u64)>,
}

impl SpecCopyContext {
    fn check_destination_path(
        &self,
        path_dst: &Path,
        if_allow_symlink_leaf: bool,
    ) -> Result<(), FileSystemError> {
        if !self.spec_cp_options.if_guard_destination_symlinks {
            return Ok(());
        }
        validate_destination_path_safety(path_dst, &self.path_dir_dst, if_allow_symlink_leaf)
    }
}

/// Copy a directory tree from `dir_source` into `dir_destination`.
///
/// The destination root and any missing ancestors are created first. Every
/// file and subdirectory is then copied recursively; destination entries that
/// do not exist in the source are left alone.
///
/// The run stops at the first failing entry and returns that error. Whatever
/// was copied before the failure stays on disk.
pub fn copy_tree<P, Q>(
    dir_source: P,
    dir_destination: Q,
    spec_cp_options: SpecCopyOptions,
) -> Result<ReportCopy, FileSystemError>
where
    P: AsRef<Path>,
    Q: AsRef<Path>,
{
    let path_dir_src = dir_source.as_ref().to_path_buf();
    let path_dir_dst = dir_destination.as_ref().to_path_buf();

    let patterns_exclude = compile_patterns_exclude(spec_cp_options.patterns_exclude.as_deref())?;

    let meta_dir_src = fs::metadata(&path_dir_src).map_err(|e| match e.kind() {
        io::ErrorKind::NotFound => FileSystemError::SourceNotFound(path_dir_src.clone()),
        _ => FileSystemError::SourceUnreadable {
            path: path_dir_src.clone(),
            source: e,
        },
    })?;
    if !meta_dir_src.is_dir() {
        return Err(FileSystemError::SourceNotDirectory(path_dir_src));
    }
    if is_overlap(&path_dir_src, &path_dir_dst) {
        return Err(FileSystemError::SourceDestinationOverlap {
            path_source: path_dir_src,
            path_destination: path_dir_dst,
        });
    }

    init_destination_root(&path_dir_dst, spec_cp_options.if_guard_destination_symlinks)?;

    let mut spec_cp_ctx = SpecCopyContext {
        path_dir_src: path_dir_src.clone(),
        path_dir_dst,
        spec_cp_options,
        patterns_exclude,
        builder_cp_report: ReportCopyBuilder::default(),
        set_ancestor_dirs: HashSet::new(),
    };

    walk_directory(&path_dir_src, &mut spec_cp_ctx)?;
    Ok(spec_cp_ctx.builder_cp_report.build())
}

/// Ensure the destination root is a directory, creating it when missing.
///
/// A symlink to a directory counts as an existing directory unless the
/// destination symlink guard is on.
fn init_destination_root(
    path_dir_dst: &Path,
    if_guard_destination_symlinks: bool,
) -> Result<(), FileSystemError> {
    let err_init = |message: String| FileSystemError::DestinationInitFailed {
        path: path_dir_dst.to_path_buf(),
        message,
    };

    if if_guard_destination_symlinks
        && fs::symlink_metadata(path_dir_dst).is_ok_and(|m| m.file_type().is_symlink())
    {
        return Err(err_init(
            "Destination root path must not be a symbolic link.".to_string(),
        ));
    }
    if let Ok(meta_dir_dst) = fs::metadata(path_dir_dst) {
        if !meta_dir_dst.is_dir() {
            return Err(err_init(
                "Destination exists and is not a directory.".to_string(),
            ));
        }
        return Ok(());
    }

    fs::create_dir_all(path_dir_dst).map_err(|e| err_init(e.to_string()))?;
    debug!("Created destination root {}", path_dir_dst.display());
    Ok(())
}

/// Walk one source directory. Under `Dereference` a directory that is already
/// one of its own ancestors is a loop; the same directory reached through two
/// sibling links is not.
fn walk_directory(
    path_root: &Path,
    spec_cp_ctx: &mut SpecCopyContext,
) -> Result<(), FileSystemError> {
    #[cfg(unix)]
    if spec_cp_ctx.spec_cp_options.rule_symlink == EnumCopySymlinkStrategy::Dereference {
        use std::os::unix::fs::MetadataExt;

        let stat_root = fs::metadata(path_root).map_err(|e| FileSystemError::SourceUnreadable {
            path: path_root.to_path_buf(),
            source: e,
        })?;
        let tuple_dir_identifier = (stat_root.dev(), stat_root.ino());
        if !spec_cp_ctx.set_ancestor_dirs.insert(tuple_dir_identifier) {
            return Err(FileSystemError::SymlinkLoop(path_root.to_path_buf()));
        }
        let res_walk = walk_directory_entries(path_root, spec_cp_ctx);
        spec_cp_ctx.set_ancestor_dirs.remove(&tuple_dir_identifier);
        return res_walk;
    }

    walk_directory_entries(path_root, spec_cp_ctx)
}

fn walk_directory_entries(
    path_root: &Path,
    spec_cp_ctx: &mut SpecCopyContext,
) -> Result<(), FileSystemError> {
    let err_unreadable = |e: io::Error| FileSystemError::SourceUnreadable {
        path: path_root.to_path_buf(),
        source: e,
    };

    let mut l_dirs: Vec<SpecDirEntry> = Vec::new();
    let mut l_files: Vec<SpecFileEntry> = Vec::new();

    for entry_res in fs::read_dir(path_root).map_err(err_unreadable)? {
        let entry = entry_res.map_err(err_unreadable)?;
        let path_entry = entry.path();
        let name_entry = entry.file_name().to_string_lossy().to_string();

        if should_exclude_by_patterns(&name_entry, spec_cp_ctx.patterns_exclude.as_ref()) {
            debug!("Excluded by pattern: {}", path_entry.display());
            spec_cp_ctx.builder_cp_report.add_scanned();
            spec_cp_ctx.builder_cp_report.add_skipped();
            continue;
        }

        let cfg_file_type = entry
            .file_type()
            .map_err(|e| FileSystemError::SourceUnreadable {
                path: path_entry.clone(),
                source: e,
            })?;

        let b_is_symlink = cfg_file_type.is_symlink();
        let b_is_dir = cfg_file_type.is_dir()
            || (b_is_symlink
                && spec_cp_ctx.spec_cp_options.rule_symlink
                    == EnumCopySymlinkStrategy::Dereference
                && path_entry.is_dir());
        if b_is_dir {
            l_dirs.push(SpecDirEntry {
                path_dir_src_sub: path_entry,
            });
        } else {
            l_files.push(SpecFileEntry {
                path_file_src: path_entry,
                if_is_symlink: b_is_symlink,
            });
        }
    }

    l_dirs.sort_by(|a, b| a.path_dir_src_sub.cmp(&b.path_dir_src_sub));
    l_files.sort_by(|a, b| a.path_file_src.cmp(&b.path_file_src));

    for spec_dir_entry in l_dirs {
        handle_dir_entry(spec_dir_entry, spec_cp_ctx)?;
    }
    for spec_file_entry in l_files {
        handle_file_entry(spec_file_entry, spec_cp_ctx)?;
    }
    Ok(())
}

fn handle_dir_entry(
    spec_dir_entry: SpecDirEntry,
    spec_cp_ctx: &mut SpecCopyContext,
) -> Result<(), FileSystemError> {
    spec_cp_ctx.builder_cp_report.add_scanned();

    let path_dir_dst_sub = derive_destination_path(
        &spec_dir_entry.path_dir_src_sub,
        &spec_cp_ctx.path_dir_src,
        &spec_cp_ctx.path_dir_dst,
    );
    spec_cp_ctx.check_destination_path(&path_dir_dst_sub, false)?;

    // `metadata` follows links: a symlinked directory in the destination is merged into.
    match fs::metadata(&path_dir_dst_sub) {
        Ok(meta_dst) if meta_dst.is_dir() => {
            debug!("Merging into {}", path_dir_dst_sub.display());
        }
        Ok(_) => {
            return Err(FileSystemError::EntryTypeConflict {
                path: path_dir_dst_sub,
                expected: "directory",
                found: "file",
            });
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            fs::create_dir(&path_dir_dst_sub).map_err(|e| FileSystemError::EntryCopyFailed {
                path: path_dir_dst_sub.clone(),
                source: e,
            })?;
            debug!("Created {}", path_dir_dst_sub.display());
            spec_cp_ctx.builder_cp_report.add_dir_created();
        }
        Err(e) => {
            return Err(FileSystemError::EntryCopyFailed {
                path: path_dir_dst_sub,
                source: e,
            });
        }
    }

    walk_directory(&spec_dir_entry.path_dir_src_sub, spec_cp_ctx)
}

fn handle_file_entry(
    spec_file_entry: SpecFileEntry,
    spec_cp_ctx: &mut SpecCopyContext,
) -> Result<(), FileSystemError> {
    spec_cp_ctx.builder_cp_report.add_scanned();

    let path_file_src = spec_file_entry.path_file_src;
    let enum_rule_symlink = spec_cp_ctx.spec_cp_options.rule_symlink;

    if spec_file_entry.if_is_symlink {
        match enum_rule_symlink {
            EnumCopySymlinkStrategy::SkipSymlinks => {
                debug!("Symlink skipped: {}", path_file_src.display());
                spec_cp_ctx.builder_cp_report.add_skipped();
                return Ok(());
            }
            EnumCopySymlinkStrategy::CopySymlinks => {
                return place_symlink(&path_file_src, spec_cp_ctx);
            }
            EnumCopySymlinkStrategy::Dereference => {}
        }
    }

    // `metadata` follows links, so dereferenced targets are classified here too.
    let meta_file_src = match fs::metadata(&path_file_src) {
        Ok(v) => v,
        Err(e) if e.kind() == io::ErrorKind::NotFound && spec_file_entry.if_is_symlink => {
            return Err(FileSystemError::BrokenSymlink(path_file_src));
        }
        Err(e) => {
            return Err(FileSystemError::SourceUnreadable {
                path: path_file_src,
                source: e,
            });
        }
    };
    if !meta_file_src.is_file() {
        return Err(FileSystemError::UnsupportedEntry {
            kind: describe_special_file(&meta_file_src),
            path: path_file_src,
        });
    }

    let path_file_dst = derive_destination_path(
        &path_file_src,
        &spec_cp_ctx.path_dir_src,
        &spec_cp_ctx.path_dir_dst,
    );
    spec_cp_ctx.check_destination_path(&path_file_dst, false)?;

    if let Ok(meta_dst) = fs::metadata(&path_file_dst) {
        if meta_dst.is_dir() {
            return Err(FileSystemError::EntryTypeConflict {
                path: path_file_dst,
                expected: "file",
                found: "directory",
            });
        }
        if should_skip_file_conflict(&path_file_dst, spec_cp_ctx)? {
            return Ok(());
        }
    }

    let n_bytes = copy_file_with_metadata(
        &path_file_src,
        &path_file_dst,
        spec_cp_ctx.spec_cp_options.if_preserve_timestamps,
    )
    .map_err(|e| FileSystemError::EntryCopyFailed {
        path: path_file_dst.clone(),
        source: e,
    })?;
    debug!(
        "Copied {} -> {} ({n_bytes} bytes)",
        path_file_src.display(),
        path_file_dst.display()
    );
    spec_cp_ctx.builder_cp_report.add_copied(n_bytes);
    Ok(())
}

/// Apply the file conflict rule to an existing destination entry.
///
/// Returns `Ok(true)` when the source entry must be skipped.
fn should_skip_file_conflict(
    path_dst: &Path,
    spec_cp_ctx: &mut SpecCopyContext,
) -> Result<bool, FileSystemError> {
    match spec_cp_ctx.spec_cp_options.rule_conflict_file {
        EnumCopyFileConflictStrategy::Overwrite => Ok(false),
        EnumCopyFileConflictStrategy::Skip => {
            debug!("Destination kept: {}", path_dst.display());
            spec_cp_ctx.builder_cp_report.add_skipped();
            Ok(true)
        }
        EnumCopyFileConflictStrategy::Error => {
            Err(FileSystemError::DestinationExists(path_dst.to_path_buf()))
        }
    }
}

fn place_symlink(
    path_link_src: &Path,
    spec_cp_ctx: &mut SpecCopyContext,
) -> Result<(), FileSystemError> {
    let path_link_dst = derive_destination_path(
        path_link_src,
        &spec_cp_ctx.path_dir_src,
        &spec_cp_ctx.path_dir_dst,
    );
    spec_cp_ctx.check_destination_path(&path_link_dst, true)?;

    if let Ok(meta_dst) = fs::symlink_metadata(&path_link_dst) {
        if meta_dst.is_dir() {
            return Err(FileSystemError::EntryTypeConflict {
                path: path_link_dst,
                expected: "symlink",
                found: "directory",
            });
        }
        if should_skip_file_conflict(&path_link_dst, spec_cp_ctx)? {
            return Ok(());
        }
        fs::remove_file(&path_link_dst).map_err(|e| FileSystemError::EntryCopyFailed {
            path: path_link_dst.clone(),
            source: e,
        })?;
    }

    create_symbolic_link(path_link_src, &path_link_dst).map_err(|e| {
        FileSystemError::EntryCopyFailed {
            path: path_link_dst.clone(),
            source: e,
        }
    })?;
    debug!("Linked {}", path_link_dst.display());
    spec_cp_ctx.builder_cp_report.add_symlink();
    Ok(())
}
