//! Copy report models and mutable report builder.

use std::collections::BTreeMap;
use std::fmt;

/// Aggregate counters for one `copy_tree` run.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ReportCopy {
    /// Total scanned directory/file entries.
    pub cnt_scanned: u64,
    /// Destination directories that did not exist before the run.
    pub cnt_dirs_created: u64,
    /// Regular files written.
    pub cnt_copied: u64,
    /// Symbolic links recreated at destination.
    pub cnt_symlinks: u64,
    /// Entries skipped by exclude pattern, symlink strategy or conflict rule.
    pub cnt_skipped: u64,
    /// Bytes written for regular files.
    pub cnt_bytes: u64,
}

impl ReportCopy {
    /// Machine-readable counters.
    pub fn to_dict(&self) -> BTreeMap<String, u64> {
        let mut dict_counts = BTreeMap::new();
        dict_counts.insert("cnt_scanned".to_string(), self.cnt_scanned);
        dict_counts.insert("cnt_dirs_created".to_string(), self.cnt_dirs_created);
        dict_counts.insert("cnt_copied".to_string(), self.cnt_copied);
        dict_counts.insert("cnt_symlinks".to_string(), self.cnt_symlinks);
        dict_counts.insert("cnt_skipped".to_string(), self.cnt_skipped);
        dict_counts.insert("cnt_bytes".to_string(), self.cnt_bytes);
        dict_counts
    }

    /// Human-readable one-line summary.
    pub fn format(&self, prefix: &str) -> String {
        format!(
            "{prefix} scanned={} dirs={} copied={} symlinks={} skipped={} bytes={}",
            self.cnt_scanned,
            self.cnt_dirs_created,
            self.cnt_copied,
            self.cnt_symlinks,
            self.cnt_skipped,
            self.cnt_bytes
        )
    }
}

impl fmt::Display for ReportCopy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format("[PUBLISH]"))
    }
}

/// Mutable accumulator for copy statistics.
#[derive(Debug, Default, Clone)]
pub struct ReportCopyBuilder {
    report: ReportCopy,
}

impl ReportCopyBuilder {
    pub fn add_scanned(&mut self) {
        self.report.cnt_scanned += 1;
    }

    pub fn add_dir_created(&mut self) {
        self.report.cnt_dirs_created += 1;
    }

    /// Count one written file and its size.
    pub fn add_copied(&mut self, n_bytes: u64) {
        self.report.cnt_copied += 1;
        self.report.cnt_bytes += n_bytes;
    }

    pub fn add_symlink(&mut self) {
        self.report.cnt_symlinks += 1;
    }

    pub fn add_skipped(&mut self) {
        self.report.cnt_skipped += 1;
    }

    /// Finalize builder into immutable report.
    pub fn build(self) -> ReportCopy {
        self.report
    }
}
