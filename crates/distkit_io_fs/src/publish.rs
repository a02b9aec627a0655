//! Configured build step: copy the source tree into the distribution tree.

use log::info;

use crate::copy::copy_tree;
use crate::report::ReportCopy;
use crate::spec::{FileSystemError, SpecCopyOptions, SpecPublishConfig};

/// Publish `path_source` into `path_destination` with the default merge rules.
pub fn publish(spec_publish_config: &SpecPublishConfig) -> Result<ReportCopy, FileSystemError> {
    publish_with_options(spec_publish_config, SpecCopyOptions::default())
}

pub fn publish_with_options(
    spec_publish_config: &SpecPublishConfig,
    spec_cp_options: SpecCopyOptions,
) -> Result<ReportCopy, FileSystemError> {
    info!(
        "Publishing {} -> {}",
        spec_publish_config.path_source.display(),
        spec_publish_config.path_destination.display()
    );
    let report = copy_tree(
        &spec_publish_config.path_source,
        &spec_publish_config.path_destination,
        spec_cp_options,
    )?;
    info!("{report}");
    Ok(report)
}
