use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use log::LevelFilter;

use distkit_io_fs::conf::{C_DIR_DESTINATION_DEFAULT, C_DIR_SOURCE_DEFAULT, C_MSG_BUILD_COMPLETED};
use distkit_io_fs::{SpecPublishConfig, publish};

#[derive(Parser)]
#[command(
    name = "distkit-build",
    about = "Copy the source tree into the distribution directory",
    version
)]
struct Cli {
    /// Directory to copy from
    #[arg(long, default_value = C_DIR_SOURCE_DEFAULT)]
    source: PathBuf,

    /// Directory to copy into (created if missing)
    #[arg(long, default_value = C_DIR_DESTINATION_DEFAULT)]
    destination: PathBuf,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Do not print the completion notice
    #[arg(short, long)]
    quiet: bool,
}

fn init_logger(verbose: u8) {
    let level = match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        _ => LevelFilter::Debug,
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logger(cli.verbose);

    let spec_publish_config = SpecPublishConfig::new(cli.source, cli.destination);
    publish(&spec_publish_config).with_context(|| {
        format!(
            "failed to publish {} to {}",
            spec_publish_config.path_source.display(),
            spec_publish_config.path_destination.display()
        )
    })?;

    if !cli.quiet {
        println!("{C_MSG_BUILD_COMPLETED}");
    }
    Ok(())
}
