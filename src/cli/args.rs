//! CLI argument definitions.

use clap::Parser;
use std::path::PathBuf;

/// Register a machine image with the job board.
///
/// Reads the image metadata tarball written during the image build, derives
/// the image's tags from it and registers the image by name. Configuration
/// comes from the environment (`JOB_BOARD_IMAGES_URL`, `IMAGE_NAME`, ...).
#[derive(Debug, Parser)]
#[command(name = "job-board-register")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Image metadata tarball (`<name>.tar.bz2`)
    pub tarball: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long)]
    pub debug: bool,
}
