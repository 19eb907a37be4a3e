// ABOUTME: Command-line arguments for teabag
//
// teabag [BUNDLE] - BUNDLE skips the file browser when given

use clap::Parser;
use std::path::{Path, PathBuf};

/// Install an AppImage and register it with the desktop launcher
#[derive(Parser, Debug)]
#[command(name = "teabag")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// AppImage to install (opens a file browser when omitted)
    pub bundle: Option<PathBuf>,

    /// Configuration file holding the AppImage directory
    #[arg(long, env = "TEABAG_CONFIG")]
    pub config: Option<PathBuf>,

    /// Directory desktop entries are registered in
    #[arg(long, env = "TEABAG_APPLICATIONS_DIR")]
    pub applications_dir: Option<PathBuf>,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,
}

/// Reject a bundle argument that is not on disk
pub fn validate_bundle(path: &Path) -> anyhow::Result<()> {
    if !path.exists() {
        anyhow::bail!("File not found: {}", path.display());
    }
    Ok(())
}
