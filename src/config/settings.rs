// ABOUTME: Runtime paths resolved once at startup from flags, environment and platform dirs

use std::path::PathBuf;

use super::CONFIG_FILE;
use crate::cli::Cli;

/// System-wide launcher registration directory
pub const DEFAULT_REGISTRATION_DIR: &str = "/usr/share/applications";

/// Directory name suggested on first run, under the home directory
pub const DEFAULT_APPIMAGE_DIR_NAME: &str = "Applications";

#[derive(Debug, Clone)]
pub struct Settings {
    /// Persisted configuration file
    pub config_path: PathBuf,
    /// Where desktop entries must end up to be discovered
    pub registration_dir: PathBuf,
    /// Where the desktop entry is staged before the copy
    pub scratch_dir: PathBuf,
    pub home_dir: PathBuf,
    /// Directory the bundle browser opens in
    pub start_dir: PathBuf,
    pub no_color: bool,
}

impl Settings {
    pub fn from_cli(cli: &Cli) -> Self {
        let home_dir = dirs::home_dir().unwrap_or_else(|| PathBuf::from("/"));
        let start_dir = std::env::current_dir().unwrap_or_else(|_| home_dir.clone());

        Self {
            config_path: cli
                .config
                .clone()
                .unwrap_or_else(|| home_dir.join(CONFIG_FILE)),
            registration_dir: cli
                .applications_dir
                .clone()
                .unwrap_or_else(|| PathBuf::from(DEFAULT_REGISTRATION_DIR)),
            scratch_dir: std::env::temp_dir(),
            start_dir,
            no_color: cli.no_color || std::env::var_os("NO_COLOR").is_some(),
            home_dir,
        }
    }

    /// First-run suggestion for the AppImage directory
    pub fn default_appimage_dir(&self) -> PathBuf {
        self.home_dir.join(DEFAULT_APPIMAGE_DIR_NAME)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_flags_override_defaults() {
        let cli = Cli::parse_from([
            "teabag",
            "--config",
            "/tmp/teabag.conf",
            "--applications-dir",
            "/tmp/apps",
        ]);
        let settings = Settings::from_cli(&cli);

        assert_eq!(settings.config_path, PathBuf::from("/tmp/teabag.conf"));
        assert_eq!(settings.registration_dir, PathBuf::from("/tmp/apps"));
    }

    #[test]
    fn test_default_appimage_dir_is_under_home() {
        let cli = Cli::parse_from(["teabag", "--config", "/tmp/c", "--applications-dir", "/tmp/a"]);
        let settings = Settings::from_cli(&cli);
        assert_eq!(
            settings.default_appimage_dir(),
            settings.home_dir.join("Applications")
        );
    }
}
