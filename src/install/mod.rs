// ABOUTME: Installation pipeline run once when the wizard reaches Processing
// Moves the AppImage, marks it executable, stages a desktop entry and registers it,
// falling back to the polkit helper when the registration directory is not writable

use std::ffi::OsString;
use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, warn};

pub mod desktop_entry;
pub mod system;

pub use desktop_entry::DesktopEntry;
pub use system::{CommandError, HostSystem, SystemCommands};

/// Privilege escalation helper that shows a graphical consent prompt
pub const ESCALATION_HELPER: &str = "pkexec";

/// Refreshes the launcher's desktop entry cache
pub const CACHE_REFRESH_TOOL: &str = "update-desktop-database";

const EXECUTABLE_MODE: u32 = 0o755;

/// Answers collected by the wizard
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallRequest {
    pub bundle_path: PathBuf,
    pub target_dir: PathBuf,
    pub app_name: String,
    pub description: String,
    pub icon_path: String,
    pub categories: String,
}

/// What a successful run produced
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallReport {
    pub bundle_path: PathBuf,
    pub desktop_entry_path: PathBuf,
    pub used_escalation: bool,
}

#[derive(Debug, Error)]
pub enum InstallError {
    #[error("failed to get absolute path for {}: {source}", path.display())]
    AbsolutePath {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("not a file: {}", path.display())]
    InvalidBundle { path: PathBuf },

    #[error("failed to move file to {}: {source}", to.display())]
    MoveBundle {
        to: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to make executable: {source}")]
    MakeExecutable {
        #[source]
        source: std::io::Error,
    },

    #[error("failed to create temp desktop entry {}: {source}", path.display())]
    StageEntry {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to copy desktop file: {source}")]
    PrivilegedCopy {
        #[source]
        source: CommandError,
    },

    #[error("Installation requires administrator privileges.\n\nRerun with sudo or pkexec.\n{source}")]
    ElevationRequired {
        #[source]
        source: std::io::Error,
    },
}

pub struct InstallPipeline {
    registration_dir: PathBuf,
    scratch_dir: PathBuf,
    system: Arc<dyn SystemCommands + Send + Sync>,
}

impl InstallPipeline {
    pub fn new(
        registration_dir: PathBuf,
        scratch_dir: PathBuf,
        system: Arc<dyn SystemCommands + Send + Sync>,
    ) -> Self {
        Self {
            registration_dir,
            scratch_dir,
            system,
        }
    }

    /// `target_dir` joined with the bundle's file name
    pub fn destination_for(bundle_path: &Path, target_dir: &Path) -> Option<PathBuf> {
        bundle_path.file_name().map(|name| target_dir.join(name))
    }

    /// Run every step; the first failure aborts the rest.
    ///
    /// Nothing is rolled back: a failed registration leaves the AppImage moved
    /// and executable.
    pub fn run(&self, request: &InstallRequest) -> Result<InstallReport, InstallError> {
        let source = absolute(&request.bundle_path)?;
        let target_dir = absolute(&request.target_dir)?;
        let destination = Self::destination_for(&source, &target_dir)
            .ok_or_else(|| InstallError::InvalidBundle { path: source.clone() })?;

        if source == destination {
            info!("{:?} is already in place, skipping move", destination);
        } else {
            info!("Moving {:?} to {:?}", source, destination);
            fs::rename(&source, &destination).map_err(|e| InstallError::MoveBundle {
                to: destination.clone(),
                source: e,
            })?;
        }

        fs::set_permissions(&destination, fs::Permissions::from_mode(EXECUTABLE_MODE))
            .map_err(|source| InstallError::MakeExecutable { source })?;

        let entry = DesktopEntry::new(
            &request.app_name,
            destination.clone(),
            &request.categories,
            &request.description,
            &request.icon_path,
        );
        let file_name = entry.file_name();

        let staged = self.scratch_dir.join(&file_name);
        fs::write(&staged, entry.to_string()).map_err(|source| InstallError::StageEntry {
            path: staged.clone(),
            source,
        })?;

        let registered = self.registration_dir.join(&file_name);
        let used_escalation = self.register(&staged, &registered)?;

        info!(
            "Installed {} ({:?}, entry {:?})",
            request.app_name, destination, registered
        );
        Ok(InstallReport {
            bundle_path: destination,
            desktop_entry_path: registered,
            used_escalation,
        })
    }

    /// Copy the staged entry into place. Returns whether the helper was needed.
    fn register(&self, staged: &Path, registered: &Path) -> Result<bool, InstallError> {
        let copy_error = match fs::copy(staged, registered) {
            Ok(_) => {
                self.refresh_desktop_cache(false);
                return Ok(false);
            }
            Err(e) => e,
        };

        warn!("Unprivileged copy to {:?} failed: {}", registered, copy_error);

        if !self.system.command_exists(ESCALATION_HELPER) {
            return Err(InstallError::ElevationRequired { source: copy_error });
        }

        info!("Retrying copy through {}", ESCALATION_HELPER);
        let args = vec![
            OsString::from("cp"),
            staged.as_os_str().to_owned(),
            registered.as_os_str().to_owned(),
        ];
        self.system
            .run(ESCALATION_HELPER, &args)
            .map_err(|source| InstallError::PrivilegedCopy { source })?;

        self.refresh_desktop_cache(true);
        Ok(true)
    }

    /// Best-effort; failures are only logged
    fn refresh_desktop_cache(&self, via_helper: bool) {
        if !self.system.command_exists(CACHE_REFRESH_TOOL) {
            return;
        }

        let dir = self.registration_dir.as_os_str().to_owned();
        let result = if via_helper {
            self.system
                .run(ESCALATION_HELPER, &[OsString::from(CACHE_REFRESH_TOOL), dir])
        } else {
            self.system.run(CACHE_REFRESH_TOOL, &[dir])
        };

        if let Err(e) = result {
            warn!("Desktop cache refresh failed: {}", e);
        }
    }
}

fn absolute(path: &Path) -> Result<PathBuf, InstallError> {
    std::path::absolute(path).map_err(|source| InstallError::AbsolutePath {
        path: path.to_path_buf(),
        source,
    })
}
