// ABOUTME: Seam between the install pipeline and host commands
// Probing for tools and running them goes through SystemCommands so tests can swap in fakes

use std::ffi::OsString;
use std::process::Command;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum CommandError {
    #[error("failed to run {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{program} exited with {status}")]
    Failed { program: String, status: String },
}

/// Capability probe and command runner
#[cfg_attr(test, mockall::automock)]
pub trait SystemCommands {
    /// Whether `program` is on the PATH
    fn command_exists(&self, program: &str) -> bool;

    /// Run `program` to completion, failing on a non-zero exit
    fn run(&self, program: &str, args: &[OsString]) -> Result<(), CommandError>;
}

/// Real implementation backed by `which` and `std::process`
#[derive(Debug, Default, Clone, Copy)]
pub struct HostSystem;

impl SystemCommands for HostSystem {
    fn command_exists(&self, program: &str) -> bool {
        which::which(program).is_ok()
    }

    fn run(&self, program: &str, args: &[OsString]) -> Result<(), CommandError> {
        debug!("Running {} {:?}", program, args);

        let status = Command::new(program)
            .args(args)
            .status()
            .map_err(|source| CommandError::Spawn {
                program: program.to_string(),
                source,
            })?;

        if status.success() {
            Ok(())
        } else {
            Err(CommandError::Failed {
                program: program.to_string(),
                status: status.to_string(),
            })
        }
    }
}
