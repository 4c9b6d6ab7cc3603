//! Subprocess implementation of the installer tool contract.

use std::path::{Path, PathBuf};
use std::process::Command;

use tracing::debug;

use super::traits::EggTool;
use super::InstallError;

/// Default installer executable, resolved through `PATH`.
const DEFAULT_PROGRAM: &str = "egginst";

/// Invokes the external installer executable.
///
/// The installer owns the bytes-on-disk work and its own atomicity; this
/// wrapper only builds the command line and reports failures.
#[derive(Debug, Clone)]
pub struct CommandEggTool {
    program: PathBuf,
}

impl Default for CommandEggTool {
    fn default() -> Self {
        Self::new(DEFAULT_PROGRAM)
    }
}

impl CommandEggTool {
    /// Use the given installer executable.
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    fn run(&self, args: &[&std::ffi::OsStr], filename: &str) -> Result<(), InstallError> {
        debug!("running {} {:?}", self.program.display(), args);
        let status = Command::new(&self.program)
            .arg("--quiet")
            .args(args)
            .status()
            .map_err(|e| InstallError::ToolFailed {
                filename: filename.to_string(),
                reason: format!("failed to run {}: {}", self.program.display(), e),
            })?;

        if status.success() {
            Ok(())
        } else {
            Err(InstallError::ToolFailed {
                filename: filename.to_string(),
                reason: format!("{} exited with {}", self.program.display(), status),
            })
        }
    }
}

impl EggTool for CommandEggTool {
    fn install(&self, prefix: &Path, egg_path: &Path) -> Result<(), InstallError> {
        let filename = egg_path
            .file_name()
            .map(|f| f.to_string_lossy().into_owned())
            .unwrap_or_else(|| egg_path.display().to_string());
        self.run(
            &[
                "--prefix".as_ref(),
                prefix.as_os_str(),
                egg_path.as_os_str(),
            ],
            &filename,
        )
    }

    fn remove(&self, prefix: &Path, filename: &str) -> Result<(), InstallError> {
        self.run(
            &[
                "--remove".as_ref(),
                "--prefix".as_ref(),
                prefix.as_os_str(),
                filename.as_ref(),
            ],
            filename,
        )
    }
}
