use crate::domain::{DeployError, ExecutionResult, HostRunner};
use std::io::Write;
use std::path::Path;
use std::process::{Command, Stdio};
use tracing::debug;

/// [`HostRunner`] backed by real processes on the local machine.
///
/// Privileged operations go through sudo the same way an operator would run
/// them by hand; there is no daemon and no elevated state kept in-process.
#[derive(Debug, Default)]
pub struct HostSystem;

impl HostSystem {
    pub fn new() -> Self {
        Self
    }
}

impl HostRunner for HostSystem {
    fn run(&self, program: &str, args: &[&str]) -> Result<ExecutionResult, DeployError> {
        let command_line = if args.is_empty() {
            program.to_string()
        } else {
            format!("{program} {}", args.join(" "))
        };
        debug!("running: {command_line}");

        let output = Command::new(program)
            .args(args)
            .output()
            .map_err(|source| DeployError::Spawn {
                command: command_line.clone(),
                source,
            })?;

        let result = ExecutionResult {
            status: output.status.code().unwrap_or(-1),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        };

        if !output.status.success() {
            return Err(DeployError::Command {
                command: command_line,
                status: result.status,
                stderr: result.stderr.trim().to_string(),
            });
        }

        Ok(result)
    }

    fn probe(&self, program: &str, args: &[&str]) -> bool {
        Command::new(program)
            .args(args)
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .map(|s| s.success())
            .unwrap_or(false)
    }

    fn path_exists(&self, path: &Path) -> bool {
        if path.exists() {
            return true;
        }
        // A plain stat reports false for root-only trees such as
        // /etc/letsencrypt/live, so ask again with elevated rights.
        Command::new("sudo")
            .arg("test")
            .arg("-e")
            .arg(path)
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .map(|s| s.success())
            .unwrap_or(false)
    }

    fn write_privileged(&self, path: &Path, content: &str) -> Result<(), DeployError> {
        let mut staged = tempfile::NamedTempFile::new().map_err(|source| DeployError::Io {
            path: std::env::temp_dir(),
            source,
        })?;
        staged
            .write_all(content.as_bytes())
            .map_err(|source| DeployError::Io {
                path: staged.path().to_path_buf(),
                source,
            })?;

        // Detach so the file survives until sudo mv consumes it
        let staged_path = staged
            .into_temp_path()
            .keep()
            .map_err(|e| DeployError::Io {
                path: path.to_path_buf(),
                source: e.error,
            })?;

        let staged_str = staged_path.to_string_lossy().into_owned();
        let target_str = path.to_string_lossy().into_owned();
        self.run("sudo", &["mv", &staged_str, &target_str])?;
        self.run("sudo", &["chmod", "644", &target_str])?;
        Ok(())
    }

    fn symlink(&self, target: &Path, link: &Path) -> Result<(), DeployError> {
        let target_str = target.to_string_lossy().into_owned();
        let link_str = link.to_string_lossy().into_owned();
        self.run("sudo", &["ln", "-s", &target_str, &link_str])?;
        Ok(())
    }
}
