use super::DeployError;
use std::fmt::Debug;
use std::path::Path;

/// Captured outcome of one external command. Consumed immediately by the
/// caller; nothing here outlives a deployment run.
#[derive(Debug, Clone)]
pub struct ExecutionResult {
    pub status: i32,
    pub stdout: String,
    pub stderr: String,
}

/// Trait for host-level operations (process spawn, privileged file writes)
///
/// Deployment talks to the machine exclusively through this seam so tests
/// can swap in a recording fake.
pub trait HostRunner: Send + Sync + Debug {
    /// Run a command to completion, capturing stdout/stderr. A non-zero exit
    /// is an error carrying the captured stderr. No retry, no timeout.
    fn run(&self, program: &str, args: &[&str]) -> Result<ExecutionResult, DeployError>;

    /// Check whether a tool answers at all (spawned and exited zero)
    fn probe(&self, program: &str, args: &[&str]) -> bool;

    /// Existence check that also works for root-only paths
    fn path_exists(&self, path: &Path) -> bool;

    /// Write a root-owned config file, staged through a temp file
    fn write_privileged(&self, path: &Path, content: &str) -> Result<(), DeployError>;

    /// Create a symlink as root
    fn symlink(&self, target: &Path, link: &Path) -> Result<(), DeployError>;
}
