use std::path::PathBuf;
use thiserror::Error;

/// Everything that can abort a deployment. Each variant maps to one failure
/// class; nothing is retried, the first error stops the run.
#[derive(Debug, Error)]
pub enum DeployError {
    #[error("invalid input: {0}")]
    Validation(String),

    #[error("unsupported framework '{0}' (expected flask, fastapi or django)")]
    UnsupportedFramework(String),

    #[error("template '{template}' has no value for placeholder '{placeholder}'")]
    MissingKey {
        template: &'static str,
        placeholder: String,
    },

    #[error("command '{command}' exited with status {status}: {stderr}")]
    Command {
        command: String,
        status: i32,
        stderr: String,
    },

    #[error("could not spawn '{command}': {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("required packages are missing: {0} (re-run with --auto-install)")]
    Dependency(String),

    #[error("{path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
