use super::DeployError;
use clap::ValueEnum;
use serde::Deserialize;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Closed set of supported Python web frameworks
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Framework {
    Flask,
    Fastapi,
    Django,
}

impl FromStr for Framework {
    type Err = DeployError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "flask" => Ok(Self::Flask),
            "fastapi" => Ok(Self::Fastapi),
            "django" => Ok(Self::Django),
            other => Err(DeployError::UnsupportedFramework(other.to_string())),
        }
    }
}

impl fmt::Display for Framework {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Flask => write!(f, "flask"),
            Self::Fastapi => write!(f, "fastapi"),
            Self::Django => write!(f, "django"),
        }
    }
}

/// Everything one deployment needs, resolved from CLI flags and the optional
/// project config file. Request-scoped; nothing is persisted.
#[derive(Debug, Clone)]
pub struct DeploymentRequest {
    pub project_path: PathBuf,
    pub service_name: String,
    pub framework: Framework,
    pub port: u16,
    pub venv_name: String,
    pub workers: u32,
    pub timeout: u32,
    pub domain: Option<String>,
    /// Accepted for compatibility; provisions nothing
    pub enable_db: bool,
    /// KEY=VALUE file, relative to the project directory
    pub env_file: Option<String>,
    pub frontend_path: Option<PathBuf>,
    pub frontend_url_prefix: String,
    pub api_url_prefix: String,
    pub verbose: bool,
}

impl DeploymentRequest {
    pub fn venv_path(&self) -> PathBuf {
        self.project_path.join(&self.venv_name)
    }

    /// Django targets `<basename>.wsgi:application`
    pub fn project_basename(&self) -> String {
        self.project_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    }

    /// A frontend is only considered present when the directory exists
    pub fn has_frontend(&self) -> bool {
        self.frontend_path.as_deref().is_some_and(Path::is_dir)
    }

    /// Checked before any host mutation happens
    pub fn validate(&self) -> Result<(), DeployError> {
        if self.service_name.trim().is_empty() {
            return Err(DeployError::Validation("service name is empty".into()));
        }
        if self.port == 0 {
            return Err(DeployError::Validation("port must be positive".into()));
        }
        if !self.project_path.is_dir() {
            return Err(DeployError::Validation(format!(
                "project path does not exist: {}",
                self.project_path.display()
            )));
        }
        if !self.venv_path().is_dir() {
            return Err(DeployError::Validation(format!(
                "virtual environment '{}' not found in {} (create it and install \
                 the application dependencies first)",
                self.venv_name,
                self.project_path.display()
            )));
        }
        Ok(())
    }
}
