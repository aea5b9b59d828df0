use crate::domain::DeployError;
use serde::Deserialize;
use std::fs;
use std::path::Path;
use tracing::debug;

pub const PROJECT_CONFIG_NAME: &str = "pydeploy.toml";

/// Optional per-project defaults for the tunable deployment knobs.
///
/// Lives next to the code being deployed; CLI flags always win over it.
/// Required parameters (service name, framework, port, venv) stay CLI-only
/// so a deployment is never ambiguous about what it targets.
#[derive(Deserialize, Debug, Default, Clone)]
#[serde(deny_unknown_fields)]
pub struct ProjectConfig {
    pub workers: Option<u32>,
    pub timeout: Option<u32>,
    pub domain: Option<String>,
    pub env_file: Option<String>,
    pub frontend_path: Option<String>,
    pub frontend_url_prefix: Option<String>,
    pub api_url_prefix: Option<String>,
}

/// Load `pydeploy.toml` from the project directory; absence is not an error.
pub fn load_project_config(project_dir: &Path) -> Result<ProjectConfig, DeployError> {
    let path = project_dir.join(PROJECT_CONFIG_NAME);
    if !path.is_file() {
        return Ok(ProjectConfig::default());
    }

    debug!("loading project defaults from {}", path.display());
    let content = fs::read_to_string(&path).map_err(|source| DeployError::Io {
        path: path.clone(),
        source,
    })?;

    parse_project_config(&content, &path)
}

fn parse_project_config(content: &str, path: &Path) -> Result<ProjectConfig, DeployError> {
    toml::from_str(content)
        .map_err(|e| DeployError::Validation(format!("parsing {}: {e}", path.display())))
}
