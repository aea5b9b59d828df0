//! Composes the systemd unit for the supervised application process.

use crate::domain::{DeployError, DeploymentRequest, Framework};
use crate::render::{Substitutions, templates};
use std::fs;
use tracing::{debug, info};

/// User/group the service runs as, resolved from the invoking identity
#[derive(Debug, Clone)]
pub struct Identity {
    pub user: String,
    pub group: String,
}

/// Final unit text, ready to land at /etc/systemd/system/<name>.service
#[derive(Debug, Clone)]
pub struct RenderedUnit {
    pub service_name: String,
    pub content: String,
}

pub fn build_unit(
    request: &DeploymentRequest,
    identity: &Identity,
) -> Result<RenderedUnit, DeployError> {
    let venv_path = request.venv_path();
    let exec_start = exec_start(request);
    debug!("ExecStart: {exec_start}");

    let environment_vars = environment_directives(request)?;

    let mut vars = Substitutions::new();
    vars.insert("service_name", request.service_name.clone());
    vars.insert("user", identity.user.clone());
    vars.insert("group", identity.group.clone());
    vars.insert("project_path", request.project_path.display().to_string());
    vars.insert("exec_start", exec_start);
    vars.insert("venv_path", venv_path.display().to_string());
    vars.insert("environment_vars", environment_vars);

    let content = templates::SYSTEMD_UNIT.render(&vars)?;

    Ok(RenderedUnit {
        service_name: request.service_name.clone(),
        content,
    })
}

/// Launch command line for the given framework.
///
/// The framework set is closed; an unknown name already failed at parse time.
pub fn exec_start(request: &DeploymentRequest) -> String {
    let venv = request.venv_path();
    let venv = venv.display();
    let port = request.port;
    let workers = request.workers;
    let timeout = request.timeout;

    match request.framework {
        Framework::Fastapi => format!(
            "{venv}/bin/uvicorn main:app --host 0.0.0.0 --port {port} \
             --workers {workers} --timeout-keep-alive {timeout}"
        ),
        Framework::Flask => {
            format!("{venv}/bin/gunicorn -w {workers} -b 0.0.0.0:{port} -t {timeout} app:app")
        }
        Framework::Django => {
            let project = request.project_basename();
            format!(
                "{venv}/bin/gunicorn -w {workers} -b 0.0.0.0:{port} -t {timeout} \
                 {project}.wsgi:application"
            )
        }
    }
}

/// One `Environment="KEY=VALUE"` directive per assignment in the env file.
///
/// Duplicate keys stay duplicated; systemd's own last-wins semantics apply.
fn environment_directives(request: &DeploymentRequest) -> Result<String, DeployError> {
    let Some(env_file) = request.env_file.as_deref() else {
        return Ok(String::new());
    };

    let path = request.project_path.join(env_file);
    if !path.is_file() {
        debug!("environment file {:?} not found, skipping", path);
        return Ok(String::new());
    }

    info!("loading environment variables from {env_file}");
    let content = fs::read_to_string(&path).map_err(|source| DeployError::Io {
        path: path.clone(),
        source,
    })?;

    let directives: Vec<String> = parse_env_file(&content)
        .into_iter()
        .map(|(key, value)| format!("Environment=\"{key}={value}\""))
        .collect();

    Ok(directives.join("\n"))
}

/// Newline-delimited KEY=VALUE; blank and `#` lines skipped, split on the
/// first `=` only. No quoting rules, no validation of keys.
pub fn parse_env_file(content: &str) -> Vec<(String, String)> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .filter_map(|line| {
            line.split_once('=')
                .map(|(key, value)| (key.to_string(), value.to_string()))
        })
        .collect()
}
