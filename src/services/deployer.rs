//! Drives one deployment from validation to a running service.
//!
//! The sequence is strictly linear: the first failing step aborts the run
//! and nothing already done is rolled back. A partial deployment is an
//! accepted end state that a re-run repairs by rewriting the same files and
//! restarting the same service.

use crate::domain::{DeployError, DeploymentRequest, HostRunner};
use crate::services::deps::DependencyChecker;
use crate::services::proxy::{self, ProxyVariant};
use crate::services::unit::{self, Identity};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info};

pub const SYSTEMD_UNIT_DIR: &str = "/etc/systemd/system";
pub const SITES_AVAILABLE_DIR: &str = "/etc/nginx/sites-available";
pub const SITES_ENABLED_DIR: &str = "/etc/nginx/sites-enabled";
pub const LETSENCRYPT_LIVE_DIR: &str = "/etc/letsencrypt/live";

/// What a finished deployment looks like, for the final report
#[derive(Debug, Clone)]
pub struct DeploymentReport {
    pub unit_path: PathBuf,
    pub proxy_path: Option<PathBuf>,
    pub proxy_variant: Option<ProxyVariant>,
    pub tls: bool,
    pub urls: Vec<String>,
    pub status: String,
}

pub struct Deployer {
    runner: Arc<dyn HostRunner>,
    deps: DependencyChecker,
}

impl Deployer {
    pub fn new(runner: Arc<dyn HostRunner>) -> Self {
        let deps = DependencyChecker::new(runner.clone());
        Self { runner, deps }
    }

    pub fn deploy(
        &self,
        request: &DeploymentRequest,
        auto_install: bool,
    ) -> Result<DeploymentReport, DeployError> {
        request.validate()?;
        info!(
            "deploying {} application from {}",
            request.framework,
            request.project_path.display()
        );
        if request.enable_db {
            debug!("--enable-db is accepted but database provisioning is not handled here");
        }

        self.deps.ensure(auto_install)?;

        let identity = self.resolve_identity()?;
        debug!("running as {}:{}", identity.user, identity.group);

        let rendered = unit::build_unit(request, &identity)?;
        let unit_path =
            Path::new(SYSTEMD_UNIT_DIR).join(format!("{}.service", rendered.service_name));
        info!("writing systemd unit {}", unit_path.display());
        self.runner.write_privileged(&unit_path, &rendered.content)?;

        let mut proxy_path = None;
        let mut proxy_variant = None;
        let mut tls = false;

        if let Some(domain) = request.domain.as_deref() {
            let live_dir = Path::new(LETSENCRYPT_LIVE_DIR).join(domain);
            let cert_present = self.runner.path_exists(&live_dir);
            debug!("certificate for {domain} present: {cert_present}");

            let cfg = proxy::build_proxy_config(request, cert_present)?;
            let available = Path::new(SITES_AVAILABLE_DIR).join(&cfg.service_name);
            info!("writing nginx virtual host {}", available.display());
            self.runner.write_privileged(&available, &cfg.content)?;

            let enabled = Path::new(SITES_ENABLED_DIR).join(&cfg.service_name);
            if !self.runner.path_exists(&enabled) {
                info!("enabling nginx site {}", cfg.service_name);
                self.runner.symlink(&available, &enabled)?;
            }

            info!("validating and reloading nginx");
            self.run_sudo(&["nginx", "-t"])?;
            self.run_sudo(&["systemctl", "reload", "nginx"])?;

            if !cert_present {
                info!("requesting certificate for {domain} via certbot");
                let email = format!("admin@{domain}");
                self.run_sudo(&[
                    "certbot",
                    "--nginx",
                    "-d",
                    domain,
                    "--non-interactive",
                    "--agree-tos",
                    "--email",
                    &email,
                ])?;
            }

            // Re-check so the report uses the post-acquisition state
            tls = self.runner.path_exists(&live_dir);
            proxy_path = Some(available);
            proxy_variant = Some(cfg.variant);
        }

        info!("enabling and starting {}", request.service_name);
        self.run_sudo(&["systemctl", "daemon-reload"])?;
        self.run_sudo(&["systemctl", "enable", &request.service_name])?;
        self.run_sudo(&["systemctl", "restart", &request.service_name])?;

        let status = self
            .run_sudo(&["systemctl", "status", &request.service_name, "--no-pager"])?
            .stdout;

        let urls = self.reachable_urls(request, tls)?;
        info!("deployment of {} completed", request.service_name);

        Ok(DeploymentReport {
            unit_path,
            proxy_path,
            proxy_variant,
            tls,
            urls,
            status,
        })
    }

    fn run_sudo(&self, args: &[&str]) -> Result<crate::domain::ExecutionResult, DeployError> {
        self.runner.run("sudo", args)
    }

    fn resolve_identity(&self) -> Result<Identity, DeployError> {
        let user = self.runner.run("whoami", &[])?.stdout.trim().to_string();
        let group = self.runner.run("id", &["-gn"])?.stdout.trim().to_string();
        Ok(Identity { user, group })
    }

    /// Where the application answers once the service is up
    fn reachable_urls(
        &self,
        request: &DeploymentRequest,
        tls: bool,
    ) -> Result<Vec<String>, DeployError> {
        let mut urls = Vec::new();

        let base = match request.domain.as_deref() {
            Some(domain) => {
                let proto = if tls { "https" } else { "http" };
                format!("{proto}://{domain}")
            }
            None => {
                let addrs = self.runner.run("hostname", &["-I"])?.stdout;
                let ip = addrs.split_whitespace().next().unwrap_or("127.0.0.1").to_string();
                format!("http://{ip}:{}", request.port)
            }
        };

        urls.push(base.clone());
        if request.has_frontend() && request.api_url_prefix != "/" {
            urls.push(format!("API: {base}{}", request.api_url_prefix));
            urls.push(format!("Frontend: {base}{}", request.frontend_url_prefix));
        }

        Ok(urls)
    }
}
