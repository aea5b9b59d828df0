use crate::domain::{DeploymentRequest, Framework};
use crate::infra::HostSystem;
use crate::infra::config::{ProjectConfig, load_project_config};
use crate::services::deployer::{Deployer, DeploymentReport};
use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;

/// Deploy a Python web application behind systemd and nginx
#[derive(Parser, Debug)]
#[command(name = "pydeploy", version, about)]
pub struct Cli {
    /// Path to the project directory
    #[arg(long)]
    pub project_path: String,

    /// Name for the systemd service
    #[arg(long)]
    pub service_name: String,

    /// Python web framework used by the project
    #[arg(long, value_enum)]
    pub framework: Framework,

    /// Port the service listens on
    #[arg(long)]
    pub port: u16,

    /// Name of the virtual environment directory inside the project
    #[arg(long)]
    pub venv_name: String,

    /// Number of worker processes [default: 2]
    #[arg(long)]
    pub workers: Option<u32>,

    /// Worker timeout in seconds [default: 120]
    #[arg(long)]
    pub timeout: Option<u32>,

    /// Domain name for the nginx virtual host (enables the proxy + TLS path)
    #[arg(long)]
    pub domain: Option<String>,

    /// Accepted for compatibility; database provisioning is not handled
    #[arg(long)]
    pub enable_db: bool,

    /// Environment file (KEY=VALUE per line), relative to the project
    #[arg(long)]
    pub env_file: Option<String>,

    /// Path to the frontend build directory
    #[arg(long)]
    pub frontend_path: Option<String>,

    /// URL prefix the frontend is served under [default: /]
    #[arg(long)]
    pub frontend_url_prefix: Option<String>,

    /// URL prefix proxied to the API [default: /api]
    #[arg(long)]
    pub api_url_prefix: Option<String>,

    /// Install missing system packages without asking
    #[arg(long)]
    pub auto_install: bool,

    /// Enable debug output
    #[arg(long)]
    pub verbose: bool,
}

fn expand(path: &str) -> PathBuf {
    PathBuf::from(shellexpand::tilde(path).into_owned())
}

impl Cli {
    /// Resolve flags against the optional project config file; flags win,
    /// then the file, then the stock defaults.
    fn into_request(self, defaults: ProjectConfig) -> DeploymentRequest {
        let project_path = expand(&self.project_path);
        let project_path = std::path::absolute(&project_path).unwrap_or(project_path);

        DeploymentRequest {
            service_name: self.service_name,
            framework: self.framework,
            port: self.port,
            venv_name: self.venv_name,
            workers: self.workers.or(defaults.workers).unwrap_or(2),
            timeout: self.timeout.or(defaults.timeout).unwrap_or(120),
            domain: self.domain.or(defaults.domain),
            enable_db: self.enable_db,
            env_file: self.env_file.or(defaults.env_file),
            frontend_path: self
                .frontend_path
                .or(defaults.frontend_path)
                .map(|p| expand(&p)),
            frontend_url_prefix: self
                .frontend_url_prefix
                .or(defaults.frontend_url_prefix)
                .unwrap_or_else(|| "/".to_string()),
            api_url_prefix: self
                .api_url_prefix
                .or(defaults.api_url_prefix)
                .unwrap_or_else(|| "/api".to_string()),
            verbose: self.verbose,
            project_path,
        }
    }
}

pub fn run(cli: Cli) -> Result<()> {
    let auto_install = cli.auto_install;
    let defaults = load_project_config(&expand(&cli.project_path))?;
    let request = cli.into_request(defaults);

    let runner = Arc::new(HostSystem::new());
    let deployer = Deployer::new(runner);
    let report = deployer.deploy(&request, auto_install)?;

    print_report(&request, &report);
    Ok(())
}

fn print_report(request: &DeploymentRequest, report: &DeploymentReport) {
    println!("\n--- Service Status ---\n{}----------------------\n", report.status);

    println!("✅ {} deployed successfully", request.service_name);
    println!("Your application is now available at:");
    for url in &report.urls {
        println!("  • {url}");
    }

    println!();
    println!("To check service status: sudo systemctl status {}", request.service_name);
    println!("To view logs: sudo journalctl -u {} -f", request.service_name);
}
