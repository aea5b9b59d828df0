//! Probes for the system tools a deployment needs and optionally installs
//! the missing ones through apt.

use crate::domain::{DeployError, HostRunner};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Package list is fixed: the proxy, the certificate tool and its nginx glue
const REQUIRED: [(&str, &[&str], &str); 3] = [
    ("nginx", &["-v"], "nginx"),
    ("certbot", &["--version"], "certbot"),
    ("dpkg", &["-l", "python3-certbot-nginx"], "python3-certbot-nginx"),
];

pub struct DependencyChecker {
    runner: Arc<dyn HostRunner>,
}

impl DependencyChecker {
    pub fn new(runner: Arc<dyn HostRunner>) -> Self {
        Self { runner }
    }

    /// Collect the missing packages and install them in one batch when
    /// `auto_install` allows it. This is the only place policy about
    /// touching the package manager lives.
    pub fn ensure(&self, auto_install: bool) -> Result<(), DeployError> {
        info!("checking for required system dependencies");

        let missing: Vec<&str> = REQUIRED
            .iter()
            .filter(|(program, args, _)| {
                debug!("probing for {program}");
                !self.runner.probe(program, args)
            })
            .map(|(_, _, package)| *package)
            .collect();

        if missing.is_empty() {
            info!("all required dependencies are installed");
            return Ok(());
        }

        if !auto_install {
            return Err(DeployError::Dependency(missing.join(", ")));
        }

        warn!("installing missing packages: {}", missing.join(", "));
        self.runner.run("sudo", &["apt-get", "update"])?;

        let mut args = vec!["apt-get", "install", "-y"];
        args.extend(missing.iter().copied());
        self.runner.run("sudo", &args)?;

        info!("dependencies installed");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::MockHost;

    #[test]
    fn passes_when_everything_is_installed() {
        let mock = Arc::new(MockHost::new());
        mock.set_available("nginx");
        mock.set_available("certbot");
        mock.set_available("dpkg");

        let checker = DependencyChecker::new(mock.clone());
        assert!(checker.ensure(false).is_ok());

        let commands = mock.get_commands();
        assert!(commands.contains(&"probe:nginx -v".to_string()));
        assert!(commands.contains(&"probe:certbot --version".to_string()));
        assert!(commands.contains(&"probe:dpkg -l python3-certbot-nginx".to_string()));
        // nothing was installed
        assert!(!commands.iter().any(|c| c.contains("apt-get")));
    }

    #[test]
    fn reports_missing_packages_without_auto_install() {
        let mock = Arc::new(MockHost::new());
        mock.set_available("nginx");

        let checker = DependencyChecker::new(mock.clone());
        let err = checker.ensure(false).unwrap_err();

        match err {
            DeployError::Dependency(list) => {
                assert!(list.contains("certbot"));
                assert!(list.contains("python3-certbot-nginx"));
                assert!(!list.contains("nginx,"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn installs_missing_set_as_one_batch() {
        let mock = Arc::new(MockHost::new());
        mock.set_available("nginx");

        let checker = DependencyChecker::new(mock.clone());
        assert!(checker.ensure(true).is_ok());

        let commands = mock.get_commands();
        assert!(commands.contains(&"sudo apt-get update".to_string()));
        assert!(
            commands
                .contains(&"sudo apt-get install -y certbot python3-certbot-nginx".to_string())
        );
    }

    #[test]
    fn failed_install_surfaces_the_error() {
        let mock = Arc::new(MockHost::new());
        mock.set_fail_on("apt-get install");

        let checker = DependencyChecker::new(mock.clone());
        let err = checker.ensure(true).unwrap_err();
        assert!(matches!(err, DeployError::Command { .. }));
    }
}
