use crate::domain::{DeployError, ExecutionResult, HostRunner};
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::RwLock;

/// Recording fake of [`HostRunner`] for unit and integration tests.
///
/// Every interaction is logged as one line ("sudo nginx -t",
/// "probe:certbot --version", "write:/etc/...") so tests can assert order
/// and presence. Responses, probe outcomes and path existence are scripted
/// up front; `set_fail_on` fails the first interaction whose recorded line
/// contains the given fragment.
#[derive(Debug, Default)]
pub struct MockHost {
    commands: RwLock<Vec<String>>,
    responses: RwLock<HashMap<String, String>>,
    available: RwLock<HashSet<String>>,
    existing_paths: RwLock<HashSet<PathBuf>>,
    files: RwLock<HashMap<PathBuf, String>>,
    fail_on: RwLock<Option<String>>,
}

impl MockHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Script stdout for an exact command line
    pub fn respond(&self, command_line: &str, stdout: &str) {
        self.responses
            .write()
            .unwrap()
            .insert(command_line.to_string(), stdout.to_string());
    }

    /// Convenience for the identity-resolution pair
    pub fn with_identity(&self, user: &str, group: &str) {
        self.respond("whoami", user);
        self.respond("id -gn", group);
    }

    /// Mark a probed tool as present
    pub fn set_available(&self, program: &str) {
        self.available.write().unwrap().insert(program.to_string());
    }

    pub fn set_all_dependencies_available(&self) {
        for tool in ["nginx", "certbot", "dpkg"] {
            self.set_available(tool);
        }
    }

    /// Pre-seed an existing host path (certificate dir, enabled-site link)
    pub fn add_path(&self, path: impl Into<PathBuf>) {
        self.existing_paths.write().unwrap().insert(path.into());
    }

    pub fn set_fail_on(&self, fragment: &str) {
        *self.fail_on.write().unwrap() = Some(fragment.to_string());
    }

    pub fn get_commands(&self) -> Vec<String> {
        self.commands.read().unwrap().clone()
    }

    /// Content last written to a host path, if any
    pub fn written(&self, path: &Path) -> Option<String> {
        self.files.read().unwrap().get(path).cloned()
    }

    fn record(&self, line: String) -> Result<(), DeployError> {
        self.commands.write().unwrap().push(line.clone());
        let fail_on = self.fail_on.read().unwrap().clone();
        if let Some(fragment) = fail_on
            && line.contains(&fragment)
        {
            return Err(DeployError::Command {
                command: line,
                status: 1,
                stderr: "mock failure".to_string(),
            });
        }
        Ok(())
    }

    fn command_line(program: &str, args: &[&str]) -> String {
        if args.is_empty() {
            program.to_string()
        } else {
            format!("{program} {}", args.join(" "))
        }
    }
}

impl HostRunner for MockHost {
    fn run(&self, program: &str, args: &[&str]) -> Result<ExecutionResult, DeployError> {
        let line = Self::command_line(program, args);
        self.record(line.clone())?;

        let stdout = self
            .responses
            .read()
            .unwrap()
            .get(&line)
            .cloned()
            .unwrap_or_default();

        Ok(ExecutionResult {
            status: 0,
            stdout,
            stderr: String::new(),
        })
    }

    fn probe(&self, program: &str, args: &[&str]) -> bool {
        let line = format!("probe:{}", Self::command_line(program, args));
        self.commands.write().unwrap().push(line);
        self.available.read().unwrap().contains(program)
    }

    fn path_exists(&self, path: &Path) -> bool {
        self.commands
            .write()
            .unwrap()
            .push(format!("exists:{}", path.display()));
        self.existing_paths.read().unwrap().contains(path)
    }

    fn write_privileged(&self, path: &Path, content: &str) -> Result<(), DeployError> {
        self.record(format!("write:{}", path.display()))?;
        self.files
            .write()
            .unwrap()
            .insert(path.to_path_buf(), content.to_string());
        self.existing_paths
            .write()
            .unwrap()
            .insert(path.to_path_buf());
        Ok(())
    }

    fn symlink(&self, target: &Path, link: &Path) -> Result<(), DeployError> {
        self.record(format!("symlink:{} -> {}", link.display(), target.display()))?;
        self.existing_paths
            .write()
            .unwrap()
            .insert(link.to_path_buf());
        Ok(())
    }
}
