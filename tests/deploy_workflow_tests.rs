use pydeploy::domain::{DeployError, DeploymentRequest, Framework};
use pydeploy::services::deployer::Deployer;
use pydeploy::services::proxy::ProxyVariant;
use pydeploy::test_support::MockHost;
use std::fs;
use std::path::Path;
use std::sync::Arc;

fn project_dir() -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    fs::create_dir(dir.path().join("venv")).unwrap();
    dir
}

fn request(project: &Path) -> DeploymentRequest {
    DeploymentRequest {
        project_path: project.to_path_buf(),
        service_name: "myapi".to_string(),
        framework: Framework::Fastapi,
        port: 8000,
        venv_name: "venv".to_string(),
        workers: 2,
        timeout: 120,
        domain: None,
        enable_db: false,
        env_file: None,
        frontend_path: None,
        frontend_url_prefix: "/".to_string(),
        api_url_prefix: "/api".to_string(),
        verbose: false,
    }
}

fn ready_mock() -> Arc<MockHost> {
    let mock = Arc::new(MockHost::new());
    mock.set_all_dependencies_available();
    mock.with_identity("deploy", "deploy");
    mock.respond("hostname -I", "192.0.2.10");
    mock.respond(
        "sudo systemctl status myapi --no-pager",
        "● myapi.service - myapi service\n   Active: active (running)\n",
    );
    mock
}

#[test]
fn full_deployment_writes_unit_and_vhost_and_starts_service() {
    let dir = project_dir();
    let mock = ready_mock();
    let deployer = Deployer::new(mock.clone());

    let mut req = request(dir.path());
    req.domain = Some("api.example.com".to_string());

    let report = deployer.deploy(&req, false).unwrap();

    let unit = mock
        .written(Path::new("/etc/systemd/system/myapi.service"))
        .expect("unit written");
    assert!(unit.contains("ExecStart="));
    assert!(unit.contains("uvicorn main:app --host 0.0.0.0 --port 8000"));
    assert!(unit.contains("User=deploy"));

    let vhost = mock
        .written(Path::new("/etc/nginx/sites-available/myapi"))
        .expect("vhost written");
    assert!(vhost.contains("server_name api.example.com;"));
    assert!(vhost.contains("proxy_pass http://localhost:8000;"));

    assert_eq!(report.proxy_variant, Some(ProxyVariant::Http));
    assert!(report.status.contains("active (running)"));
}

#[test]
fn steps_run_in_documented_order() {
    let dir = project_dir();
    let mock = ready_mock();
    let deployer = Deployer::new(mock.clone());

    let mut req = request(dir.path());
    req.domain = Some("api.example.com".to_string());

    deployer.deploy(&req, false).unwrap();

    let commands = mock.get_commands();
    let position = |needle: &str| {
        commands
            .iter()
            .position(|c| c.contains(needle))
            .unwrap_or_else(|| panic!("missing step: {needle}"))
    };

    assert!(position("probe:nginx") < position("whoami"));
    assert!(position("whoami") < position("write:/etc/systemd/system/myapi.service"));
    assert!(
        position("write:/etc/systemd/system/myapi.service")
            < position("write:/etc/nginx/sites-available/myapi")
    );
    assert!(position("write:/etc/nginx/sites-available/myapi") < position("symlink:"));
    assert!(position("symlink:") < position("sudo nginx -t"));
    assert!(position("sudo nginx -t") < position("sudo systemctl reload nginx"));
    assert!(position("sudo systemctl reload nginx") < position("sudo certbot --nginx"));
    assert!(position("sudo certbot --nginx") < position("sudo systemctl daemon-reload"));
    assert!(position("sudo systemctl daemon-reload") < position("sudo systemctl enable myapi"));
    assert!(position("sudo systemctl enable myapi") < position("sudo systemctl restart myapi"));
    assert!(position("sudo systemctl restart myapi") < position("sudo systemctl status myapi"));
}

#[test]
fn rerunning_identical_input_is_idempotent() {
    let dir = project_dir();
    let mock = ready_mock();
    let deployer = Deployer::new(mock.clone());

    let mut req = request(dir.path());
    req.domain = Some("api.example.com".to_string());

    deployer.deploy(&req, false).unwrap();
    let unit_first = mock
        .written(Path::new("/etc/systemd/system/myapi.service"))
        .unwrap();
    let vhost_first = mock
        .written(Path::new("/etc/nginx/sites-available/myapi"))
        .unwrap();

    deployer.deploy(&req, false).unwrap();
    let unit_second = mock
        .written(Path::new("/etc/systemd/system/myapi.service"))
        .unwrap();
    let vhost_second = mock
        .written(Path::new("/etc/nginx/sites-available/myapi"))
        .unwrap();

    assert_eq!(unit_first, unit_second);
    assert_eq!(vhost_first, vhost_second);

    // both runs restarted the service
    let restarts = mock
        .get_commands()
        .iter()
        .filter(|c| c.as_str() == "sudo systemctl restart myapi")
        .count();
    assert_eq!(restarts, 2);
}

#[test]
fn frontend_deployment_serves_static_files_with_spa_fallback() {
    let dir = project_dir();
    let frontend = dir.path().join("dist");
    fs::create_dir(&frontend).unwrap();

    let mock = ready_mock();
    mock.add_path("/etc/letsencrypt/live/app.example.com");
    let deployer = Deployer::new(mock.clone());

    let mut req = request(dir.path());
    req.domain = Some("app.example.com".to_string());
    req.frontend_path = Some(frontend.clone());
    req.frontend_url_prefix = "/app".to_string();
    req.api_url_prefix = "/api".to_string();

    let report = deployer.deploy(&req, false).unwrap();
    assert_eq!(report.proxy_variant, Some(ProxyVariant::HttpsFrontend));
    assert_eq!(
        report.urls,
        vec![
            "https://app.example.com".to_string(),
            "API: https://app.example.com/api".to_string(),
            "Frontend: https://app.example.com/app".to_string(),
        ]
    );

    let vhost = mock
        .written(Path::new("/etc/nginx/sites-available/myapi"))
        .unwrap();
    assert!(vhost.contains("location /api/ {"));
    assert!(vhost.contains(&format!("alias {}/;", frontend.display())));
    assert!(vhost.contains("try_files $uri $uri/ /app/index.html;"));
    assert!(vhost.contains("listen 443 ssl;"));
}

#[test]
fn missing_dependencies_abort_before_any_write() {
    let dir = project_dir();
    let mock = Arc::new(MockHost::new());
    mock.with_identity("deploy", "deploy");
    let deployer = Deployer::new(mock.clone());

    let err = deployer.deploy(&request(dir.path()), false).unwrap_err();
    assert!(matches!(err, DeployError::Dependency(_)));

    let commands = mock.get_commands();
    assert!(!commands.iter().any(|c| c.starts_with("write:")));
    assert!(!commands.iter().any(|c| c.contains("systemctl")));
}

#[test]
fn failure_mid_sequence_leaves_partial_state_and_stops() {
    let dir = project_dir();
    let mock = ready_mock();
    mock.set_fail_on("systemctl reload nginx");
    let deployer = Deployer::new(mock.clone());

    let mut req = request(dir.path());
    req.domain = Some("api.example.com".to_string());

    let err = deployer.deploy(&req, false).unwrap_err();
    assert!(matches!(err, DeployError::Command { .. }));

    // The unit and vhost were already written; nothing rolled them back.
    assert!(
        mock.written(Path::new("/etc/systemd/system/myapi.service"))
            .is_some()
    );
    assert!(
        mock.written(Path::new("/etc/nginx/sites-available/myapi"))
            .is_some()
    );

    // Nothing after the failing step ran.
    let commands = mock.get_commands();
    assert!(!commands.iter().any(|c| c.contains("certbot")));
    assert!(!commands.iter().any(|c| c.contains("systemctl enable")));
}

#[test]
fn unsupported_framework_fails_at_parse_time() {
    let err = "rails".parse::<Framework>().unwrap_err();
    assert!(matches!(err, DeployError::UnsupportedFramework(_)));
}
