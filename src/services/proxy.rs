//! Composes the nginx virtual host for a deployed service.
//!
//! All branching happens here, in the choice between four complete
//! templates; the templates themselves carry no conditionals.

use crate::domain::{DeployError, DeploymentRequest};
use crate::render::{Substitutions, Template, templates};
use tracing::info;

/// Which of the four virtual-host layouts was selected
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProxyVariant {
    /// Plain reverse proxy to localhost
    Http,
    /// Port 80 redirect plus TLS termination
    Https,
    /// API prefix proxied, everything else static with SPA fallback
    HttpFrontend,
    /// TLS variant of the frontend layout
    HttpsFrontend,
}

/// Final virtual-host text, tagged with the variant that produced it
#[derive(Debug, Clone)]
pub struct RenderedProxyConfig {
    pub service_name: String,
    pub variant: ProxyVariant,
    pub content: String,
}

/// Select and render the virtual host for `request`.
///
/// `certificate_present` is observed, never changed, by this function;
/// certificate acquisition is the orchestrator's problem.
pub fn build_proxy_config(
    request: &DeploymentRequest,
    certificate_present: bool,
) -> Result<RenderedProxyConfig, DeployError> {
    let domain = request
        .domain
        .as_deref()
        .ok_or_else(|| DeployError::Validation("proxy config requires a domain".into()))?;

    let has_frontend = request.has_frontend();

    let (variant, template): (ProxyVariant, Template) = match (has_frontend, certificate_present) {
        (false, false) => (ProxyVariant::Http, templates::NGINX_HTTP),
        (false, true) => (ProxyVariant::Https, templates::NGINX_HTTPS),
        (true, false) => (ProxyVariant::HttpFrontend, templates::NGINX_HTTP_FRONTEND),
        (true, true) => (ProxyVariant::HttpsFrontend, templates::NGINX_HTTPS_FRONTEND),
    };
    info!("selected virtual host layout: {variant:?}");

    let mut vars = Substitutions::new();
    vars.insert("domain", domain.to_string());
    vars.insert("port", request.port.to_string());

    if has_frontend {
        // has_frontend already checked the path is present
        let frontend = request
            .frontend_path
            .as_deref()
            .unwrap_or(std::path::Path::new(""));
        vars.insert("frontend_path", frontend.display().to_string());
        vars.insert("frontend_url_prefix", request.frontend_url_prefix.clone());
        vars.insert("api_url_prefix", request.api_url_prefix.clone());
    }

    let content = template.render(&vars)?;

    Ok(RenderedProxyConfig {
        service_name: request.service_name.clone(),
        variant,
        content,
    })
}
