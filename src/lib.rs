pub mod cli;
pub mod domain;
pub mod infra;
pub mod render;
pub mod services;

// Make test_support available for integration tests
// In a real production crate, we might use a feature flag "test-utils"
pub mod test_support;

pub use domain::{DeployError, DeploymentRequest, ExecutionResult, Framework, HostRunner};
pub use infra::HostSystem;
pub use services::{
    Deployer, DeploymentReport, Identity, ProxyVariant, RenderedProxyConfig, RenderedUnit,
};
