pub mod deployer;
pub mod deps;
pub mod proxy;
pub mod unit;

pub use deployer::{Deployer, DeploymentReport};
pub use deps::DependencyChecker;
pub use proxy::{ProxyVariant, RenderedProxyConfig, build_proxy_config};
pub use unit::{Identity, RenderedUnit, build_unit};
