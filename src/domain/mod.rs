mod error;
mod request;
pub mod traits;

pub use error::DeployError;
pub use request::{DeploymentRequest, Framework};
pub use traits::{ExecutionResult, HostRunner};
