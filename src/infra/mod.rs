pub mod config;
mod host;

pub use host::HostSystem;
