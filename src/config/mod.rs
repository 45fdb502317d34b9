pub mod env;
pub mod service;

pub use env::EnvConfig;
pub use service::FlowServiceConfig;
