pub mod config;
pub mod tracing;
pub mod wiring;

pub use config::{load_client_config, ConfigOverrides};
pub use wiring::{wire_services, WiredServices};
