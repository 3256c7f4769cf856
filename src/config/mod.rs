pub mod client_config;

pub use client_config::{load_client_config, ClientConfig, DeviceEntry, TransportConfig};
