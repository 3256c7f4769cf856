use crate::errors::{ConfigError, ConfigResult};
use serde::Deserialize;
use std::fs;
use std::time::Duration;

const DEFAULT_NODE_NAME: &str = "imu_topic_client";

/// Root configuration struct expecting a `[transport]` table and a
/// `[[device]]` TOML array
#[derive(Debug, Deserialize)]
pub struct ClientConfig {
    pub transport: TransportConfig,
    #[serde(rename = "device")]
    pub devices: Vec<DeviceEntry>,
}

/// Broker connection settings
#[derive(Debug, Deserialize)]
pub struct TransportConfig {
    /// Broker address, host:port
    pub server_addr: String,
    /// Name this client announces to the broker
    pub node_name: Option<String>,
}

/// One device entry, matching each `[[device]]` section
#[derive(Debug, Deserialize)]
pub struct DeviceEntry {
    /// Topic the device subscribes to, must start with '/'
    pub topic: String,
    /// Name reported by the sensor name getters
    pub sensor_name: String,
    /// When set, a sample older than this is reported as timed out
    pub stale_timeout_ms: Option<u64>,
}

impl ClientConfig {
    pub fn node_name(&self) -> &str {
        self.transport
            .node_name
            .as_deref()
            .unwrap_or(DEFAULT_NODE_NAME)
    }

    pub fn validate(&self) -> ConfigResult<()> {
        if self.transport.server_addr.is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "transport.server_addr".to_string(),
                reason: "must not be empty".to_string(),
            });
        }
        if let Some(node) = &self.transport.node_name {
            if node.is_empty() || node.contains('/') {
                return Err(ConfigError::InvalidValue {
                    field: "transport.node_name".to_string(),
                    reason: format!("'{}' must be non-empty and contain no '/'", node),
                });
            }
        }
        if self.devices.is_empty() {
            return Err(ConfigError::ValidationError(
                "at least one [[device]] entry is required".to_string(),
            ));
        }
        for device in &self.devices {
            if !device.topic.starts_with('/') {
                return Err(ConfigError::InvalidValue {
                    field: "device.topic".to_string(),
                    reason: format!("'{}' must start with a '/' character", device.topic),
                });
            }
            if device.sensor_name.is_empty() {
                return Err(ConfigError::InvalidValue {
                    field: "device.sensor_name".to_string(),
                    reason: "must not be empty".to_string(),
                });
            }
        }
        Ok(())
    }
}

impl DeviceEntry {
    pub fn stale_timeout(&self) -> Option<Duration> {
        self.stale_timeout_ms.map(Duration::from_millis)
    }
}

/// Loads and validates config from a TOML file
pub fn load_client_config(path: &str) -> ConfigResult<ClientConfig> {
    let content = fs::read_to_string(path).map_err(|source| ConfigError::LoadError {
        path: path.to_string(),
        source,
    })?;
    let parsed: ClientConfig = toml::from_str(&content)?;
    parsed.validate()?;
    Ok(parsed)
}
