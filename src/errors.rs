use thiserror::Error;

/// Errors returned by the sensor query interfaces
#[derive(Error, Debug)]
pub enum SensorError {
    #[error("sensor index {sens_index} is out of range, this device exposes a single sensor")]
    OutOfRange { sens_index: usize },

    #[error("no data received yet on '{topic}'")]
    NoData { topic: String },
}

/// Configuration-related errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to load configuration from '{path}': {source}")]
    LoadError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid configuration format: {0}")]
    FormatError(#[from] toml::de::Error),

    #[error("Invalid configuration value for '{field}': {reason}")]
    InvalidValue { field: String, reason: String },

    #[error("Configuration validation failed: {0}")]
    ValidationError(String),
}

/// Broker link errors
#[derive(Error, Debug)]
pub enum TransportError {
    #[error("failed to connect to broker at '{addr}': {source}")]
    ConnectError {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    #[error("broker link I/O error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("failed to encode request frame: {0}")]
    EncodeError(#[from] serde_json::Error),
}

/// Device registry errors
#[derive(Error, Debug)]
pub enum RegistryError {
    #[error("failed to subscribe device: {0}")]
    SubscribeError(#[from] TransportError),

    #[error("duplicate sensor name '{name}' in device configuration")]
    DuplicateSensor { name: String },
}

/// Result type aliases for convenience
pub type SensorResult<T> = Result<T, SensorError>;
pub type ConfigResult<T> = Result<T, ConfigError>;
pub type TransportResult<T> = Result<T, TransportError>;
pub type RegistryResult<T> = Result<T, RegistryError>;
