// Public modules
pub mod config;
pub mod devices;
pub mod errors;
pub mod interfaces;
pub mod messages;
pub mod registry;
pub mod transport;

// Re-export commonly used types
pub use config::{load_client_config, ClientConfig};
pub use devices::ImuTopicDevice;
pub use errors::{SensorError, SensorResult};
pub use interfaces::{
    OrientationSensors, SensorMeasurement, SensorStatus, ThreeAxisGyroscopes,
    ThreeAxisLinearAccelerometers,
};
pub use registry::init_all;
pub use transport::TopicClient;

use tracing_subscriber::EnvFilter;

/// Initialize tracing with default configuration
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()))
        .init();
}
