use crate::config::ClientConfig;
use crate::devices::ImuTopicDevice;
use crate::errors::{RegistryError, RegistryResult};
use crate::transport::TopicClient;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::info;

/// Build one started device per configured `[[device]]` entry, subscribing
/// each to its topic over the given broker connection.
pub async fn init_all(
    config: &ClientConfig,
    client: &TopicClient,
) -> RegistryResult<Vec<Arc<ImuTopicDevice>>> {
    let mut seen_names = HashSet::new();
    let mut devices = Vec::new();
    info!("[registry] initializing {} device(s)...", config.devices.len());

    for entry in &config.devices {
        if !seen_names.insert(entry.sensor_name.clone()) {
            return Err(RegistryError::DuplicateSensor {
                name: entry.sensor_name.clone(),
            });
        }

        let rx = client.subscribe(&entry.topic).await?;
        let device = Arc::new(ImuTopicDevice::new(entry));
        device.start(rx);
        info!(
            "[registry] registered device: sensor={} topic={}",
            entry.sensor_name, entry.topic
        );
        devices.push(device);
    }

    Ok(devices)
}
