use imu_topic_client::{
    init_all, load_client_config, ImuTopicDevice, OrientationSensors, ThreeAxisGyroscopes,
    ThreeAxisLinearAccelerometers, TopicClient,
};
use std::time::Duration;
use tracing::{info, warn};

#[tokio::main]
async fn main() {
    // RUST_LOG=debug for verbose, RUST_LOG=info for normal, RUST_LOG=warn for production
    imu_topic_client::init_tracing();

    info!("[ImuTopicClient] starting up...");

    // Load configuration from CONFIG_PATH or default
    let config_path = std::env::var("CONFIG_PATH").unwrap_or_else(|_| "config".to_string());
    let client_config_path = format!("{}/client.toml", config_path);
    let config = load_client_config(&client_config_path).expect("Failed to load client config");
    info!("[config] loaded {} device(s)", config.devices.len());

    // Connect to the broker and announce ourselves
    let client = TopicClient::connect(&config.transport.server_addr, config.node_name())
        .await
        .expect("Failed to connect to broker");

    // Subscribe and start every configured device
    let devices = init_all(&config, &client).await.expect("Initialization failed");
    info!("[main] devices subscribed, polling sensor data");

    let mut ticker = tokio::time::interval(Duration::from_secs(1));
    loop {
        ticker.tick().await;
        for device in &devices {
            report(device).await;
        }
    }
}

/// Poll all three interfaces of one device and log what they serve
async fn report(device: &ImuTopicDevice) {
    let name = device
        .accelerometer_name(0)
        .unwrap_or_else(|_| "?".to_string());
    let status = device.orientation_sensor_status(0).await;

    match device.accelerometer_measure(0).await {
        Ok(m) => info!(
            "[{}] accel=({:.3}, {:.3}, {:.3}) m/s² t={:.3}",
            name, m.values[0], m.values[1], m.values[2], m.timestamp
        ),
        Err(e) => warn!("[{}] status={:?}: {}", name, status, e),
    }
    if let Ok(m) = device.gyroscope_measure(0).await {
        info!(
            "[{}] gyro=({:.4}, {:.4}, {:.4}) rad/s t={:.3}",
            name, m.values[0], m.values[1], m.values[2], m.timestamp
        );
    }
    if let Ok(m) = device.orientation_measure_as_rpy(0).await {
        info!(
            "[{}] rpy=({:.2}, {:.2}, {:.2})° frame={} t={:.3}",
            name,
            m.values[0],
            m.values[1],
            m.values[2],
            device
                .orientation_sensor_frame_name(0)
                .await
                .unwrap_or_default(),
            m.timestamp
        );
    }
}
