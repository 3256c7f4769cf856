use crate::config::DeviceEntry;
use crate::errors::{SensorError, SensorResult};
use crate::interfaces::{
    OrientationSensors, SensorMeasurement, SensorStatus, ThreeAxisGyroscopes,
    ThreeAxisLinearAccelerometers,
};
use crate::messages::{ImuMessage, Quaternion, TopicEnvelope};
use async_trait::async_trait;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::{broadcast, Mutex};
use tracing::{error, info, trace, warn};

/// Most recent sample decoded from the subscribed topic
#[derive(Debug, Clone)]
struct CachedSample {
    accel: [f64; 3],
    gyro: [f64; 3],
    orientation: Quaternion,
    frame_id: String,
    /// Message timestamp, seconds since the UNIX epoch
    timestamp: f64,
    /// Local arrival time, used for staleness detection
    received_at: Instant,
}

impl CachedSample {
    fn from_message(msg: ImuMessage) -> Self {
        Self {
            accel: msg.linear_acceleration.to_array(),
            gyro: msg.angular_velocity.to_array(),
            orientation: msg.orientation,
            timestamp: msg.header.stamp.as_secs_f64(),
            frame_id: msg.header.frame_id,
            received_at: Instant::now(),
        }
    }
}

#[derive(Debug, Default)]
struct DeviceState {
    sample: Option<CachedSample>,
    /// Set when the subscription ends, no further samples will arrive
    faulted: bool,
}

/// IMU device wrapper over one subscribed topic.
///
/// The subscription task replaces the cached sample wholesale on every
/// received message; the query interfaces copy from it under the same lock,
/// so a reader never observes fields from two different messages. Exposes
/// exactly one virtual accelerometer, one gyroscope and one orientation
/// sensor, all at index 0.
pub struct ImuTopicDevice {
    topic: String,
    sensor_name: String,
    stale_timeout: Option<Duration>,
    state: Arc<Mutex<DeviceState>>,
}

impl ImuTopicDevice {
    pub fn new(entry: &DeviceEntry) -> Self {
        Self {
            topic: entry.topic.clone(),
            sensor_name: entry.sensor_name.clone(),
            stale_timeout: entry.stale_timeout(),
            state: Arc::new(Mutex::new(DeviceState::default())),
        }
    }

    pub fn topic(&self) -> &str {
        &self.topic
    }

    /// Start the message receive loop and update the cached sample on every
    /// message published on this device's topic
    pub fn start(&self, mut rx: broadcast::Receiver<TopicEnvelope>) {
        let state = Arc::clone(&self.state);
        let topic = self.topic.clone();
        let sensor_name = self.sensor_name.clone();

        tokio::spawn(async move {
            info!("[{}] listening on {}", sensor_name, topic);

            loop {
                match rx.recv().await {
                    Ok(envelope) => {
                        if envelope.topic != topic {
                            continue;
                        }
                        trace!("[{}] sample received", sensor_name);
                        let sample = CachedSample::from_message(envelope.msg);
                        let mut state = state.lock().await;
                        state.sample = Some(sample);
                    }
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        warn!(
                            "[{}] fell behind the subscription, {} message(s) dropped",
                            sensor_name, skipped
                        );
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }

            error!("[{}] subscription closed, no further samples will arrive", sensor_name);
            let mut state = state.lock().await;
            state.faulted = true;
        });
    }

    fn check_index(&self, sens_index: usize) -> SensorResult<()> {
        if sens_index == 0 {
            Ok(())
        } else {
            Err(SensorError::OutOfRange { sens_index })
        }
    }

    async fn status(&self, sens_index: usize) -> SensorStatus {
        if sens_index != 0 {
            return SensorStatus::Unavailable;
        }
        let state = self.state.lock().await;
        if state.faulted {
            return SensorStatus::Error;
        }
        match &state.sample {
            None => SensorStatus::Unknown,
            Some(sample) => match self.stale_timeout {
                Some(limit) if sample.received_at.elapsed() > limit => SensorStatus::Timeout,
                _ => SensorStatus::Ok,
            },
        }
    }

    fn name(&self, sens_index: usize) -> SensorResult<String> {
        self.check_index(sens_index)?;
        Ok(self.sensor_name.clone())
    }

    /// Frame id of the latest received message, empty until the first one
    async fn frame_name(&self, sens_index: usize) -> SensorResult<String> {
        self.check_index(sens_index)?;
        let state = self.state.lock().await;
        Ok(state
            .sample
            .as_ref()
            .map(|sample| sample.frame_id.clone())
            .unwrap_or_default())
    }

    async fn measure_with<F>(&self, sens_index: usize, project: F) -> SensorResult<SensorMeasurement>
    where
        F: FnOnce(&CachedSample) -> [f64; 3],
    {
        self.check_index(sens_index)?;
        let state = self.state.lock().await;
        let sample = state.sample.as_ref().ok_or_else(|| SensorError::NoData {
            topic: self.topic.clone(),
        })?;
        Ok(SensorMeasurement {
            values: project(sample),
            timestamp: sample.timestamp,
        })
    }
}

#[async_trait]
impl ThreeAxisLinearAccelerometers for ImuTopicDevice {
    fn accelerometer_count(&self) -> usize {
        1
    }

    async fn accelerometer_status(&self, sens_index: usize) -> SensorStatus {
        self.status(sens_index).await
    }

    fn accelerometer_name(&self, sens_index: usize) -> SensorResult<String> {
        self.name(sens_index)
    }

    async fn accelerometer_frame_name(&self, sens_index: usize) -> SensorResult<String> {
        self.frame_name(sens_index).await
    }

    async fn accelerometer_measure(&self, sens_index: usize) -> SensorResult<SensorMeasurement> {
        self.measure_with(sens_index, |sample| sample.accel).await
    }
}

#[async_trait]
impl ThreeAxisGyroscopes for ImuTopicDevice {
    fn gyroscope_count(&self) -> usize {
        1
    }

    async fn gyroscope_status(&self, sens_index: usize) -> SensorStatus {
        self.status(sens_index).await
    }

    fn gyroscope_name(&self, sens_index: usize) -> SensorResult<String> {
        self.name(sens_index)
    }

    async fn gyroscope_frame_name(&self, sens_index: usize) -> SensorResult<String> {
        self.frame_name(sens_index).await
    }

    async fn gyroscope_measure(&self, sens_index: usize) -> SensorResult<SensorMeasurement> {
        self.measure_with(sens_index, |sample| sample.gyro).await
    }
}

#[async_trait]
impl OrientationSensors for ImuTopicDevice {
    fn orientation_sensor_count(&self) -> usize {
        1
    }

    async fn orientation_sensor_status(&self, sens_index: usize) -> SensorStatus {
        self.status(sens_index).await
    }

    fn orientation_sensor_name(&self, sens_index: usize) -> SensorResult<String> {
        self.name(sens_index)
    }

    async fn orientation_sensor_frame_name(&self, sens_index: usize) -> SensorResult<String> {
        self.frame_name(sens_index).await
    }

    async fn orientation_measure_as_rpy(
        &self,
        sens_index: usize,
    ) -> SensorResult<SensorMeasurement> {
        self.measure_with(sens_index, |sample| sample.orientation.to_rpy_degrees())
            .await
    }
}
