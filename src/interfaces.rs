use crate::errors::SensorResult;
use async_trait::async_trait;

/// Health of one exposed sensor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SensorStatus {
    /// No measurement has been received yet
    Unknown,
    /// A measurement is available
    Ok,
    /// The latest measurement is older than the configured staleness window
    Timeout,
    /// The subscription ended, no further measurements will arrive
    Error,
    /// The queried sensor index does not exist on this device
    Unavailable,
}

/// A three-component reading paired with the source message timestamp
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SensorMeasurement {
    pub values: [f64; 3],
    /// Seconds since the UNIX epoch, taken from the message header
    pub timestamp: f64,
}

/// Query interface for devices exposing three-axis linear accelerometers
#[async_trait]
pub trait ThreeAxisLinearAccelerometers {
    fn accelerometer_count(&self) -> usize;
    async fn accelerometer_status(&self, sens_index: usize) -> SensorStatus;
    fn accelerometer_name(&self, sens_index: usize) -> SensorResult<String>;
    async fn accelerometer_frame_name(&self, sens_index: usize) -> SensorResult<String>;
    /// Latest linear acceleration (m/s²)
    async fn accelerometer_measure(&self, sens_index: usize) -> SensorResult<SensorMeasurement>;
}

/// Query interface for devices exposing three-axis gyroscopes
#[async_trait]
pub trait ThreeAxisGyroscopes {
    fn gyroscope_count(&self) -> usize;
    async fn gyroscope_status(&self, sens_index: usize) -> SensorStatus;
    fn gyroscope_name(&self, sens_index: usize) -> SensorResult<String>;
    async fn gyroscope_frame_name(&self, sens_index: usize) -> SensorResult<String>;
    /// Latest angular velocity (rad/s)
    async fn gyroscope_measure(&self, sens_index: usize) -> SensorResult<SensorMeasurement>;
}

/// Query interface for devices exposing orientation sensors
#[async_trait]
pub trait OrientationSensors {
    fn orientation_sensor_count(&self) -> usize;
    async fn orientation_sensor_status(&self, sens_index: usize) -> SensorStatus;
    fn orientation_sensor_name(&self, sens_index: usize) -> SensorResult<String>;
    async fn orientation_sensor_frame_name(&self, sens_index: usize) -> SensorResult<String>;
    /// Latest orientation as roll-pitch-yaw (degrees, intrinsic ZYX)
    async fn orientation_measure_as_rpy(&self, sens_index: usize)
        -> SensorResult<SensorMeasurement>;
}
