use nalgebra::UnitQuaternion;
use serde::{Deserialize, Serialize};

/// Message timestamp, seconds and nanoseconds since the UNIX epoch
#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq)]
pub struct TimeStamp {
    pub sec: i64,
    pub nanosec: u32,
}

impl TimeStamp {
    /// Collapse to floating-point seconds, the form the query interfaces report
    pub fn as_secs_f64(&self) -> f64 {
        self.sec as f64 + self.nanosec as f64 * 1e-9
    }
}

/// Header metadata common to stamped sensor messages
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct Header {
    pub stamp: TimeStamp,
    /// Reference frame the measurements are expressed in
    pub frame_id: String,
}

/// Three-component vector as carried on the wire
#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq)]
pub struct Vector3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Vector3 {
    pub fn to_array(self) -> [f64; 3] {
        [self.x, self.y, self.z]
    }
}

/// Orientation quaternion as carried on the wire (x, y, z, w ordering)
#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq)]
pub struct Quaternion {
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub w: f64,
}

impl Quaternion {
    /// Decompose into roll-pitch-yaw, in degrees.
    ///
    /// Intrinsic ZYX convention: the quaternion is read as yaw about Z, then
    /// pitch about Y, then roll about X. Non-unit input is normalized first.
    pub fn to_rpy_degrees(&self) -> [f64; 3] {
        let q = UnitQuaternion::from_quaternion(nalgebra::Quaternion::new(
            self.w, self.x, self.y, self.z,
        ));
        let (roll, pitch, yaw) = q.euler_angles();
        [roll.to_degrees(), pitch.to_degrees(), yaw.to_degrees()]
    }
}

fn zero_covariance() -> [f64; 9] {
    [0.0; 9]
}

/// Inertial measurement message received from the subscribed topic.
///
/// Covariance arrays are part of the wire format but unused here; publishers
/// that omit them produce all-zero matrices.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct ImuMessage {
    pub header: Header,
    pub orientation: Quaternion,
    #[serde(default = "zero_covariance")]
    pub orientation_covariance: [f64; 9],
    /// Angular velocity (rad/s)
    pub angular_velocity: Vector3,
    #[serde(default = "zero_covariance")]
    pub angular_velocity_covariance: [f64; 9],
    /// Linear acceleration (m/s²)
    pub linear_acceleration: Vector3,
    #[serde(default = "zero_covariance")]
    pub linear_acceleration_covariance: [f64; 9],
}

/// One broker frame: which topic the message was published on, and the message
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct TopicEnvelope {
    pub topic: String,
    pub msg: ImuMessage,
}

/// Frames sent from this client to the broker
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum ClientRequest {
    /// Announce the client's node name after connecting
    Hello { node: String },
    /// Ask the broker to forward messages published on `topic`
    Subscribe { topic: String },
}
