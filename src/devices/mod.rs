pub mod imu;

pub use imu::ImuTopicDevice;
