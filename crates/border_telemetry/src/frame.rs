//! One synthesized telemetry sample.

use border_core::{CarId, QueueId, SimTime};
use border_fleet::CarStatus;

/// One sensor sample for one car at one timestamp. Append-only, ordered by
/// `timestamp` within a car's stream.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SensorFrame {
    pub timestamp: SimTime,
    pub car_id: CarId,
    pub status: CarStatus,
    pub queue_id: Option<QueueId>,
    pub latitude: f64,
    pub longitude: f64,
    pub heading_deg: f64,
    pub speed_mps: f64,
    pub accel_x: f64,
    pub accel_y: f64,
    pub accel_z: f64,
    pub gyro_x: f64,
    pub gyro_y: f64,
    pub gyro_z: f64,
}
