//! A point-in-time, internally consistent copy of simulation state,
//! published to subscribers atomically — a subscriber receives a whole
//! snapshot or none.

use border_core::{BoothId, CarId, QueueId, SimTime};
use border_fleet::{CarStatus, Stats};

/// Lifecycle status of a simulation, mirrored onto every snapshot so a
/// subscriber never has to consult anything but the snapshot stream.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SimStatus {
    Running,
    Completed,
    Failed,
    Cancelled,
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CarSnapshot {
    pub car_id: CarId,
    pub position_s: f64,
    pub velocity: f64,
    pub status: CarStatus,
    pub queue_id: Option<QueueId>,
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BoothSnapshot {
    pub booth_id: BoothId,
    pub queue_id: QueueId,
    pub is_busy: bool,
    pub current_car_id: Option<CarId>,
    pub service_rate: f64,
    pub total_served: u64,
    pub total_service_time: f64,
}

#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Snapshot {
    pub sim_time: SimTime,
    pub status: SimStatus,
    pub cars: Vec<CarSnapshot>,
    pub booths: Vec<BoothSnapshot>,
    pub stats: Stats,
    /// Populated only when `status == Failed`.
    pub failure_message: Option<String>,
}
