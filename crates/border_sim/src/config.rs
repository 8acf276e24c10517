//! Closed, validated configuration surface.
//!
//! Re-expressed from the distilled spec's dictionary-shaped config as a
//! closed struct with enumerated variants for `queue_assignment` and
//! `device_orientation` (the latter lives in `border_telemetry::phone`).
//! Unknown keys cannot be expressed at all in a struct, which is the point:
//! validation happens once, at construction, rather than being re-checked
//! on every access.

use border_fleet::AssignmentKind;
use border_telemetry::PhoneConfig;

use crate::error::{SimError, SimResult};

/// Per-booth subscriber backlog policy (§5 / §4.7 of the design).
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BacklogPolicy {
    /// Evict the oldest buffered snapshot when a subscriber's ring buffer
    /// is full. Default: favors orchestrator liveness over completeness of
    /// any one subscriber's view.
    DropOldest,
    /// Block the publisher (bounded by one `publish_period`) until the
    /// subscriber drains room; disconnect on timeout.
    BackPressure,
}

impl Default for BacklogPolicy {
    fn default() -> Self {
        BacklogPolicy::DropOldest
    }
}

/// Static layout and service parameters for the border crossing.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BorderConfig {
    pub num_queues: usize,
    /// Number of booths attached to each queue, length `num_queues`.
    pub nodes_per_queue: Vec<usize>,
    /// Poisson arrival rate, cars/minute.
    pub arrival_rate: f64,
    /// Per-booth service rate μ, cars/minute, length `Σ nodes_per_queue`.
    pub service_rates: Vec<f64>,
    pub queue_assignment: AssignmentKind,
    /// Minimum spatial gap a stopped car maintains from its predecessor,
    /// metres.
    pub safe_distance: f64,
    pub max_queue_length: usize,
}

impl BorderConfig {
    pub fn validate(&self) -> SimResult<()> {
        if self.nodes_per_queue.len() != self.num_queues {
            return Err(SimError::Config(format!(
                "nodes_per_queue has {} entries, expected num_queues={}",
                self.nodes_per_queue.len(),
                self.num_queues
            )));
        }

        let expected_booths: usize = self.nodes_per_queue.iter().sum();
        if self.service_rates.len() != expected_booths {
            return Err(SimError::Config(format!(
                "service_rates has {} entries, expected {} (sum of nodes_per_queue)",
                self.service_rates.len(),
                expected_booths
            )));
        }

        if self.service_rates.iter().any(|&r| r <= 0.0) {
            return Err(SimError::Config(
                "all service_rates must be > 0".to_string(),
            ));
        }

        if self.safe_distance <= 0.0 {
            return Err(SimError::Config("safe_distance must be > 0".to_string()));
        }

        if self.max_queue_length == 0 {
            return Err(SimError::Config(
                "max_queue_length must be > 0".to_string(),
            ));
        }

        if self.num_queues == 0 {
            return Err(SimError::Config("num_queues must be > 0".to_string()));
        }

        Ok(())
    }
}

/// Run-duration and clock parameters.
#[derive(Copy, Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SimulationConfig {
    pub max_simulation_time: f64,
    pub time_factor: f64,
    pub enable_telemetry: bool,
    pub enable_position_tracking: bool,
    pub rng_seed: u64,
}

impl SimulationConfig {
    pub fn validate(&self) -> SimResult<()> {
        if self.max_simulation_time <= 0.0 {
            return Err(SimError::Config(
                "max_simulation_time must be > 0".to_string(),
            ));
        }
        if self.time_factor <= 0.0 {
            return Err(SimError::Config("time_factor must be > 0".to_string()));
        }
        Ok(())
    }
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            max_simulation_time: 3600.0,
            time_factor: 1.0,
            enable_telemetry: true,
            enable_position_tracking: true,
            rng_seed: 0,
        }
    }
}

/// The full, validated configuration bundle required to start a simulation.
#[derive(Clone, Debug)]
pub struct SimulationParams {
    pub border: BorderConfig,
    pub simulation: SimulationConfig,
    pub phone: PhoneConfig,
    pub backlog_policy: BacklogPolicy,
}

impl SimulationParams {
    pub fn validate(&self) -> SimResult<()> {
        self.border.validate()?;
        self.simulation.validate()?;
        self.phone.validate()?;
        Ok(())
    }
}
