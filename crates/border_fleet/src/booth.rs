//! Service booths: exponential-service single-server stations.

use border_core::{BoothId, CarId, QueueId, SimRng, SimTime};

use crate::error::{FleetError, FleetResult};

/// A single service booth attached to one queue.
///
/// Service durations are drawn fresh on `accept`, so mutating
/// `service_rate` mid-service never reschedules the car already being
/// served — memorylessness of the exponential distribution means the
/// remaining service time from "now" is itself exponential with the *new*
/// rate, but this engine takes the simpler and equally valid reading:
/// the draw already taken stands, and the new rate applies to the next
/// car accepted.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Booth {
    pub booth_id: BoothId,
    pub queue_id: QueueId,
    /// Mean service rate, cars per minute (μ).
    pub service_rate: f64,
    pub is_busy: bool,
    pub current_car_id: Option<CarId>,
    pub service_start: Option<SimTime>,
    pub completion_time: Option<SimTime>,
    pub total_served: u64,
    pub total_service_time: f64,
}

impl Booth {
    pub fn new(booth_id: BoothId, queue_id: QueueId, service_rate: f64) -> Self {
        Self {
            booth_id,
            queue_id,
            service_rate,
            is_busy: false,
            current_car_id: None,
            service_start: None,
            completion_time: None,
            total_served: 0,
            total_service_time: 0.0,
        }
    }

    /// Begin serving `car_id` at `now`, drawing a fresh exponential service
    /// duration from `service_rate`. Errors if the booth is already busy.
    pub fn accept(&mut self, car_id: CarId, now: SimTime, rng: &mut SimRng) -> FleetResult<()> {
        if self.is_busy {
            return Err(FleetError::BoothBusy(self.booth_id));
        }
        let duration = rng.exponential(self.service_rate / 60.0);
        self.is_busy = true;
        self.current_car_id = Some(car_id);
        self.service_start = Some(now);
        self.completion_time = Some(now + duration);
        Ok(())
    }

    /// If the in-progress service has matured by `now`, free the booth and
    /// return `(car_id, elapsed_service_time)`. Otherwise `None`.
    pub fn try_complete(&mut self, now: SimTime) -> Option<(CarId, f64)> {
        let completion = self.completion_time?;
        if completion > now {
            return None;
        }
        let car_id = self.current_car_id.take().expect("busy booth always has a car");
        let elapsed = now - self.service_start.take().expect("busy booth always has a start");
        self.completion_time = None;
        self.is_busy = false;
        self.total_served += 1;
        self.total_service_time += elapsed;
        Some((car_id, elapsed))
    }

    /// Change the service rate. Takes effect for the next car accepted;
    /// does not affect a service already in progress.
    pub fn set_rate(&mut self, mu: f64) -> FleetResult<()> {
        if mu <= 0.0 {
            return Err(FleetError::InvalidServiceRate(mu));
        }
        self.service_rate = mu;
        Ok(())
    }

    pub fn mean_service_time(&self) -> f64 {
        if self.total_served == 0 {
            0.0
        } else {
            self.total_service_time / self.total_served as f64
        }
    }
}
