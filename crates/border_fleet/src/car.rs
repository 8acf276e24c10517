//! Car physics state and the car-following kinematic step.

use border_core::{BoothId, CarId, QueueId, SimTime};

use crate::error::{FleetError, FleetResult};

/// Free-flow cruising speed, metres/second (~30 mph).
pub const V_MAX: f64 = 13.4;
/// Velocity-tracking time constant, seconds.
pub const TAU: f64 = 1.0;
/// Maximum magnitude of acceleration/deceleration, metres/second².
pub const A_MAX: f64 = 2.0;
/// Driver reaction time folded into the safe-following check, seconds.
pub const T_REACTION: f64 = 1.2;
/// Minimum effective gap used in the emergency-braking kinematic formula,
/// to avoid dividing by (near-)zero when a predecessor is stopped exactly
/// at `safe_distance`.
pub const EPS: f64 = 0.1;

/// A car's lifecycle stage.
///
/// Transitions are monotonic: `Arriving -> Queued -> Serving -> Completed`,
/// enforced by [`Car::transition_to`]. No reversals are ever valid.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CarStatus {
    Arriving,
    Queued,
    Serving,
    Completed,
}

impl CarStatus {
    /// `true` if `self -> next` is a legal forward transition.
    fn can_advance_to(self, next: CarStatus) -> bool {
        matches!(
            (self, next),
            (CarStatus::Arriving, CarStatus::Queued)
                | (CarStatus::Queued, CarStatus::Serving)
                | (CarStatus::Serving, CarStatus::Completed)
        )
    }
}

/// One vehicle's physical and lifecycle state.
///
/// `position_s` is arc length from the queue head, increasing toward the
/// queue tail: the front car (closest to the booth) has the smallest
/// `position_s`. Advancing forward therefore *decreases* `position_s`.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Car {
    pub car_id: CarId,
    pub queue_id: Option<QueueId>,
    pub booth_id: Option<BoothId>,
    pub position_s: f64,
    pub velocity: f64,
    pub acceleration: f64,
    pub status: CarStatus,
    pub spawn_time: SimTime,
    pub service_start: Option<SimTime>,
    pub complete_time: Option<SimTime>,
}

impl Car {
    /// Construct a freshly arrived car at `position_s`, stationary, at
    /// `spawn_time`.
    pub fn new(car_id: CarId, queue_id: QueueId, position_s: f64, spawn_time: SimTime) -> Self {
        Self {
            car_id,
            queue_id: Some(queue_id),
            booth_id: None,
            position_s,
            velocity: 0.0,
            acceleration: 0.0,
            status: CarStatus::Arriving,
            spawn_time,
            service_start: None,
            complete_time: None,
        }
    }

    /// Advance `status` forward by one stage. Rejects any transition that
    /// is not a legal forward step (including attempts to stay put or go
    /// backward).
    pub fn transition_to(&mut self, next: CarStatus) -> FleetResult<()> {
        if !self.status.can_advance_to(next) {
            return Err(FleetError::InvalidTransition(self.car_id, self.status, next));
        }
        self.status = next;
        Ok(())
    }

    /// How long this car waited between arrival and service start. `None`
    /// until service has begun.
    pub fn wait_time(&self) -> Option<f64> {
        self.service_start.map(|start| start - self.spawn_time)
    }

    /// How long this car spent being served. `None` until service has
    /// completed.
    pub fn service_time(&self) -> Option<f64> {
        match (self.service_start, self.complete_time) {
            (Some(start), Some(end)) => Some(end - start),
            _ => None,
        }
    }
}

/// Advance `car` by `dt` seconds of car-following physics.
///
/// `gap` is the arc-length distance to the car's predecessor (or to the
/// queue's stop line if it has none), already measured along the waitline.
/// `safe_distance` is the minimum spatial gap to maintain at rest.
///
/// Mutates `car.velocity`, `car.acceleration`, and `car.position_s` in
/// place. Never moves the car past its predecessor: the kinematic advance
/// is clamped so the post-step gap is never negative.
pub fn car_following_step(car: &mut Car, gap: Option<f64>, safe_distance: f64, dt: SimTime) {
    let target_velocity = if car.status == CarStatus::Serving {
        0.0
    } else {
        V_MAX
    };

    let mut a = ((target_velocity - car.velocity) / TAU).clamp(-A_MAX, A_MAX);

    if let Some(gap) = gap {
        if gap < safe_distance + car.velocity * T_REACTION {
            let effective_gap = (gap - safe_distance).max(EPS);
            let braking = -(car.velocity * car.velocity) / (2.0 * effective_gap);
            // The safe-distance constraint is never less restrictive than
            // the target-tracking acceleration; take whichever decelerates
            // harder.
            a = a.min(braking);
        }
    }

    car.acceleration = a;
    car.velocity = (car.velocity + a * dt).clamp(0.0, V_MAX);

    let mut ds = car.velocity * dt + 0.5 * a * dt * dt;
    ds = ds.max(0.0);

    if let Some(gap) = gap {
        // Never close more than the available room down to `safe_distance`
        // — this is what makes "car may not overtake predecessor" hold
        // exactly rather than just statistically.
        ds = ds.min((gap - safe_distance).max(0.0));
    }

    car.position_s = (car.position_s - ds).max(0.0);
}

#[cfg(test)]
mod tests {
    use super::*;
    use border_core::QueueId;

    fn new_car(position_s: f64) -> Car {
        Car::new(CarId(0), QueueId(0), position_s, 0.0)
    }

    #[test]
    fn transitions_are_monotonic() {
        let mut car = new_car(10.0);
        assert!(car.transition_to(CarStatus::Queued).is_ok());
        assert!(car.transition_to(CarStatus::Serving).is_ok());
        assert!(car.transition_to(CarStatus::Completed).is_ok());
    }

    #[test]
    fn rejects_skipped_and_backward_transitions() {
        let mut car = new_car(10.0);
        assert!(car.transition_to(CarStatus::Serving).is_err());
        car.transition_to(CarStatus::Queued).unwrap();
        car.transition_to(CarStatus::Serving).unwrap();
        assert!(car.transition_to(CarStatus::Queued).is_err());
        assert!(car.transition_to(CarStatus::Arriving).is_err());
    }

    #[test]
    fn free_flow_accelerates_toward_v_max() {
        let mut car = new_car(1000.0);
        car.transition_to(CarStatus::Queued).unwrap();
        for _ in 0..200 {
            car_following_step(&mut car, None, 5.0, 0.1);
        }
        assert!((car.velocity - V_MAX).abs() < 0.01, "got {}", car.velocity);
    }

    #[test]
    fn velocity_never_negative_or_over_v_max() {
        let mut car = new_car(1.0);
        car.velocity = 20.0; // implausible, but the clamp must still hold
        for _ in 0..50 {
            car_following_step(&mut car, Some(0.5), 5.0, 0.1);
            assert!(car.velocity >= 0.0);
            assert!(car.velocity <= V_MAX);
        }
    }

    #[test]
    fn never_overtakes_predecessor() {
        let mut car = new_car(100.0);
        let safe_distance = 5.0;
        let mut gap = 6.0; // predecessor just ahead of the safe distance
        for _ in 0..500 {
            car_following_step(&mut car, Some(gap), safe_distance, 0.05);
            // Predecessor is fixed here; the gap shrinks by however much
            // this car advances.
            let advanced = 100.0 - car.position_s;
            gap = 6.0 - advanced;
            assert!(gap >= safe_distance - 1e-6, "gap {gap} < safe_distance {safe_distance}");
        }
    }

    #[test]
    fn serving_car_decelerates_to_stop() {
        let mut car = new_car(0.0);
        car.velocity = V_MAX;
        car.transition_to(CarStatus::Queued).unwrap();
        car.transition_to(CarStatus::Serving).unwrap();
        for _ in 0..500 {
            car_following_step(&mut car, None, 5.0, 0.1);
        }
        assert!(car.velocity.abs() < 0.01, "got {}", car.velocity);
    }
}
