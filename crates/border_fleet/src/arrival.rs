//! Poisson arrival process feeding new cars into the system.

use border_core::{SimRng, SimTime};

/// A single Poisson arrival stream. `rate_per_min` may be mutated at any
/// time; the next scheduled arrival is left untouched (consistent with
/// [`crate::booth::Booth::set_rate`]'s treatment of in-flight service) and
/// only draws made *after* the change use the new rate.
pub struct ArrivalSource {
    rate_per_min: f64,
    next_arrival_time: SimTime,
}

impl ArrivalSource {
    /// Construct a source whose first arrival is drawn starting from
    /// `start_time`.
    pub fn new(rate_per_min: f64, start_time: SimTime, rng: &mut SimRng) -> Self {
        let mut source = Self {
            rate_per_min,
            next_arrival_time: start_time,
        };
        source.schedule_next(start_time, rng);
        source
    }

    pub fn rate_per_min(&self) -> f64 {
        self.rate_per_min
    }

    pub fn set_rate(&mut self, rate_per_min: f64) {
        self.rate_per_min = rate_per_min;
    }

    fn schedule_next(&mut self, now: SimTime, rng: &mut SimRng) {
        let dt = rng.exponential(self.rate_per_min / 60.0);
        self.next_arrival_time = now + dt;
    }

    /// Drain and return every arrival timestamp up to and including
    /// `horizon`, scheduling each subsequent arrival as it is drained.
    pub fn due_before(&mut self, horizon: SimTime, rng: &mut SimRng) -> Vec<SimTime> {
        let mut arrivals = Vec::new();
        while self.next_arrival_time <= horizon && self.next_arrival_time.is_finite() {
            let t = self.next_arrival_time;
            arrivals.push(t);
            self.schedule_next(t, rng);
        }
        arrivals
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_rate_never_arrives() {
        let mut rng = SimRng::new(1);
        let mut source = ArrivalSource::new(0.0, 0.0, &mut rng);
        assert!(source.due_before(10_000.0, &mut rng).is_empty());
    }

    #[test]
    fn arrivals_are_monotonically_increasing() {
        let mut rng = SimRng::new(2);
        let mut source = ArrivalSource::new(30.0, 0.0, &mut rng);
        let arrivals = source.due_before(120.0, &mut rng);
        assert!(!arrivals.is_empty());
        for window in arrivals.windows(2) {
            assert!(window[1] > window[0]);
        }
    }

    #[test]
    fn horizon_is_inclusive_boundary() {
        let mut rng = SimRng::new(3);
        let mut source = ArrivalSource::new(60.0, 0.0, &mut rng);
        let first_batch = source.due_before(5.0, &mut rng);
        let second_batch = source.due_before(10.0, &mut rng);
        for t in &first_batch {
            assert!(*t <= 5.0);
        }
        for t in &second_batch {
            assert!(*t > 5.0 && *t <= 10.0);
        }
    }
}
