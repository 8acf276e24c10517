//! Simulation time model.
//!
//! # Design
//!
//! Unlike a fixed-tick digital twin, this engine advances by a variable
//! `Δt` each iteration of the orchestrator loop: `Δt = (wall_now -
//! wall_last) * time_factor`, clamped to `max_slice_secs` so a paused or
//! slow host process cannot produce one enormous integration step. Sim time
//! itself is a plain `f64` of elapsed seconds — there is no tick counter,
//! because car-following integration and Poisson arrivals are both
//! naturally continuous-time processes.

use std::time::{Duration, Instant};

/// Elapsed simulation time, in seconds, since the run started at `t=0`.
pub type SimTime = f64;

/// The largest `Δt` a single orchestrator iteration may advance, regardless
/// of how long the wall-clock gap since the last iteration was. Prevents a
/// suspended process (debugger pause, OS scheduling hiccup) from producing
/// a single unrealistic jump in car kinematics or arrivals.
pub const MAX_SLICE_SECS: SimTime = 1.0;

// ── SimClock ────────────────────────────────────────────────────────────────

/// Converts wall-clock elapsed time into clamped simulation-time slices.
///
/// `SimClock` holds no simulation state of its own beyond the running
/// `sim_time_s` total and the `Instant` of the last slice — it is cheap to
/// keep alongside the orchestrator and advanced once per tick.
#[derive(Debug, Clone)]
pub struct SimClock {
    /// Wall-clock instant this clock was created (or last resumed).
    wall_last: Instant,
    /// Ratio of simulated seconds to wall seconds. 1.0 = real-time.
    pub time_factor: f64,
    /// Total simulated seconds elapsed so far.
    pub sim_time_s: SimTime,
}

impl SimClock {
    /// Create a clock starting at `sim_time_s = 0` with the given time factor.
    pub fn new(time_factor: f64) -> Self {
        Self {
            wall_last: Instant::now(),
            time_factor: time_factor.max(0.0),
            sim_time_s: 0.0,
        }
    }

    /// Compute the next `Δt` (sim seconds) to advance by, based on wall-clock
    /// elapsed time since the previous call, clamped to `MAX_SLICE_SECS`.
    ///
    /// Also advances `sim_time_s` and resets the internal wall reference.
    pub fn next_slice(&mut self) -> SimTime {
        let now = Instant::now();
        let wall_elapsed = now.duration_since(self.wall_last).as_secs_f64();
        self.wall_last = now;

        let dt = (wall_elapsed * self.time_factor).min(MAX_SLICE_SECS);
        self.sim_time_s += dt;
        dt
    }

    /// Force-advance sim time by exactly `dt` seconds without consulting the
    /// wall clock. Used by the `advance(dt)` control-surface test hook,
    /// which must consume exactly the requested amount of sim time.
    pub fn force_advance(&mut self, dt: SimTime) {
        self.sim_time_s += dt;
        self.wall_last = Instant::now();
    }

    /// Wall-clock duration corresponding to `sim_seconds` at the current
    /// `time_factor`. Used to size the orchestrator's publish-period timer.
    pub fn wall_duration_for(&self, sim_seconds: SimTime) -> Duration {
        if self.time_factor <= 0.0 {
            return Duration::from_secs_f64(sim_seconds);
        }
        Duration::from_secs_f64((sim_seconds / self.time_factor).max(0.0))
    }
}

// ── SimConfig ─────────────────────────────────────────────────────────────────

/// Top-level run parameters shared by every crate that needs to know how
/// long the simulation runs or how its seed was chosen.
///
/// The border/telemetry/queue configuration structs (`border_sim::config`)
/// embed this alongside their own domain-specific fields; `SimConfig` itself
/// only covers what `border_core` needs to construct a clock and an RNG.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SimConfig {
    /// Total simulated seconds to run before transitioning to `completed`.
    pub max_simulation_time: SimTime,
    /// Ratio of simulated seconds to wall seconds.
    pub time_factor: f64,
    /// Master RNG seed. The same seed always produces identical draws.
    pub seed: u64,
}

impl SimConfig {
    /// Construct a `SimClock` pre-configured for this run.
    pub fn make_clock(&self) -> SimClock {
        SimClock::new(self.time_factor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn force_advance_is_exact() {
        let mut clock = SimClock::new(1.0);
        clock.force_advance(12.5);
        assert_eq!(clock.sim_time_s, 12.5);
    }

    #[test]
    fn next_slice_is_clamped() {
        let mut clock = SimClock::new(f64::MAX / 2.0);
        std::thread::sleep(Duration::from_millis(5));
        let dt = clock.next_slice();
        assert!(dt <= MAX_SLICE_SECS);
    }

    #[test]
    fn wall_duration_scales_with_time_factor() {
        let clock = SimClock::new(2.0);
        assert_eq!(clock.wall_duration_for(4.0), Duration::from_secs_f64(2.0));
    }
}
