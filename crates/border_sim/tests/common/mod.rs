//! Shared helpers for `border_sim`'s black-box integration tests. Every
//! test here drives the public [`SimulationHandle`] API only, the way an
//! external HTTP façade would.

use border_core::BoothId;
use border_fleet::{AssignmentKind, Stats};
use border_path::{GeoPoint, Waitline};
use border_sim::{BacklogPolicy, BorderConfig, SimulationConfig, SimulationHandle, SimulationParams};
use border_telemetry::PhoneConfig;

/// Large enough that every `SimClock::next_slice` call clamps to exactly
/// `MAX_SLICE_SECS`, regardless of real wall-clock jitter between ticks —
/// this is what makes "batch mode" runs reproducible (see the Determinism
/// law in `laws.rs`).
pub const BATCH_TIME_FACTOR: f64 = 1.0e9;

/// One straight ~150 m lane per queue, spaced a few metres apart.
pub fn waitlines(num_queues: usize) -> Vec<Waitline> {
    (0..num_queues)
        .map(|i| {
            let lon_offset = i as f64 * -0.00002;
            Waitline::new(vec![
                GeoPoint::new(32.5420, -117.0297 + lon_offset),
                GeoPoint::new(32.5410, -117.0297 + lon_offset),
            ])
            .expect("two distinct points form a valid waitline")
        })
        .collect()
}

pub fn border_config(
    num_queues: usize,
    nodes_per_queue: Vec<usize>,
    arrival_rate: f64,
    service_rates: Vec<f64>,
    queue_assignment: AssignmentKind,
    max_queue_length: usize,
) -> BorderConfig {
    BorderConfig {
        num_queues,
        nodes_per_queue,
        arrival_rate,
        service_rates,
        queue_assignment,
        safe_distance: 5.0,
        max_queue_length,
    }
}

pub fn simulation_config(max_simulation_time: f64, rng_seed: u64) -> SimulationConfig {
    simulation_config_with_factor(max_simulation_time, rng_seed, BATCH_TIME_FACTOR)
}

pub fn simulation_config_with_factor(
    max_simulation_time: f64,
    rng_seed: u64,
    time_factor: f64,
) -> SimulationConfig {
    SimulationConfig {
        max_simulation_time,
        time_factor,
        enable_telemetry: true,
        enable_position_tracking: true,
        rng_seed,
    }
}

pub fn params(border: BorderConfig, simulation: SimulationConfig) -> SimulationParams {
    SimulationParams {
        border,
        simulation,
        phone: PhoneConfig::default(),
        backlog_policy: BacklogPolicy::DropOldest,
    }
}

/// Start a simulation and drain its subscription to completion, returning
/// the last published snapshot (always `Some` once the run reaches a
/// terminal state, since `Simulation::run` publishes a final snapshot
/// unconditionally before closing subscribers).
pub fn run_to_completion(
    sim_params: SimulationParams,
    num_queues: usize,
    csv_path: Option<std::path::PathBuf>,
) -> (SimulationHandle, border_sim::Snapshot) {
    let handle = SimulationHandle::start(sim_params, waitlines(num_queues), csv_path).unwrap();
    let subscription = handle.subscribe();
    let mut last = None;
    while let Some(snapshot) = subscription.recv() {
        last = Some((*snapshot).clone());
    }
    (handle, last.expect("a terminal run always publishes a final snapshot"))
}

/// A deliberate step in a [`stats_after`] checkpoint sequence.
pub enum Step {
    /// Block until exactly this many sim-seconds have been consumed.
    Advance(f64),
    /// Mutate a booth's service rate (booth index, new rate/min).
    BumpRate(u32, f64),
    /// Add a booth to a queue (queue index, service rate/min).
    AddBooth(u32, f64),
}

/// A `time_factor` tiny enough that the orchestrator's own wall-clock-paced
/// ticks between `advance()` calls are negligible, leaving `Step::Advance`
/// as the sole source of sim-time progress. Needed for precise mid-run
/// checkpoints (e.g. "stats as of exactly t=60s"), since the periodic
/// snapshot-publish cadence is itself wall-clock-throttled and cannot be
/// used to observe an exact instant.
pub const PRECISE_TIME_FACTOR: f64 = 1.0e-9;

/// Drive a fresh simulation through `steps` in order, then cancel and drain
/// to the final snapshot, returning its stats.
///
/// Because runs are deterministic for a fixed seed and control-op sequence
/// (see the Determinism law in `laws.rs`), the stats produced by a given
/// prefix of `steps` are reproducible across separate handles — so a
/// windowed quantity (e.g. "completions between t=60 and t=180") can be
/// read off as the difference between two checkpoint runs that share a
/// common prefix.
pub fn stats_after(sim_params: SimulationParams, num_queues: usize, steps: &[Step]) -> Stats {
    let handle = SimulationHandle::start(sim_params, waitlines(num_queues), None).unwrap();
    let subscription = handle.subscribe();

    for step in steps {
        match *step {
            Step::Advance(dt) => handle.advance(dt).unwrap(),
            Step::BumpRate(booth_idx, rate) => {
                handle.update_booth_rate(BoothId(booth_idx), rate).unwrap()
            }
            Step::AddBooth(queue_idx, rate) => {
                handle
                    .add_booth(border_core::QueueId(queue_idx), rate)
                    .unwrap()
            }
        }
    }
    handle.cancel().unwrap();

    let mut last = None;
    while let Some(snapshot) = subscription.recv() {
        last = Some((*snapshot).clone());
    }
    handle.join().unwrap();
    last.expect("a cancelled run still publishes a final snapshot").stats
}
