//! Cross-cutting invariants the engine promises regardless of scenario:
//! determinism under a fixed seed, monotone rate response, and strict
//! conservation of cars.

mod common;

use border_fleet::AssignmentKind;

use common::{border_config, params, run_to_completion, simulation_config};

/// Same seed, same config, no control mutations: two independent runs must
/// produce byte-identical telemetry CSVs and equal final stats. Only
/// possible in batch mode, where `SimClock::next_slice` clamps to
/// `MAX_SLICE_SECS` on every tick regardless of real wall-clock jitter
/// between ticks (see `common::BATCH_TIME_FACTOR`).
#[test]
fn determinism_same_seed_same_config_same_output() {
    let dir = tempfile::tempdir().unwrap();
    let path_a = dir.path().join("run_a.csv");
    let path_b = dir.path().join("run_b.csv");

    let border = || border_config(2, vec![1, 1], 8.0, vec![3.0, 3.0], AssignmentKind::Shortest, 20);
    let sim = || simulation_config(200.0, 99);

    let (_handle_a, snapshot_a) =
        run_to_completion(params(border(), sim()), 2, Some(path_a.clone()));
    let (_handle_b, snapshot_b) =
        run_to_completion(params(border(), sim()), 2, Some(path_b.clone()));

    assert_eq!(snapshot_a.stats.total_arrivals, snapshot_b.stats.total_arrivals);
    assert_eq!(snapshot_a.stats.total_completions, snapshot_b.stats.total_completions);
    assert_eq!(snapshot_a.stats.dropped, snapshot_b.stats.dropped);
    assert_eq!(snapshot_a.sim_time, snapshot_b.sim_time);

    let contents_a = std::fs::read_to_string(&path_a).unwrap();
    let contents_b = std::fs::read_to_string(&path_b).unwrap();
    assert_eq!(contents_a, contents_b, "telemetry CSVs should be byte-identical");
}

/// Doubling (here, roughly 3x-ing for a wider margin) a saturated booth's
/// service rate strictly decreases the run's mean service time, which
/// tracks 1/mu under heavy load.
#[test]
fn raising_service_rate_strictly_decreases_mean_service_time() {
    let sim = simulation_config(3600.0, 17);

    let slow = border_config(1, vec![1], 300.0, vec![20.0], AssignmentKind::Shortest, 5000);
    let fast = border_config(1, vec![1], 300.0, vec![60.0], AssignmentKind::Shortest, 5000);

    let (_h1, snapshot_slow) = run_to_completion(params(slow, sim), 1, None);
    let (_h2, snapshot_fast) = run_to_completion(params(fast, sim), 1, None);

    assert!(
        snapshot_slow.stats.total_completions >= 200,
        "need enough completions ({}) for the mean to stabilize near 1/mu",
        snapshot_slow.stats.total_completions
    );

    assert!(
        snapshot_fast.stats.mean_service_time() < snapshot_slow.stats.mean_service_time(),
        "mean service time should drop when the service rate rises: slow={}, fast={}",
        snapshot_slow.stats.mean_service_time(),
        snapshot_fast.stats.mean_service_time()
    );
}

/// `total_arrivals = total_completions + currently_in_system + dropped`
/// holds at the end of any run, including one that mixes natural Poisson
/// arrivals, drops from overload, and explicit `add_car` control mutations.
#[test]
fn conservation_law_holds_at_terminal_state() {
    let border = border_config(1, vec![1], 40.0, vec![3.0], AssignmentKind::Shortest, 8);
    let sim = common::simulation_config_with_factor(120.0, 3, common::PRECISE_TIME_FACTOR);

    let handle =
        border_sim::SimulationHandle::start(params(border, sim), common::waitlines(1), None)
            .unwrap();
    let subscription = handle.subscribe();

    handle.advance(30.0).unwrap();
    for _ in 0..5 {
        handle.add_car(Some(border_core::QueueId(0)), None).unwrap();
    }
    handle.advance(90.0).unwrap();
    handle.cancel().unwrap();

    let mut last = None;
    while let Some(snapshot) = subscription.recv() {
        last = Some((*snapshot).clone());
    }
    handle.join().unwrap();
    let stats = last.expect("a cancelled run still publishes a final snapshot").stats;

    assert_eq!(
        stats.total_arrivals,
        stats.total_completions + stats.currently_in_system() + stats.dropped
    );
}
