//! basic_run — smallest example for the border-crossing simulation engine.
//!
//! Two queues, one booth each, moderate arrival load, run to completion in
//! batch mode (a large `time_factor` so the tick loop drains the whole
//! `max_simulation_time` in a handful of wall-clock iterations) and print
//! summary statistics. The load-bearing analogue of the grounding corpus's
//! `xsmall` runner, relocated out of the read-only examples pack.

use std::time::Instant;

use anyhow::Result;

use border_fleet::AssignmentKind;
use border_path::{GeoPoint, Waitline};
use border_sim::{BacklogPolicy, BorderConfig, SimulationConfig, SimulationHandle, SimulationParams};
use border_telemetry::PhoneConfig;

const SEED: u64 = 42;

fn build_waitlines() -> Result<Vec<Waitline>> {
    // Two short, roughly parallel lanes approaching a port of entry near
    // San Ysidro; a few metres apart, each ~150 m long.
    Ok(vec![
        Waitline::new(vec![
            GeoPoint::new(32.5420, -117.0297),
            GeoPoint::new(32.5410, -117.0297),
        ])?,
        Waitline::new(vec![
            GeoPoint::new(32.5420, -117.0299),
            GeoPoint::new(32.5410, -117.0299),
        ])?,
    ])
}

fn params() -> SimulationParams {
    SimulationParams {
        border: BorderConfig {
            num_queues: 2,
            nodes_per_queue: vec![1, 1],
            arrival_rate: 10.0,
            service_rates: vec![6.0, 6.0],
            queue_assignment: AssignmentKind::Shortest,
            safe_distance: 5.0,
            max_queue_length: 50,
        },
        simulation: SimulationConfig {
            max_simulation_time: 600.0,
            time_factor: 10_000.0,
            enable_telemetry: true,
            enable_position_tracking: true,
            rng_seed: SEED,
        },
        phone: PhoneConfig::default(),
        backlog_policy: BacklogPolicy::DropOldest,
    }
}

fn main() -> Result<()> {
    println!("=== basic_run — border_sim digital twin ===");
    println!("Queues: 2  |  Duration: 600 s (sim)  |  Seed: {SEED}");
    println!();

    let csv_path = std::env::current_dir()?.join("basic_run_telemetry.csv");
    let handle = SimulationHandle::start(params(), build_waitlines()?, Some(csv_path.clone()))?;
    let subscription = handle.subscribe();

    let t0 = Instant::now();
    let mut final_snapshot = None;
    while let Some(snapshot) = subscription.recv() {
        final_snapshot = Some((*snapshot).clone());
    }
    handle.join()?;
    let elapsed = t0.elapsed();

    println!("Simulation complete in {:.3} s (wall)", elapsed.as_secs_f64());
    println!();

    match final_snapshot {
        Some(snapshot) => {
            println!("Final status: {:?}", snapshot.status);
            println!("Sim time:     {:.1} s", snapshot.sim_time);
            println!();
            println!("{:<22} {:>10}", "Total arrivals", snapshot.stats.total_arrivals);
            println!("{:<22} {:>10}", "Completions", snapshot.stats.total_completions);
            println!("{:<22} {:>10}", "Dropped", snapshot.stats.dropped);
            println!(
                "{:<22} {:>10}",
                "Currently in system",
                snapshot.stats.currently_in_system()
            );
            println!("{:<22} {:>9.2}s", "Mean wait", snapshot.stats.mean_wait());
            println!(
                "{:<22} {:>9.2}s",
                "Mean service time",
                snapshot.stats.mean_service_time()
            );
            println!(
                "{:<22} {:>9.2}/min",
                "Throughput",
                snapshot.stats.throughput_per_min(snapshot.sim_time)
            );
            println!();
            println!("{:<10} {:<10} {:<10}", "Booth", "Queue", "Served");
            println!("{}", "-".repeat(32));
            for booth in &snapshot.booths {
                println!(
                    "{:<10} {:<10} {:<10}",
                    booth.booth_id, booth.queue_id, booth.total_served
                );
            }
        }
        None => println!("No snapshot was ever published."),
    }

    println!();
    println!("Telemetry CSV: {}", csv_path.display());

    Ok(())
}
