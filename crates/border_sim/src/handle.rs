//! Public, thread-spanning façade over the orchestrator.
//!
//! `SimulationHandle` is the only supported way to start a simulation: it
//! owns the `JoinHandle` of the orchestrator thread and the sending half
//! of its control FIFO, and is what an external HTTP layer (out of scope
//! here) would hold per simulation id.

use std::panic::{self, AssertUnwindSafe};
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};

use border_core::BoothId;
use border_path::Waitline;
use border_telemetry::{CsvSink, PhoneConfig};

use crate::config::SimulationParams;
use crate::control::{control_channel, ControlOp, ControlSender};
use crate::error::{SimError, SimResult};
use crate::observer::{BroadcastHub, Subscription};
use crate::orchestrator::Simulation;
use crate::snapshot::{SimStatus, Snapshot};

/// Handle to a running (or finished) simulation.
///
/// Dropping the handle does not stop the orchestrator thread; call
/// [`SimulationHandle::cancel`] and [`SimulationHandle::join`] for a clean
/// shutdown, or simply let it run to completion and `join`.
pub struct SimulationHandle {
    control: ControlSender,
    hub: Arc<BroadcastHub>,
    last_snapshot: Arc<Mutex<Option<Snapshot>>>,
    thread: Option<JoinHandle<SimResult<()>>>,
}

/// An [`crate::observer::Observer`] that mirrors every published snapshot
/// into a shared slot, so the spawning thread can recover "last known
/// good state" if the orchestrator thread later panics.
struct MirroringObserver {
    slot: Arc<Mutex<Option<Snapshot>>>,
}

impl crate::observer::Observer for MirroringObserver {
    fn on_snapshot(&mut self, snapshot: &Snapshot) {
        *self.slot.lock().unwrap() = Some(snapshot.clone());
    }
}

impl SimulationHandle {
    /// Validate `params`, construct the orchestrator, and spawn it on its
    /// own thread. `waitlines` must have one entry per queue in
    /// `params.border`.
    pub fn start(
        params: SimulationParams,
        waitlines: Vec<Waitline>,
        csv_path: Option<std::path::PathBuf>,
    ) -> SimResult<Self> {
        params.validate()?;

        let (control_tx, control_rx) = control_channel();
        let hub = Arc::new(BroadcastHub::new(params.backlog_policy));
        let last_snapshot = Arc::new(Mutex::new(None));

        let hub_for_thread = hub.clone();
        let slot_for_thread = last_snapshot.clone();

        let thread = thread::Builder::new()
            .name("border-sim-orchestrator".to_string())
            .spawn(move || -> SimResult<()> {
                run_orchestrator(params, waitlines, control_rx, hub_for_thread, slot_for_thread, csv_path)
            })
            .map_err(|e| SimError::Internal(format!("failed to spawn orchestrator thread: {e}")))?;

        Ok(Self {
            control: control_tx,
            hub,
            last_snapshot,
            thread: Some(thread),
        })
    }

    /// Request cancellation. Best-effort: the orchestrator applies it at
    /// the next tick boundary.
    pub fn cancel(&self) -> SimResult<()> {
        self.control
            .send(ControlOp::Cancel)
            .map_err(|_| SimError::Terminal)
    }

    /// Enqueue a new car. `queue_id = None` defers to the configured
    /// assignment policy.
    pub fn add_car(
        &self,
        queue_id: Option<border_core::QueueId>,
        phone_config: Option<PhoneConfig>,
    ) -> SimResult<()> {
        self.control
            .send(ControlOp::AddCar {
                queue_id,
                phone_config,
            })
            .map_err(|_| SimError::Terminal)
    }

    pub fn update_booth_rate(&self, booth_id: BoothId, service_rate: f64) -> SimResult<()> {
        self.control
            .send(ControlOp::UpdateBoothRate {
                booth_id,
                service_rate,
            })
            .map_err(|_| SimError::Terminal)
    }

    pub fn add_booth(&self, queue_id: border_core::QueueId, service_rate: f64) -> SimResult<()> {
        self.control
            .send(ControlOp::AddBooth {
                queue_id,
                service_rate,
            })
            .map_err(|_| SimError::Terminal)
    }

    pub fn set_time_factor(&self, time_factor: f64) -> SimResult<()> {
        self.control
            .send(ControlOp::SetTimeFactor { time_factor })
            .map_err(|_| SimError::Terminal)
    }

    /// Test hook: block until the orchestrator has consumed exactly
    /// `dt_seconds` of sim time.
    pub fn advance(&self, dt_seconds: f64) -> SimResult<()> {
        self.control
            .advance_and_wait(dt_seconds)
            .map_err(|_| SimError::Terminal)
    }

    /// Subscribe to the snapshot broadcast plane.
    pub fn subscribe(&self) -> Subscription {
        self.hub.subscribe()
    }

    /// The most recently published snapshot, if any — usable without
    /// blocking on the subscriber plane (e.g. for a status-poll endpoint).
    pub fn last_snapshot(&self) -> Option<Snapshot> {
        self.last_snapshot.lock().unwrap().clone()
    }

    /// Block until the orchestrator thread exits, returning its result.
    /// A panicking tick loop surfaces here as `Ok(Err(SimError::Internal(..)))`
    /// rather than propagating the panic to the caller.
    pub fn join(mut self) -> SimResult<()> {
        let thread = self
            .thread
            .take()
            .expect("join called more than once");
        match thread.join() {
            Ok(result) => result,
            Err(panic_payload) => {
                let message = panic_message(&*panic_payload);
                Err(SimError::Internal(message))
            }
        }
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "orchestrator thread panicked with a non-string payload".to_string()
    }
}

/// Runs on the dedicated orchestrator thread. Wraps the tick loop in
/// `catch_unwind` so a panic is converted into a `Failed` status and a
/// final snapshot built from the mirrored last-known-good state, matching
/// §4.6A: the workspace does not set `panic = "abort"` specifically so
/// this recovery path can run.
fn run_orchestrator(
    params: SimulationParams,
    waitlines: Vec<Waitline>,
    control_rx: crate::control::ControlReceiver,
    hub: Arc<BroadcastHub>,
    last_snapshot: Arc<Mutex<Option<Snapshot>>>,
    csv_path: Option<std::path::PathBuf>,
) -> SimResult<()> {
    let enable_telemetry = params.simulation.enable_telemetry;

    let mut sim = Simulation::new(params, waitlines, control_rx, hub.clone())?;

    if enable_telemetry {
        if let Some(path) = csv_path {
            let sink = CsvSink::new(&path)?;
            sim = sim.with_csv_sink(sink);
        }
    }

    let mut observer = MirroringObserver {
        slot: last_snapshot.clone(),
    };

    let result = panic::catch_unwind(AssertUnwindSafe(|| sim.run(&mut observer)));

    match result {
        Ok(run_result) => run_result,
        Err(panic_payload) => {
            let message = panic_message(&*panic_payload);
            let mut failed_snapshot = last_snapshot.lock().unwrap().clone().unwrap_or(Snapshot {
                sim_time: 0.0,
                status: SimStatus::Failed,
                cars: Vec::new(),
                booths: Vec::new(),
                stats: border_fleet::Stats::new(),
                failure_message: Some(message.clone()),
            });
            failed_snapshot.status = SimStatus::Failed;
            failed_snapshot.failure_message = Some(message.clone());
            hub.publish(failed_snapshot, crate::orchestrator::DEFAULT_PUBLISH_PERIOD);
            hub.close_all();
            Err(SimError::Internal(message))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{BacklogPolicy, BorderConfig, SimulationConfig};
    use border_fleet::AssignmentKind;
    use border_path::GeoPoint;

    fn params() -> SimulationParams {
        SimulationParams {
            border: BorderConfig {
                num_queues: 1,
                nodes_per_queue: vec![1],
                arrival_rate: 30.0,
                service_rates: vec![30.0],
                queue_assignment: AssignmentKind::Shortest,
                safe_distance: 5.0,
                max_queue_length: 10,
            },
            simulation: SimulationConfig {
                max_simulation_time: 2.0,
                time_factor: 1_000_000.0,
                enable_telemetry: false,
                enable_position_tracking: true,
                rng_seed: 1,
            },
            phone: PhoneConfig::default(),
            backlog_policy: BacklogPolicy::DropOldest,
        }
    }

    fn waitline() -> Waitline {
        Waitline::new(vec![GeoPoint::new(32.0, -117.0), GeoPoint::new(32.01, -117.0)]).unwrap()
    }

    /// A long-running, real-time-paced configuration: gives `cancel` ample
    /// headroom to land before the simulation would otherwise complete.
    fn slow_params() -> SimulationParams {
        let mut p = params();
        p.simulation.max_simulation_time = 600.0;
        p.simulation.time_factor = 1.0;
        p
    }

    #[test]
    fn runs_to_completion_and_joins_cleanly() {
        let handle = SimulationHandle::start(params(), vec![waitline()], None).unwrap();
        handle.join().unwrap();
    }

    #[test]
    fn cancel_reaches_cancelled_status() {
        let handle = SimulationHandle::start(slow_params(), vec![waitline()], None).unwrap();
        handle.cancel().unwrap();
        // `join` blocks until the orchestrator has published its final
        // snapshot and exited; a clean `Ok` here means it reached a
        // terminal state (cancelled, in this case) rather than panicking.
        handle.join().unwrap();
    }
}
