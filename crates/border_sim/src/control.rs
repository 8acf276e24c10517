//! The control surface: typed mutations accepted from outside the
//! orchestrator, deposited into a FIFO and applied at the next tick
//! boundary.

use std::sync::mpsc::{self, Receiver, Sender};

use border_core::{BoothId, QueueId};
use border_telemetry::PhoneConfig;

/// One externally requested mutation.
///
/// `Advance` is a test hook: it blocks the caller (via a completion
/// channel, see [`ControlIntake::advance_and_wait`]) until the orchestrator
/// has consumed exactly that much sim time.
#[derive(Debug)]
pub enum ControlOp {
    AddCar {
        queue_id: Option<QueueId>,
        phone_config: Option<PhoneConfig>,
    },
    UpdateBoothRate {
        booth_id: BoothId,
        service_rate: f64,
    },
    AddBooth {
        queue_id: QueueId,
        service_rate: f64,
    },
    SetTimeFactor {
        time_factor: f64,
    },
    Cancel,
    Advance {
        dt_seconds: f64,
        done: Sender<()>,
    },
}

/// Sending half of the control FIFO. Cloneable — multiple external callers
/// may hold one (the "multi-producer" half of the spec's "multi-producer
/// FIFO feeding the orchestrator").
#[derive(Clone)]
pub struct ControlSender(Sender<ControlOp>);

impl ControlSender {
    /// Enqueue an op. Only fails if the orchestrator thread has already
    /// exited (its `Receiver` dropped), which happens once the simulation
    /// reaches a terminal state and tears itself down.
    pub fn send(&self, op: ControlOp) -> Result<(), ControlOp> {
        self.0.send(op).map_err(|e| e.0)
    }

    /// Convenience wrapper for the `advance(dt)` test hook: enqueues the op
    /// and blocks until the orchestrator signals it has consumed that much
    /// sim time.
    pub fn advance_and_wait(&self, dt_seconds: f64) -> Result<(), ControlOp> {
        let (done_tx, done_rx) = mpsc::channel();
        self.send(ControlOp::Advance {
            dt_seconds,
            done: done_tx,
        })?;
        let _ = done_rx.recv();
        Ok(())
    }
}

/// Receiving half, owned exclusively by the orchestrator thread.
pub struct ControlReceiver(Receiver<ControlOp>);

impl ControlReceiver {
    /// Drain every op currently queued, without blocking.
    pub fn drain(&self) -> Vec<ControlOp> {
        self.0.try_iter().collect()
    }
}

/// Construct a fresh control FIFO.
pub fn control_channel() -> (ControlSender, ControlReceiver) {
    let (tx, rx) = mpsc::channel();
    (ControlSender(tx), ControlReceiver(rx))
}
