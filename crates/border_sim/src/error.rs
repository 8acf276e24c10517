//! Top-level error surface for `border_sim`.
//!
//! Each variant corresponds to one row of the error-handling table: an
//! external HTTP layer (out of scope here) can match on variant to choose a
//! status code without string-matching messages.

use border_core::CoreError;
use border_fleet::FleetError;
use border_path::PathError;
use border_telemetry::TelemetryError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SimError {
    /// Validation — inconsistent node counts, non-positive rates, unknown
    /// assignment policy. Rejected at construction; the simulation is never
    /// created.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// Not found — an operation referenced an id that does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// State-incompatible — a mutation was attempted on a terminal
    /// simulation, or a download was requested before completion.
    #[error("simulation is in a terminal state and rejects mutations")]
    Terminal,

    /// Resource — arrival dropped, subscriber backlog exceeded.
    #[error("resource exhausted: {0}")]
    Resource(String),

    #[error("fleet error: {0}")]
    Fleet(#[from] FleetError),

    #[error("path error: {0}")]
    Path(#[from] PathError),

    #[error("telemetry error: {0}")]
    Telemetry(#[from] TelemetryError),

    #[error("core error: {0}")]
    Core(#[from] CoreError),

    /// Internal — the orchestrator thread panicked or otherwise failed
    /// unrecoverably. Captured by `SimulationHandle::join` rather than
    /// propagated here; this variant is stored on the final `Snapshot`
    /// instead of being matched against by callers.
    #[error("internal orchestrator failure: {0}")]
    Internal(String),
}

pub type SimResult<T> = Result<T, SimError>;
