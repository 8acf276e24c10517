//! Shared error base.
//!
//! Sub-crates define their own error enums scoped to their own failure
//! modes and convert them into `border_sim::SimError` via `From` impls at
//! the orchestrator boundary. `CoreError` only covers failures that can
//! occur in `border_core` itself (currently: none at construction time, but
//! the type exists so downstream crates have a common leaf to wrap).

use thiserror::Error;

/// Errors originating in `border_core` primitives.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("configuration error: {0}")]
    Config(String),
}

/// Shorthand result type for `border_core`.
pub type CoreResult<T> = Result<T, CoreError>;
