//! `border_core` — foundational types for the border-crossing simulation
//! engine.
//!
//! This crate is a dependency of every other `border_*` crate. It
//! intentionally has no `border_*` dependencies and minimal external ones
//! (only `rand`, `rand_distr`, and `thiserror`, plus optional `serde`).
//!
//! # What lives here
//!
//! | Module    | Contents                                      |
//! |-----------|------------------------------------------------|
//! | [`ids`]   | `CarId`, `QueueId`, `BoothId`                  |
//! | [`time`]  | `SimTime`, `SimClock`, `SimConfig`             |
//! | [`rng`]   | `SimRng` — single-owner deterministic stream   |
//! | [`error`] | `CoreError`, `CoreResult`                      |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                |
//! |---------|--------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to public types.        |

pub mod error;
pub mod ids;
pub mod rng;
pub mod time;

pub use error::{CoreError, CoreResult};
pub use ids::{BoothId, CarId, QueueId};
pub use rng::SimRng;
pub use time::{SimClock, SimConfig, SimTime, MAX_SLICE_SECS};
