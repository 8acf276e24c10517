//! `border_sim` — the simulation orchestrator, control surface, and
//! observer/broadcast plane that tie the lower crates into a runnable
//! border-crossing simulation.
//!
//! # Crate layout
//!
//! | Module          | Contents                                               |
//! |-----------------|---------------------------------------------------------|
//! | [`config`]      | `BorderConfig`, `SimulationConfig`, `SimulationParams`, `BacklogPolicy` |
//! | [`control`]     | `ControlOp`, `ControlSender`, `ControlReceiver`, `control_channel` |
//! | [`snapshot`]    | `Snapshot`, `CarSnapshot`, `BoothSnapshot`, `SimStatus` |
//! | [`observer`]    | `Observer`, `NoopObserver`, `BroadcastHub`, `Subscription` |
//! | [`orchestrator`]| `Simulation` — the tick loop                           |
//! | [`handle`]      | `SimulationHandle` — the public, thread-spanning façade |
//! | [`error`]       | `SimError`, `SimResult`                                |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                |
//! |---------|--------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to public snapshot/config types. |

pub mod config;
pub mod control;
pub mod error;
pub mod handle;
pub mod observer;
pub mod orchestrator;
pub mod snapshot;

pub use config::{BacklogPolicy, BorderConfig, SimulationConfig, SimulationParams};
pub use control::{control_channel, ControlOp, ControlReceiver, ControlSender};
pub use error::{SimError, SimResult};
pub use handle::SimulationHandle;
pub use observer::{BroadcastHub, NoopObserver, Observer, Subscription};
pub use orchestrator::Simulation;
pub use snapshot::{BoothSnapshot, CarSnapshot, SimStatus, Snapshot};
