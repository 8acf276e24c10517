//! `border_fleet` — cars, booths, queues, assignment policy, and the
//! arrival process.
//!
//! # Crate layout
//!
//! | Module         | Contents                                              |
//! |-----------------|--------------------------------------------------------|
//! | [`car`]         | `Car`, `CarStatus`, `car_following_step`              |
//! | [`booth`]       | `Booth` — exponential single-server station           |
//! | [`queue`]       | `Queue` — ordered waiting lane                        |
//! | [`assignment`]  | `Assigner`, `AssignmentKind`                          |
//! | [`arrival`]     | `ArrivalSource` — Poisson car arrivals                |
//! | [`stats`]       | `Stats` — running throughput/wait accumulators        |
//! | [`error`]       | `FleetError`, `FleetResult`                           |

pub mod arrival;
pub mod assignment;
pub mod booth;
pub mod car;
pub mod error;
pub mod queue;
pub mod stats;

pub use arrival::ArrivalSource;
pub use assignment::{AssignmentKind, Assigner};
pub use booth::Booth;
pub use car::{car_following_step, Car, CarStatus, EPS};
pub use error::{FleetError, FleetResult};
pub use queue::Queue;
pub use stats::Stats;
