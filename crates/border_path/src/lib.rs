//! `border_path` — arc-length parametrized waitline path.
//!
//! # Crate layout
//!
//! | Module       | Contents                                             |
//! |--------------|-------------------------------------------------------|
//! | [`geo`]      | `GeoPoint` — WGS-84 coordinate, haversine distance    |
//! | [`waitline`] | `Waitline` — arc length → (lat, lon, heading, curvature) |
//! | [`error`]    | `PathError`, `PathResult`                             |

pub mod error;
pub mod geo;
pub mod waitline;

pub use error::{PathError, PathResult};
pub use geo::GeoPoint;
pub use waitline::Waitline;
