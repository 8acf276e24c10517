//! `border_telemetry` — synthesizes per-vehicle phone sensor telemetry and
//! archives it as CSV.
//!
//! # Crate layout
//!
//! | Module       | Contents                                               |
//! |---------------|----------------------------------------------------------|
//! | [`phone`]     | `PhoneConfig`, `GpsNoise`, `DeviceOrientation`          |
//! | [`frame`]     | `SensorFrame`                                          |
//! | [`synth`]     | `TelemetrySynthesizer` — per-car cadence + noise model  |
//! | [`csv_sink`]  | `CsvSink` — append-only CSV archive                    |
//! | [`error`]     | `TelemetryError`, `TelemetryResult`                    |

pub mod csv_sink;
pub mod error;
pub mod frame;
pub mod phone;
pub mod synth;

pub use csv_sink::CsvSink;
pub use error::{TelemetryError, TelemetryResult};
pub use frame::SensorFrame;
pub use phone::{DeviceOrientation, GpsNoise, PhoneConfig};
pub use synth::TelemetrySynthesizer;
