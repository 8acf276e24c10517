//! Errors for `border_telemetry`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum TelemetryError {
    #[error("sampling_rate must be > 0, got {0}")]
    InvalidSamplingRate(f64),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV write error: {0}")]
    Csv(#[from] csv::Error),
}

pub type TelemetryResult<T> = Result<T, TelemetryError>;
