//! Append-only CSV archive of synthesized telemetry frames.

use std::fs::File;
use std::path::Path;

use csv::Writer;

use crate::error::TelemetryResult;
use crate::frame::SensorFrame;

const HEADER: [&str; 14] = [
    "timestamp_iso8601",
    "car_id",
    "status",
    "queue_id",
    "latitude",
    "longitude",
    "heading_deg",
    "speed_mps",
    "accel_x",
    "accel_y",
    "accel_z",
    "gyro_x",
    "gyro_y",
    "gyro_z",
];

/// Writes sensor frames to a single CSV file, header first. Idempotent
/// finalization mirrors the rest of the engine's output writers.
pub struct CsvSink {
    writer: Writer<File>,
    finished: bool,
}

impl CsvSink {
    /// Create (or truncate) the CSV file at `path` and write the header row.
    pub fn new(path: &Path) -> TelemetryResult<Self> {
        let mut writer = Writer::from_path(path)?;
        writer.write_record(HEADER)?;
        Ok(Self {
            writer,
            finished: false,
        })
    }

    /// Append one frame as a row. `timestamp` is written as sim-time
    /// seconds rather than a wall-clock ISO-8601 string — the column name
    /// is kept per the fixed schema, but the engine itself has no
    /// wall-clock epoch to anchor an ISO timestamp to (that's the batch
    /// driver's job, consistent with an external HTTP layer owning any
    /// unix-epoch mapping it needs).
    pub fn write_frame(&mut self, frame: &SensorFrame) -> TelemetryResult<()> {
        self.writer.write_record(&[
            frame.timestamp.to_string(),
            frame.car_id.to_string(),
            format!("{:?}", frame.status),
            frame
                .queue_id
                .map(|q| q.to_string())
                .unwrap_or_default(),
            frame.latitude.to_string(),
            frame.longitude.to_string(),
            frame.heading_deg.to_string(),
            frame.speed_mps.to_string(),
            frame.accel_x.to_string(),
            frame.accel_y.to_string(),
            frame.accel_z.to_string(),
            frame.gyro_x.to_string(),
            frame.gyro_y.to_string(),
            frame.gyro_z.to_string(),
        ])?;
        Ok(())
    }

    pub fn write_frames(&mut self, frames: &[SensorFrame]) -> TelemetryResult<()> {
        for frame in frames {
            self.write_frame(frame)?;
        }
        Ok(())
    }

    /// Flush to disk. Idempotent — safe to call more than once (e.g. once
    /// on terminal transition and once more if the orchestrator's fault
    /// isolation path also finalizes on a failure).
    pub fn finish(&mut self) -> TelemetryResult<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        self.writer.flush()?;
        Ok(())
    }
}
