//! Per-car phone configuration driving telemetry synthesis.

use crate::error::{TelemetryError, TelemetryResult};

/// GPS fix noise, expressed as 1-sigma accuracy in metres.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GpsNoise {
    pub horizontal_accuracy: f64,
    pub vertical_accuracy: f64,
}

impl Default for GpsNoise {
    fn default() -> Self {
        Self {
            horizontal_accuracy: 5.0,
            vertical_accuracy: 8.0,
        }
    }
}

/// Physical orientation of the phone in the cabin, which determines which
/// accelerometer axis carries the car's longitudinal motion.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum DeviceOrientation {
    Portrait,
    Landscape,
}

/// Per-car telemetry configuration: sample rate and sensor noise profile.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PhoneConfig {
    /// Sensor frames emitted per sim-time second.
    pub sampling_rate: f64,
    pub gps_noise: GpsNoise,
    pub accelerometer_noise: f64,
    pub gyro_noise: f64,
    pub device_orientation: DeviceOrientation,
}

impl PhoneConfig {
    pub fn validate(&self) -> TelemetryResult<()> {
        if self.sampling_rate <= 0.0 {
            return Err(TelemetryError::InvalidSamplingRate(self.sampling_rate));
        }
        Ok(())
    }
}

impl Default for PhoneConfig {
    fn default() -> Self {
        Self {
            sampling_rate: 1.0,
            gps_noise: GpsNoise::default(),
            accelerometer_noise: 0.05,
            gyro_noise: 0.01,
            device_orientation: DeviceOrientation::Portrait,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_nonpositive_sampling_rate() {
        let mut cfg = PhoneConfig::default();
        cfg.sampling_rate = 0.0;
        assert!(cfg.validate().is_err());
        cfg.sampling_rate = -1.0;
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn default_is_valid() {
        assert!(PhoneConfig::default().validate().is_ok());
    }
}
