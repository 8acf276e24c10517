//! Per-car sensor-frame synthesis from kinematic state.

use std::collections::HashMap;

use border_core::{CarId, QueueId, SimRng, SimTime};
use border_fleet::{Car, CarStatus};
use border_path::Waitline;

use crate::frame::SensorFrame;
use crate::phone::{DeviceOrientation, PhoneConfig};

/// Per-car sampling-cadence bookkeeping. `next_sample_time` carries forward
/// any overshoot past the scheduled sample instead of resetting from the
/// current tick's `sim_time`, so long-run cadence stays locked to the car's
/// spawn phase rather than drifting with tick granularity.
struct CarCadence {
    phone_config: PhoneConfig,
    next_sample_time: SimTime,
}

/// Emits [`SensorFrame`]s for every live car at its own configured cadence.
///
/// One synthesizer instance is owned by the orchestrator; it is not
/// `Send`-shared, matching the single-owner-per-tick-thread rule the rest
/// of the engine follows.
pub struct TelemetrySynthesizer {
    cadences: HashMap<CarId, CarCadence>,
}

const GRAVITY_MPS2: f64 = 9.81;

impl TelemetrySynthesizer {
    pub fn new() -> Self {
        Self {
            cadences: HashMap::new(),
        }
    }

    /// Begin tracking a newly spawned car.
    pub fn register_car(&mut self, car_id: CarId, phone_config: PhoneConfig, spawn_time: SimTime) {
        self.cadences.insert(
            car_id,
            CarCadence {
                phone_config,
                next_sample_time: spawn_time,
            },
        );
    }

    /// Stop tracking a car (it has completed or been cancelled).
    pub fn unregister_car(&mut self, car_id: CarId) {
        self.cadences.remove(&car_id);
    }

    /// Emit every sensor frame due for `car` up to and including `now`,
    /// advancing each car's cadence as frames are emitted.
    pub fn sample_due(
        &mut self,
        car: &Car,
        queue_id: Option<QueueId>,
        waitline: &Waitline,
        now: SimTime,
        rng: &mut SimRng,
    ) -> Vec<SensorFrame> {
        let Some(cadence) = self.cadences.get_mut(&car.car_id) else {
            return Vec::new();
        };

        let period = 1.0 / cadence.phone_config.sampling_rate;
        let mut frames = Vec::new();

        while cadence.next_sample_time <= now {
            let frame = synthesize_frame(
                car,
                queue_id,
                waitline,
                cadence.next_sample_time,
                &cadence.phone_config,
                rng,
            );
            frames.push(frame);
            cadence.next_sample_time += period;
        }

        frames
    }
}

impl Default for TelemetrySynthesizer {
    fn default() -> Self {
        Self::new()
    }
}

/// Build one sensor frame for `car` at `timestamp`, which may differ from
/// `car`'s own current simulation time (we sample at the cadence's
/// schedule, not necessarily at the tick boundary).
///
/// `car.position_s` is used directly as the waitline arc length: both are
/// defined as distance from the queue head, so no conversion is needed —
/// `border_path::Waitline` is the sole authority for turning that arc
/// length into geography (see its module docs).
fn synthesize_frame(
    car: &Car,
    queue_id: Option<QueueId>,
    waitline: &Waitline,
    timestamp: SimTime,
    phone_config: &PhoneConfig,
    rng: &mut SimRng,
) -> SensorFrame {
    let arc_length = car.position_s;
    let point = waitline.point_at(arc_length);
    let heading_deg = waitline.heading_at(arc_length);
    let curvature = waitline.curvature_at(arc_length);

    let lat_noise_deg = meters_to_deg_lat(gaussian_1d(rng, phone_config.gps_noise.horizontal_accuracy / 2.0));
    let lon_noise_deg = meters_to_deg_lon(
        gaussian_1d(rng, phone_config.gps_noise.horizontal_accuracy / 2.0),
        point.lat,
    );

    let longitudinal = car.acceleration;
    let lateral = car.velocity * car.velocity * curvature;
    let vertical = GRAVITY_MPS2 + gaussian_1d(rng, phone_config.accelerometer_noise);

    let (accel_x, accel_y, accel_z) = match phone_config.device_orientation {
        DeviceOrientation::Portrait => (
            lateral + gaussian_1d(rng, phone_config.accelerometer_noise),
            longitudinal + gaussian_1d(rng, phone_config.accelerometer_noise),
            vertical,
        ),
        DeviceOrientation::Landscape => (
            longitudinal + gaussian_1d(rng, phone_config.accelerometer_noise),
            lateral + gaussian_1d(rng, phone_config.accelerometer_noise),
            vertical,
        ),
    };

    let yaw_rate = car.velocity * curvature;
    let gyro_x = gaussian_1d(rng, phone_config.gyro_noise);
    let gyro_y = gaussian_1d(rng, phone_config.gyro_noise);
    let gyro_z = yaw_rate + gaussian_1d(rng, phone_config.gyro_noise);

    SensorFrame {
        timestamp,
        car_id: car.car_id,
        status: car.status,
        queue_id,
        latitude: point.lat + lat_noise_deg,
        longitude: point.lon + lon_noise_deg,
        heading_deg,
        speed_mps: car.velocity,
        accel_x,
        accel_y,
        accel_z,
        gyro_x,
        gyro_y,
        gyro_z,
    }
}

fn gaussian_1d(rng: &mut SimRng, std_dev: f64) -> f64 {
    rng.gaussian(0.0, std_dev)
}

/// Convert a metre offset to degrees of latitude.
fn meters_to_deg_lat(meters: f64) -> f64 {
    meters / 111_320.0
}

/// Convert a metre offset to degrees of longitude at a given latitude.
fn meters_to_deg_lon(meters: f64, lat_deg: f64) -> f64 {
    let cos_lat = lat_deg.to_radians().cos().max(1e-6);
    meters / (111_320.0 * cos_lat)
}
