//! The simulation orchestrator: owns all mutable state and drives the
//! tick loop.

use std::sync::Arc;
use std::time::{Duration, Instant};

use border_core::{BoothId, CarId, QueueId, SimClock, SimRng, SimTime};
use border_fleet::{
    car_following_step, ArrivalSource, Assigner, Booth, Car, CarStatus, Queue, Stats, EPS,
};
use border_path::Waitline;
use border_telemetry::{CsvSink, PhoneConfig, TelemetrySynthesizer};

use crate::config::SimulationParams;
use crate::control::{ControlOp, ControlReceiver};
use crate::error::SimResult;
use crate::observer::{BroadcastHub, Observer};
use crate::snapshot::{BoothSnapshot, CarSnapshot, SimStatus, Snapshot};

/// Default cadence at which snapshots are published to observers, in wall
/// time — matches the grounding design's `publish_period` default.
pub const DEFAULT_PUBLISH_PERIOD: Duration = Duration::from_secs(1);

/// Owns every piece of mutable simulation state. Created via
/// [`crate::handle::SimulationHandle::start`]; never shared — all access is
/// either from the orchestrator's own thread or through published
/// [`Snapshot`]s.
pub struct Simulation {
    params: SimulationParams,
    clock: SimClock,
    rng: SimRng,

    cars: Vec<Car>,
    queues: Vec<Queue>,
    booths: Vec<Booth>,
    waitlines: Vec<Waitline>,

    arrival: ArrivalSource,
    assigner: Assigner,
    stats: Stats,
    telemetry: TelemetrySynthesizer,
    csv_sink: Option<CsvSink>,
    phone_configs: std::collections::HashMap<CarId, PhoneConfig>,

    control: ControlReceiver,
    hub: Arc<BroadcastHub>,

    status: SimStatus,
    failure_message: Option<String>,
    last_publish: Instant,
    publish_period: Duration,
}

impl Simulation {
    /// Construct a simulation ready to run. `waitlines` must have one entry
    /// per queue (`border_core`/`border_path` do not know about each
    /// other's geography, so the caller — typically
    /// `SimulationHandle::start` — supplies them after loading the
    /// geographic path externally).
    pub fn new(
        params: SimulationParams,
        waitlines: Vec<Waitline>,
        control: ControlReceiver,
        hub: Arc<BroadcastHub>,
    ) -> SimResult<Self> {
        params.validate()?;

        let mut rng = SimRng::new(params.simulation.rng_seed);
        let mut booths = Vec::new();
        let mut queues = Vec::new();

        let mut rate_cursor = 0;
        for (queue_idx, &num_booths) in params.border.nodes_per_queue.iter().enumerate() {
            let queue_id = QueueId(queue_idx as u32);
            let mut booth_ids = Vec::with_capacity(num_booths);
            for _ in 0..num_booths {
                let booth_id = BoothId(booths.len() as u32);
                let rate = params.border.service_rates[rate_cursor];
                rate_cursor += 1;
                booths.push(Booth::new(booth_id, queue_id, rate));
                booth_ids.push(booth_id);
            }
            queues.push(Queue::new(queue_id, booth_ids, params.border.max_queue_length));
        }

        let arrival = ArrivalSource::new(params.border.arrival_rate, 0.0, &mut rng);
        let assigner = Assigner::new(params.border.queue_assignment);

        Ok(Self {
            clock: SimClock::new(params.simulation.time_factor),
            rng,
            cars: Vec::new(),
            queues,
            booths,
            waitlines,
            arrival,
            assigner,
            stats: Stats::new(),
            telemetry: TelemetrySynthesizer::new(),
            csv_sink: None,
            phone_configs: std::collections::HashMap::new(),
            params,
            control,
            hub,
            status: SimStatus::Running,
            failure_message: None,
            last_publish: Instant::now(),
            publish_period: DEFAULT_PUBLISH_PERIOD,
        })
    }

    /// Attach a CSV sink for telemetry archiving. No-op if
    /// `params.simulation.enable_telemetry` is false.
    pub fn with_csv_sink(mut self, sink: CsvSink) -> Self {
        if self.params.simulation.enable_telemetry {
            self.csv_sink = Some(sink);
        }
        self
    }

    pub fn status(&self) -> SimStatus {
        self.status
    }

    pub fn sim_time(&self) -> SimTime {
        self.clock.sim_time_s
    }

    pub fn stats(&self) -> &Stats {
        &self.stats
    }

    /// Run until `max_simulation_time` is reached, cancelled, or failed.
    /// Calls `observer` hooks at tick boundaries. Blocking — intended to
    /// run on a dedicated thread (see [`crate::handle::SimulationHandle`]).
    pub fn run<O: Observer>(&mut self, observer: &mut O) -> SimResult<()> {
        while self.status == SimStatus::Running {
            observer.on_tick_start(self.clock.sim_time_s);
            self.process_tick()?;
            observer.on_tick_end(self.clock.sim_time_s);

            if self.last_publish.elapsed() >= self.publish_period {
                let snapshot = self.build_snapshot();
                observer.on_snapshot(&snapshot);
                self.hub.publish(snapshot, self.publish_period);
                self.last_publish = Instant::now();
            }
        }

        let final_snapshot = self.build_snapshot();
        observer.on_snapshot(&final_snapshot);
        self.hub.publish(final_snapshot, self.publish_period);
        self.hub.close_all();
        if let Some(sink) = self.csv_sink.as_mut() {
            sink.finish()?;
        }
        observer.on_sim_end(self.clock.sim_time_s);
        Ok(())
    }

    /// One iteration of the tick loop (spec §4.6, steps 1-8).
    fn process_tick(&mut self) -> SimResult<()> {
        let advanced_via_control = self.apply_control_ops()?;
        if self.status != SimStatus::Running {
            return Ok(());
        }

        // A queued `Advance` op already consumed sim time for this
        // iteration via `advance_by`; running a wall-clock-driven
        // `next_slice` on top of it would advance time beyond what the
        // test hook promised to consume.
        if !advanced_via_control {
            let dt = self.clock.next_slice();

            self.spawn_due_arrivals()?;
            self.step_cars(dt);
            self.process_booth_completions()?;
            self.emit_telemetry()?;
        }

        if self.clock.sim_time_s >= self.params.simulation.max_simulation_time {
            self.status = SimStatus::Completed;
        }

        Ok(())
    }

    /// Applies every queued control op, returning whether an `Advance` op
    /// was among them (and therefore already consumed sim time this tick).
    fn apply_control_ops(&mut self) -> SimResult<bool> {
        let mut advanced = false;
        for op in self.control.drain() {
            match op {
                ControlOp::Cancel => {
                    self.status = SimStatus::Cancelled;
                }
                _ if self.status != SimStatus::Running => {
                    // Terminal simulations reject further mutations
                    // (best-effort: silently drop, per §4.8's idempotency
                    // rule — mutation rejection is reported by the
                    // control surface itself, not by panicking here).
                }
                ControlOp::AddCar {
                    queue_id,
                    phone_config,
                } => {
                    self.add_car(queue_id, phone_config.unwrap_or_default());
                }
                ControlOp::UpdateBoothRate {
                    booth_id,
                    service_rate,
                } => {
                    if let Some(booth) = self.booths.get_mut(booth_id.index()) {
                        let _ = booth.set_rate(service_rate);
                    }
                }
                ControlOp::AddBooth {
                    queue_id,
                    service_rate,
                } => {
                    self.add_booth(queue_id, service_rate);
                }
                ControlOp::SetTimeFactor { time_factor } => {
                    if time_factor > 0.0 {
                        self.clock.time_factor = time_factor;
                    }
                }
                ControlOp::Advance { dt_seconds, done } => {
                    self.advance_by(dt_seconds)?;
                    advanced = true;
                    let _ = done.send(());
                }
            }
        }
        Ok(advanced)
    }

    /// Test-hook advance: consumes exactly `dt_seconds` of sim time in one
    /// or more `MAX_SLICE_SECS`-bounded steps.
    fn advance_by(&mut self, mut dt_seconds: SimTime) -> SimResult<()> {
        while dt_seconds > 0.0 && self.status == SimStatus::Running {
            let slice = dt_seconds.min(border_core::MAX_SLICE_SECS);
            self.clock.force_advance(slice);
            self.spawn_due_arrivals()?;
            self.step_cars(slice);
            self.process_booth_completions()?;
            self.emit_telemetry()?;
            dt_seconds -= slice;

            if self.clock.sim_time_s >= self.params.simulation.max_simulation_time {
                self.status = SimStatus::Completed;
                break;
            }
        }
        Ok(())
    }

    fn add_car(&mut self, queue_id: Option<QueueId>, phone_config: PhoneConfig) -> Option<CarId> {
        let queue_id = queue_id.or_else(|| self.assigner.choose(&self.queues, &mut self.rng))?;
        let queue = self.queues.get_mut(queue_id.index())?;
        if queue.is_full() {
            self.stats.record_drop();
            return None;
        }

        let car_id = CarId(self.cars.len() as u32);
        let tail_position = queue.len() as f64 * self.params.border.safe_distance
            + self.params.border.safe_distance;
        let mut car = Car::new(car_id, queue_id, tail_position, self.clock.sim_time_s);
        // Joining the queue's car list and becoming `queued` happen
        // together: there is no separately-observable "arriving but not
        // yet in a queue" interval in this implementation.
        car.transition_to(CarStatus::Queued).ok()?;

        queue.push_tail(car_id).ok()?;
        self.cars.push(car);
        self.stats.record_arrival();

        if self.params.simulation.enable_telemetry {
            self.telemetry
                .register_car(car_id, phone_config, self.clock.sim_time_s);
        }
        self.phone_configs.insert(car_id, phone_config);

        Some(car_id)
    }

    fn add_booth(&mut self, queue_id: QueueId, service_rate: f64) -> Option<BoothId> {
        let queue = self.queues.get_mut(queue_id.index())?;
        let booth_id = BoothId(self.booths.len() as u32);
        self.booths.push(Booth::new(booth_id, queue_id, service_rate));
        queue.booths.push(booth_id);
        Some(booth_id)
    }

    fn spawn_due_arrivals(&mut self) -> SimResult<()> {
        let horizon = self.clock.sim_time_s;
        let due = self.arrival.due_before(horizon, &mut self.rng);
        for _ in due {
            let queue_id = self.assigner.choose(&self.queues, &mut self.rng);
            match queue_id {
                Some(qid) => {
                    self.add_car(Some(qid), PhoneConfig::default());
                }
                None => self.stats.record_drop(),
            }
        }
        Ok(())
    }

    /// Advance every non-completed car's kinematics by `dt`.
    fn step_cars(&mut self, dt: SimTime) {
        for queue in &self.queues {
            let ids = queue.car_ids.clone();
            for (i, &car_id) in ids.iter().enumerate() {
                // The front car's "predecessor" is the queue's stop line at
                // position_s = 0; every other car follows the car ahead of
                // it in queue order.
                let gap = if i == 0 {
                    Some(self.cars[car_id.index()].position_s)
                } else {
                    let predecessor = self.cars[ids[i - 1].index()].position_s;
                    let this_s = self.cars[car_id.index()].position_s;
                    Some((this_s - predecessor).max(0.0))
                };
                let car = &mut self.cars[car_id.index()];
                if car.status == CarStatus::Completed {
                    continue;
                }
                car_following_step(car, gap, self.params.border.safe_distance, dt);
            }
        }
    }

    /// Process any bookings that have matured, then admit waiting cars into
    /// every idle booth each queue owns (not just the literal front of the
    /// line, since a car already `Serving` stays in `car_ids` until it
    /// completes).
    fn process_booth_completions(&mut self) -> SimResult<()> {
        let now = self.clock.sim_time_s;

        for booth in &mut self.booths {
            if let Some((car_id, elapsed)) = booth.try_complete(now) {
                if let Some(car) = self.cars.get_mut(car_id.index()) {
                    let _ = car.transition_to(CarStatus::Completed);
                    car.complete_time = Some(now);
                    let wait = car.wait_time().unwrap_or(0.0);
                    self.stats.record_completion(wait, elapsed);
                }
                if let Some(queue) = self.queues.get_mut(booth.queue_id.index()) {
                    let _ = queue.remove(car_id);
                }
                self.telemetry.unregister_car(car_id);
            }
        }

        for queue in &self.queues {
            let mut idle_booths: Vec<BoothId> = queue
                .booths
                .iter()
                .copied()
                .filter(|&bid| !self.booths[bid.index()].is_busy)
                .collect();
            if idle_booths.is_empty() {
                continue;
            }

            for &car_id in &queue.car_ids {
                if idle_booths.is_empty() {
                    break;
                }
                let car = &self.cars[car_id.index()];
                if car.status != CarStatus::Queued {
                    continue;
                }
                // Service only starts once the car has physically reached
                // the stop-line; until then it's still driving up.
                if car.position_s > EPS {
                    continue;
                }
                let booth_id = idle_booths.pop().expect("checked non-empty above");
                let car = &mut self.cars[car_id.index()];
                car.transition_to(CarStatus::Serving)?;
                car.service_start = Some(self.clock.sim_time_s);
                car.booth_id = Some(booth_id);
                self.booths[booth_id.index()].accept(car_id, self.clock.sim_time_s, &mut self.rng)?;
            }
        }

        Ok(())
    }

    fn emit_telemetry(&mut self) -> SimResult<()> {
        if !self.params.simulation.enable_telemetry {
            return Ok(());
        }
        let now = self.clock.sim_time_s;

        for queue in &self.queues {
            let waitline = match self.waitlines.get(queue.queue_id.index()) {
                Some(w) => w,
                None => continue,
            };
            for &car_id in &queue.car_ids {
                let car = &self.cars[car_id.index()];
                let frames = self.telemetry.sample_due(
                    car,
                    Some(queue.queue_id),
                    waitline,
                    now,
                    &mut self.rng,
                );
                if let Some(sink) = self.csv_sink.as_mut() {
                    sink.write_frames(&frames)?;
                }
            }
        }
        Ok(())
    }

    fn build_snapshot(&self) -> Snapshot {
        let cars = self
            .cars
            .iter()
            .map(|c| CarSnapshot {
                car_id: c.car_id,
                position_s: c.position_s,
                velocity: c.velocity,
                status: c.status,
                queue_id: c.queue_id,
            })
            .collect();

        let booths = self
            .booths
            .iter()
            .map(|b| BoothSnapshot {
                booth_id: b.booth_id,
                queue_id: b.queue_id,
                is_busy: b.is_busy,
                current_car_id: b.current_car_id,
                service_rate: b.service_rate,
                total_served: b.total_served,
                total_service_time: b.total_service_time,
            })
            .collect();

        Snapshot {
            sim_time: self.clock.sim_time_s,
            status: self.status,
            cars,
            booths,
            stats: self.stats.clone(),
            failure_message: self.failure_message.clone(),
        }
    }
}
