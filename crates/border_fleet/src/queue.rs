//! A single waiting lane: an ordered sequence of cars feeding one or more
//! booths.

use border_core::{BoothId, CarId, QueueId};

use crate::error::{FleetError, FleetResult};

/// An ordered line of cars. `car_ids[0]` is the front of the queue
/// (smallest `position_s`, closest to being served); new arrivals are
/// pushed to the tail.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Queue {
    pub queue_id: QueueId,
    pub car_ids: Vec<CarId>,
    pub booths: Vec<BoothId>,
    pub max_length: usize,
}

impl Queue {
    pub fn new(queue_id: QueueId, booths: Vec<BoothId>, max_length: usize) -> Self {
        Self {
            queue_id,
            car_ids: Vec::new(),
            booths,
            max_length,
        }
    }

    pub fn len(&self) -> usize {
        self.car_ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.car_ids.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.car_ids.len() >= self.max_length
    }

    pub fn front(&self) -> Option<CarId> {
        self.car_ids.first().copied()
    }

    /// Append `car_id` to the tail. Errors if the queue is already full.
    pub fn push_tail(&mut self, car_id: CarId) -> FleetResult<()> {
        if self.is_full() {
            return Err(FleetError::QueueFull(self.queue_id));
        }
        self.car_ids.push(car_id);
        Ok(())
    }

    /// Remove and return the front car, if any.
    pub fn pop_front(&mut self) -> Option<CarId> {
        if self.car_ids.is_empty() {
            None
        } else {
            Some(self.car_ids.remove(0))
        }
    }

    /// Remove a specific car from anywhere in the line (e.g. on
    /// cancellation). Errors if it is not present.
    pub fn remove(&mut self, car_id: CarId) -> FleetResult<()> {
        let pos = self
            .car_ids
            .iter()
            .position(|&c| c == car_id)
            .ok_or(FleetError::CarNotInQueue(car_id, self.queue_id))?;
        self.car_ids.remove(pos);
        Ok(())
    }
}
