//! Errors for `border_fleet`.

use border_core::{BoothId, CarId, QueueId};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FleetError {
    #[error("booth {0} is already busy")]
    BoothBusy(BoothId),

    #[error("service rate must be > 0, got {0}")]
    InvalidServiceRate(f64),

    #[error("queue {0} is full")]
    QueueFull(QueueId),

    #[error("car {0} not found in queue {1}")]
    CarNotInQueue(CarId, QueueId),

    #[error("invalid status transition for car {0}: {1:?} -> {2:?}")]
    InvalidTransition(CarId, crate::car::CarStatus, crate::car::CarStatus),
}

pub type FleetResult<T> = Result<T, FleetError>;
