//! Errors for `border_path`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum PathError {
    #[error("a waitline needs at least 2 points, got {0}")]
    TooFewPoints(usize),
}

pub type PathResult<T> = Result<T, PathError>;
