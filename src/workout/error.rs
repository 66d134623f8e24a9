use thiserror::Error;

use super::DAY_FLAG_COUNT;

#[derive(Error, Debug, PartialEq)]
pub enum ValidationError {
    #[error("Exercise name can't be empty")]
    EmptyName,
    #[error("{field} must be a positive number")]
    NotPositive { field: &'static str },
    #[error("Day index {0} is out of range, expected 0..{max}", max = DAY_FLAG_COUNT)]
    DayIndexOutOfRange(usize),
}

#[derive(Error, Debug)]
pub enum LogError {
    /// Input was rejected before anything was written.
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("Failed to write into the store: {0:#}")]
    Storage(#[from] anyhow::Error),
}

impl From<serde_json::Error> for LogError {
    fn from(value: serde_json::Error) -> Self {
        LogError::Storage(value.into())
    }
}
