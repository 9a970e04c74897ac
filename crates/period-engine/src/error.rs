//! Error types for period-engine operations.

use chrono::{DateTime, Utc};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PeriodError {
    /// A period whose start lies after its end.
    #[error("Invalid period: start {start} is after end {end}")]
    InvalidPeriod {
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    },

    /// An insertion index outside `0..=len`.
    #[error("Invalid index {index} for collection of length {len}")]
    InvalidIndex { index: usize, len: usize },

    #[error("Invalid timezone: {0}")]
    InvalidTimezone(String),

    #[error("Invalid date: {0}")]
    InvalidDate(String),

    /// Calendar arithmetic left the representable range.
    #[error("Date out of range: {0}")]
    OutOfRange(String),

    /// The localizer has no string for the requested key.
    #[error("Missing translation for key: {0:?}")]
    MissingTranslation(String),

    #[error("Translation table parse error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, PeriodError>;
