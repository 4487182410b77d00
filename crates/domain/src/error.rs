//! Unified error types for the clock domain.
//!
//! Every rejected operation reports one of these synchronously; the rejected
//! operation never leaves a partially applied change behind.

use thiserror::Error;

/// Unified error type for clock operations
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ClockError {
    /// Hour, minute or second outside the wall-clock range
    #[error("Invalid time value: {hour:02}:{minute:02}:{second:02}")]
    InvalidTimeValue { hour: u32, minute: u32, second: u32 },

    /// Rate magnitude is zero, non-finite or outside the configured bounds
    #[error("Invalid rate: {0}")]
    InvalidRate(f64),

    /// A manual time set was attempted while the permission flag is off
    #[error("Manual time set is not allowed")]
    ManualSetNotAllowed,
}

impl ClockError {
    /// Create an invalid time value error
    pub fn invalid_time_value(hour: u32, minute: u32, second: u32) -> Self {
        Self::InvalidTimeValue {
            hour,
            minute,
            second,
        }
    }

    /// Create an invalid rate error
    pub fn invalid_rate(rate: f64) -> Self {
        Self::InvalidRate(rate)
    }
}

/// Failure to read a `HH:MM:SS` string.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum TimeParseError {
    #[error("Malformed time '{0}', expected HH:MM:SS")]
    Malformed(String),

    #[error(transparent)]
    OutOfRange(#[from] ClockError),
}
