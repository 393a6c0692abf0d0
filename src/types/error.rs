//! Input parsing error types.
//!
//! These errors are raised only at the boundary where user text is turned
//! into typed values. The scheduler itself never fails.

use thiserror::Error;

/// Errors produced while parsing user input into alarm values.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// Time is not a strict 24-hour `HH:MM` value.
    #[error("invalid time '{0}': expected 24-hour HH:MM")]
    InvalidTime(String),

    /// Day is not one of the seven English weekday names.
    #[error("invalid day '{0}': expected a weekday name such as 'monday'")]
    InvalidDay(String),

    /// Alarm specification is not of the form `HH:MM,day`.
    #[error("invalid alarm '{0}': expected HH:MM,day")]
    InvalidAlarmSpec(String),

    /// Alarm index is not a non-negative integer.
    #[error("invalid alarm index '{0}'")]
    InvalidIndex(String),
}
