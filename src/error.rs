//! Error types for BetterRest
//!
//! The bedtime computation itself is total and never fails. These errors only
//! arise at the edges: parsing caller input and checking it against the
//! ranges the planner form offers.

use thiserror::Error;

/// Errors produced while reading or checking planner input
#[derive(Debug, Error)]
pub enum InputError {
    #[error("Invalid wake time '{0}': expected HH:MM")]
    InvalidWakeTime(String),

    #[error("Sleep amount must be a finite number of hours, got {0}")]
    NonFiniteSleep(f64),

    #[error("Sleep amount {value} is outside {min}..={max} hours")]
    SleepOutOfRange { value: f64, min: f64, max: f64 },

    #[error("Sleep amount {value} is not a multiple of {step} hours")]
    SleepOffStep { value: f64, step: f64 },

    #[error("Coffee cups {value} is outside {min}..={max}")]
    CoffeeOutOfRange { value: i64, min: u32, max: u32 },

    #[error("Invalid JSON: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Invalid request on line {line}: {source}")]
    LineError {
        line: usize,
        #[source]
        source: serde_json::Error,
    },
}
