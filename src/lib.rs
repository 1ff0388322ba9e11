//! BetterRest - Bedtime recommendation engine
//!
//! Given the time a user wants to wake up, how long they want to sleep, and how
//! much coffee they drink, BetterRest suggests an hour to go to bed:
//!
//! ```text
//! bedtime = (wake_hour + whole_sleep_hours + 2 * coffee_cups) mod 24
//! ```
//!
//! ## Modules
//!
//! - **Calculator**: the pure bedtime computation and its alert presentation
//! - **Form**: planner state (defaults, stepper and picker bounds, labels)
//! - **Request**: JSON request/response records for batch and embedded use

pub mod calculator;
pub mod error;
pub mod form;
pub mod request;
pub mod types;

#[cfg(feature = "cli")]
pub mod logging;

#[cfg(test)]
mod test_logs;

// FFI bindings for C interop (always available for cdylib/staticlib builds)
pub mod ffi;

pub use calculator::{compute, BedtimeCalculator};
pub use error::InputError;
pub use form::BedtimeForm;
pub use request::{calculate_json, BedtimeRequest, BedtimeResponse, RequestAdapter};
pub use types::{Bedtime, CoffeeCups, Recommendation, SleepAmount, WakeTime};

/// Library version embedded in every response
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
