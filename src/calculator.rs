//! Bedtime calculation
//!
//! The recommendation is fixed arithmetic over the hour of the wake time:
//!
//! ```text
//! bedtime = (wake_hour + whole_sleep_hours + 2 * coffee_cups) mod 24
//! ```
//!
//! The modulo is Euclidean, so negative inputs still land in 0..=23.

use crate::types::{Bedtime, CoffeeCups, Recommendation, SleepAmount, WakeTime};

/// Hours pushed onto the bedtime for every cup of coffee
pub const HOURS_PER_CUP: i64 = 2;

/// Title shown above the recommended bedtime in alert presentation
pub const RECOMMENDATION_TITLE: &str = "Your ideal bedtime is…";

const HOURS_PER_DAY: i128 = 24;

/// Compute the bedtime hour for raw inputs.
///
/// Total over every input: `sleep_hours` is truncated toward zero (NaN counts
/// as zero, infinities saturate) and the sum is carried in `i128` so it
/// cannot overflow. Always returns a value in `0..=23`.
pub fn compute(wake_hour: i64, sleep_hours: f64, coffee_cups: i64) -> u8 {
    let whole_sleep = SleepAmount(sleep_hours).whole_hours();
    let total = wake_hour as i128
        + whole_sleep as i128
        + (coffee_cups as i128) * (HOURS_PER_CUP as i128);
    total.rem_euclid(HOURS_PER_DAY) as u8
}

/// Calculator for turning planner input into a bedtime
pub struct BedtimeCalculator;

impl BedtimeCalculator {
    /// Calculate the bedtime for typed planner input
    pub fn calculate(wake: WakeTime, sleep: SleepAmount, coffee: CoffeeCups) -> Bedtime {
        bedtime_for(wake.hour() as i64, sleep.hours(), coffee.count() as i64)
    }

    /// Calculate the bedtime and wrap it for alert presentation
    pub fn recommend(wake: WakeTime, sleep: SleepAmount, coffee: CoffeeCups) -> Recommendation {
        let bedtime = Self::calculate(wake, sleep, coffee);
        recommendation_for(bedtime)
    }
}

/// Every bedtime the library hands out goes through here
pub(crate) fn bedtime_for(wake_hour: i64, sleep_hours: f64, coffee_cups: i64) -> Bedtime {
    let hour = compute(wake_hour, sleep_hours, coffee_cups);
    tracing::debug!(
        wake_hour,
        sleep_hours,
        coffee_cups,
        bedtime_hour = hour,
        "calculated bedtime"
    );
    Bedtime::from_normalized_hour(hour)
}

/// Alert presentation of an already computed bedtime
pub fn recommendation_for(bedtime: Bedtime) -> Recommendation {
    Recommendation {
        title: RECOMMENDATION_TITLE.to_string(),
        message: bedtime.to_string(),
    }
}
