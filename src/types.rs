//! Core types for the BetterRest planner
//!
//! Inputs the planner collects (wake time, sleep amount, coffee intake) and
//! the bedtime it produces. Range constants describe what the planner form
//! offers; the calculator itself accepts any value.

use chrono::{NaiveTime, Timelike};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::InputError;

/// Time of day the user wants to wake up
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct WakeTime {
    hour: u8,
    minute: u8,
}

impl WakeTime {
    /// Build a wake time, rejecting anything that is not a valid time of day
    pub fn new(hour: u32, minute: u32) -> Result<Self, InputError> {
        if hour > 23 || minute > 59 {
            return Err(InputError::InvalidWakeTime(format!("{}:{:02}", hour, minute)));
        }
        Ok(Self {
            hour: hour as u8,
            minute: minute as u8,
        })
    }

    pub fn hour(&self) -> u8 {
        self.hour
    }

    pub fn minute(&self) -> u8 {
        self.minute
    }
}

impl Default for WakeTime {
    /// 07:00
    fn default() -> Self {
        Self { hour: 7, minute: 0 }
    }
}

impl From<NaiveTime> for WakeTime {
    /// Seconds are dropped; the planner works at minute resolution.
    fn from(time: NaiveTime) -> Self {
        Self {
            hour: time.hour() as u8,
            minute: time.minute() as u8,
        }
    }
}

impl FromStr for WakeTime {
    type Err = InputError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        NaiveTime::parse_from_str(s.trim(), "%H:%M")
            .map(WakeTime::from)
            .map_err(|_| InputError::InvalidWakeTime(s.to_string()))
    }
}

impl TryFrom<String> for WakeTime {
    type Error = InputError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<WakeTime> for String {
    fn from(value: WakeTime) -> Self {
        value.to_string()
    }
}

impl fmt::Display for WakeTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour, self.minute)
    }
}

/// Desired amount of sleep in hours
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SleepAmount(pub f64);

impl SleepAmount {
    /// Smallest amount the stepper offers
    pub const MIN: f64 = 4.0;
    /// Largest amount the stepper offers
    pub const MAX: f64 = 12.0;
    /// Stepper granularity (a quarter hour)
    pub const STEP: f64 = 0.25;

    pub fn hours(&self) -> f64 {
        self.0
    }

    /// Whole hours counted by the calculator (truncated toward zero)
    pub fn whole_hours(&self) -> i64 {
        // NaN maps to 0, infinities saturate
        self.0.trunc() as i64
    }

    /// Check the amount against the stepper's range and granularity
    pub fn validate(&self) -> Result<(), InputError> {
        let value = self.0;
        if !value.is_finite() {
            return Err(InputError::NonFiniteSleep(value));
        }
        if !(Self::MIN..=Self::MAX).contains(&value) {
            return Err(InputError::SleepOutOfRange {
                value,
                min: Self::MIN,
                max: Self::MAX,
            });
        }
        if (value / Self::STEP).fract() != 0.0 {
            return Err(InputError::SleepOffStep {
                value,
                step: Self::STEP,
            });
        }
        Ok(())
    }
}

impl Default for SleepAmount {
    fn default() -> Self {
        SleepAmount(8.0)
    }
}

impl fmt::Display for SleepAmount {
    /// Shortest representation, so 8.0 prints as "8" and 8.25 as "8.25"
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Daily coffee intake in cups
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CoffeeCups(pub u32);

impl CoffeeCups {
    pub const MIN: u32 = 1;
    pub const MAX: u32 = 20;

    pub fn count(&self) -> u32 {
        self.0
    }

    pub fn validate(&self) -> Result<(), InputError> {
        if !(Self::MIN..=Self::MAX).contains(&self.0) {
            return Err(InputError::CoffeeOutOfRange {
                value: self.0 as i64,
                min: Self::MIN,
                max: Self::MAX,
            });
        }
        Ok(())
    }

    /// Picker label: "1 cup", "2 cups", ...
    pub fn label(&self) -> String {
        format!("{} cup{}", self.0, if self.0 > 1 { "s" } else { "" })
    }
}

impl Default for CoffeeCups {
    fn default() -> Self {
        CoffeeCups(1)
    }
}

/// Recommended bedtime, always an hour of the day in 0..=23
///
/// Serializes as its display form, e.g. `"17:00"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(into = "String")]
pub struct Bedtime {
    hour: u8,
}

impl Bedtime {
    /// Wrap an hour already reduced into 0..=23
    pub(crate) fn from_normalized_hour(hour: u8) -> Self {
        debug_assert!(hour < 24);
        Self { hour }
    }

    pub fn hour(&self) -> u8 {
        self.hour
    }
}

impl fmt::Display for Bedtime {
    /// "H:00" without zero padding, e.g. "0:00" or "17:00"
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:00", self.hour)
    }
}

impl From<Bedtime> for String {
    fn from(value: Bedtime) -> Self {
        value.to_string()
    }
}

/// Alert-style presentation of a bedtime
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recommendation {
    pub title: String,
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wake_time_parse_and_display() {
        let wake: WakeTime = "07:30".parse().unwrap();
        assert_eq!(wake.hour(), 7);
        assert_eq!(wake.minute(), 30);
        assert_eq!(wake.to_string(), "07:30");

        let short: WakeTime = "6:05".parse().unwrap();
        assert_eq!(short.to_string(), "06:05");
    }

    #[test]
    fn test_wake_time_rejects_garbage() {
        assert!("25:00".parse::<WakeTime>().is_err());
        assert!("seven".parse::<WakeTime>().is_err());
        assert!(WakeTime::new(12, 60).is_err());
        assert!(WakeTime::new(24, 0).is_err());
    }

    #[test]
    fn test_wake_time_serde_as_string() {
        let wake = WakeTime::new(23, 15).unwrap();
        let json = serde_json::to_string(&wake).unwrap();
        assert_eq!(json, "\"23:15\"");

        let back: WakeTime = serde_json::from_str(&json).unwrap();
        assert_eq!(back, wake);

        assert!(serde_json::from_str::<WakeTime>("\"noon\"").is_err());
    }

    #[test]
    fn test_default_wake_time_is_seven() {
        assert_eq!(WakeTime::default().to_string(), "07:00");
    }

    #[test]
    fn test_sleep_whole_hours_truncates() {
        assert_eq!(SleepAmount(8.99).whole_hours(), 8);
        assert_eq!(SleepAmount(4.0).whole_hours(), 4);
        assert_eq!(SleepAmount(-1.5).whole_hours(), -1);
        assert_eq!(SleepAmount(f64::NAN).whole_hours(), 0);
    }

    #[test]
    fn test_sleep_validation() {
        assert!(SleepAmount(8.25).validate().is_ok());
        assert!(SleepAmount(4.0).validate().is_ok());
        assert!(SleepAmount(12.0).validate().is_ok());
        assert!(matches!(
            SleepAmount(3.75).validate(),
            Err(InputError::SleepOutOfRange { .. })
        ));
        assert!(matches!(
            SleepAmount(8.1).validate(),
            Err(InputError::SleepOffStep { .. })
        ));
        assert!(matches!(
            SleepAmount(f64::INFINITY).validate(),
            Err(InputError::NonFiniteSleep(_))
        ));
    }

    #[test]
    fn test_sleep_display_is_shortest() {
        assert_eq!(SleepAmount(8.0).to_string(), "8");
        assert_eq!(SleepAmount(8.25).to_string(), "8.25");
        assert_eq!(SleepAmount(4.5).to_string(), "4.5");
    }

    #[test]
    fn test_coffee_validation_and_label() {
        assert!(CoffeeCups(1).validate().is_ok());
        assert!(CoffeeCups(20).validate().is_ok());
        assert!(CoffeeCups(0).validate().is_err());
        assert!(CoffeeCups(21).validate().is_err());

        assert_eq!(CoffeeCups(1).label(), "1 cup");
        assert_eq!(CoffeeCups(3).label(), "3 cups");
    }

    #[test]
    fn test_bedtime_format() {
        assert_eq!(Bedtime::from_normalized_hour(0).to_string(), "0:00");
        assert_eq!(Bedtime::from_normalized_hour(5).to_string(), "5:00");
        assert_eq!(Bedtime::from_normalized_hour(17).to_string(), "17:00");
    }

    #[test]
    fn test_bedtime_serializes_as_display_string() {
        let json = serde_json::to_string(&Bedtime::from_normalized_hour(5)).unwrap();
        assert_eq!(json, "\"5:00\"");
    }
}
