//! Planner form state
//!
//! `BedtimeForm` holds the three inputs the planner screen edits. It is a plain
//! value: the UI layer owns it, applies edits through the methods below, and
//! reads the recommended bedtime back after every change. Stepper and picker
//! bounds are enforced here, not in the calculator.

use serde::{Deserialize, Serialize};

use crate::calculator::BedtimeCalculator;
use crate::types::{Bedtime, CoffeeCups, SleepAmount, WakeTime};

/// Screen title
pub const SCREEN_TITLE: &str = "BetterRest";

/// Section headers in display order
pub const WAKE_SECTION: &str = "When do you want to wake up?";
pub const SLEEP_SECTION: &str = "Desired amount of sleep";
pub const COFFEE_SECTION: &str = "Daily coffee intake";
pub const BEDTIME_SECTION: &str = "Recommended Bedtime";

pub const SECTIONS: [&str; 4] = [WAKE_SECTION, SLEEP_SECTION, COFFEE_SECTION, BEDTIME_SECTION];

/// Editable planner state
///
/// Fields are only reachable through the setters, so sleep always sits in
/// 4..=12 hours and coffee in 1..=20 cups. Deserialized forms are clamped the
/// same way.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(from = "FormFields")]
pub struct BedtimeForm {
    wake_time: WakeTime,
    sleep_amount: SleepAmount,
    coffee_cups: CoffeeCups,
}

/// Wire shape of a form before the stepper and picker bounds are applied
#[derive(Deserialize)]
struct FormFields {
    #[serde(default)]
    wake_time: WakeTime,
    #[serde(default = "default_sleep_hours")]
    sleep_amount: f64,
    #[serde(default = "default_coffee_cups")]
    coffee_cups: i64,
}

fn default_sleep_hours() -> f64 {
    SleepAmount::default().hours()
}

fn default_coffee_cups() -> i64 {
    CoffeeCups::default().count() as i64
}

impl From<FormFields> for BedtimeForm {
    fn from(fields: FormFields) -> Self {
        let mut form = BedtimeForm::default();
        form.set_wake_time(fields.wake_time);
        form.set_sleep_amount(fields.sleep_amount);
        let cups = fields
            .coffee_cups
            .clamp(CoffeeCups::MIN as i64, CoffeeCups::MAX as i64);
        form.select_coffee_cups(cups as u32);
        form
    }
}

impl BedtimeForm {
    /// Build a form; sleep and coffee are clamped into the stepper and picker ranges
    pub fn new(wake_time: WakeTime, sleep_amount: SleepAmount, coffee_cups: CoffeeCups) -> Self {
        let mut form = BedtimeForm::default();
        form.set_wake_time(wake_time);
        form.set_sleep_amount(sleep_amount.hours());
        form.select_coffee_cups(coffee_cups.count());
        form
    }

    pub fn wake_time(&self) -> WakeTime {
        self.wake_time
    }

    pub fn sleep_amount(&self) -> SleepAmount {
        self.sleep_amount
    }

    pub fn coffee_cups(&self) -> CoffeeCups {
        self.coffee_cups
    }

    pub fn set_wake_time(&mut self, wake_time: WakeTime) {
        self.wake_time = wake_time;
    }

    /// Step sleep up by a quarter hour; stays put at the maximum
    pub fn increment_sleep(&mut self) {
        self.set_sleep_amount(self.sleep_amount.hours() + SleepAmount::STEP);
    }

    /// Step sleep down by a quarter hour; stays put at the minimum
    pub fn decrement_sleep(&mut self) {
        self.set_sleep_amount(self.sleep_amount.hours() - SleepAmount::STEP);
    }

    /// Set sleep directly, clamped into the stepper range
    pub fn set_sleep_amount(&mut self, hours: f64) {
        let hours = if hours.is_nan() {
            SleepAmount::default().hours()
        } else {
            hours.clamp(SleepAmount::MIN, SleepAmount::MAX)
        };
        self.sleep_amount = SleepAmount(hours);
    }

    /// Pick a cup count, clamped into the picker range
    pub fn select_coffee_cups(&mut self, cups: u32) {
        self.coffee_cups = CoffeeCups(cups.clamp(CoffeeCups::MIN, CoffeeCups::MAX));
    }

    /// Bedtime for the current inputs
    pub fn bedtime(&self) -> Bedtime {
        BedtimeCalculator::calculate(self.wake_time, self.sleep_amount, self.coffee_cups)
    }

    pub fn bedtime_text(&self) -> String {
        self.bedtime().to_string()
    }

    /// Stepper label, e.g. "8 hours" or "8.25 hours"
    pub fn sleep_label(&self) -> String {
        format!("{} hours", self.sleep_amount)
    }

    pub fn coffee_label(&self) -> String {
        self.coffee_cups.label()
    }

    /// Serializable view of everything the planner screen shows
    pub fn snapshot(&self) -> FormSnapshot {
        let bedtime = self.bedtime();
        FormSnapshot {
            title: SCREEN_TITLE.to_string(),
            sections: SECTIONS.iter().map(|s| s.to_string()).collect(),
            wake_time: self.wake_time,
            sleep_hours: self.sleep_amount.hours(),
            sleep_label: self.sleep_label(),
            coffee_cups: self.coffee_cups.count(),
            coffee_label: self.coffee_label(),
            bedtime: bedtime.to_string(),
            bedtime_hour: bedtime.hour(),
        }
    }
}

/// Options offered by the coffee picker
pub fn coffee_options() -> impl Iterator<Item = CoffeeCups> {
    (CoffeeCups::MIN..=CoffeeCups::MAX).map(CoffeeCups)
}

/// Rendered form state
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FormSnapshot {
    pub title: String,
    /// Section headers in display order
    pub sections: Vec<String>,
    pub wake_time: WakeTime,
    pub sleep_hours: f64,
    pub sleep_label: String,
    pub coffee_cups: u32,
    pub coffee_label: String,
    pub bedtime: String,
    pub bedtime_hour: u8,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_defaults() {
        let form = BedtimeForm::default();
        assert_eq!(form.wake_time().to_string(), "07:00");
        assert_eq!(form.sleep_amount(), SleepAmount(8.0));
        assert_eq!(form.coffee_cups(), CoffeeCups(1));
        assert_eq!(form.bedtime_text(), "17:00");
    }

    #[test]
    fn test_stepper_moves_by_quarter_hour() {
        let mut form = BedtimeForm::default();
        form.increment_sleep();
        assert_eq!(form.sleep_amount(), SleepAmount(8.25));
        assert_eq!(form.sleep_label(), "8.25 hours");

        form.decrement_sleep();
        form.decrement_sleep();
        assert_eq!(form.sleep_amount(), SleepAmount(7.75));
    }

    #[test]
    fn test_stepper_clamps_at_bounds() {
        let mut form = BedtimeForm::default();
        form.set_sleep_amount(12.0);
        form.increment_sleep();
        assert_eq!(form.sleep_amount(), SleepAmount(12.0));

        form.set_sleep_amount(4.0);
        form.decrement_sleep();
        assert_eq!(form.sleep_amount(), SleepAmount(4.0));

        form.set_sleep_amount(30.0);
        assert_eq!(form.sleep_amount(), SleepAmount(12.0));

        form.set_sleep_amount(f64::NAN);
        assert_eq!(form.sleep_amount(), SleepAmount(8.0));
    }

    #[test]
    fn test_coffee_picker_clamps() {
        let mut form = BedtimeForm::default();
        form.select_coffee_cups(0);
        assert_eq!(form.coffee_cups(), CoffeeCups(1));
        form.select_coffee_cups(50);
        assert_eq!(form.coffee_cups(), CoffeeCups(20));
        assert_eq!(form.coffee_label(), "20 cups");
    }

    #[test]
    fn test_coffee_options() {
        let options: Vec<u32> = coffee_options().map(|c| c.count()).collect();
        assert_eq!(options.len(), 20);
        assert_eq!(options.first(), Some(&1));
        assert_eq!(options.last(), Some(&20));
    }

    #[test]
    fn test_live_recompute() {
        let mut form = BedtimeForm::default();
        form.set_wake_time(WakeTime::new(20, 0).unwrap());
        form.set_sleep_amount(12.0);
        form.select_coffee_cups(20);
        assert_eq!(form.bedtime_text(), "0:00");

        form.select_coffee_cups(1);
        // 20 + 12 + 2 = 34 -> 10
        assert_eq!(form.bedtime().hour(), 10);
    }

    #[test]
    fn test_snapshot() {
        let snapshot = BedtimeForm::default().snapshot();
        assert_eq!(
            snapshot,
            FormSnapshot {
                title: "BetterRest".to_string(),
                sections: vec![
                    "When do you want to wake up?".to_string(),
                    "Desired amount of sleep".to_string(),
                    "Daily coffee intake".to_string(),
                    "Recommended Bedtime".to_string(),
                ],
                wake_time: WakeTime::default(),
                sleep_hours: 8.0,
                sleep_label: "8 hours".to_string(),
                coffee_cups: 1,
                coffee_label: "1 cup".to_string(),
                bedtime: "17:00".to_string(),
                bedtime_hour: 17,
            }
        );
    }

    #[test]
    fn test_deserialized_form_is_clamped() {
        let form: BedtimeForm = serde_json::from_str(
            r#"{"wake_time": "07:00", "sleep_amount": 30.0, "coffee_cups": 500}"#,
        )
        .unwrap();
        assert_eq!(form.sleep_amount(), SleepAmount(12.0));
        assert_eq!(form.coffee_cups(), CoffeeCups(20));
        assert_eq!(form.coffee_label(), "20 cups");
        // 7 + 12 + 40 = 59 -> 11
        assert_eq!(form.bedtime_text(), "11:00");

        let low: BedtimeForm =
            serde_json::from_str(r#"{"sleep_amount": 1.0, "coffee_cups": -4}"#).unwrap();
        assert_eq!(low.sleep_amount(), SleepAmount(4.0));
        assert_eq!(low.coffee_cups(), CoffeeCups(1));
    }

    #[test]
    fn test_form_serializes_and_reloads() {
        let mut form = BedtimeForm::default();
        form.increment_sleep();
        form.select_coffee_cups(3);

        let json = serde_json::to_string(&form).unwrap();
        let back: BedtimeForm = serde_json::from_str(&json).unwrap();
        assert_eq!(back, form);
    }

    #[test]
    fn test_new_clamps_inputs() {
        let form = BedtimeForm::new(WakeTime::default(), SleepAmount(2.0), CoffeeCups(0));
        assert_eq!(form.sleep_amount(), SleepAmount(4.0));
        assert_eq!(form.coffee_cups(), CoffeeCups(1));
    }
}
