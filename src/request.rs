//! Bedtime request/response records
//!
//! JSON interface used by the CLI batch mode and the C ABI. A request carries
//! raw planner values; missing fields fall back to the planner defaults.
//!
//! ```json
//! {"id": "r1", "wake_time": "06:30", "sleep_hours": 7.5, "coffee_cups": 2}
//! ```

use serde::{Deserialize, Serialize};

use crate::calculator::{bedtime_for, recommendation_for, BedtimeCalculator};
use crate::error::InputError;
use crate::types::{CoffeeCups, SleepAmount, WakeTime};
use crate::VERSION;

/// Request schema identifier
pub const REQUEST_SCHEMA: &str = "betterrest.bedtime_request.v1";

/// Response schema identifier
pub const RESPONSE_SCHEMA: &str = "betterrest.bedtime_response.v1";

fn default_sleep_hours() -> f64 {
    SleepAmount::default().hours()
}

fn default_coffee_cups() -> i64 {
    CoffeeCups::default().count() as i64
}

/// A single bedtime request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BedtimeRequest {
    /// Caller-supplied identifier, echoed in the response
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default)]
    pub wake_time: WakeTime,
    #[serde(default = "default_sleep_hours")]
    pub sleep_hours: f64,
    #[serde(default = "default_coffee_cups")]
    pub coffee_cups: i64,
}

impl Default for BedtimeRequest {
    fn default() -> Self {
        Self {
            id: None,
            wake_time: WakeTime::default(),
            sleep_hours: default_sleep_hours(),
            coffee_cups: default_coffee_cups(),
        }
    }
}

impl BedtimeRequest {
    /// Check the request against the ranges the planner form offers.
    ///
    /// The calculator accepts anything; this is for callers that want to
    /// reject input a user could not have entered.
    pub fn validate(&self) -> Result<(), InputError> {
        self.check_ranges().map_err(|e| {
            tracing::warn!(request_id = ?self.id, error = %e, "request outside planner ranges");
            e
        })
    }

    fn check_ranges(&self) -> Result<(), InputError> {
        SleepAmount(self.sleep_hours).validate()?;
        if self.coffee_cups < CoffeeCups::MIN as i64 || self.coffee_cups > CoffeeCups::MAX as i64 {
            return Err(InputError::CoffeeOutOfRange {
                value: self.coffee_cups,
                min: CoffeeCups::MIN,
                max: CoffeeCups::MAX,
            });
        }
        Ok(())
    }
}

/// Result for a single request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BedtimeResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub bedtime: String,
    pub bedtime_hour: u8,
    pub title: String,
    pub message: String,
    pub calculator_version: String,
}

impl BedtimeCalculator {
    /// Answer a raw request. Never fails; out-of-range values wrap.
    pub fn calculate_request(request: &BedtimeRequest) -> BedtimeResponse {
        let bedtime = bedtime_for(
            request.wake_time.hour() as i64,
            request.sleep_hours,
            request.coffee_cups,
        );
        let recommendation = recommendation_for(bedtime);

        BedtimeResponse {
            id: request.id.clone(),
            bedtime: bedtime.to_string(),
            bedtime_hour: bedtime.hour(),
            title: recommendation.title,
            message: recommendation.message,
            calculator_version: VERSION.to_string(),
        }
    }
}

/// Parsing and validation helpers for request batches
pub struct RequestAdapter;

impl RequestAdapter {
    /// Parse newline-delimited requests; blank lines are skipped
    pub fn parse_ndjson(ndjson: &str) -> Result<Vec<BedtimeRequest>, InputError> {
        let mut requests = Vec::new();
        for (line_num, line) in ndjson.lines().enumerate() {
            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }
            let request = serde_json::from_str::<BedtimeRequest>(trimmed).map_err(|source| {
                InputError::LineError {
                    line: line_num + 1,
                    source,
                }
            })?;
            requests.push(request);
        }
        Ok(requests)
    }

    /// Parse a JSON array of requests
    pub fn parse_array(json: &str) -> Result<Vec<BedtimeRequest>, InputError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Give every request without an id a fresh one
    pub fn assign_missing_ids(requests: &mut [BedtimeRequest]) {
        for request in requests.iter_mut().filter(|r| r.id.is_none()) {
            request.id = Some(uuid::Uuid::new_v4().to_string());
        }
    }

    /// Collect the requests that fall outside the planner ranges
    pub fn validate_requests(requests: &[BedtimeRequest]) -> Vec<RequestValidationFailure> {
        requests
            .iter()
            .enumerate()
            .filter_map(|(index, request)| {
                request.validate().err().map(|error| RequestValidationFailure {
                    index,
                    request_id: request.id.clone(),
                    error,
                })
            })
            .collect()
    }
}

/// A request that failed validation
#[derive(Debug)]
pub struct RequestValidationFailure {
    pub index: usize,
    pub request_id: Option<String>,
    pub error: InputError,
}

/// Parse one request JSON object and return the response JSON
pub fn calculate_json(request_json: &str) -> Result<String, InputError> {
    let request: BedtimeRequest = serde_json::from_str(request_json)?;
    let response = BedtimeCalculator::calculate_request(&request);
    Ok(serde_json::to_string(&response)?)
}
