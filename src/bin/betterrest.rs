//! BetterRest CLI - Command-line interface for the bedtime planner
//!
//! Commands:
//! - calculate: Recommend a bedtime for one set of inputs
//! - batch: Answer a file or stream of JSON requests
//! - validate: Check requests against the planner ranges
//! - schema: Print request/response schema information

use clap::{Parser, Subcommand, ValueEnum};
use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use better_rest::calculator::BedtimeCalculator;
use better_rest::logging::init_cli_logger;
use better_rest::request::{
    BedtimeRequest, BedtimeResponse, RequestAdapter, REQUEST_SCHEMA, RESPONSE_SCHEMA,
};
use better_rest::types::{CoffeeCups, SleepAmount, WakeTime};
use better_rest::{InputError, VERSION};

/// BetterRest - find out when to go to bed
#[derive(Parser)]
#[command(name = "betterrest")]
#[command(version = VERSION)]
#[command(about = "Recommend a bedtime from wake time, sleep amount and coffee intake", long_about = None)]
struct Cli {
    /// Enable debug logging (RUST_LOG overrides)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Recommend a bedtime for one set of inputs
    Calculate {
        /// Wake-up time (HH:MM)
        #[arg(short, long, default_value = "07:00")]
        wake: WakeTime,

        /// Desired hours of sleep
        #[arg(short, long, default_value = "8", allow_negative_numbers = true)]
        sleep: f64,

        /// Cups of coffee per day
        #[arg(short, long, default_value = "1", allow_negative_numbers = true)]
        coffee: i64,

        /// Reject values the planner form would not offer
        #[arg(long)]
        strict: bool,

        /// Output format
        #[arg(long, default_value = "text")]
        format: CalculateFormat,
    },

    /// Answer a file or stream of JSON requests
    Batch {
        /// Input file path (use - for stdin)
        #[arg(short, long)]
        input: PathBuf,

        /// Output file path (use - for stdout)
        #[arg(short, long)]
        output: PathBuf,

        /// Input format
        #[arg(long, default_value = "ndjson")]
        input_format: InputFormat,

        /// Output format
        #[arg(long, default_value = "ndjson")]
        output_format: OutputFormat,

        /// Reject the whole batch if any request is outside the planner ranges
        #[arg(long)]
        strict: bool,
    },

    /// Check requests against the planner ranges
    Validate {
        /// Input file path (use - for stdin)
        #[arg(short, long)]
        input: PathBuf,

        /// Input format
        #[arg(long, default_value = "ndjson")]
        input_format: InputFormat,

        /// Output validation report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print schema information
    Schema {
        /// Schema to print (request or response)
        #[arg(value_enum)]
        schema_type: SchemaType,

        /// Output as JSON schema
        #[arg(long)]
        json_schema: bool,
    },
}

#[derive(Clone, ValueEnum)]
enum CalculateFormat {
    /// Just the bedtime, e.g. "17:00"
    Text,
    /// Title and message, as shown in an alert
    Alert,
    /// Response record as JSON
    Json,
}

#[derive(Clone, ValueEnum)]
enum InputFormat {
    /// Newline-delimited JSON (one request per line)
    Ndjson,
    /// JSON array of requests
    Json,
}

#[derive(Clone, ValueEnum)]
enum OutputFormat {
    /// Newline-delimited JSON (one response per line)
    Ndjson,
    /// JSON array of responses
    Json,
    /// Pretty-printed JSON
    JsonPretty,
}

#[derive(Clone, ValueEnum)]
enum SchemaType {
    /// Request schema (betterrest.bedtime_request.v1)
    Request,
    /// Response schema (betterrest.bedtime_response.v1)
    Response,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_cli_logger(cli.verbose);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::debug!(error = ?e, "command failed");
            eprintln!(
                "{}",
                serde_json::to_string(&CliError::from(e)).unwrap_or_else(|_| "Unknown error".to_string())
            );
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), CliFailure> {
    match cli.command {
        Commands::Calculate {
            wake,
            sleep,
            coffee,
            strict,
            format,
        } => cmd_calculate(wake, sleep, coffee, strict, format),

        Commands::Batch {
            input,
            output,
            input_format,
            output_format,
            strict,
        } => cmd_batch(&input, &output, input_format, output_format, strict),

        Commands::Validate {
            input,
            input_format,
            json,
        } => cmd_validate(&input, input_format, json),

        Commands::Schema { schema_type, json_schema } => cmd_schema(schema_type, json_schema),
    }
}

fn cmd_calculate(
    wake: WakeTime,
    sleep: f64,
    coffee: i64,
    strict: bool,
    format: CalculateFormat,
) -> Result<(), CliFailure> {
    let request = BedtimeRequest {
        id: None,
        wake_time: wake,
        sleep_hours: sleep,
        coffee_cups: coffee,
    };

    if strict {
        request.validate()?;
    }

    let response = BedtimeCalculator::calculate_request(&request);

    match format {
        CalculateFormat::Text => println!("{}", response.bedtime),
        CalculateFormat::Alert => {
            println!("{}", response.title);
            println!("{}", response.message);
        }
        CalculateFormat::Json => println!("{}", serde_json::to_string_pretty(&response)?),
    }

    Ok(())
}

fn cmd_batch(
    input: &Path,
    output: &Path,
    input_format: InputFormat,
    output_format: OutputFormat,
    strict: bool,
) -> Result<(), CliFailure> {
    let input_data = read_input(input)?;

    let mut requests = match input_format {
        InputFormat::Ndjson => RequestAdapter::parse_ndjson(&input_data)?,
        InputFormat::Json => RequestAdapter::parse_array(&input_data)?,
    };

    if requests.is_empty() {
        return Err(CliFailure::NoRequests);
    }

    if strict {
        let failures = RequestAdapter::validate_requests(&requests);
        if !failures.is_empty() {
            return Err(CliFailure::ValidationFailed(failures.len()));
        }
    }

    RequestAdapter::assign_missing_ids(&mut requests);

    let responses: Vec<BedtimeResponse> = requests
        .iter()
        .map(BedtimeCalculator::calculate_request)
        .collect();
    tracing::info!(count = responses.len(), "answered bedtime requests");

    let output_data = format_output(&responses, &output_format)?;

    if output.to_string_lossy() == "-" {
        let stdout = io::stdout();
        let mut handle = stdout.lock();
        handle.write_all(output_data.as_bytes())?;
        handle.flush()?;
    } else {
        fs::write(output, output_data)?;
    }

    Ok(())
}

fn cmd_validate(input: &Path, input_format: InputFormat, json: bool) -> Result<(), CliFailure> {
    let input_data = read_input(input)?;

    let requests = match input_format {
        InputFormat::Ndjson => RequestAdapter::parse_ndjson(&input_data)?,
        InputFormat::Json => RequestAdapter::parse_array(&input_data)?,
    };

    let failures = RequestAdapter::validate_requests(&requests);

    let report = ValidationReport {
        total_requests: requests.len(),
        valid_requests: requests.len() - failures.len(),
        invalid_requests: failures.len(),
        errors: failures
            .iter()
            .map(|f| ValidationErrorDetail {
                index: f.index,
                request_id: f.request_id.clone(),
                error: f.error.to_string(),
            })
            .collect(),
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("Validation Report");
        println!("=================");
        println!("Total requests:   {}", report.total_requests);
        println!("Valid requests:   {}", report.valid_requests);
        println!("Invalid requests: {}", report.invalid_requests);

        if !report.errors.is_empty() {
            println!("\nErrors:");
            for err in &report.errors {
                println!(
                    "  - Request {} (index {}): {}",
                    err.request_id.as_deref().unwrap_or("unknown"),
                    err.index,
                    err.error
                );
            }
        }
    }

    if report.invalid_requests > 0 {
        Err(CliFailure::ValidationFailed(report.invalid_requests))
    } else {
        Ok(())
    }
}

fn cmd_schema(schema_type: SchemaType, json_schema: bool) -> Result<(), CliFailure> {
    match schema_type {
        SchemaType::Request => {
            if json_schema {
                println!("{}", request_json_schema());
            } else {
                println!("Request Schema: {}", REQUEST_SCHEMA);
                println!();
                println!("- id:          optional string, echoed in the response");
                println!("- wake_time:   \"HH:MM\" (default {})", WakeTime::default());
                println!(
                    "- sleep_hours: number, planner range {}..={} in steps of {} (default {})",
                    SleepAmount::MIN,
                    SleepAmount::MAX,
                    SleepAmount::STEP,
                    SleepAmount::default()
                );
                println!(
                    "- coffee_cups: integer, planner range {}..={} (default {})",
                    CoffeeCups::MIN,
                    CoffeeCups::MAX,
                    CoffeeCups::default().count()
                );
                println!();
                println!("Values outside the planner ranges are still answered unless --strict is set.");
            }
        }
        SchemaType::Response => {
            if json_schema {
                println!("{}", response_json_schema());
            } else {
                println!("Response Schema: {}", RESPONSE_SCHEMA);
                println!();
                println!("- id:                 request id (generated in batch mode when missing)");
                println!("- bedtime:            \"H:00\", e.g. \"17:00\" or \"0:00\"");
                println!("- bedtime_hour:       integer 0-23");
                println!("- title, message:     alert presentation of the bedtime");
                println!("- calculator_version: library version");
                println!();
                println!("bedtime_hour = (wake hour + whole sleep hours + 2 * coffee cups) mod 24");
            }
        }
    }

    Ok(())
}

// Helper functions

fn read_input(input: &Path) -> Result<String, CliFailure> {
    if input.to_string_lossy() == "-" {
        if atty::is(atty::Stream::Stdin) {
            tracing::warn!("reading requests from an interactive terminal; end input with Ctrl-D");
        }
        let mut buffer = String::new();
        io::stdin().read_to_string(&mut buffer)?;
        Ok(buffer)
    } else {
        Ok(fs::read_to_string(input)?)
    }
}

fn format_output(responses: &[BedtimeResponse], format: &OutputFormat) -> Result<String, CliFailure> {
    match format {
        OutputFormat::Ndjson => {
            let mut lines: Vec<String> = Vec::new();
            for response in responses {
                lines.push(serde_json::to_string(response)?);
            }
            Ok(lines.join("\n") + "\n")
        }
        OutputFormat::Json => Ok(serde_json::to_string(responses)?),
        OutputFormat::JsonPretty => Ok(serde_json::to_string_pretty(responses)?),
    }
}

fn request_json_schema() -> String {
    serde_json::json!({
        "$schema": "https://json-schema.org/draft/2020-12/schema",
        "title": REQUEST_SCHEMA,
        "description": "BetterRest bedtime request",
        "type": "object",
        "properties": {
            "id": { "type": "string" },
            "wake_time": {
                "type": "string",
                "pattern": "^[0-9]{1,2}:[0-9]{2}$",
                "default": WakeTime::default().to_string()
            },
            "sleep_hours": {
                "type": "number",
                "minimum": SleepAmount::MIN,
                "maximum": SleepAmount::MAX,
                "multipleOf": SleepAmount::STEP,
                "default": SleepAmount::default().hours()
            },
            "coffee_cups": {
                "type": "integer",
                "minimum": CoffeeCups::MIN,
                "maximum": CoffeeCups::MAX,
                "default": CoffeeCups::default().count()
            }
        }
    })
    .to_string()
}

fn response_json_schema() -> String {
    serde_json::json!({
        "$schema": "https://json-schema.org/draft/2020-12/schema",
        "title": RESPONSE_SCHEMA,
        "description": "BetterRest bedtime recommendation",
        "type": "object",
        "required": ["bedtime", "bedtime_hour", "title", "message", "calculator_version"],
        "properties": {
            "id": { "type": "string" },
            "bedtime": { "type": "string", "pattern": "^[0-9]{1,2}:00$" },
            "bedtime_hour": { "type": "integer", "minimum": 0, "maximum": 23 },
            "title": { "type": "string" },
            "message": { "type": "string" },
            "calculator_version": { "type": "string" }
        }
    })
    .to_string()
}

// Error types

#[derive(Debug)]
enum CliFailure {
    Io(io::Error),
    Input(InputError),
    Json(serde_json::Error),
    NoRequests,
    ValidationFailed(usize),
}

impl From<io::Error> for CliFailure {
    fn from(e: io::Error) -> Self {
        CliFailure::Io(e)
    }
}

impl From<InputError> for CliFailure {
    fn from(e: InputError) -> Self {
        CliFailure::Input(e)
    }
}

impl From<serde_json::Error> for CliFailure {
    fn from(e: serde_json::Error) -> Self {
        CliFailure::Json(e)
    }
}

#[derive(serde::Serialize)]
struct CliError {
    code: String,
    message: String,
    hint: Option<String>,
}

impl From<CliFailure> for CliError {
    fn from(e: CliFailure) -> Self {
        match e {
            CliFailure::Io(e) => CliError {
                code: "IO_ERROR".to_string(),
                message: e.to_string(),
                hint: Some("Check file paths and permissions".to_string()),
            },
            CliFailure::Input(e) => CliError {
                code: "INPUT_ERROR".to_string(),
                message: e.to_string(),
                hint: Some(format!("Ensure input matches {}", REQUEST_SCHEMA)),
            },
            CliFailure::Json(e) => CliError {
                code: "JSON_ERROR".to_string(),
                message: e.to_string(),
                hint: Some("Check JSON syntax".to_string()),
            },
            CliFailure::NoRequests => CliError {
                code: "NO_REQUESTS".to_string(),
                message: "No requests found in input".to_string(),
                hint: Some("Ensure input file is not empty".to_string()),
            },
            CliFailure::ValidationFailed(count) => CliError {
                code: "VALIDATION_FAILED".to_string(),
                message: format!("{} requests failed validation", count),
                hint: Some("Run 'betterrest validate' for details".to_string()),
            },
        }
    }
}

// Report types

#[derive(serde::Serialize)]
struct ValidationReport {
    total_requests: usize,
    valid_requests: usize,
    invalid_requests: usize,
    errors: Vec<ValidationErrorDetail>,
}

#[derive(serde::Serialize)]
struct ValidationErrorDetail {
    index: usize,
    request_id: Option<String>,
    error: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn sample_responses() -> Vec<BedtimeResponse> {
        let requests = RequestAdapter::parse_ndjson(
            "{\"id\": \"a\"}\n{\"id\": \"b\", \"wake_time\": \"20:00\", \"sleep_hours\": 12, \"coffee_cups\": 20}\n",
        )
        .unwrap();
        requests.iter().map(BedtimeCalculator::calculate_request).collect()
    }

    #[test]
    fn test_format_output_ndjson() {
        let output = format_output(&sample_responses(), &OutputFormat::Ndjson).unwrap();
        let lines: Vec<&str> = output.lines().collect();

        assert_eq!(lines.len(), 2);
        assert!(output.ends_with('\n'));
        let second: BedtimeResponse = serde_json::from_str(lines[1]).unwrap();
        assert_eq!(second.id.as_deref(), Some("b"));
        assert_eq!(second.bedtime, "0:00");
    }

    #[test]
    fn test_format_output_json_array() {
        let responses = sample_responses();
        let compact = format_output(&responses, &OutputFormat::Json).unwrap();
        let pretty = format_output(&responses, &OutputFormat::JsonPretty).unwrap();

        assert!(!compact.contains('\n'));
        assert!(pretty.contains('\n'));
        let from_compact: Vec<BedtimeResponse> = serde_json::from_str(&compact).unwrap();
        let from_pretty: Vec<BedtimeResponse> = serde_json::from_str(&pretty).unwrap();
        assert_eq!(from_compact, responses);
        assert_eq!(from_pretty, responses);
    }

    #[test]
    fn test_strict_calculate_rejects_out_of_range() {
        let result = cmd_calculate(WakeTime::default(), 13.0, 1, true, CalculateFormat::Text);
        assert!(matches!(
            result,
            Err(CliFailure::Input(InputError::SleepOutOfRange { .. }))
        ));

        let result = cmd_calculate(WakeTime::default(), 8.0, 0, true, CalculateFormat::Text);
        assert!(matches!(
            result,
            Err(CliFailure::Input(InputError::CoffeeOutOfRange { .. }))
        ));

        assert!(cmd_calculate(WakeTime::default(), 13.0, 1, false, CalculateFormat::Text).is_ok());
    }

    #[test]
    fn test_error_report_shape() {
        let report = CliError::from(CliFailure::ValidationFailed(3));
        let value = serde_json::to_value(&report).unwrap();

        assert_eq!(value["code"], "VALIDATION_FAILED");
        assert_eq!(value["message"], "3 requests failed validation");
        assert_eq!(value["hint"], "Run 'betterrest validate' for details");

        let report = CliError::from(CliFailure::Input(InputError::InvalidWakeTime(
            "noon".to_string(),
        )));
        assert_eq!(report.code, "INPUT_ERROR");
        assert!(report.message.contains("noon"));

        assert_eq!(CliError::from(CliFailure::NoRequests).code, "NO_REQUESTS");
    }
}
