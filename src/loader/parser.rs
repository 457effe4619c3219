use csv::{ReaderBuilder, StringRecord, Trim};
use serde::de::DeserializeOwned;
use std::fs;
use std::path::Path;

use crate::domain::request::Request;
use crate::error::{Error, Result};

const TIMESTAMP_FIELD: usize = 0;
const PROCESSING_TIME_FIELD: usize = 2;

/// Parses a JSON file into a given type `T`.
///
/// This function reads a file from `file_path`, attempts to parse it
/// as JSON, and returns an instance of `T`.
///
/// Errors are automatically converted into `crate::error::Error` variants:
/// - `Error::IoError` if the file cannot be read.
/// - `Error::DeserializationError` if the JSON is malformed.
pub fn parse_json_file<T: DeserializeOwned>(file_path: impl AsRef<Path>) -> Result<T> {
    let data = fs::read_to_string(file_path)?;

    let parsed_data: T = serde_json::from_str(&data)?;

    Ok(parsed_data)
}

/// Reads the request table at `file_path`, see [`parse_requests`].
pub fn load_requests(file_path: impl AsRef<Path>) -> Result<Vec<Request>> {
    let file_path = file_path.as_ref();
    let data = fs::read_to_string(file_path)?;

    let requests = parse_requests(&data)?;
    log::info!("Loaded {} request(s) from '{}'.", requests.len(), file_path.display());

    Ok(requests)
}

/// Parses comma separated request rows in input order.
///
/// Field 0 is the arrival timestamp and field 2 the processing time. Field 1 and
/// any trailing fields are ignored. Rows are neither validated for order nor
/// re-sorted. The first malformed row aborts parsing with [`Error::InputFormat`].
pub fn parse_requests(raw_text: &str) -> Result<Vec<Request>> {
    let mut reader = ReaderBuilder::new().has_headers(false).flexible(true).trim(Trim::All).from_reader(raw_text.as_bytes());

    let mut requests = Vec::new();
    for (index, record) in reader.records().enumerate() {
        let record = record?;
        let line = record.position().map(|p| p.line()).unwrap_or(index as u64 + 1);
        requests.push(parse_record(&record, line)?);
    }

    Ok(requests)
}

fn parse_record(record: &StringRecord, line: u64) -> Result<Request> {
    if record.len() <= PROCESSING_TIME_FIELD {
        return Err(Error::InputFormat { line, reason: format!("expected at least {} fields, found {}", PROCESSING_TIME_FIELD + 1, record.len()) });
    }

    let timestamp = parse_integer_field(record, TIMESTAMP_FIELD, "timestamp", line)?;
    let processing_time = parse_integer_field(record, PROCESSING_TIME_FIELD, "processing time", line)?;

    if timestamp < 0 {
        return Err(Error::InputFormat { line, reason: format!("timestamp must not be negative, got {}", timestamp) });
    }
    if processing_time < 1 {
        return Err(Error::InputFormat { line, reason: format!("processing time must be at least 1, got {}", processing_time) });
    }

    Ok(Request::new(timestamp, processing_time))
}

fn parse_integer_field(record: &StringRecord, field: usize, name: &str, line: u64) -> Result<i64> {
    let raw = record.get(field).unwrap_or_default();

    raw.parse::<i64>().map_err(|e| Error::InputFormat { line, reason: format!("{} '{}' is not an integer: {}", name, raw, e) })
}
