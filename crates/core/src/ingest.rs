//! Validation boundary for the untyped prediction feed.
//!
//! The upstream feed delivers `{"predictions": [...]}` where each entry is
//! arbitrary JSON. Entries are coerced into [`PredictionRecord`] here so the
//! engine can assume well-formed records; anything malformed is rejected
//! per-entry with an indexed reason and never reaches the engine.

use chrono::DateTime;
use serde::Deserialize;

use crate::domain::forecast::PredictionRecord;
use crate::errors::ApplicationError;

/// Boundary validation options.
#[derive(Clone, Copy, Debug, Default)]
pub struct IngestOptions {
    /// Additionally reject entries violating elementwise `p10 <= p50 <= p90`.
    /// The engine rules never assume this invariant, so the check is opt-in.
    pub strict_quantile_order: bool,
}

/// One rejected feed entry with the position it held in the payload.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RejectedRecord {
    pub index: usize,
    pub reason: String,
}

/// Outcome of parsing a feed payload: the accepted records plus per-entry
/// rejections. A rejection is never fatal for the payload as a whole.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct IngestReport {
    pub records: Vec<PredictionRecord>,
    pub rejected: Vec<RejectedRecord>,
}

#[derive(Debug, Deserialize)]
struct RawFeed {
    predictions: Vec<serde_json::Value>,
}

/// Parse and validate a raw feed payload.
///
/// A payload that is not a JSON object with a `predictions` array is an
/// [`ApplicationError::Ingest`]; individual malformed entries are collected
/// in the report instead.
pub fn parse_prediction_feed(
    payload: &str,
    options: IngestOptions,
) -> Result<IngestReport, ApplicationError> {
    let feed: RawFeed = serde_json::from_str(payload)
        .map_err(|error| ApplicationError::Ingest(format!("malformed feed envelope: {error}")))?;

    let mut report = IngestReport::default();
    for (index, entry) in feed.predictions.into_iter().enumerate() {
        match validate_entry(entry, options) {
            Ok(record) => report.records.push(record),
            Err(reason) => report.rejected.push(RejectedRecord { index, reason }),
        }
    }

    Ok(report)
}

/// Validate a single already-parsed feed entry. Shared with the HTTP boundary
/// where entries arrive inside a larger request body.
pub fn validate_entry(
    entry: serde_json::Value,
    options: IngestOptions,
) -> Result<PredictionRecord, String> {
    let record: PredictionRecord = serde_json::from_value(entry)
        .map_err(|error| format!("schema mismatch: {error}"))?;

    record
        .forecast
        .validate_lengths()
        .map_err(|error| error.to_string())?;

    if DateTime::parse_from_rfc3339(&record.timestamp).is_err() {
        return Err(format!("unparsable timestamp `{}`", record.timestamp));
    }

    if options.strict_quantile_order {
        record
            .forecast
            .validate_quantile_order()
            .map_err(|error| error.to_string())?;
    }

    Ok(record)
}
