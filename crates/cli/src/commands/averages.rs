use std::fs;
use std::path::Path;

use demandlens_core::config::{AppConfig, LoadOptions};
use demandlens_core::{compute_store_averages, parse_prediction_feed, IngestOptions};

use super::CommandResult;

pub fn run(input: &Path, store: &str) -> CommandResult {
    let options = match AppConfig::load(LoadOptions::default()) {
        Ok(config) => IngestOptions { strict_quantile_order: config.ingest.strict_quantile_order },
        Err(error) => {
            return CommandResult::failure("averages", "configuration", error.to_string(), 2)
        }
    };

    let payload = match fs::read_to_string(input) {
        Ok(payload) => payload,
        Err(error) => {
            return CommandResult::failure(
                "averages",
                "io",
                format!("could not read `{}`: {error}", input.display()),
                2,
            )
        }
    };

    let report = match parse_prediction_feed(&payload, options) {
        Ok(report) => report,
        Err(error) => return CommandResult::failure("averages", "ingest", error.to_string(), 1),
    };

    let averages = compute_store_averages(&report.records, store);
    if averages.is_empty() {
        return CommandResult::success(
            "averages",
            format!("no forecast records found for store `{store}`"),
        );
    }

    let mut lines = vec![format!("average daily demand for {store}:")];
    for (item, average) in averages.iter() {
        lines.push(format!("- {item}: {average:.2}"));
    }
    if !report.rejected.is_empty() {
        lines.push(format!("warning: {} malformed feed entries were skipped", report.rejected.len()));
    }

    CommandResult { exit_code: 0, output: lines.join("\n") }
}
