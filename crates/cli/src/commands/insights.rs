use std::fs;
use std::path::Path;

use demandlens_core::config::{AppConfig, LoadOptions};
use demandlens_core::{
    compute_store_averages, parse_prediction_feed, CallerInput, EffectiveContext, IngestOptions,
    InsightEngine, InsightEntry,
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde_json::json;

use super::CommandResult;

pub fn run(
    input: &Path,
    store: Option<String>,
    item: Option<String>,
    seed: Option<u64>,
    json: bool,
) -> CommandResult {
    let options = match load_ingest_options() {
        Ok(options) => options,
        Err(message) => return CommandResult::failure("insights", "configuration", message, 2),
    };

    let payload = match fs::read_to_string(input) {
        Ok(payload) => payload,
        Err(error) => {
            return CommandResult::failure(
                "insights",
                "io",
                format!("could not read `{}`: {error}", input.display()),
                2,
            )
        }
    };

    let report = match parse_prediction_feed(&payload, options) {
        Ok(report) => report,
        Err(error) => return CommandResult::failure("insights", "ingest", error.to_string(), 1),
    };

    let caller = CallerInput { store_name: store, item_name: item, ..CallerInput::default() };
    let context = match seed {
        Some(seed) => EffectiveContext::resolve_with_rng(
            &report.records,
            caller,
            &mut StdRng::seed_from_u64(seed),
        ),
        None => EffectiveContext::resolve(&report.records, caller),
    };

    let averages = compute_store_averages(&report.records, &context.store_name);
    let insights = InsightEngine::new().generate(
        &context.forecast,
        &context.history,
        &context.item_name,
        &context.store_name,
        &averages,
    );

    if json {
        let rejected: Vec<_> = report
            .rejected
            .iter()
            .map(|entry| json!({"index": entry.index, "reason": entry.reason}))
            .collect();
        return CommandResult::success_with_data(
            "insights",
            format!("{} insights generated", insights.len()),
            json!({
                "context": context,
                "averages": averages,
                "insights": insights,
                "rejected": rejected,
            }),
        );
    }

    CommandResult {
        exit_code: 0,
        output: render_text(&context, &averages, &insights, report.rejected.len()),
    }
}

fn load_ingest_options() -> Result<IngestOptions, String> {
    let config = AppConfig::load(LoadOptions::default()).map_err(|error| error.to_string())?;
    Ok(IngestOptions { strict_quantile_order: config.ingest.strict_quantile_order })
}

fn render_text(
    context: &EffectiveContext,
    averages: &demandlens_core::StoreAverages,
    insights: &[InsightEntry],
    rejected: usize,
) -> String {
    let mut lines = vec![format!(
        "store: {} | item: {}{}",
        context.store_name,
        context.item_name,
        if context.synthetic_history { " | history: synthetic" } else { "" }
    )];

    if rejected > 0 {
        lines.push(format!("warning: {rejected} malformed feed entries were skipped"));
    }

    if !averages.is_empty() {
        lines.push("average daily demand:".to_string());
        for (item, average) in averages.iter() {
            lines.push(format!("- {item}: {average:.2}"));
        }
    }

    lines.push("insights:".to_string());
    for (position, entry) in insights.iter().enumerate() {
        lines.push(format!(
            "{}. [{}] {} (confidence {:.2})",
            position + 1,
            entry.kind.label(),
            entry.message,
            entry.confidence
        ));
    }

    lines.join("\n")
}
