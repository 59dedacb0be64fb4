//! Fallback selection for dashboard views.
//!
//! When the caller has not just run a forecast there is nothing to display,
//! so the most recent stored record drives the view instead. With no records
//! at all a neutral placeholder forecast is synthesized so the rendering path
//! always has something well-formed to work with.

use rand::Rng;
use serde::Serialize;

use crate::domain::forecast::{ForecastSeries, PredictionRecord};

/// Horizon of the neutral placeholder forecast.
pub const NEUTRAL_HORIZON: usize = 7;
/// Median level of the neutral placeholder forecast.
pub const NEUTRAL_P50: f64 = 50.0;
/// Upper-quantile level of the neutral placeholder forecast.
pub const NEUTRAL_P90: f64 = 100.0;
/// Length of the synthesized history series.
pub const SYNTHETIC_HISTORY_LEN: usize = 30;
/// History level used when no record (or no median value) is available.
pub const NEUTRAL_HISTORY_LEVEL: f64 = 20.0;
/// Uniform perturbation range applied to `p50[0]` when synthesizing history.
pub const PERTURBATION_RANGE: (f64, f64) = (0.9, 1.1);

/// Placeholder labels used when fallback cannot resolve a name.
const DEFAULT_ITEM_NAME: &str = "Default Item";
const DEFAULT_STORE_NAME: &str = "Default Store";

/// Outcome of fallback selection: a forecast to display plus a synthesized
/// history series. `item_name`/`store_name` are unset when no record existed,
/// which is the caller's cue to prompt the user to generate a forecast.
#[derive(Clone, Debug, PartialEq)]
pub struct FallbackForecast {
    pub item_name: Option<String>,
    pub store_name: Option<String>,
    pub forecast: ForecastSeries,
    pub history: Vec<f64>,
}

/// Select a representative record to drive a view, or synthesize a neutral
/// default when there are no records. Uses the thread RNG for the history
/// perturbation; tests use [`select_fallback_with_rng`].
pub fn select_fallback(records: &[PredictionRecord]) -> FallbackForecast {
    select_fallback_with_rng(records, &mut rand::thread_rng())
}

/// Deterministic-RNG variant of [`select_fallback`].
pub fn select_fallback_with_rng<R: Rng>(
    records: &[PredictionRecord],
    rng: &mut R,
) -> FallbackForecast {
    let Some(latest) = latest_record(records) else {
        return FallbackForecast {
            item_name: None,
            store_name: None,
            forecast: neutral_forecast(),
            history: vec![NEUTRAL_HISTORY_LEVEL; SYNTHETIC_HISTORY_LEN],
        };
    };

    FallbackForecast {
        item_name: Some(latest.item_name.clone()),
        store_name: Some(latest.store_name.clone()),
        forecast: latest.forecast.clone(),
        history: synthesize_history(&latest.forecast, rng),
    }
}

/// Record with the maximum timestamp. Lexicographic comparison is sufficient
/// because ingestion guarantees well-formed ISO-8601 strings; strictly-greater
/// comparison makes the first-encountered record win ties.
fn latest_record(records: &[PredictionRecord]) -> Option<&PredictionRecord> {
    let mut latest: Option<&PredictionRecord> = None;
    for record in records {
        match latest {
            Some(current) if record.timestamp.as_str() <= current.timestamp.as_str() => {}
            _ => latest = Some(record),
        }
    }
    latest
}

fn neutral_forecast() -> ForecastSeries {
    ForecastSeries::new(
        vec![0.0; NEUTRAL_HORIZON],
        vec![NEUTRAL_P50; NEUTRAL_HORIZON],
        vec![NEUTRAL_P90; NEUTRAL_HORIZON],
    )
}

/// Build a 30-point placeholder history by perturbing the first median value.
/// This is explicitly synthetic data, not real sales history; any UI that
/// consumes it must label it as such.
fn synthesize_history<R: Rng>(forecast: &ForecastSeries, rng: &mut R) -> Vec<f64> {
    let Some(base) = forecast.p50.first().copied() else {
        return vec![NEUTRAL_HISTORY_LEVEL; SYNTHETIC_HISTORY_LEN];
    };

    let (low, high) = PERTURBATION_RANGE;
    (0..SYNTHETIC_HISTORY_LEN).map(|_| base * rng.gen_range(low..=high)).collect()
}

/// The resolved input to insight generation: caller-supplied fields merged
/// field-by-field over fallback output, caller always winning.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct EffectiveContext {
    pub store_name: String,
    pub item_name: String,
    pub forecast: ForecastSeries,
    pub history: Vec<f64>,
    /// True when `history` came from perturbation rather than real sales.
    pub synthetic_history: bool,
}

/// Caller-supplied view parameters; any subset may be present.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CallerInput {
    pub store_name: Option<String>,
    pub item_name: Option<String>,
    pub forecast: Option<ForecastSeries>,
    pub history: Option<Vec<f64>>,
}

impl EffectiveContext {
    /// Merge caller input with fallback selection over the record set.
    pub fn resolve(records: &[PredictionRecord], input: CallerInput) -> Self {
        Self::resolve_with_rng(records, input, &mut rand::thread_rng())
    }

    pub fn resolve_with_rng<R: Rng>(
        records: &[PredictionRecord],
        input: CallerInput,
        rng: &mut R,
    ) -> Self {
        // Fallback runs only when the caller left a gap to fill.
        let needs_fallback = input.forecast.is_none()
            || input.history.is_none()
            || input.item_name.is_none()
            || input.store_name.is_none();

        let fallback = if needs_fallback {
            select_fallback_with_rng(records, rng)
        } else {
            FallbackForecast {
                item_name: None,
                store_name: None,
                forecast: neutral_forecast(),
                history: Vec::new(),
            }
        };

        let synthetic_history = input.history.is_none();

        Self {
            store_name: input
                .store_name
                .or(fallback.store_name)
                .unwrap_or_else(|| DEFAULT_STORE_NAME.to_string()),
            item_name: input
                .item_name
                .or(fallback.item_name)
                .unwrap_or_else(|| DEFAULT_ITEM_NAME.to_string()),
            forecast: input.forecast.unwrap_or(fallback.forecast),
            history: input.history.unwrap_or(fallback.history),
            synthetic_history,
        }
    }
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::{
        select_fallback, select_fallback_with_rng, CallerInput, EffectiveContext,
        NEUTRAL_HISTORY_LEVEL, NEUTRAL_P50, NEUTRAL_P90, SYNTHETIC_HISTORY_LEN,
    };
    use crate::domain::forecast::{ForecastSeries, PredictionRecord};

    fn record(item: &str, timestamp: &str, p50_head: f64) -> PredictionRecord {
        PredictionRecord {
            item_name: item.to_string(),
            store_name: "Store 1".to_string(),
            forecast: ForecastSeries::new(
                vec![p50_head * 0.5; 7],
                vec![p50_head; 7],
                vec![p50_head * 2.0; 7],
            ),
            suggestions: Vec::new(),
            timestamp: timestamp.to_string(),
            filename: String::new(),
        }
    }

    #[test]
    fn empty_records_produce_neutral_default() {
        let fallback = select_fallback(&[]);

        assert!(fallback.item_name.is_none());
        assert_eq!(fallback.forecast.p50, vec![NEUTRAL_P50; 7]);
        assert_eq!(fallback.forecast.p10, vec![0.0; 7]);
        assert_eq!(fallback.forecast.p90, vec![NEUTRAL_P90; 7]);
        assert_eq!(fallback.history, vec![NEUTRAL_HISTORY_LEVEL; SYNTHETIC_HISTORY_LEN]);
    }

    #[test]
    fn latest_timestamp_wins() {
        let records = vec![
            record("first", "2024-01-01T00:00:00Z", 10.0),
            record("second", "2024-03-01T00:00:00Z", 20.0),
            record("third", "2024-02-01T00:00:00Z", 30.0),
        ];

        let fallback = select_fallback(&records);
        assert_eq!(fallback.item_name.as_deref(), Some("second"));
    }

    #[test]
    fn timestamp_ties_resolve_to_first_encountered() {
        let records = vec![
            record("first", "2024-02-01T00:00:00Z", 10.0),
            record("second", "2024-02-01T00:00:00Z", 20.0),
        ];

        let fallback = select_fallback(&records);
        assert_eq!(fallback.item_name.as_deref(), Some("first"));
    }

    #[test]
    fn synthetic_history_stays_within_perturbation_band() {
        let records = vec![record("item", "2024-01-01T00:00:00Z", 40.0)];
        let mut rng = StdRng::seed_from_u64(7);

        let fallback = select_fallback_with_rng(&records, &mut rng);

        assert_eq!(fallback.history.len(), SYNTHETIC_HISTORY_LEN);
        for point in &fallback.history {
            assert!(*point >= 40.0 * 0.9 && *point <= 40.0 * 1.1, "point {point} out of band");
        }
    }

    #[test]
    fn caller_fields_take_precedence_field_by_field() {
        let records = vec![record("stored item", "2024-01-01T00:00:00Z", 40.0)];
        let caller_forecast = ForecastSeries::new(vec![1.0], vec![2.0], vec![3.0]);
        let mut rng = StdRng::seed_from_u64(7);

        let context = EffectiveContext::resolve_with_rng(
            &records,
            CallerInput {
                store_name: Some("Store 9".to_string()),
                item_name: None,
                forecast: Some(caller_forecast.clone()),
                history: None,
            },
            &mut rng,
        );

        assert_eq!(context.store_name, "Store 9");
        assert_eq!(context.item_name, "stored item");
        assert_eq!(context.forecast, caller_forecast);
        assert!(context.synthetic_history);
    }

    #[test]
    fn caller_history_is_not_flagged_synthetic() {
        let context = EffectiveContext::resolve(
            &[],
            CallerInput {
                store_name: Some("Store 1".to_string()),
                item_name: Some("Maggi".to_string()),
                forecast: Some(ForecastSeries::new(vec![1.0], vec![2.0], vec![3.0])),
                history: Some(vec![5.0; 30]),
            },
        );

        assert!(!context.synthetic_history);
        assert_eq!(context.history, vec![5.0; 30]);
    }

    #[test]
    fn unresolvable_names_fall_back_to_placeholder_labels() {
        let context = EffectiveContext::resolve(&[], CallerInput::default());

        assert_eq!(context.item_name, "Default Item");
        assert_eq!(context.store_name, "Default Store");
        assert!(context.synthetic_history);
    }
}
