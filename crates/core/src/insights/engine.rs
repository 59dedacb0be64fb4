//! Insight rule evaluation.

use crate::aggregate::StoreAverages;
use crate::domain::forecast::ForecastSeries;
use crate::domain::insight::{InsightEntry, InsightKind};

use super::{
    HOLIDAY_LIFT_RATIO, PROMO_MIN_SPIKE_DAYS, PROMO_SPIKE_RATIO, STOCK_BUFFER_FACTOR,
    VOLATILITY_RATIO,
};

/// The insight generation engine.
///
/// Stateless and pure: every call is independent and safe to run concurrently
/// on disjoint inputs. Execution is synchronous and sub-millisecond for
/// realistic horizons.
#[derive(Clone, Copy, Debug, Default)]
pub struct InsightEngine;

impl InsightEngine {
    pub fn new() -> Self {
        Self
    }

    /// Evaluate all rules in their fixed contract order.
    ///
    /// An empty median series means the averages below are undefined, so a
    /// single informational entry is returned instead of running rules.
    pub fn generate(
        &self,
        series: &ForecastSeries,
        history: &[f64],
        item_name: &str,
        store_name: &str,
        averages: &StoreAverages,
    ) -> Vec<InsightEntry> {
        if series.p50.is_empty() {
            return vec![InsightEntry::new(
                InsightKind::NoData,
                format!(
                    "No forecast data available for {item_name}; generate a forecast to see recommendations."
                ),
            )];
        }

        let avg_p50 = mean(&series.p50);
        let mut insights = Vec::new();

        insights.push(self.stock_adjustment(item_name, avg_p50));
        if let Some(entry) = self.promotion_strategy(series) {
            insights.push(entry);
        }
        if let Some(entry) = self.holiday_impact(series, history) {
            insights.push(entry);
        }
        insights.push(self.sales_trend(series, item_name));
        if let Some(entry) = self.risk_analysis(series, item_name, avg_p50) {
            insights.push(entry);
        }
        if let Some(entry) = self.multi_item_comparison(store_name, averages) {
            insights.push(entry);
        }

        insights
    }

    /// Rule 1, always emitted: recommended buffer is 20% above average demand,
    /// rounded up to whole units.
    fn stock_adjustment(&self, item_name: &str, avg_p50: f64) -> InsightEntry {
        let buffer = (avg_p50 * STOCK_BUFFER_FACTOR).ceil();
        InsightEntry::new(
            InsightKind::StockAdjustment,
            format!(
                "Average daily demand for {item_name} is {avg_p50:.2} units; keep a stock buffer of {buffer:.0} units (20% above average)."
            ),
        )
    }

    /// Rule 2: emitted when more than two days carry p90 above 1.5x the
    /// median, signalling enough upside to be worth capturing.
    fn promotion_strategy(&self, series: &ForecastSeries) -> Option<InsightEntry> {
        let spike_days = series
            .p90
            .iter()
            .zip(&series.p50)
            .filter(|(p90, p50)| **p90 > **p50 * PROMO_SPIKE_RATIO)
            .count();

        if spike_days <= PROMO_MIN_SPIKE_DAYS {
            return None;
        }

        Some(InsightEntry::new(
            InsightKind::PromotionStrategy,
            format!(
                "{spike_days} of {horizon} forecast days show high upside (p90 above 1.5x the median); consider running a promotion to capture the extra demand.",
                horizon = series.horizon()
            ),
        ))
    }

    /// Rule 3: emitted when any forecast day exceeds the wrapped historical
    /// value by more than 30%. History wraps modulo its length against the
    /// horizon; an empty history carries no signal, so the rule is skipped.
    fn holiday_impact(&self, series: &ForecastSeries, history: &[f64]) -> Option<InsightEntry> {
        if history.is_empty() {
            return None;
        }

        let lifted = series
            .p50
            .iter()
            .enumerate()
            .any(|(day, p50)| *p50 > history[day % history.len()] * HOLIDAY_LIFT_RATIO);

        if !lifted {
            return None;
        }

        Some(InsightEntry::new(
            InsightKind::HolidayImpact,
            "Forecast demand exceeds historical sales by more than 30% on at least one day; plan inventory for holiday or event-driven demand.".to_string(),
        ))
    }

    /// Rule 4, always emitted. Strict comparison: an exactly flat series is
    /// reported as decreasing. Documented behavior, kept deliberately.
    fn sales_trend(&self, series: &ForecastSeries, item_name: &str) -> InsightEntry {
        let first = series.p50[0];
        let last = series.p50[series.p50.len() - 1];
        let trend = if last > first { "increasing" } else { "decreasing" };

        InsightEntry::new(
            InsightKind::SalesTrend,
            format!("Median demand for {item_name} is {trend} across the forecast horizon."),
        )
    }

    /// Rule 5: emitted when the full p10-to-p90 spread is more than twice the
    /// average demand. An empty p10 or p90 leaves the spread undefined; the
    /// rule is skipped rather than assuming the series lengths match.
    fn risk_analysis(
        &self,
        series: &ForecastSeries,
        item_name: &str,
        avg_p50: f64,
    ) -> Option<InsightEntry> {
        let max_p90 = series.p90.iter().copied().fold(None, |max: Option<f64>, value| {
            Some(max.map_or(value, |current| current.max(value)))
        })?;
        let min_p10 = series.p10.iter().copied().fold(None, |min: Option<f64>, value| {
            Some(min.map_or(value, |current| current.min(value)))
        })?;

        let volatility = max_p90 - min_p10;
        if volatility <= avg_p50 * VOLATILITY_RATIO {
            return None;
        }

        Some(InsightEntry::new(
            InsightKind::RiskAnalysis,
            format!(
                "Forecast spread for {item_name} is {volatility:.2} units, more than twice the average demand; expect high demand uncertainty."
            ),
        ))
    }

    /// Rule 6: emitted when the store has more than one ranked item. Names
    /// the leading item; first-encountered wins on exact average ties.
    fn multi_item_comparison(
        &self,
        store_name: &str,
        averages: &StoreAverages,
    ) -> Option<InsightEntry> {
        if averages.len() <= 1 {
            return None;
        }

        let (top_item, top_average) = averages.top_item()?;
        Some(InsightEntry::new(
            InsightKind::MultiItemComparison,
            format!(
                "{top_item} leads {store_name} with an average of {top_average:.2} units per day."
            ),
        ))
    }
}

fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

#[cfg(test)]
mod tests {
    use super::InsightEngine;
    use crate::aggregate::StoreAverages;
    use crate::domain::forecast::ForecastSeries;
    use crate::domain::insight::InsightKind;

    fn flat_series(level: f64, horizon: usize) -> ForecastSeries {
        ForecastSeries::new(
            vec![level * 0.8; horizon],
            vec![level; horizon],
            vec![level * 1.2; horizon],
        )
    }

    fn generate(
        series: &ForecastSeries,
        history: &[f64],
        averages: &StoreAverages,
    ) -> Vec<InsightKind> {
        InsightEngine::new()
            .generate(series, history, "Maggi", "Store 1", averages)
            .into_iter()
            .map(|entry| entry.kind)
            .collect()
    }

    #[test]
    fn stock_and_trend_are_always_present_and_ordered() {
        let series = flat_series(10.0, 7);
        let kinds = generate(&series, &[10.0; 30], &StoreAverages::new());

        assert_eq!(kinds, vec![InsightKind::StockAdjustment, InsightKind::SalesTrend]);
    }

    #[test]
    fn empty_p50_yields_exactly_one_no_data_entry() {
        let series = ForecastSeries::new(Vec::new(), Vec::new(), Vec::new());
        let entries = InsightEngine::new().generate(
            &series,
            &[10.0; 30],
            "Maggi",
            "Store 1",
            &StoreAverages::new(),
        );

        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].kind, InsightKind::NoData);
    }

    #[test]
    fn stock_buffer_is_ceiling_of_average_times_factor() {
        let series = ForecastSeries::new(vec![0.0; 3], vec![10.0, 20.0, 30.0], vec![40.0; 3]);
        let entries = InsightEngine::new().generate(
            &series,
            &[20.0; 30],
            "Maggi",
            "Store 1",
            &StoreAverages::new(),
        );

        // avg = 20, buffer = ceil(24) = 24
        assert_eq!(entries[0].kind, InsightKind::StockAdjustment);
        assert!(entries[0].message.contains("20.00"));
        assert!(entries[0].message.contains("24 units"));
    }

    #[test]
    fn promotion_requires_strictly_more_than_two_spike_days() {
        let p50 = vec![10.0; 7];
        let two_spikes =
            ForecastSeries::new(vec![5.0; 7], p50.clone(), vec![
                20.0, 20.0, 10.0, 10.0, 10.0, 10.0, 10.0,
            ]);
        let three_spikes =
            ForecastSeries::new(vec![5.0; 7], p50, vec![20.0, 20.0, 20.0, 10.0, 10.0, 10.0, 10.0]);

        let without = generate(&two_spikes, &[10.0; 30], &StoreAverages::new());
        let with = generate(&three_spikes, &[10.0; 30], &StoreAverages::new());

        assert!(!without.contains(&InsightKind::PromotionStrategy));
        assert!(with.contains(&InsightKind::PromotionStrategy));
    }

    #[test]
    fn holiday_impact_wraps_history_modulo_its_length() {
        // Horizon 7 against a 3-point history: day 5 indexes history[5 % 3].
        let mut p50 = vec![10.0; 7];
        p50[5] = 100.0;
        let series = ForecastSeries::new(vec![5.0; 7], p50, vec![12.0; 7]);
        let history = vec![10.0, 10.0, 10.0];

        let kinds = generate(&series, &history, &StoreAverages::new());
        assert!(kinds.contains(&InsightKind::HolidayImpact));
    }

    #[test]
    fn holiday_impact_is_skipped_for_empty_history() {
        let series = flat_series(100.0, 7);
        let kinds = generate(&series, &[], &StoreAverages::new());

        assert!(!kinds.contains(&InsightKind::HolidayImpact));
    }

    #[test]
    fn flat_series_reports_decreasing_trend() {
        let series = flat_series(10.0, 7);
        let entries = InsightEngine::new().generate(
            &series,
            &[10.0; 30],
            "Maggi",
            "Store 1",
            &StoreAverages::new(),
        );

        let trend = entries
            .iter()
            .find(|entry| entry.kind == InsightKind::SalesTrend)
            .expect("trend is always emitted");
        assert!(trend.message.contains("decreasing"));
    }

    #[test]
    fn rising_series_reports_increasing_trend() {
        let series =
            ForecastSeries::new(vec![1.0, 1.0], vec![10.0, 20.0], vec![30.0, 30.0]);
        let entries = InsightEngine::new().generate(
            &series,
            &[10.0; 30],
            "Maggi",
            "Store 1",
            &StoreAverages::new(),
        );

        let trend = entries
            .iter()
            .find(|entry| entry.kind == InsightKind::SalesTrend)
            .expect("trend is always emitted");
        assert!(trend.message.contains("increasing"));
    }

    #[test]
    fn risk_analysis_triggers_on_wide_spread() {
        // avg p50 = 10, spread = 50 - 1 = 49 > 20.
        let series = ForecastSeries::new(vec![1.0; 7], vec![10.0; 7], vec![50.0; 7]);
        let kinds = generate(&series, &[10.0; 30], &StoreAverages::new());

        assert!(kinds.contains(&InsightKind::RiskAnalysis));
    }

    #[test]
    fn risk_analysis_stays_quiet_for_tight_spread() {
        let series = flat_series(10.0, 7);
        let kinds = generate(&series, &[10.0; 30], &StoreAverages::new());

        assert!(!kinds.contains(&InsightKind::RiskAnalysis));
    }

    #[test]
    fn multi_item_comparison_names_top_item() {
        let mut averages = StoreAverages::new();
        averages.insert("A", 5.0);
        averages.insert("B", 10.0);

        let series = flat_series(10.0, 7);
        let entries = InsightEngine::new().generate(
            &series,
            &[10.0; 30],
            "Maggi",
            "Store 1",
            &averages,
        );

        let comparison = entries
            .iter()
            .find(|entry| entry.kind == InsightKind::MultiItemComparison)
            .expect("comparison should be emitted for two items");
        assert!(comparison.message.starts_with('B'));
        assert!(comparison.message.contains("Store 1"));
    }

    #[test]
    fn multi_item_comparison_is_absent_for_single_item() {
        let mut averages = StoreAverages::new();
        averages.insert("A", 5.0);

        let series = flat_series(10.0, 7);
        let kinds = generate(&series, &[10.0; 30], &averages);

        assert!(!kinds.contains(&InsightKind::MultiItemComparison));
    }

    #[test]
    fn rule_order_is_stable_when_all_rules_fire() {
        let mut averages = StoreAverages::new();
        averages.insert("A", 5.0);
        averages.insert("B", 10.0);

        // Wide spread, spikes on three days, rising median over a small history.
        let series = ForecastSeries::new(
            vec![0.0; 7],
            vec![10.0, 11.0, 12.0, 13.0, 14.0, 15.0, 16.0],
            vec![40.0, 40.0, 40.0, 14.0, 15.0, 16.0, 17.0],
        );
        let kinds = generate(&series, &[5.0; 30], &averages);

        assert_eq!(
            kinds,
            vec![
                InsightKind::StockAdjustment,
                InsightKind::PromotionStrategy,
                InsightKind::HolidayImpact,
                InsightKind::SalesTrend,
                InsightKind::RiskAnalysis,
                InsightKind::MultiItemComparison,
            ]
        );
    }
}
