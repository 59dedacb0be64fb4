use serde::{Deserialize, Serialize};

use crate::domain::insight::InsightEntry;
use crate::errors::DomainError;

/// A quantile forecast over a fixed horizon: one value per future day for the
/// 10th, 50th, and 90th percentile of predicted sales.
///
/// All three sequences are expected to share the same length H. Elementwise
/// `p10 <= p50 <= p90` is expected but deliberately not enforced here; see
/// [`ForecastSeries::validate_quantile_order`] for the opt-in boundary check.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ForecastSeries {
    pub p10: Vec<f64>,
    pub p50: Vec<f64>,
    pub p90: Vec<f64>,
}

impl ForecastSeries {
    pub fn new(p10: Vec<f64>, p50: Vec<f64>, p90: Vec<f64>) -> Self {
        Self { p10, p50, p90 }
    }

    /// Number of forecast days. The median series is authoritative: every
    /// decision rule indexes through p50.
    pub fn horizon(&self) -> usize {
        self.p50.len()
    }

    pub fn is_empty(&self) -> bool {
        self.p50.is_empty()
    }

    /// Check that all three quantile series cover the same horizon.
    pub fn validate_lengths(&self) -> Result<(), DomainError> {
        if self.p10.len() == self.p50.len() && self.p50.len() == self.p90.len() {
            Ok(())
        } else {
            Err(DomainError::SeriesLengthMismatch {
                p10: self.p10.len(),
                p50: self.p50.len(),
                p90: self.p90.len(),
            })
        }
    }

    /// Opt-in check that `p10 <= p50 <= p90` holds elementwise. Only called
    /// from the ingestion boundary in strict mode; the engine rules never
    /// assume this invariant.
    pub fn validate_quantile_order(&self) -> Result<(), DomainError> {
        for (index, ((p10, p50), p90)) in
            self.p10.iter().zip(&self.p50).zip(&self.p90).enumerate()
        {
            if p10 > p50 || p50 > p90 {
                return Err(DomainError::QuantileOrderViolation {
                    index,
                    p10: *p10,
                    p50: *p50,
                    p90: *p90,
                });
            }
        }
        Ok(())
    }
}

/// One stored forecast result as delivered by the prediction feed.
///
/// Records are immutable once ingested; the engine only ever reads them.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PredictionRecord {
    pub item_name: String,
    pub store_name: String,
    pub forecast: ForecastSeries,
    #[serde(default)]
    pub suggestions: Vec<InsightEntry>,
    /// ISO-8601 timestamp of when the forecast was generated. Well-formed
    /// timestamps compare correctly as plain strings.
    pub timestamp: String,
    #[serde(default)]
    pub filename: String,
}
