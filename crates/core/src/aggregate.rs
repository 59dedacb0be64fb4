//! Cross-item demand aggregation within a store.

use indexmap::IndexMap;
use serde::Serialize;

use crate::domain::forecast::PredictionRecord;

/// Per-item mean of the median (p50) forecast, keyed by item name.
///
/// The map is explicitly insertion-ordered: consumers treat key order as
/// display order, so the order of first occurrence in the filtered record set
/// must survive serialization. A repeated item keeps its original position
/// and takes the latest average.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct StoreAverages(IndexMap<String, f64>);

impl StoreAverages {
    pub fn new() -> Self {
        Self(IndexMap::new())
    }

    pub fn insert(&mut self, item_name: impl Into<String>, average: f64) {
        self.0.insert(item_name.into(), average);
    }

    pub fn get(&self, item_name: &str) -> Option<f64> {
        self.0.get(item_name).copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.0.iter().map(|(item, average)| (item.as_str(), *average))
    }

    /// Item with the highest average. First-encountered wins on exact ties,
    /// so only a strictly greater average displaces the current leader.
    pub fn top_item(&self) -> Option<(&str, f64)> {
        let mut top: Option<(&str, f64)> = None;
        for (item, average) in self.iter() {
            match top {
                Some((_, best)) if average <= best => {}
                _ => top = Some((item, average)),
            }
        }
        top
    }
}

/// Compute per-item average daily demand for one store.
///
/// Filters records to an exact, case-sensitive store match and averages each
/// record's median series. Records with an empty p50 are excluded rather than
/// dividing by zero. Pure function: no I/O, inputs are never mutated.
pub fn compute_store_averages(records: &[PredictionRecord], store_name: &str) -> StoreAverages {
    let mut averages = StoreAverages::new();

    for record in records.iter().filter(|record| record.store_name == store_name) {
        let p50 = &record.forecast.p50;
        if p50.is_empty() {
            continue;
        }
        let average = p50.iter().sum::<f64>() / p50.len() as f64;
        averages.insert(record.item_name.clone(), average);
    }

    averages
}
