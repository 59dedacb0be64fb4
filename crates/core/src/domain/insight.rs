use serde::{Deserialize, Serialize};

/// Category of a generated business recommendation.
///
/// The engine emits insights in a fixed order (stock guidance first, trend
/// always present), so consumers may rely on position as well as kind.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InsightKind {
    StockAdjustment,
    PromotionStrategy,
    HolidayImpact,
    SalesTrend,
    RiskAnalysis,
    MultiItemComparison,
    /// Emitted alone when the forecast carries no median series at all.
    NoData,
}

impl InsightKind {
    /// Short display heading for text-rendering consumers.
    pub fn label(&self) -> &'static str {
        match self {
            InsightKind::StockAdjustment => "Stock Adjustment",
            InsightKind::PromotionStrategy => "Promotion Strategy",
            InsightKind::HolidayImpact => "Holiday Impact",
            InsightKind::SalesTrend => "Sales Trend",
            InsightKind::RiskAnalysis => "Risk Analysis",
            InsightKind::MultiItemComparison => "Multi-Item Comparison",
            InsightKind::NoData => "No Data",
        }
    }

    /// Fixed informational confidence per kind. Part of the wire schema but
    /// never read by the generation rules for ordering or filtering.
    pub fn default_confidence(&self) -> f64 {
        match self {
            InsightKind::StockAdjustment => 0.85,
            InsightKind::PromotionStrategy => 0.75,
            InsightKind::HolidayImpact => 0.70,
            InsightKind::SalesTrend => 0.80,
            InsightKind::RiskAnalysis => 0.70,
            InsightKind::MultiItemComparison => 0.75,
            InsightKind::NoData => 1.0,
        }
    }
}

/// A typed, human-readable recommendation produced by the insight engine.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct InsightEntry {
    #[serde(rename = "type")]
    pub kind: InsightKind,
    pub message: String,
    pub confidence: f64,
}

impl InsightEntry {
    pub fn new(kind: InsightKind, message: impl Into<String>) -> Self {
        Self { kind, message: message.into(), confidence: kind.default_confidence() }
    }
}

#[cfg(test)]
mod tests {
    use super::{InsightEntry, InsightKind};

    #[test]
    fn kind_serializes_under_type_key_in_snake_case() {
        let entry = InsightEntry::new(InsightKind::StockAdjustment, "keep 12 units on hand");
        let json = serde_json::to_value(&entry).expect("entry should serialize");

        assert_eq!(json["type"], "stock_adjustment");
        assert_eq!(json["message"], "keep 12 units on hand");
    }

    #[test]
    fn entry_roundtrips_from_feed_payload() {
        let entry: InsightEntry = serde_json::from_str(
            r#"{"type":"sales_trend","message":"demand is increasing","confidence":0.8}"#,
        )
        .expect("payload should deserialize");

        assert_eq!(entry.kind, InsightKind::SalesTrend);
        assert_eq!(entry.kind.label(), "Sales Trend");
    }
}
