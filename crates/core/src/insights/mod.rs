//! Business recommendation rules over a resolved forecast context.
//!
//! The engine evaluates a fixed, ordered set of rules and emits typed,
//! human-readable insight entries. Rule order is part of the contract:
//! consumers may rely on position (the first insight is always stock
//! guidance, and a trend insight is always present).

mod engine;

pub use engine::InsightEngine;

/// Safety margin applied to average demand for the stock buffer.
pub const STOCK_BUFFER_FACTOR: f64 = 1.2;
/// A day counts as high-upside when p90 exceeds this multiple of p50.
pub const PROMO_SPIKE_RATIO: f64 = 1.5;
/// Promotion guidance requires strictly more than this many high-upside days.
pub const PROMO_MIN_SPIKE_DAYS: usize = 2;
/// Holiday guidance triggers when any forecast day exceeds this multiple of
/// the wrapped historical value.
pub const HOLIDAY_LIFT_RATIO: f64 = 1.3;
/// Risk guidance triggers when the p10-to-p90 spread exceeds this multiple of
/// average demand.
pub const VOLATILITY_RATIO: f64 = 2.0;
