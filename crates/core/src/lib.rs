pub mod aggregate;
pub mod config;
pub mod domain;
pub mod errors;
pub mod fallback;
pub mod ingest;
pub mod insights;

pub use aggregate::{compute_store_averages, StoreAverages};
pub use domain::forecast::{ForecastSeries, PredictionRecord};
pub use domain::insight::{InsightEntry, InsightKind};
pub use errors::{ApplicationError, DomainError, InterfaceError};
pub use fallback::{
    select_fallback, select_fallback_with_rng, CallerInput, EffectiveContext, FallbackForecast,
};
pub use ingest::{parse_prediction_feed, IngestOptions, IngestReport, RejectedRecord};
pub use insights::InsightEngine;
