//! Insight API endpoints.
//!
//! `POST /v1/insights` runs the full pipeline over caller-supplied prediction
//! entries; `GET /v1/dashboard` does the same over the upstream feed for a
//! single store view.

use axum::{
    extract::{Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use demandlens_core::config::AppConfig;
use demandlens_core::ingest::validate_entry;
use demandlens_core::{
    compute_store_averages, ApplicationError, CallerInput, EffectiveContext, ForecastSeries,
    IngestOptions, InsightEngine, InsightEntry, InterfaceError, PredictionRecord, StoreAverages,
};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

#[derive(Clone)]
pub struct ApiState {
    pub config: AppConfig,
    pub client: crate::client::PredictionClient,
}

impl ApiState {
    pub fn new(config: AppConfig, client: crate::client::PredictionClient) -> Self {
        Self { config, client }
    }

    fn ingest_options(&self) -> IngestOptions {
        IngestOptions { strict_quantile_order: self.config.ingest.strict_quantile_order }
    }
}

pub fn router(state: ApiState) -> Router {
    Router::new()
        .route("/v1/insights", post(generate_insights))
        .route("/v1/dashboard", get(dashboard))
        .with_state(state)
}

#[derive(Debug, Deserialize)]
pub struct InsightsRequest {
    /// Raw prediction feed entries; malformed entries are rejected per-entry.
    #[serde(default)]
    pub predictions: Vec<serde_json::Value>,
    #[serde(default)]
    pub store_name: Option<String>,
    #[serde(default)]
    pub item_name: Option<String>,
    #[serde(default)]
    pub forecast: Option<ForecastSeries>,
    #[serde(default)]
    pub history: Option<Vec<f64>>,
}

#[derive(Debug, Serialize)]
pub struct RejectedEntry {
    pub index: usize,
    pub reason: String,
}

#[derive(Debug, Serialize)]
pub struct InsightsResponse {
    pub context: EffectiveContext,
    pub averages: StoreAverages,
    pub insights: Vec<InsightEntry>,
    pub rejected: Vec<RejectedEntry>,
    pub correlation_id: String,
}

#[derive(Debug, Serialize)]
pub struct ApiError {
    pub error: String,
    pub correlation_id: String,
}

#[derive(Debug, Deserialize)]
pub struct DashboardQuery {
    #[serde(default)]
    pub store: Option<String>,
}

pub async fn generate_insights(
    State(state): State<ApiState>,
    Json(request): Json<InsightsRequest>,
) -> Result<Json<InsightsResponse>, (StatusCode, Json<ApiError>)> {
    let correlation_id = Uuid::new_v4().simple().to_string();
    let options = state.ingest_options();

    let mut records = Vec::with_capacity(request.predictions.len());
    let mut rejected = Vec::new();
    for (index, entry) in request.predictions.into_iter().enumerate() {
        match validate_entry(entry, options) {
            Ok(record) => records.push(record),
            Err(reason) => rejected.push(RejectedEntry { index, reason }),
        }
    }

    if !rejected.is_empty() {
        warn!(
            event_name = "api.insights.rejected_entries",
            correlation_id = %correlation_id,
            rejected = rejected.len(),
            accepted = records.len(),
            "request contained malformed prediction entries"
        );
    }

    let input = CallerInput {
        store_name: request.store_name,
        item_name: request.item_name,
        forecast: request.forecast,
        history: request.history,
    };

    let response = build_insight_response(&records, input, rejected, correlation_id.clone());

    info!(
        event_name = "api.insights.generated",
        correlation_id = %correlation_id,
        store_name = %response.context.store_name,
        item_name = %response.context.item_name,
        insight_count = response.insights.len(),
        "insights generated"
    );

    Ok(Json(response))
}

pub async fn dashboard(
    State(state): State<ApiState>,
    Query(query): Query<DashboardQuery>,
) -> Result<Json<InsightsResponse>, (StatusCode, Json<ApiError>)> {
    let correlation_id = Uuid::new_v4().simple().to_string();

    let report = state
        .client
        .fetch(state.config.upstream.api_token.as_ref(), state.ingest_options())
        .await
        .map_err(|error| interface_reply(error, &correlation_id))?;

    let rejected = report
        .rejected
        .into_iter()
        .map(|entry| RejectedEntry { index: entry.index, reason: entry.reason })
        .collect();

    let input = CallerInput { store_name: query.store, ..CallerInput::default() };
    let response = build_insight_response(&report.records, input, rejected, correlation_id.clone());

    info!(
        event_name = "api.dashboard.rendered",
        correlation_id = %correlation_id,
        store_name = %response.context.store_name,
        record_count = report.records.len(),
        "dashboard view built"
    );

    Ok(Json(response))
}

/// Pure assembly of the response payload: resolve the effective context,
/// aggregate the store, and run the rules.
pub fn build_insight_response(
    records: &[PredictionRecord],
    input: CallerInput,
    rejected: Vec<RejectedEntry>,
    correlation_id: String,
) -> InsightsResponse {
    let context = EffectiveContext::resolve(records, input);
    let averages = compute_store_averages(records, &context.store_name);
    let insights = InsightEngine::new().generate(
        &context.forecast,
        &context.history,
        &context.item_name,
        &context.store_name,
        &averages,
    );

    InsightsResponse { context, averages, insights, rejected, correlation_id }
}

fn interface_reply(
    error: ApplicationError,
    correlation_id: &str,
) -> (StatusCode, Json<ApiError>) {
    warn!(
        event_name = "api.request.failed",
        correlation_id = %correlation_id,
        error = %error,
        "request failed"
    );

    let interface = error.into_interface(correlation_id);
    let status = match interface {
        InterfaceError::BadRequest { .. } => StatusCode::BAD_REQUEST,
        InterfaceError::ServiceUnavailable { .. } => StatusCode::SERVICE_UNAVAILABLE,
        InterfaceError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
    };

    (
        status,
        Json(ApiError {
            error: interface.user_message().to_string(),
            correlation_id: correlation_id.to_string(),
        }),
    )
}
