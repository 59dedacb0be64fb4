use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use chrono::Utc;
use serde::Serialize;

use crate::routes::ApiState;

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct HealthCheck {
    pub status: &'static str,
    pub detail: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: HealthCheck,
    pub upstream: HealthCheck,
    pub checked_at: String,
}

pub fn router(state: ApiState) -> Router {
    Router::new().route("/health", get(health)).with_state(state)
}

pub async fn health(State(state): State<ApiState>) -> (StatusCode, Json<HealthResponse>) {
    let upstream = upstream_check(&state);
    let ready = upstream.status == "ready";

    let payload = HealthResponse {
        status: if ready { "ready" } else { "degraded" },
        service: HealthCheck {
            status: "ready",
            detail: "demandlens-server runtime initialized".to_string(),
        },
        upstream,
        checked_at: Utc::now().to_rfc3339(),
    };

    let status_code = if ready { StatusCode::OK } else { StatusCode::SERVICE_UNAVAILABLE };
    (status_code, Json(payload))
}

/// Readiness reflects whether the configured upstream is usable, not whether
/// it is reachable right now; fetch failures surface per-request instead.
fn upstream_check(state: &ApiState) -> HealthCheck {
    match state.config.validate() {
        Ok(()) => HealthCheck {
            status: "ready",
            detail: format!("prediction feed configured at {}", state.config.upstream.base_url),
        },
        Err(error) => {
            HealthCheck { status: "degraded", detail: format!("configuration invalid: {error}") }
        }
    }
}

#[cfg(test)]
mod tests {
    use axum::{extract::State, http::StatusCode, Json};
    use demandlens_core::config::AppConfig;

    use crate::client::PredictionClient;
    use crate::health::health;
    use crate::routes::ApiState;

    fn state_with(config: AppConfig) -> ApiState {
        let client = PredictionClient::from_config(&config.upstream).expect("client should build");
        ApiState::new(config, client)
    }

    #[tokio::test]
    async fn health_returns_ready_for_valid_configuration() {
        let (status, Json(payload)) = health(State(state_with(AppConfig::default()))).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(payload.status, "ready");
        assert_eq!(payload.upstream.status, "ready");
        assert_eq!(payload.service.status, "ready");
    }

    #[tokio::test]
    async fn health_returns_service_unavailable_for_invalid_upstream() {
        let mut config = AppConfig::default();
        config.upstream.base_url = "ftp://not-http".to_string();

        let (status, Json(payload)) = health(State(state_with(config))).await;

        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(payload.status, "degraded");
        assert_eq!(payload.upstream.status, "degraded");
        assert_eq!(payload.service.status, "ready");
    }
}
