mod middleware;
mod rate_limit;

use std::env;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Json, Path, State};
use axum::http::StatusCode;
use axum::middleware::from_fn_with_state;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::Router;
use scout_core::{BriefRequest, PolicyError};
use scout_observability::MetricsSnapshot;
use scout_service::{build_service, EngineSettings, PolicyService};
use scout_storage::JurisdictionCatalog;
use serde::Serialize;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::TraceLayer;

pub use crate::rate_limit::IpRateLimiter;

pub const DEFAULT_API_KEY: &str = "dev-scout-key";

#[derive(Clone)]
pub struct ApiState {
    pub service: Arc<PolicyService<JurisdictionCatalog>>,
    pub api_key: String,
    pub limiter: IpRateLimiter,
    pub allowed_origins: Arc<Vec<String>>,
    pub strict_transport: bool,
}

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
    timestamp_utc: String,
    jurisdictions: usize,
    city_scope: scout_core::CityScope,
    metrics: MetricsSnapshot,
}

pub async fn build_app(settings: EngineSettings) -> Result<Router> {
    let service = Arc::new(build_service(settings).await?);

    let api_key = env::var("SCOUT_API_KEY").unwrap_or_else(|_| DEFAULT_API_KEY.to_string());
    let rate_limit_window = Duration::from_secs(
        env::var("SCOUT_API_RATE_LIMIT_WINDOW_SECONDS")
            .ok()
            .and_then(|value| value.parse::<u64>().ok())
            .unwrap_or(60),
    );
    let rate_limit_max = env::var("SCOUT_API_RATE_LIMIT_MAX")
        .ok()
        .and_then(|value| value.parse::<usize>().ok())
        .unwrap_or(120);
    let strict_transport = env::var("SCOUT_HSTS")
        .map(|value| value != "0" && !value.eq_ignore_ascii_case("false"))
        .unwrap_or(true);

    let state = ApiState {
        service,
        api_key,
        limiter: IpRateLimiter::new(rate_limit_window, rate_limit_max),
        allowed_origins: Arc::new(middleware::parse_origins(
            env::var("SCOUT_ALLOWED_ORIGINS").ok().as_deref(),
        )),
        strict_transport,
    };

    Ok(build_router(state))
}

pub fn build_router(state: ApiState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/v1/briefs", post(create_brief))
        .route("/v1/jurisdictions", get(list_jurisdictions))
        .route("/v1/jurisdictions/:code", get(jurisdiction_detail))
        .layer(middleware::cors_layer(&state.allowed_origins))
        .layer(from_fn_with_state(state.clone(), middleware::response_headers))
        .layer(TraceLayer::new_for_http())
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .layer(RequestBodyLimitLayer::new(16 * 1024))
        .layer(from_fn_with_state(state.clone(), middleware::require_api_key))
        .layer(from_fn_with_state(state.clone(), middleware::limit_per_caller))
        .with_state(state)
}

async fn health(State(state): State<ApiState>) -> impl IntoResponse {
    let payload = HealthResponse {
        status: "ok",
        timestamp_utc: chrono::Utc::now().to_rfc3339(),
        jurisdictions: state.service.repository().len(),
        city_scope: state.service.settings().city_scope,
        metrics: state.service.metrics().snapshot(),
    };
    (StatusCode::OK, Json(payload))
}

async fn create_brief(
    State(state): State<ApiState>,
    payload: Result<Json<BriefRequest>, JsonRejection>,
) -> Response {
    let Json(request) = match payload {
        Ok(payload) => payload,
        Err(rejection) => {
            return error_response(
                StatusCode::BAD_REQUEST,
                "invalid_configuration",
                rejection.body_text(),
            )
        }
    };

    match state.service.generate(&request) {
        Ok(brief) => (StatusCode::OK, Json(brief)).into_response(),
        Err(error) => policy_error_response(&error),
    }
}

async fn list_jurisdictions(State(state): State<ApiState>) -> impl IntoResponse {
    let countries = state.service.jurisdictions();
    (
        StatusCode::OK,
        Json(serde_json::json!({
            "count": countries.len(),
            "jurisdictions": countries,
        })),
    )
}

async fn jurisdiction_detail(
    State(state): State<ApiState>,
    Path(code): Path<String>,
) -> Response {
    match state.service.jurisdiction_detail(&code) {
        Ok(detail) => (StatusCode::OK, Json(detail)).into_response(),
        Err(error) => policy_error_response(&error),
    }
}

fn policy_error_response(error: &PolicyError) -> Response {
    let status = match error {
        PolicyError::InvalidConfiguration(_) => StatusCode::BAD_REQUEST,
        PolicyError::NotFound(_) => StatusCode::NOT_FOUND,
    };
    error_response(status, error.code(), error.to_string())
}

pub(crate) fn error_response(status: StatusCode, code: &str, message: String) -> Response {
    (
        status,
        Json(serde_json::json!({
            "error": code,
            "message": message,
        })),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_policy_errors_to_statuses() {
        let invalid = policy_error_response(&PolicyError::InvalidConfiguration("x".into()));
        assert_eq!(invalid.status(), StatusCode::BAD_REQUEST);
        let missing = policy_error_response(&PolicyError::NotFound("ZZ".into()));
        assert_eq!(missing.status(), StatusCode::NOT_FOUND);
    }
}
