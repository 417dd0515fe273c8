use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use axum::Router;
use scout_api::{build_app, build_router, ApiState, IpRateLimiter, DEFAULT_API_KEY};
use scout_core::{PolicyBrief, RiskLevel};
use scout_service::{build_service, EngineSettings};
use serde_json::{json, Value};
use tower::ServiceExt;

fn settings() -> EngineSettings {
    EngineSettings {
        catalog_path: PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../data/jurisdictions.json"),
        ..EngineSettings::default()
    }
}

async fn app() -> Router {
    build_app(settings()).await.expect("app should build")
}

fn brief_request(body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/v1/briefs")
        .header("content-type", "application/json")
        .header("x-api-key", DEFAULT_API_KEY)
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn read_json(response: axum::response::Response) -> Value {
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&body).unwrap()
}

#[tokio::test]
async fn health_is_public() {
    let response = app()
        .await
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let parsed = read_json(response).await;
    assert_eq!(parsed["status"], "ok");
    assert!(parsed["jurisdictions"].as_u64().unwrap() >= 5);
}

#[tokio::test]
async fn briefs_require_api_key() {
    let request = Request::builder()
        .method("POST")
        .uri("/v1/briefs")
        .header("content-type", "application/json")
        .body(Body::from(json!({ "country_code": "US" }).to_string()))
        .unwrap();

    let response = app().await.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn baseline_brief_has_five_documents() {
    let response = app()
        .await
        .oneshot(brief_request(json!({ "country_code": "us" })))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers().contains_key("x-request-id"));
    assert_eq!(response.headers()["cache-control"], "no-store");
    assert_eq!(response.headers()["x-content-type-options"], "nosniff");

    let brief: PolicyBrief = serde_json::from_value(read_json(response).await).unwrap();
    assert_eq!(brief.location.country_code.as_str(), "US");
    assert_eq!(brief.checklist.len(), 5);
    assert_eq!(brief.risk.overall_risk, RiskLevel::Low);
}

#[tokio::test]
async fn full_production_in_us_is_medium_risk() {
    let response = app()
        .await
        .oneshot(brief_request(json!({
            "country_code": "US",
            "has_drones": true,
            "has_minors": true,
            "has_foreign_crew": true,
            "shoot_date": "2026-12-01"
        })))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let parsed = read_json(response).await;
    assert_eq!(parsed["checklist"].as_array().unwrap().len(), 13);
    assert_eq!(parsed["risk"]["factors"].as_array().unwrap().len(), 3);
    assert_eq!(parsed["risk"]["overall_risk"], "medium");
    assert_eq!(parsed["configuration"]["shoot_date"], "2026-12-01");
}

#[tokio::test]
async fn foreign_city_is_reported_but_not_applied() {
    let response = app()
        .await
        .oneshot(brief_request(json!({
            "country_code": "US",
            "city_name": "Tokyo"
        })))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let parsed = read_json(response).await;
    assert_eq!(parsed["checklist"].as_array().unwrap().len(), 5);
    assert!(parsed["city_override"].is_null());
    assert_eq!(
        parsed["location"]["city_resolution"],
        json!({ "status": "country_mismatch", "override_country": "JP" })
    );
}

#[tokio::test]
async fn unknown_country_is_not_found() {
    let response = app()
        .await
        .oneshot(brief_request(json!({ "country_code": "ZZ", "has_drones": true })))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let parsed = read_json(response).await;
    assert_eq!(parsed["error"], "jurisdiction_not_found");
}

#[tokio::test]
async fn empty_country_is_bad_request() {
    let response = app()
        .await
        .oneshot(brief_request(json!({ "country_code": "  " })))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let parsed = read_json(response).await;
    assert_eq!(parsed["error"], "invalid_configuration");
}

#[tokio::test]
async fn missing_or_null_country_is_bad_request() {
    for body in [json!({ "has_drones": true }), json!({ "country_code": null })] {
        let response = app().await.oneshot(brief_request(body)).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let parsed = read_json(response).await;
        assert_eq!(parsed["error"], "invalid_configuration");
        assert!(parsed["message"].as_str().unwrap().contains("country code"));
    }
}

#[tokio::test]
async fn malformed_body_gets_json_error() {
    let request = Request::builder()
        .method("POST")
        .uri("/v1/briefs")
        .header("content-type", "application/json")
        .header("x-api-key", DEFAULT_API_KEY)
        .body(Body::from(r#"{"country_code": "US", "has_drones": "yes"}"#))
        .unwrap();

    let response = app().await.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let parsed = read_json(response).await;
    assert_eq!(parsed["error"], "invalid_configuration");
    assert!(parsed["message"].is_string());
}

#[tokio::test]
async fn rate_limited_callers_get_retry_after() {
    let service = build_service(settings()).await.unwrap();
    let app = build_router(ApiState {
        service: Arc::new(service),
        api_key: DEFAULT_API_KEY.to_string(),
        limiter: IpRateLimiter::new(Duration::from_secs(30), 1),
        allowed_origins: Arc::new(Vec::new()),
        strict_transport: false,
    });

    let first = app
        .clone()
        .oneshot(brief_request(json!({ "country_code": "US" })))
        .await
        .unwrap();
    assert_eq!(first.status(), StatusCode::OK);
    assert!(first.headers().get("strict-transport-security").is_none());

    let second = app
        .oneshot(brief_request(json!({ "country_code": "US" })))
        .await
        .unwrap();
    assert_eq!(second.status(), StatusCode::TOO_MANY_REQUESTS);
    let retry_after = second.headers()["retry-after"]
        .to_str()
        .unwrap()
        .parse::<u64>()
        .unwrap();
    assert!((1..=30).contains(&retry_after));
    assert_eq!(read_json(second).await["error"], "rate_limited");
}

#[tokio::test]
async fn lists_and_describes_jurisdictions() {
    let app = app().await;

    let list = Request::builder()
        .uri("/v1/jurisdictions")
        .header("x-api-key", DEFAULT_API_KEY)
        .body(Body::empty())
        .unwrap();
    let response = app.clone().oneshot(list).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let parsed = read_json(response).await;
    let codes = parsed["jurisdictions"]
        .as_array()
        .unwrap()
        .iter()
        .map(|entry| entry["country_code"].as_str().unwrap().to_string())
        .collect::<Vec<_>>();
    assert!(codes.contains(&"AE".to_string()));

    let detail = Request::builder()
        .uri("/v1/jurisdictions/ae")
        .header("x-api-key", DEFAULT_API_KEY)
        .body(Body::empty())
        .unwrap();
    let response = app.clone().oneshot(detail).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let parsed = read_json(response).await;
    assert_eq!(parsed["cultural_sensitivity"]["risk_level"], "high");
    assert_eq!(parsed["cities"][0]["city"], "Dubai");

    let missing = Request::builder()
        .uri("/v1/jurisdictions/zz")
        .header("x-api-key", DEFAULT_API_KEY)
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(missing).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
