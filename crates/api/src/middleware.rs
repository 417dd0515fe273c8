use axum::body::Body;
use axum::extract::State;
use axum::http::{header, HeaderName, HeaderValue, Method, Request, StatusCode};
use axum::middleware::Next;
use axum::response::Response;
use tower_http::cors::{AllowOrigin, CorsLayer};

use crate::rate_limit::retry_after_secs;
use crate::{error_response, ApiState};

pub const DEFAULT_ALLOWED_ORIGIN: &str = "http://localhost:3000";

const X_API_KEY: HeaderName = HeaderName::from_static("x-api-key");
const X_REQUEST_ID: HeaderName = HeaderName::from_static("x-request-id");

/// Briefs are computed per request and never cached downstream.
const RESPONSE_HEADERS: [(&str, &str); 4] = [
    ("x-content-type-options", "nosniff"),
    ("referrer-policy", "no-referrer"),
    (
        "content-security-policy",
        "default-src 'none'; frame-ancestors 'none'",
    ),
    ("cache-control", "no-store"),
];

fn is_exempt(request: &Request<Body>) -> bool {
    request.method() == Method::OPTIONS || request.uri().path() == "/health"
}

pub async fn require_api_key(
    State(state): State<ApiState>,
    request: Request<Body>,
    next: Next,
) -> Response {
    if is_exempt(&request) {
        return next.run(request).await;
    }

    let presented = request
        .headers()
        .get(&X_API_KEY)
        .and_then(|value| value.to_str().ok());

    match presented {
        Some(key) if key == state.api_key => next.run(request).await,
        _ => error_response(
            StatusCode::UNAUTHORIZED,
            "unauthorized",
            "missing or invalid x-api-key".to_string(),
        ),
    }
}

pub async fn limit_per_caller(
    State(state): State<ApiState>,
    request: Request<Body>,
    next: Next,
) -> Response {
    if is_exempt(&request) {
        return next.run(request).await;
    }

    let caller = caller_key(&request);
    match state.limiter.check(&caller) {
        Ok(()) => next.run(request).await,
        Err(wait) => {
            let secs = retry_after_secs(wait);
            let mut response = error_response(
                StatusCode::TOO_MANY_REQUESTS,
                "rate_limited",
                format!("too many requests, retry in {secs}s"),
            );
            response
                .headers_mut()
                .insert(header::RETRY_AFTER, HeaderValue::from(secs));
            response
        }
    }
}

pub async fn response_headers(
    State(state): State<ApiState>,
    request: Request<Body>,
    next: Next,
) -> Response {
    let mut response = next.run(request).await;
    let headers = response.headers_mut();

    for (name, value) in RESPONSE_HEADERS {
        headers.insert(
            HeaderName::from_static(name),
            HeaderValue::from_static(value),
        );
    }
    if state.strict_transport {
        headers.insert(
            header::STRICT_TRANSPORT_SECURITY,
            HeaderValue::from_static("max-age=31536000; includeSubDomains"),
        );
    }

    response
}

/// First forwarded hop, then `x-real-ip`, else a shared local bucket.
pub fn caller_key(request: &Request<Body>) -> String {
    header_text(request, "x-forwarded-for")
        .and_then(|chain| chain.split(',').next())
        .map(str::trim)
        .filter(|hop| !hop.is_empty())
        .or_else(|| header_text(request, "x-real-ip"))
        .unwrap_or("local")
        .to_string()
}

fn header_text<'r>(request: &'r Request<Body>, name: &str) -> Option<&'r str> {
    request
        .headers()
        .get(name)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|value| !value.is_empty())
}

pub fn parse_origins(raw: Option<&str>) -> Vec<String> {
    let origins = raw
        .unwrap_or_default()
        .split(',')
        .map(|origin| origin.trim().trim_end_matches('/'))
        .filter(|origin| !origin.is_empty())
        .map(str::to_string)
        .collect::<Vec<_>>();

    if origins.is_empty() {
        vec![DEFAULT_ALLOWED_ORIGIN.to_string()]
    } else {
        origins
    }
}

pub fn cors_layer(origins: &[String]) -> CorsLayer {
    let mut allowed = origins
        .iter()
        .filter_map(|origin| HeaderValue::from_str(origin).ok())
        .collect::<Vec<_>>();
    if allowed.is_empty() {
        allowed.push(HeaderValue::from_static(DEFAULT_ALLOWED_ORIGIN));
    }

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(allowed))
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE, X_API_KEY, X_REQUEST_ID])
        .expose_headers([X_REQUEST_ID, header::RETRY_AFTER])
}
