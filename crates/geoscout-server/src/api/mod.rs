mod geo_free;

use std::sync::Arc;

use axum::{
    extract::State,
    http::{header, HeaderName, Method, StatusCode},
    response::IntoResponse,
    routing::get,
    Extension, Json, Router,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::cache::ScoreCache;
use crate::middleware::{enforce_rate_limit, request_id, RateLimitState, RequestId};

#[derive(Clone)]
pub struct AppState {
    pub cache: Arc<ScoreCache>,
}

#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub data: T,
    pub meta: ResponseMeta,
}

#[derive(Debug, Serialize)]
pub struct ResponseMeta {
    pub request_id: String,
    pub timestamp: DateTime<Utc>,
}

impl ResponseMeta {
    pub(super) fn new(request_id: String) -> Self {
        Self {
            request_id,
            timestamp: Utc::now(),
        }
    }
}

/// Error response rendered as `{ "error": message }`.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        (
            self.status,
            Json(ErrorBody {
                error: self.message,
            }),
        )
            .into_response()
    }
}

#[derive(Debug, Serialize, PartialEq, Eq)]
struct HealthData {
    status: &'static str,
    cached_brands: Option<usize>,
}

fn build_cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET])
        .allow_headers([header::CONTENT_TYPE, HeaderName::from_static("x-request-id")])
}

fn public_api_router(rate_limit: RateLimitState) -> Router<AppState> {
    Router::new()
        .route(
            "/api/geo-free",
            get(geo_free::get_geo_free).fallback(geo_free::method_not_allowed),
        )
        .layer(axum::middleware::from_fn_with_state(
            rate_limit,
            enforce_rate_limit,
        ))
}

pub fn build_app(state: AppState, rate_limit: RateLimitState) -> Router {
    let health_routes = Router::new().route("/api/v1/health", get(health));

    Router::new()
        .merge(health_routes)
        .merge(public_api_router(rate_limit))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(build_cors())
                .layer(axum::middleware::from_fn(request_id)),
        )
        .with_state(state)
}

async fn health(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> impl IntoResponse {
    let meta = ResponseMeta::new(req_id.0);

    match state.cache.len() {
        Ok(cached_brands) => (
            StatusCode::OK,
            Json(ApiResponse {
                data: HealthData {
                    status: "ok",
                    cached_brands: Some(cached_brands),
                },
                meta,
            }),
        ),
        Err(e) => {
            tracing::warn!(error = %e, "health check: score cache unavailable");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(ApiResponse {
                    data: HealthData {
                        status: "degraded",
                        cached_brands: None,
                    },
                    meta,
                }),
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use chrono::TimeDelta;
    use tower::ServiceExt;

    use super::*;
    use crate::cache::testing::{ManualClock, WEEK};

    struct TestApp {
        app: Router,
        cache: Arc<ScoreCache>,
        clock: Arc<ManualClock>,
    }

    fn test_app() -> TestApp {
        let clock = Arc::new(ManualClock::new());
        let cache = Arc::new(ScoreCache::new(WEEK, clock.clone()));
        let app = build_app(
            AppState {
                cache: Arc::clone(&cache),
            },
            RateLimitState::per_minute(120),
        );
        TestApp { app, cache, clock }
    }

    async fn send(app: &Router, method: Method, uri: &str) -> (StatusCode, serde_json::Value) {
        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .method(method)
                    .uri(uri)
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("response");

        let status = response.status();
        let body = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body bytes");
        let json = serde_json::from_slice(&body).expect("json parse");
        (status, json)
    }

    #[test]
    fn api_error_keeps_its_status() {
        let response = ApiError::new(StatusCode::BAD_REQUEST, "nope").into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn geo_free_returns_preloaded_brand_then_cached_copy() {
        let t = test_app();

        let (status, first) = send(&t.app, Method::GET, "/api/geo-free?brand=Nike").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(first["score"], 18);
        assert_eq!(first["breakdown"]["ai"], 9);
        assert_eq!(first["confidence"], "High");
        assert_eq!(first["cached"], false);
        assert_eq!(first["data_age"], "2026-10-19");

        let (status, second) = send(&t.app, Method::GET, "/api/geo-free?brand=nike").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(second["cached"], true);
        assert_eq!(second["score"], first["score"]);
        assert_eq!(second["breakdown"], first["breakdown"]);
        assert_eq!(second["insight"], first["insight"]);
    }

    #[tokio::test]
    async fn geo_free_unknown_brand_gets_placeholder() {
        let t = test_app();

        let (status, json) =
            send(&t.app, Method::GET, "/api/geo-free?brand=Acme%20Widgets").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["score"], 10);
        assert_eq!(json["confidence"], "Low");
        assert_eq!(json["breakdown"]["community"], 3);
        assert_eq!(json["cached"], false);
    }

    #[tokio::test]
    async fn geo_free_recomputes_after_ttl() {
        let t = test_app();
        send(&t.app, Method::GET, "/api/geo-free?brand=apple").await;

        t.clock.advance(TimeDelta::days(7) + TimeDelta::seconds(1));
        let (_, json) = send(&t.app, Method::GET, "/api/geo-free?brand=apple").await;
        assert_eq!(json["cached"], false);
        assert_eq!(json["data_age"], "2026-10-26");
    }

    #[tokio::test]
    async fn geo_free_requires_brand() {
        let t = test_app();

        for uri in ["/api/geo-free", "/api/geo-free?brand=", "/api/geo-free?brand=%20%20"] {
            let (status, json) = send(&t.app, Method::GET, uri).await;
            assert_eq!(status, StatusCode::BAD_REQUEST, "{uri}");
            assert_eq!(json["error"], "Brand parameter required");
        }
        assert_eq!(t.cache.len().unwrap(), 0);
    }

    #[tokio::test]
    async fn geo_free_rejects_other_methods() {
        let t = test_app();

        for method in [Method::POST, Method::PUT, Method::DELETE] {
            let (status, json) = send(&t.app, method, "/api/geo-free?brand=nike").await;
            assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
            assert_eq!(json["error"], "Method not allowed");
        }
        assert_eq!(t.cache.len().unwrap(), 0);
    }

    #[tokio::test]
    async fn geo_free_internal_fault_is_500() {
        let t = test_app();
        t.cache.poison();

        let (status, json) = send(&t.app, Method::GET, "/api/geo-free?brand=nike").await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(json["error"], "Analysis failed");
    }

    #[tokio::test]
    async fn health_reports_cached_brand_count() {
        let t = test_app();
        send(&t.app, Method::GET, "/api/geo-free?brand=tesla").await;
        send(&t.app, Method::GET, "/api/geo-free?brand=unknown-co").await;

        let (status, json) = send(&t.app, Method::GET, "/api/v1/health").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["data"]["status"], "ok");
        assert_eq!(json["data"]["cached_brands"], 2);
        assert!(json["meta"]["request_id"].is_string());
    }

    #[tokio::test]
    async fn health_is_degraded_when_cache_is_poisoned() {
        let t = test_app();
        t.cache.poison();

        let (status, json) = send(&t.app, Method::GET, "/api/v1/health").await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(json["data"]["status"], "degraded");
    }
}
