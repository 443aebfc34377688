use axum::{
    body::Bytes,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::Value;
use tower_http::trace::TraceLayer;
use zerog_core::delegate::{Delegated, Delegator};
use zerog_core::domain::request::ForecastBody;

pub const SOURCE_HEADER: &str = "x-forecast-source";

#[derive(Clone)]
pub struct AppState {
    pub delegator: Delegator,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/healthz", get(healthz))
        .route("/api/proxy/growth", post(proxy_growth))
        .route("/api/proxy/jobs", post(proxy_jobs))
        .route("/api/proxy/sentiment", post(proxy_sentiment))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

async fn healthz() -> &'static str {
    "ok"
}

// Bodies are taken as raw bytes: a malformed body still gets a forecast.
async fn proxy_growth(State(state): State<AppState>, body: Bytes) -> Response {
    let body = ForecastBody::from_slice(&body);
    respond(state.delegator.growth(&body).await)
}

async fn proxy_jobs(State(state): State<AppState>, body: Bytes) -> Response {
    let body = ForecastBody::from_slice(&body);
    respond(state.delegator.jobs(&body).await)
}

async fn proxy_sentiment(State(state): State<AppState>, body: Bytes) -> Response {
    let body = ForecastBody::from_slice(&body);
    respond(state.delegator.sentiment(&body).await)
}

fn respond<T: serde::Serialize>(delegated: Delegated<T>) -> Response {
    let source = delegated.source();
    match delegated.into_json() {
        Ok(json) => ([(SOURCE_HEADER, source.as_str())], Json::<Value>(json)).into_response(),
        Err(e) => {
            sentry_anyhow::capture_anyhow(&e);
            tracing::error!(error = %e, "failed to serialize forecast");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use serde_json::json;
    use std::sync::Arc;
    use std::time::Duration;
    use tower::ServiceExt;
    use zerog_core::domain::forecast::{GrowthResponse, JobsResponse, SentimentResponse};
    use zerog_core::forecast::FallbackProfile;
    use zerog_core::upstream::HttpForecastService;

    async fn post_json(
        app: Router,
        uri: &str,
        body: impl Into<Body>,
    ) -> (StatusCode, String, Value) {
        let res = app
            .oneshot(
                Request::post(uri)
                    .header("content-type", "application/json")
                    .body(body.into())
                    .unwrap(),
            )
            .await
            .unwrap();
        let status = res.status();
        let source = res
            .headers()
            .get(SOURCE_HEADER)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string();
        let bytes = axum::body::to_bytes(res.into_body(), usize::MAX).await.unwrap();
        let json = serde_json::from_slice(&bytes).unwrap();
        (status, source, json)
    }

    /// Spawns a fake ML service answering every capability with `status` and `body`.
    async fn fake_ml_service(status: StatusCode, body: Value) -> String {
        let reply = move || {
            let body = body.clone();
            async move { (status, Json(body)) }
        };
        let app = Router::new()
            .route("/forecast/growth", post(reply.clone()))
            .route("/jobs", post(reply.clone()))
            .route("/sentiment", post(reply));
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });
        format!("http://{addr}")
    }

    /// Spawns a fake ML service whose `/jobs` handler answers only after `delay`.
    async fn slow_ml_service(delay: Duration) -> String {
        let app = Router::new().route(
            "/jobs",
            post(move || async move {
                tokio::time::sleep(delay).await;
                Json(json!({"items": [], "geo": []}))
            }),
        );
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });
        format!("http://{addr}")
    }

    fn app_with_upstream(base_url: &str) -> Router {
        app_with_timeout(base_url, Duration::from_secs(5))
    }

    fn app_with_timeout(base_url: &str, timeout: Duration) -> Router {
        let svc = HttpForecastService::new(base_url, timeout).unwrap();
        router(AppState {
            delegator: Delegator::new(Arc::new(svc), FallbackProfile::default()),
        })
    }

    fn fallback_app() -> Router {
        router(AppState {
            delegator: Delegator::fallback_only(FallbackProfile::default()),
        })
    }

    #[tokio::test]
    async fn healthz_is_ok() {
        let res = fallback_app()
            .oneshot(Request::get("/healthz").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn growth_fallback_example() {
        let body = json!({"industry_ids": ["manufacturing", "space_vehicles"], "horizon_years": 3});
        let (status, source, json) =
            post_json(fallback_app(), "/api/proxy/growth", body.to_string()).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(source, "fallback");

        let parsed: GrowthResponse = serde_json::from_value(json).unwrap();
        assert_eq!(parsed.items.len(), 2);
        assert_eq!(parsed.items[1].years, vec![2024, 2025, 2026]);
    }

    #[tokio::test]
    async fn malformed_body_still_renders() {
        let (status, source, json) =
            post_json(fallback_app(), "/api/proxy/jobs", "{not json").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(source, "fallback");
        let parsed: JobsResponse = serde_json::from_value(json).unwrap();
        assert_eq!(parsed.items.len(), 5);
        assert!(parsed.geo.iter().all(|r| r.employment_total >= 1));
    }

    #[tokio::test]
    async fn upstream_500_is_served_by_fallback_with_the_same_schema() {
        let base =
            fake_ml_service(StatusCode::INTERNAL_SERVER_ERROR, json!({"detail": "boom"})).await;
        let app = app_with_upstream(&base);
        let body = json!({"industry_ids": ["manufacturing"], "window": "quarterly", "lag_max": 4});

        let (status, source, json) =
            post_json(app.clone(), "/api/proxy/sentiment", body.to_string()).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(source, "fallback");
        let parsed: SentimentResponse = serde_json::from_value(json).unwrap();
        assert_eq!(parsed.items.len(), 8);
        assert_eq!(parsed.correlations["manufacturing"].best_lag, 2);

        let (_, source, json) = post_json(app, "/api/proxy/growth", body.to_string()).await;
        assert_eq!(source, "fallback");
        assert!(serde_json::from_value::<GrowthResponse>(json).is_ok());
    }

    #[tokio::test]
    async fn upstream_success_passes_through() {
        let upstream = json!({
            "items": [{
                "industry_id": "manufacturing",
                "year": 2024,
                "employment_direct": 1,
                "employment_indirect": 2,
                "employment_induced": 3,
                "employment_total": 6
            }],
            "geo": [{"state": "CA", "industry_id": "manufacturing", "year": 2024, "employment_total": 6}]
        });
        let base = fake_ml_service(StatusCode::OK, upstream.clone()).await;

        let (status, source, json) = post_json(
            app_with_upstream(&base),
            "/api/proxy/jobs",
            json!({"industry_ids": ["manufacturing"]}).to_string(),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(source, "upstream");
        assert_eq!(json, upstream);
    }

    #[tokio::test]
    async fn upstream_timeout_is_served_by_fallback() {
        let base = slow_ml_service(Duration::from_secs(3)).await;
        let app = app_with_timeout(&base, Duration::from_millis(300));

        let (status, source, json) = post_json(
            app,
            "/api/proxy/jobs",
            json!({"industry_ids": ["manufacturing"]}).to_string(),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(source, "fallback");
        let parsed: JobsResponse = serde_json::from_value(json).unwrap();
        assert_eq!(parsed.items.len(), 5);
        assert_eq!(parsed.geo.len(), 5 * 48);
    }
}
