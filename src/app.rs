use std::{net::SocketAddr, sync::Arc};

use axum::{http::HeaderValue, middleware, routing::get, Json, Router};
use serde::Serialize;
use time::OffsetDateTime;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::warn;

use crate::{
    auth, exercise, food, meal_plans, mood,
    rate_limit::{self, RateLimiter},
    sleep,
    state::AppState,
};

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
    #[serde(with = "time::serde::rfc3339")]
    timestamp: OffsetDateTime,
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        timestamp: OffsetDateTime::now_utc(),
    })
}

pub fn build_app(state: AppState) -> Router {
    let mut api = Router::new()
        .nest("/auth", auth::router())
        .nest("/food-logs", food::router())
        .nest("/exercises", exercise::router())
        .nest("/sleep-logs", sleep::router())
        .nest("/mood-logs", mood::router())
        .nest("/meal-plans", meal_plans::router());

    if state.config.is_production() {
        let limiter = Arc::new(RateLimiter::new(&state.config.rate_limit));
        api = api.layer(middleware::from_fn_with_state(
            limiter,
            rate_limit::limit_requests,
        ));
    }

    let cors = match state.config.cors_origin.as_deref() {
        Some(origin) => match origin.parse::<HeaderValue>() {
            Ok(value) => CorsLayer::new()
                .allow_origin(value)
                .allow_methods(Any)
                .allow_headers(Any),
            Err(_) => {
                warn!(origin, "unparseable CORS_ORIGIN, falling back to permissive");
                CorsLayer::permissive()
            }
        },
        None => CorsLayer::permissive(),
    };

    Router::new()
        .route("/health", get(health))
        .nest("/api", api)
        .with_state(state)
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|req: &axum::http::Request<_>| {
                    let method = req.method().clone();
                    let uri = req.uri().clone();
                    tracing::info_span!("http_request", %method, uri = %uri)
                })
                .on_response(
                    |res: &axum::http::Response<_>,
                     _latency: std::time::Duration,
                     span: &tracing::Span| {
                        let status = res.status();
                        span.record("status", tracing::field::display(status));
                        if status.is_server_error() {
                            tracing::error!(%status, "response");
                        } else {
                            tracing::info!(%status, "response");
                        }
                    },
                ),
        )
}

pub async fn serve(app: Router, state: &AppState) -> anyhow::Result<()> {
    let addr: SocketAddr = format!("{}:{}", state.config.host, state.config.port).parse()?;

    tracing::info!("listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;
    Ok(())
}
