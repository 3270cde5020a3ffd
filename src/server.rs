use std::sync::Arc;
use std::time::Duration;

use axum::{
    Router,
    extract::{DefaultBodyLimit, Request},
    http::StatusCode,
    middleware::Next,
    response::IntoResponse,
};
use tokio::task::JoinHandle;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::AppState;
use crate::api;
use crate::config::AppConfig;
use crate::session::SessionStore;

/// Guesses are single words; anything bigger is not a guess.
const MAX_BODY_BYTES: usize = 16 * 1024;

/// Start the Axum server with the provided configuration.
pub async fn start_server(config: Arc<AppConfig>) -> anyhow::Result<()> {
    info!(
        name: "services.config.loaded",
        word_source = %config.services.word_source_url,
        similarity = %config.services.similarity_url,
        timeout_secs = config.services.request_timeout_secs,
        "Service configuration loaded"
    );

    let sessions = SessionStore::new();
    let state = AppState::from_config(&config, sessions.clone())?;

    let sweeper = spawn_session_sweeper(
        sessions,
        config.session.ttl(),
        config.session.cleanup_interval(),
    );

    let app = build_app(state, config.server.request_timeout());

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    info!(
        name: "server.started",
        address = %addr,
        "Server started"
    );

    let served = axum::serve(listener, app.into_make_service()).await;
    sweeper.abort();
    served?;
    Ok(())
}

/// Game routes wrapped with tracing, body limit and request timeout.
pub fn build_app(state: AppState, request_timeout: Duration) -> Router {
    api::router(state).layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
            .layer(axum::middleware::from_fn(
                move |req: Request, next: Next| async move {
                    match tokio::time::timeout(request_timeout, next.run(req)).await {
                        Ok(res) => res,
                        Err(_) => {
                            tracing::warn!(
                                timeout_secs = request_timeout.as_secs(),
                                "Request timed out"
                            );
                            (StatusCode::REQUEST_TIMEOUT, "Request timed out").into_response()
                        }
                    }
                },
            )),
    )
}

/// Periodically evict sessions idle for longer than `ttl`.
pub fn spawn_session_sweeper(
    sessions: SessionStore,
    ttl: Duration,
    every: Duration,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(every);
        // The first tick completes immediately.
        ticker.tick().await;
        loop {
            ticker.tick().await;
            let removed = sessions.cleanup_expired(ttl);
            if removed > 0 {
                info!(
                    name: "session.evicted",
                    removed = removed,
                    remaining = sessions.len(),
                    "Evicted idle sessions"
                );
            }
        }
    })
}
