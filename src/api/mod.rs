//! HTTP routes.
//!
//! The game lives on a single path: `GET /` renders the HTML page, `POST /`
//! answers JSON. Any other method gets a 405 page without touching the
//! session store.

mod guess;

use axum::{Router, routing::get};

use crate::AppState;

pub use guess::{GuessQuery, GuessResponse};

/// Build the game router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route(
            "/",
            get(guess::guess_page)
                .post(guess::guess_json)
                .fallback(guess::method_not_allowed),
        )
        .route("/healthz", get(healthz))
        .with_state(state)
}

async fn healthz() -> &'static str {
    "ok"
}
