//! Semantic word-guessing game server.
//!
//! Each player gets a secret word. Guesses are scored by an external
//! word-embedding service and the running history is rendered as HTML.
//!
//! # Architecture
//!
//! - **Server**: Axum HTTP server with a single game route
//! - **Sessions**: in-memory store keyed by a signed cookie, with idle eviction
//! - **Services**: HTTP clients for the random word and similarity providers
//! - **Rendering**: minijinja templates with HTML auto-escaping
//!
//! # Modules
//!
//! - [`api`]: HTTP handlers
//! - [`config`]: layered configuration
//! - [`game`]: session resolution, guess processing, score presentation
//! - [`render`]: HTML page rendering
//! - [`services`]: outbound collaborators
//! - [`session`]: session state and storage

// Allow pedantic clippy warnings that don't add value for this codebase
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::missing_fields_in_debug)]
#![allow(clippy::unused_async)]

pub mod api;
pub mod config;
pub mod error;
pub mod game;
pub mod render;
pub mod server;
pub mod services;
pub mod session;

use std::sync::Arc;

use axum::extract::FromRef;
use axum_extra::extract::cookie::Key;

use crate::config::AppConfig;
use crate::render::PageRenderer;
use crate::services::{HttpSimilarityScorer, HttpWordSource, SimilarityScorer, WordSource};
use crate::session::SessionStore;

/// Application state shared across all handlers.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Live game sessions.
    pub sessions: SessionStore,
    /// Secret word provider.
    pub words: Arc<dyn WordSource>,
    /// Similarity provider.
    pub scorer: Arc<dyn SimilarityScorer>,
    /// Game page renderer.
    pub renderer: Arc<PageRenderer>,
    /// Name of the session cookie.
    pub cookie_name: Arc<str>,
    /// Signing key for the session cookie.
    pub cookie_key: Key,
}

impl FromRef<AppState> for Key {
    fn from_ref(state: &AppState) -> Self {
        state.cookie_key.clone()
    }
}

impl AppState {
    /// Assemble state from explicit collaborators.
    pub fn new(
        sessions: SessionStore,
        words: Arc<dyn WordSource>,
        scorer: Arc<dyn SimilarityScorer>,
        cookie_name: &str,
        cookie_key: Key,
    ) -> Result<Self, minijinja::Error> {
        Ok(Self {
            sessions,
            words,
            scorer,
            renderer: Arc::new(PageRenderer::new()?),
            cookie_name: Arc::from(cookie_name),
            cookie_key,
        })
    }

    /// Build state with HTTP collaborators described by `config`.
    pub fn from_config(config: &AppConfig, sessions: SessionStore) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.services.request_timeout())
            .build()?;

        let words: Arc<dyn WordSource> = Arc::new(HttpWordSource::new(
            client.clone(),
            &config.services.word_source_url,
        ));
        let scorer: Arc<dyn SimilarityScorer> = Arc::new(HttpSimilarityScorer::new(
            client,
            &config.services.similarity_url,
        ));

        let key = cookie_key(config.session.cookie_secret.as_deref());
        Ok(Self::new(
            sessions,
            words,
            scorer,
            &config.session.cookie_name,
            key,
        )?)
    }
}

/// Signing key from the configured secret, or a random one.
///
/// A random key invalidates every cookie on restart, which is harmless
/// since sessions do not survive a restart either.
pub fn cookie_key(secret: Option<&str>) -> Key {
    match secret.map(|s| Key::try_from(s.as_bytes())) {
        Some(Ok(key)) => key,
        Some(Err(e)) => {
            tracing::warn!(error = %e, "Cookie secret rejected, generating a random key");
            Key::generate()
        }
        None => {
            tracing::warn!("No cookie secret configured, generating a random key");
            Key::generate()
        }
    }
}
