//! Guess handlers.

use axum::{
    Json,
    body::Bytes,
    extract::{Query, State},
    http::{HeaderMap, HeaderValue, Method, StatusCode, header},
    response::{Html, IntoResponse, Response},
};
use axum_extra::extract::cookie::{Cookie, SameSite, SignedCookieJar};
use serde::{Deserialize, Serialize};

use crate::AppState;
use crate::error::{GameError, Result};
use crate::game::{ScoreBand, present, process_guess, resolve_session};
use crate::render::PageView;
use crate::session::{GuessRecord, Session};

/// Query string of `GET /`.
#[derive(Debug, Deserialize)]
pub struct GuessQuery {
    /// The guess.
    #[serde(default)]
    pub text: Option<String>,
    /// Presence-only flag revealing the category.
    #[serde(default)]
    pub hint: Option<String>,
}

/// JSON body of `POST /`.
#[derive(Debug, Deserialize)]
struct JsonGuess {
    #[serde(default)]
    text: Option<String>,
    /// Presence-only, like the form field. Only `null` and `false` mean no hint.
    #[serde(default)]
    hint: Option<serde_json::Value>,
}

/// Guess extracted from a POST body, whatever its encoding.
#[derive(Debug)]
struct PostedGuess {
    text: Option<String>,
    hint: bool,
}

/// Response of `POST /`.
#[derive(Debug, Serialize)]
pub struct GuessResponse {
    pub guess: String,
    pub score: f64,
    pub message: String,
    pub band: ScoreBand,
    pub width_percent: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    /// Best guess first.
    pub history: Vec<GuessRecord>,
    /// RFC3339 creation time of the session.
    pub started_at: String,
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
}

/// GET / - Score a guess and render the game page.
pub(super) async fn guess_page(
    State(state): State<AppState>,
    jar: SignedCookieJar,
    Query(query): Query<GuessQuery>,
) -> Response {
    let hint = query.hint.is_some();
    let guess = query
        .text
        .as_deref()
        .map(str::trim)
        .filter(|g| !g.is_empty());

    let session = match lookup_session(&state, &jar).await {
        Ok(session) => session,
        Err(err) => {
            log_failure(&err);
            let message = err.to_string();
            let view = PageView {
                guess,
                error: Some(&message),
                hint,
                ..PageView::default()
            };
            return render_page(&state, err.status_code(), &view);
        }
    };
    let jar = jar.add(session_cookie(&state.cookie_name, session.id()));

    let (status, score, error) =
        match process_guess(&session, state.scorer.as_ref(), query.text.as_deref()).await {
            Ok(record) => (StatusCode::OK, Some(record.score), None),
            Err(err) => {
                log_failure(&err);
                (err.status_code(), None, Some(err.to_string()))
            }
        };

    let history = session.history();
    let view = PageView {
        guess,
        score,
        error: error.as_deref(),
        hint,
        category: session.category(),
        history: &history,
    };
    (jar, render_page(&state, status, &view)).into_response()
}

/// POST / - Score a guess sent as JSON or form data, answer JSON.
pub(super) async fn guess_json(
    State(state): State<AppState>,
    jar: SignedCookieJar,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let posted = match parse_body(&headers, &body) {
        Ok(posted) => posted,
        Err(err) => return json_error(&err),
    };
    let Some(text) = posted.text else {
        return json_error(&GameError::MissingField("text"));
    };

    let session = match lookup_session(&state, &jar).await {
        Ok(session) => session,
        Err(err) => return json_error(&err),
    };
    let jar = jar.add(session_cookie(&state.cookie_name, session.id()));

    match process_guess(&session, state.scorer.as_ref(), Some(text.as_str())).await {
        Ok(record) => {
            let display = present(record.score);
            let response = GuessResponse {
                message: display.band.message(&record.guess),
                band: display.band,
                width_percent: display.width_percent,
                category: posted.hint.then(|| session.category().to_string()),
                history: session.history(),
                started_at: session.created_at().to_rfc3339(),
                guess: record.guess,
                score: record.score,
            };
            (jar, Json(response)).into_response()
        }
        Err(err) => (jar, json_error(&err)).into_response(),
    }
}

/// Any other method on `/`. The session store is never consulted.
pub(super) async fn method_not_allowed(State(state): State<AppState>, method: Method) -> Response {
    let err = GameError::UnsupportedMethod(method);
    log_failure(&err);
    let message = err.to_string();
    let view = PageView {
        error: Some(&message),
        ..PageView::default()
    };
    let mut response = render_page(&state, err.status_code(), &view);
    response
        .headers_mut()
        .insert(header::ALLOW, HeaderValue::from_static("GET, HEAD, POST"));
    response
}

// ─────────────────────────────────────────────────────────────────────────────
// Helpers
// ─────────────────────────────────────────────────────────────────────────────

async fn lookup_session(state: &AppState, jar: &SignedCookieJar) -> Result<Session> {
    let token = jar.get(&state.cookie_name).map(|c| c.value().to_owned());
    resolve_session(&state.sessions, state.words.as_ref(), token.as_deref()).await
}

fn session_cookie(name: &str, id: &str) -> Cookie<'static> {
    Cookie::build((name.to_owned(), id.to_owned()))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .build()
}

fn parse_body(headers: &HeaderMap, body: &[u8]) -> Result<PostedGuess> {
    let content_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();
    let mime = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();

    match mime.as_str() {
        "application/json" => {
            let dto: JsonGuess = serde_json::from_slice(body)
                .map_err(|e| GameError::InvalidInput(format!("Malformed JSON body: {e}")))?;
            Ok(PostedGuess {
                text: dto.text,
                hint: !matches!(dto.hint, None | Some(serde_json::Value::Bool(false))),
            })
        }
        "application/x-www-form-urlencoded" => {
            let mut posted = PostedGuess {
                text: None,
                hint: false,
            };
            for (key, value) in url::form_urlencoded::parse(body) {
                match key.as_ref() {
                    "text" => posted.text = Some(value.into_owned()),
                    "hint" => posted.hint = true,
                    _ => {}
                }
            }
            Ok(posted)
        }
        "" => Err(GameError::UnsupportedContentType("none".to_string())),
        other => Err(GameError::UnsupportedContentType(other.to_string())),
    }
}

fn render_page(state: &AppState, status: StatusCode, view: &PageView<'_>) -> Response {
    match state.renderer.render(view) {
        Ok(body) => (status, Html(body)).into_response(),
        Err(e) => {
            let err = GameError::from(e);
            log_failure(&err);
            (err.status_code(), "Internal server error").into_response()
        }
    }
}

fn json_error(err: &GameError) -> Response {
    log_failure(err);
    (
        err.status_code(),
        Json(ErrorResponse {
            error: err.to_string(),
        }),
    )
        .into_response()
}

fn log_failure(err: &GameError) {
    match err {
        GameError::Service(_) | GameError::Render(_) => {
            tracing::error!(error = %err, status = %err.status_code(), "Guess request failed");
        }
        _ => tracing::info!(error = %err, status = %err.status_code(), "Guess rejected"),
    }
}
