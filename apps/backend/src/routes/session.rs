//! Session creation and session-resolving middleware

use axum::{
    body::Body,
    extract::{Request, State},
    http::{
        header::{HeaderName, COOKIE, SET_COOKIE},
        HeaderMap,
    },
    middleware::Next,
    response::Response,
    Json,
};
use chrono::Utc;
use uuid::Uuid;

use crate::error::{ApiError, Result};
use crate::models::CreateSessionResponse;
use crate::services::sessions::SessionHandle;
use crate::AppState;

/// Cookie carrying the session id for plain browser requests (e.g. `<img>`).
pub const SESSION_COOKIE: &str = "split_deck_session";

/// Header carrying the session id for API clients.
pub const SESSION_HEADER: &str = "x-session-id";

/// Resolved session stored in request extensions
#[derive(Clone)]
pub struct ActiveSession {
    pub id: Uuid,
    pub handle: SessionHandle,
}

/// POST /api/session
/// Creates a new session and sets the session cookie
pub async fn create(
    State(state): State<AppState>,
) -> Result<([(HeaderName, String); 1], Json<CreateSessionResponse>)> {
    let session_id = state.sessions.create().await;

    tracing::info!("Created session: {}", session_id);

    let cookie = format!(
        "{}={}; Path=/; HttpOnly; SameSite=Lax",
        SESSION_COOKIE, session_id
    );

    Ok(([(SET_COOKIE, cookie)], Json(CreateSessionResponse { session_id })))
}

/// Session middleware - resolves the session from header or cookie
pub async fn session_middleware(
    State(state): State<AppState>,
    mut request: Request<Body>,
    next: Next,
) -> Result<Response> {
    let raw = session_token(request.headers())
        .ok_or_else(|| ApiError::Unauthorized("Missing session".to_string()))?;

    let id = Uuid::parse_str(raw.trim())
        .map_err(|_| ApiError::Unauthorized("Malformed session id".to_string()))?;

    let handle = state
        .sessions
        .get(id)
        .await
        .ok_or_else(|| ApiError::Unauthorized("Unknown or expired session".to_string()))?;

    // Update last_seen
    handle.lock().await.last_seen_at = Utc::now();

    request
        .extensions_mut()
        .insert(ActiveSession { id, handle });

    Ok(next.run(request).await)
}

/// Session id from the `X-Session-Id` header, falling back to the cookie.
pub fn session_token(headers: &HeaderMap) -> Option<String> {
    if let Some(value) = headers.get(SESSION_HEADER).and_then(|h| h.to_str().ok()) {
        return Some(value.to_string());
    }

    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|h| h.to_str().ok())
        .flat_map(|h| h.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == SESSION_COOKIE)
        .map(|(_, value)| value.to_string())
}
