//! Study endpoints: current card, next, reveal, reset

use axum::{extract::rejection::JsonRejection, Extension, Json};

use crate::error::{ApiError, Result};
use crate::models::{DeckView, RevealRequest};
use crate::routes::session::ActiveSession;

/// GET /api/deck
pub async fn view(Extension(active): Extension<ActiveSession>) -> Result<Json<DeckView>> {
    let session = active.handle.lock().await;
    Ok(Json(session.view()))
}

/// POST /api/deck/next
pub async fn next(Extension(active): Extension<ActiveSession>) -> Result<Json<DeckView>> {
    let mut session = active.handle.lock().await;
    let index = session.advance()?;

    tracing::debug!(
        "Session {} drew page {} ({} left in cycle)",
        active.id,
        index + 1,
        session.deck.remaining()
    );

    Ok(Json(session.view()))
}

/// POST /api/deck/reveal
/// Body is optional; a request without a JSON body reveals the answer
pub async fn reveal(
    Extension(active): Extension<ActiveSession>,
    payload: std::result::Result<Json<RevealRequest>, JsonRejection>,
) -> Result<Json<DeckView>> {
    let value = match payload {
        Ok(Json(request)) => request.reveal.unwrap_or(true),
        Err(JsonRejection::MissingJsonContentType(_)) => true,
        Err(rejection) => return Err(ApiError::BadRequest(rejection.body_text())),
    };

    let mut session = active.handle.lock().await;
    session.current_card()?;
    session.set_reveal(value);

    Ok(Json(session.view()))
}

/// POST /api/deck/reset
pub async fn reset(Extension(active): Extension<ActiveSession>) -> Result<Json<DeckView>> {
    let mut session = active.handle.lock().await;
    session.reset()?;

    tracing::info!("Session {} reshuffled its deck", active.id);

    Ok(Json(session.view()))
}
