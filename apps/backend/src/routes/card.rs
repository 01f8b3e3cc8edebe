//! Card image endpoints

use axum::{
    extract::{Path, State},
    http::header::{CACHE_CONTROL, CONTENT_TYPE},
    response::{IntoResponse, Response},
    Extension,
};

use crate::error::{ApiError, Result};
use crate::models::CardSide;
use crate::routes::session::ActiveSession;
use crate::AppState;

/// GET /api/card/:side
/// PNG of one half of the current card; the answer half requires reveal
pub async fn image(
    State(state): State<AppState>,
    Extension(active): Extension<ActiveSession>,
    Path(side): Path<String>,
) -> Result<Response> {
    let side = CardSide::from_str(&side)
        .ok_or_else(|| ApiError::NotFound(format!("Unknown card side '{}'", side)))?;

    // Copy what the render needs so the session is not locked while pdfium runs.
    let (document, page_index, dpi) = {
        let session = active.handle.lock().await;
        let document = session.document()?.clone();
        let page_index = session.current_card()?;
        if side.is_answer() && !session.deck.reveal() {
            return Err(ApiError::AnswerHidden);
        }
        (document, page_index, session.settings.dpi)
    };

    let halves = state.cache.get_or_render(&document, page_index, dpi).await?;
    let png = match side {
        CardSide::Left => halves.left.clone(),
        CardSide::Right => halves.right.clone(),
    };

    Ok((
        [(CONTENT_TYPE, "image/png"), (CACHE_CONTROL, "no-store")],
        png,
    )
        .into_response())
}
