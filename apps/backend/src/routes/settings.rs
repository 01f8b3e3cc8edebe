//! Settings endpoints

use axum::{extract::State, Extension, Json};

use crate::error::Result;
use crate::models::{SettingsResponse, UpdateSettingsRequest};
use crate::routes::session::ActiveSession;
use crate::AppState;

/// GET /api/settings
pub async fn get(
    State(state): State<AppState>,
    Extension(active): Extension<ActiveSession>,
) -> Result<Json<SettingsResponse>> {
    let session = active.handle.lock().await;

    Ok(Json(SettingsResponse {
        settings: session.settings,
        dpi_bounds: state.config.dpi,
    }))
}

/// PUT /api/settings
/// Partial update; omitted fields keep their current value
pub async fn update(
    State(state): State<AppState>,
    Extension(active): Extension<ActiveSession>,
    Json(request): Json<UpdateSettingsRequest>,
) -> Result<Json<SettingsResponse>> {
    let bounds = state.config.dpi;
    let mut session = active.handle.lock().await;
    let current = &mut session.settings;

    // Apply updates
    if let Some(dpi) = request.dpi {
        current.dpi = bounds.clamp(dpi);
    }
    if let Some(show_page_number) = request.show_page_number {
        current.show_page_number = show_page_number;
    }
    if let Some(keep_answer_visible) = request.keep_answer_visible {
        current.keep_answer_visible = keep_answer_visible;
    }
    if let Some(no_repeat) = request.no_repeat {
        current.no_repeat = no_repeat;
    }

    Ok(Json(SettingsResponse {
        settings: session.settings,
        dpi_bounds: bounds,
    }))
}
