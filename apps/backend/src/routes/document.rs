//! Document upload endpoint

use axum::{
    body::Bytes,
    extract::{Multipart, State},
    Extension, Json,
};

use crate::error::{ApiError, Result};
use crate::models::{looks_like_pdf, DeckView, Document, DocumentId};
use crate::routes::session::ActiveSession;
use crate::AppState;

/// POST /api/document
/// Accepts a multipart PDF upload (field `file` or `pdf`) and draws the first card
pub async fn upload(
    State(state): State<AppState>,
    Extension(active): Extension<ActiveSession>,
    mut multipart: Multipart,
) -> Result<Json<DeckView>> {
    let mut upload = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadRequest(format!("Failed to read upload: {}", e)))?
    {
        let name = field.name().unwrap_or("").to_string();
        if name != "file" && name != "pdf" {
            tracing::debug!("Ignoring multipart field '{}'", name);
            continue;
        }

        let file_name = field
            .file_name()
            .map(|s| s.to_string())
            .unwrap_or_else(|| "document.pdf".to_string());

        let data = field
            .bytes()
            .await
            .map_err(|e| ApiError::BadRequest(format!("Failed to read file data: {}", e)))?;

        upload = Some((file_name, data));
        break;
    }

    let (file_name, bytes) =
        upload.ok_or_else(|| ApiError::BadRequest("Missing 'file' field".to_string()))?;

    let document = match read_document(&state, file_name, bytes).await {
        Ok(document) => document,
        Err(err @ ApiError::InvalidDocument(_)) => {
            // An unreadable upload replaces whatever was being studied.
            active.handle.lock().await.clear_document();
            tracing::warn!("Session {} upload rejected: {}", active.id, err);
            return Err(err);
        }
        Err(err) => return Err(err),
    };

    tracing::info!(
        "Session {} uploaded '{}' ({} bytes, {} pages)",
        active.id,
        document.file_name,
        document.bytes.len(),
        document.page_count
    );

    let mut session = active.handle.lock().await;
    session.replace_document(document);
    session.advance()?;

    Ok(Json(session.view()))
}

/// Validate an upload and count its pages.
async fn read_document(state: &AppState, file_name: String, bytes: Bytes) -> Result<Document> {
    if bytes.is_empty() {
        return Err(ApiError::InvalidDocument("empty upload".to_string()));
    }
    if !looks_like_pdf(&bytes) {
        return Err(ApiError::InvalidDocument(format!(
            "'{}' is not a PDF file",
            file_name
        )));
    }

    let id = DocumentId::from_bytes(&bytes);
    let page_count = state.cache.page_count(&id, bytes.clone()).await?;

    Ok(Document {
        id,
        file_name,
        bytes,
        page_count,
    })
}
