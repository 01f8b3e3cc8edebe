//! Session documents and API types

use std::fmt;

use axum::body::Bytes;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use uuid::Uuid;

// Re-export shared types from flashcard-core
pub use flashcard_core::types::{CardSide, DpiBounds, Progress, RenderSettings};

/// Content identity of an uploaded document (SHA-256, hex).
///
/// Identical uploads share an identity and therefore share cached renders.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DocumentId(String);

impl DocumentId {
    /// Hash document bytes into an identity.
    pub fn from_bytes(bytes: &[u8]) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(bytes);
        Self(format!("{:x}", hasher.finalize()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// An uploaded PDF held for the lifetime of a session.
#[derive(Debug, Clone)]
pub struct Document {
    pub id: DocumentId,
    pub file_name: String,
    pub bytes: Bytes,
    pub page_count: usize,
}

impl Document {
    pub fn info(&self) -> DocumentInfo {
        DocumentInfo {
            id: self.id.clone(),
            file_name: self.file_name.clone(),
            page_count: self.page_count,
        }
    }
}

/// PDF magic header.
pub const PDF_MAGIC: &[u8] = b"%PDF-";

/// Cheap check before handing bytes to the renderer.
pub fn looks_like_pdf(bytes: &[u8]) -> bool {
    bytes.starts_with(PDF_MAGIC)
}

// === API Types ===

#[derive(Debug, Serialize, Deserialize)]
pub struct CreateSessionResponse {
    pub session_id: Uuid,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentInfo {
    pub id: DocumentId,
    pub file_name: String,
    pub page_count: usize,
}

/// Everything the page needs to draw the current card.
#[derive(Debug, Serialize, Deserialize)]
pub struct DeckView {
    pub document: Option<DocumentInfo>,
    /// 0-based index of the page on screen.
    pub current_page: Option<usize>,
    /// "Page 3 / 10"; omitted when page numbers are turned off.
    pub page_label: Option<String>,
    pub reveal: bool,
    /// Only reported in no-repeat mode.
    pub progress: Option<Progress>,
    pub settings: RenderSettings,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct RevealRequest {
    pub reveal: Option<bool>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SettingsResponse {
    pub settings: RenderSettings,
    pub dpi_bounds: DpiBounds,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct UpdateSettingsRequest {
    pub dpi: Option<u32>,
    pub show_page_number: Option<bool>,
    pub keep_answer_visible: Option<bool>,
    pub no_repeat: Option<bool>,
}
