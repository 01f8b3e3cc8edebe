//! Error types for flashcard-core.

use thiserror::Error;

/// Result type alias using DeckError.
pub type Result<T> = std::result::Result<T, DeckError>;

/// Errors raised by deck operations.
///
/// Both variants are contract violations on the caller's side: a deck with
/// no pages cannot be drawn from, and a page index must stay below the
/// document's page count.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DeckError {
    #[error("deck has no pages to draw from")]
    EmptyDeck,

    #[error("page index {index} out of range (document has {total} pages)")]
    IndexOutOfRange { index: usize, total: usize },
}

/// Check that `index` addresses a page of a `total`-page document.
pub fn check_index(index: usize, total: usize) -> Result<()> {
    if index < total {
        Ok(())
    } else {
        Err(DeckError::IndexOutOfRange { index, total })
    }
}
