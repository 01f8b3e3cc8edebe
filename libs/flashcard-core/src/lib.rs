//! Core flashcard library for split-page PDF decks.
//!
//! Provides:
//! - Deck state machine (shuffle-without-repeat draws, reveal toggle)
//! - Render settings with bounded resolution
//! - Shared types (CardSide, Progress, etc.)

pub mod deck;
pub mod error;
pub mod types;

pub use deck::DeckState;
pub use error::{check_index, DeckError, Result};
pub use types::{page_label, CardSide, DpiBounds, Progress, RenderSettings};
