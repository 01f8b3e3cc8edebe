//! In-memory browsing sessions.
//!
//! Each session owns its document, deck and settings. Handlers lock one
//! session at a time, so interactions within a session are serialized while
//! separate sessions proceed independently. Nothing survives a restart.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use flashcard_core::{check_index, page_label, DeckState, DpiBounds, RenderSettings};
use tokio::sync::{Mutex, RwLock};
use uuid::Uuid;

use crate::error::{ApiError, Result};
use crate::models::{DeckView, Document};

/// State for one browser session.
#[derive(Debug)]
pub struct Session {
    pub id: Uuid,
    pub document: Option<Document>,
    pub deck: DeckState,
    pub settings: RenderSettings,
    pub created_at: DateTime<Utc>,
    pub last_seen_at: DateTime<Utc>,
}

impl Session {
    pub fn new(id: Uuid, settings: RenderSettings) -> Self {
        let now = Utc::now();
        Self {
            id,
            document: None,
            deck: DeckState::new(),
            settings,
            created_at: now,
            last_seen_at: now,
        }
    }

    /// The active document, or `NoDocument` before the first upload.
    pub fn document(&self) -> Result<&Document> {
        self.document.as_ref().ok_or(ApiError::NoDocument)
    }

    fn total_pages(&self) -> Result<usize> {
        Ok(self.document()?.page_count)
    }

    /// Replace the document; the old deck order no longer applies.
    pub fn replace_document(&mut self, document: Document) {
        self.deck.forget_document();
        self.document = Some(document);
    }

    /// Drop the document after a failed upload; nothing is playable until
    /// the next good one.
    pub fn clear_document(&mut self) {
        self.deck.forget_document();
        self.document = None;
    }

    /// Draw the next card according to the session settings.
    pub fn advance(&mut self) -> Result<usize> {
        let total = self.total_pages()?;
        let index = self.deck.on_advance(
            total,
            self.settings.keep_answer_visible,
            self.settings.no_repeat,
        )?;
        Ok(index)
    }

    /// Reshuffle and show the first card of the new cycle.
    pub fn reset(&mut self) -> Result<usize> {
        let total = self.total_pages()?;
        let index = self.deck.reset_deck(total, self.settings.no_repeat)?;
        Ok(index)
    }

    /// Page index on screen, checked against the active document.
    pub fn current_card(&self) -> Result<usize> {
        let total = self.total_pages()?;
        if total == 0 {
            return Err(ApiError::EmptyDeck);
        }
        let index = self
            .deck
            .current()
            .ok_or_else(|| ApiError::NotFound("No card drawn yet".to_string()))?;
        check_index(index, total)?;
        Ok(index)
    }

    pub fn set_reveal(&mut self, value: bool) {
        self.deck.set_reveal(value);
    }

    /// Snapshot of what the page should display.
    pub fn view(&self) -> DeckView {
        let total = self.document.as_ref().map(|d| d.page_count);
        let current_page = self.deck.current();

        let page_label = match (self.settings.show_page_number, current_page, total) {
            (true, Some(index), Some(total)) => Some(page_label(index, total)),
            _ => None,
        };
        let progress = match (self.settings.no_repeat, total) {
            (true, Some(total)) => Some(self.deck.progress(total)),
            _ => None,
        };

        DeckView {
            document: self.document.as_ref().map(Document::info),
            current_page,
            page_label,
            reveal: self.deck.reveal(),
            progress,
            settings: self.settings,
        }
    }
}

pub type SessionHandle = Arc<Mutex<Session>>;

/// All live sessions.
pub struct SessionStore {
    sessions: RwLock<HashMap<Uuid, SessionHandle>>,
    ttl: Duration,
    defaults: RenderSettings,
}

impl SessionStore {
    pub fn new(ttl: Duration, dpi: &DpiBounds) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            ttl,
            defaults: RenderSettings::with_bounds(dpi),
        }
    }

    /// Start a session with default settings, dropping idle ones first.
    pub async fn create(&self) -> Uuid {
        let purged = self.purge_idle(Utc::now()).await;
        if purged > 0 {
            tracing::info!("Dropped {} idle sessions", purged);
        }

        let id = Uuid::new_v4();
        let session = Session::new(id, self.defaults);
        self.sessions
            .write()
            .await
            .insert(id, Arc::new(Mutex::new(session)));
        tracing::debug!("{} live sessions", self.len().await);
        id
    }

    pub async fn get(&self, id: Uuid) -> Option<SessionHandle> {
        self.sessions.read().await.get(&id).cloned()
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    /// Remove sessions not seen within the TTL. Returns how many were removed.
    pub async fn purge_idle(&self, now: DateTime<Utc>) -> usize {
        let ttl = match chrono::Duration::from_std(self.ttl) {
            Ok(ttl) => ttl,
            Err(_) => return 0,
        };

        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|id, handle| match handle.try_lock() {
            Ok(session) if now - session.last_seen_at > ttl => {
                tracing::debug!(
                    "Session {} expired after {} minutes",
                    id,
                    (now - session.created_at).num_minutes()
                );
                false
            }
            // Busy sessions are in use right now.
            _ => true,
        });
        before - sessions.len()
    }
}
