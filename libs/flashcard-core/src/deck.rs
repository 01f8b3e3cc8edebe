//! Deck state: shuffled draw order, position, current card and reveal flag.
//!
//! In no-repeat mode every page is drawn exactly once per cycle. Reaching the
//! end of the order silently starts a new, independently shuffled cycle, so
//! an exhausted deck is never observable from outside.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

use crate::error::{DeckError, Result};
use crate::types::Progress;

/// Session-scoped deck state, generic over its random source.
#[derive(Debug, Clone)]
pub struct DeckState<R = StdRng> {
    order: Option<Vec<usize>>,
    order_total: usize,
    position: usize,
    current: Option<usize>,
    reveal: bool,
    rng: R,
}

impl DeckState<StdRng> {
    /// Deck seeded from OS entropy.
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_entropy())
    }

    /// Deck with a deterministic random source.
    pub fn seeded(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }
}

impl Default for DeckState<StdRng> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Rng> DeckState<R> {
    /// Uninitialized deck drawing from `rng`.
    pub fn with_rng(rng: R) -> Self {
        Self {
            order: None,
            order_total: 0,
            position: 0,
            current: None,
            reveal: false,
            rng,
        }
    }

    /// Replace the order with a fresh permutation of `[0, total_pages)`.
    pub fn initialize_or_reshuffle(&mut self, total_pages: usize) {
        let mut order: Vec<usize> = (0..total_pages).collect();
        order.shuffle(&mut self.rng);
        self.order = Some(order);
        self.order_total = total_pages;
        self.position = 0;
    }

    /// Pick the next page index without touching the current card.
    pub fn draw_next(&mut self, total_pages: usize, no_repeat: bool) -> Result<usize> {
        if total_pages == 0 {
            return Err(DeckError::EmptyDeck);
        }

        if !no_repeat {
            return Ok(self.rng.gen_range(0..total_pages));
        }

        if self.order.is_none() || self.order_total != total_pages {
            self.initialize_or_reshuffle(total_pages);
        }
        if self.position >= self.order_len() {
            self.initialize_or_reshuffle(total_pages);
        }

        let order = self.order.as_ref().ok_or(DeckError::EmptyDeck)?;
        let index = order[self.position];
        self.position += 1;
        Ok(index)
    }

    /// Show or hide the answer half.
    pub fn set_reveal(&mut self, value: bool) {
        self.reveal = value;
    }

    /// Move to the next card. Hides the answer unless `keep_answer_visible`.
    pub fn on_advance(
        &mut self,
        total_pages: usize,
        keep_answer_visible: bool,
        no_repeat: bool,
    ) -> Result<usize> {
        let index = self.draw_next(total_pages, no_repeat)?;
        self.current = Some(index);
        if !keep_answer_visible {
            self.reveal = false;
        }
        Ok(index)
    }

    /// Start a new cycle and draw its first card with the answer hidden.
    pub fn reset_deck(&mut self, total_pages: usize, no_repeat: bool) -> Result<usize> {
        self.initialize_or_reshuffle(total_pages);
        self.reveal = false;
        match self.draw_next(total_pages, no_repeat) {
            Ok(index) => {
                self.current = Some(index);
                Ok(index)
            }
            Err(e) => {
                self.current = None;
                Err(e)
            }
        }
    }

    /// Drop the order and current card, as when a new document arrives.
    pub fn forget_document(&mut self) {
        self.order = None;
        self.order_total = 0;
        self.position = 0;
        self.current = None;
        self.reveal = false;
    }

    pub fn current(&self) -> Option<usize> {
        self.current
    }

    pub fn reveal(&self) -> bool {
        self.reveal
    }

    pub fn position(&self) -> usize {
        self.position
    }

    /// Page count the current order was built for.
    pub fn order_total(&self) -> usize {
        self.order_total
    }

    /// Cards left before the next reshuffle.
    pub fn remaining(&self) -> usize {
        self.order_len().saturating_sub(self.position)
    }

    /// Position in the cycle, reported against `total_pages`.
    ///
    /// A stale order (built for another page count) reports zero drawn.
    pub fn progress(&self, total_pages: usize) -> Progress {
        let drawn = if self.order.is_some() && self.order_total == total_pages {
            self.position
        } else {
            0
        };
        Progress {
            drawn,
            total: total_pages,
        }
    }

    fn order_len(&self) -> usize {
        self.order.as_ref().map_or(0, Vec::len)
    }
}
