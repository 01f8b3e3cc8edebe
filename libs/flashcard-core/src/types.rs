//! Core types for split-page flashcards.

use serde::{Deserialize, Serialize};

/// Half of a page. The left half carries the prompt, the right half the answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CardSide {
    Left,
    Right,
}

impl CardSide {
    /// Get the side name as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Left => "left",
            Self::Right => "right",
        }
    }

    /// Parse from string.
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "left" => Some(Self::Left),
            "right" => Some(Self::Right),
            _ => None,
        }
    }

    /// The answer side is hidden until revealed.
    pub fn is_answer(self) -> bool {
        matches!(self, Self::Right)
    }
}

/// Allowed render resolution range, in dots per inch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DpiBounds {
    pub min: u32,
    pub max: u32,
    pub step: u32,
    pub default: u32,
}

impl Default for DpiBounds {
    fn default() -> Self {
        Self {
            min: 120,
            max: 300,
            step: 20,
            default: 200,
        }
    }
}

impl DpiBounds {
    /// Build bounds, repairing inverted or degenerate values.
    pub fn new(min: u32, max: u32, step: u32, default: u32) -> Self {
        let min = min.max(1);
        let max = max.max(min);
        let step = step.max(1);
        let mut bounds = Self {
            min,
            max,
            step,
            default: min,
        };
        bounds.default = bounds.clamp(default);
        bounds
    }

    /// Clamp `dpi` into range and snap it to the nearest step above `min`.
    pub fn clamp(&self, dpi: u32) -> u32 {
        let dpi = dpi.clamp(self.min, self.max);
        let offset = dpi - self.min;
        let steps = (offset + self.step / 2) / self.step;
        (self.min + steps * self.step).min(self.max)
    }
}

/// Per-session render and draw settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderSettings {
    pub dpi: u32,
    pub show_page_number: bool,
    pub keep_answer_visible: bool,
    pub no_repeat: bool,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self::with_bounds(&DpiBounds::default())
    }
}

impl RenderSettings {
    /// Default settings with the resolution taken from `bounds`.
    pub fn with_bounds(bounds: &DpiBounds) -> Self {
        Self {
            dpi: bounds.default,
            show_page_number: true,
            keep_answer_visible: false,
            no_repeat: true,
        }
    }
}

/// Cards drawn in the current cycle out of the deck size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Progress {
    pub drawn: usize,
    pub total: usize,
}

/// Human-readable 1-based page label, e.g. "Page 3 / 10".
pub fn page_label(index: usize, total: usize) -> String {
    format!("Page {} / {}", index + 1, total)
}
