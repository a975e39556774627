//! Page-level types.

use serde::{Deserialize, Serialize};

/// One fragment of text at a coordinate on a page.
///
/// Coordinates use a top-down vertical axis: larger `y` is further down
/// the page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextToken {
    /// X position (left edge)
    pub x: f64,
    /// Y position, measured from the top of the page
    pub y: f64,
    /// Decoded text
    pub text: String,
}

impl TextToken {
    /// Create a new token.
    pub fn new(x: f64, y: f64, text: impl Into<String>) -> Self {
        Self {
            x,
            y,
            text: text.into(),
        }
    }

    /// Euclidean distance from this token to a point.
    pub fn distance_to(&self, x: f64, y: f64) -> f64 {
        (self.x - x).hypot(self.y - y)
    }
}

/// A single page: its tokens in file order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Page {
    tokens: Vec<TextToken>,
}

impl Page {
    /// Create a page from tokens in file order.
    pub fn new(tokens: Vec<TextToken>) -> Self {
        Self { tokens }
    }

    /// Tokens in file order.
    pub fn tokens(&self) -> &[TextToken] {
        &self.tokens
    }

    /// Number of tokens on the page.
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    /// Check if the page carries no text at all.
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

impl FromIterator<TextToken> for Page {
    fn from_iter<I: IntoIterator<Item = TextToken>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}
