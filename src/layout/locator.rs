//! Document-wide page-number convention detection.
//!
//! Each page contributes at most one weak candidate: its first token that
//! looks like a page number. The centroid of those candidates says where
//! the document prints its page numbers.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::config::LayoutConfig;
use super::patterns::PatternSet;
use crate::model::{Page, TextToken};

/// Vertical zone of the printed page numbers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VerticalZone {
    Top,
    Bottom,
    /// Never inferred; a caller-supplied convention may use it to lift the
    /// vertical constraint of the fallback window.
    Center,
}

/// Horizontal zone of the printed page numbers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HorizontalZone {
    Left,
    Center,
    Right,
}

/// Where a document conventionally prints its page numbers.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PageNumberConvention {
    pub vertical: VerticalZone,
    pub horizontal: HorizontalZone,
    /// Centroid x of the sampled candidates
    pub x: f64,
    /// Centroid y of the sampled candidates
    pub y: f64,
}

impl fmt::Display for VerticalZone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VerticalZone::Top => write!(f, "top"),
            VerticalZone::Bottom => write!(f, "bottom"),
            VerticalZone::Center => write!(f, "center"),
        }
    }
}

impl fmt::Display for HorizontalZone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HorizontalZone::Left => write!(f, "left"),
            HorizontalZone::Center => write!(f, "center"),
            HorizontalZone::Right => write!(f, "right"),
        }
    }
}

impl fmt::Display for PageNumberConvention {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/{} at ({:.1}, {:.1})",
            self.vertical, self.horizontal, self.x, self.y
        )
    }
}

/// Learns the [`PageNumberConvention`] of a document.
pub struct PageNumberLocator<'a> {
    config: &'a LayoutConfig,
    patterns: &'a PatternSet,
}

impl<'a> PageNumberLocator<'a> {
    /// Create a locator.
    pub fn new(config: &'a LayoutConfig, patterns: &'a PatternSet) -> Self {
        Self { config, patterns }
    }

    /// The first page-number-like token of every page that has one.
    pub fn candidates<'p>(&self, pages: &'p [Page]) -> Vec<&'p TextToken> {
        pages
            .iter()
            .filter_map(|page| {
                page.tokens()
                    .iter()
                    .find(|t| self.patterns.is_valid_page_number(&t.text))
            })
            .collect()
    }

    /// Infer the convention, `None` when no page offers a candidate.
    pub fn locate(&self, pages: &[Page]) -> Option<PageNumberConvention> {
        let candidates = self.candidates(pages);
        if candidates.is_empty() {
            log::debug!("No page-number candidates in {} pages", pages.len());
            return None;
        }

        let count = candidates.len() as f64;
        let avg_x = candidates.iter().map(|c| c.x).sum::<f64>() / count;
        let avg_y = candidates.iter().map(|c| c.y).sum::<f64>() / count;

        let vertical = if avg_y > self.config.page_height / 2.0 {
            VerticalZone::Bottom
        } else {
            VerticalZone::Top
        };

        let min_x = candidates.iter().map(|c| c.x).fold(f64::INFINITY, f64::min);
        let max_x = candidates.iter().map(|c| c.x).fold(f64::NEG_INFINITY, f64::max);
        let spread = if max_x - min_x == 0.0 { 1.0 } else { max_x - min_x };
        let relative = (avg_x - min_x) / spread;

        let horizontal = if relative < self.config.left_threshold {
            HorizontalZone::Left
        } else if relative > self.config.right_threshold {
            HorizontalZone::Right
        } else {
            HorizontalZone::Center
        };

        let convention = PageNumberConvention {
            vertical,
            horizontal,
            x: avg_x,
            y: avg_y,
        };
        log::debug!(
            "Page-number convention from {} candidates: {}",
            candidates.len(),
            convention
        );
        Some(convention)
    }
}
