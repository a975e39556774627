//! Per-page printed number resolution.
//!
//! Two passes: the page-number-like token nearest to the convention's
//! centroid, then, if that yields nothing usable, the first acceptable
//! token in document order inside the window the convention implies.

use super::config::LayoutConfig;
use super::locator::{HorizontalZone, PageNumberConvention, VerticalZone};
use super::patterns::{NumberPattern, PatternSet};
use crate::model::{Page, TextToken};

/// Which pass produced a printed page number.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchSource {
    /// Nearest candidate to the convention centroid
    Nearest,
    /// First acceptable token inside the convention window
    Window,
}

/// A resolved printed page number and how it was found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageNumberMatch {
    pub value: u32,
    pub pattern: NumberPattern,
    pub source: MatchSource,
}

/// Resolves printed page numbers against a document convention.
pub struct PageNumberResolver<'a> {
    config: &'a LayoutConfig,
    patterns: &'a PatternSet,
    convention: Option<PageNumberConvention>,
}

impl<'a> PageNumberResolver<'a> {
    /// Create a resolver. Without a convention every page resolves to `None`.
    pub fn new(
        config: &'a LayoutConfig,
        patterns: &'a PatternSet,
        convention: Option<PageNumberConvention>,
    ) -> Self {
        Self {
            config,
            patterns,
            convention,
        }
    }

    /// Printed page number of a page.
    pub fn resolve(&self, page: &Page) -> Option<u32> {
        self.resolve_detailed(page).map(|m| m.value)
    }

    /// Printed page number of a page, with provenance.
    pub fn resolve_detailed(&self, page: &Page) -> Option<PageNumberMatch> {
        let convention = self.convention.as_ref()?;
        self.nearest(page, convention)
            .or_else(|| self.window(page, convention))
    }

    fn nearest(&self, page: &Page, convention: &PageNumberConvention) -> Option<PageNumberMatch> {
        let mut closest: Option<(&TextToken, f64)> = None;
        for token in page.tokens() {
            if !self.patterns.is_valid_page_number(&token.text) {
                continue;
            }
            let dist = token.distance_to(convention.x, convention.y);
            if closest.map_or(true, |(_, best)| dist < best) {
                closest = Some((token, dist));
            }
        }

        let (token, _) = closest?;
        let found = self.read_number(token, MatchSource::Nearest);
        if found.is_none() {
            log::trace!("Nearest candidate {:?} is out of range", token.text);
        }
        found
    }

    fn window(&self, page: &Page, convention: &PageNumberConvention) -> Option<PageNumberMatch> {
        page.tokens()
            .iter()
            .filter(|t| self.in_window(t, convention))
            .filter(|t| self.patterns.is_valid_page_number(&t.text))
            .find_map(|t| self.read_number(t, MatchSource::Window))
    }

    fn in_window(&self, token: &TextToken, convention: &PageNumberConvention) -> bool {
        let vertical = match convention.vertical {
            VerticalZone::Bottom => token.y > self.config.margin,
            VerticalZone::Top => token.y < self.config.margin + self.config.top_band,
            VerticalZone::Center => true,
        };
        let horizontal = match convention.horizontal {
            HorizontalZone::Left => token.x <= convention.x + self.config.tolerance,
            HorizontalZone::Right => token.x >= convention.x - self.config.tolerance,
            HorizontalZone::Center => true,
        };
        vertical && horizontal
    }

    fn read_number(&self, token: &TextToken, source: MatchSource) -> Option<PageNumberMatch> {
        let (pattern, n) = self.patterns.extract_page_number(&token.text)?;
        if !self.config.accepts_page_number(n) {
            return None;
        }
        Some(PageNumberMatch {
            value: u32::try_from(n).ok()?,
            pattern,
            source,
        })
    }
}
