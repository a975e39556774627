//! Ordered pattern tables for page numbers and question markers.
//!
//! Each table is evaluated first-match-wins, in the order listed. The order
//! is part of the observable behavior: reordering a table changes which
//! number is read from an ambiguous token.

use std::sync::OnceLock;

use regex::Regex;

/// Longest string (in characters) still considered a page number.
pub const MAX_PAGE_NUMBER_LEN: usize = 15;

/// Shapes a page-number token may take.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageNumberShape {
    /// `12`
    Digits,
    /// `Page 12`, `page12`
    PageLabel,
    /// `3 / 20`
    Fraction,
    /// `(12)`
    Parenthesized,
    /// `- 12 -`
    Dashed,
}

/// Accepted page-number shapes, matched against the trimmed token.
pub const PAGE_NUMBER_SHAPES: [(PageNumberShape, &str); 5] = [
    (PageNumberShape::Digits, r"^[0-9]+$"),
    (PageNumberShape::PageLabel, r"(?i)^page\s*[0-9]+$"),
    (PageNumberShape::Fraction, r"^[0-9]+\s*/\s*[0-9]+$"),
    (PageNumberShape::Parenthesized, r"^\([0-9]+\)$"),
    (PageNumberShape::Dashed, r"^-\s*[0-9]+\s*-$"),
];

/// Patterns that read the integer out of a page-number token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NumberPattern {
    /// Leading digits, optionally after `page`
    LeadingDigits,
    /// Numerator of a fraction
    Fraction,
    /// Digits inside parentheses
    Parenthesized,
    /// Digits between dashes
    Dashed,
    /// The whole string as digits
    WholeDigits,
}

/// Number extraction order. Capture group 1 holds the digits.
pub const PAGE_NUMBER_EXTRACTORS: [(NumberPattern, &str); 5] = [
    (NumberPattern::LeadingDigits, r"(?i)^(?:page\s*)?([0-9]+)"),
    (NumberPattern::Fraction, r"^([0-9]+)\s*/"),
    (NumberPattern::Parenthesized, r"^\(([0-9]+)\)$"),
    (NumberPattern::Dashed, r"^-\s*([0-9]+)\s*-$"),
    (NumberPattern::WholeDigits, r"^([0-9]+)$"),
];

/// Question marker forms.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkerPattern {
    /// `Q3`, `Q.3`, `q 3`
    QPrefix,
    /// `Question 12`
    QuestionWord,
    /// `Q(4)`
    QParenthesized,
    /// `(5)` at the start of the token
    Parenthesized,
}

/// Question marker order. Capture group 1 holds the question number.
pub const QUESTION_MARKERS: [(MarkerPattern, &str); 4] = [
    (MarkerPattern::QPrefix, r"(?i)^Q\.?\s*([0-9]{1,3})(?-u:\b)"),
    (MarkerPattern::QuestionWord, r"(?i)^Question\s+([0-9]{1,3})(?-u:\b)"),
    (MarkerPattern::QParenthesized, r"(?i)^Q\s*\(([0-9]{1,3})\)"),
    (MarkerPattern::Parenthesized, r"^\(([0-9]{1,3})\)"),
];

/// Compiled pattern tables.
#[derive(Debug, Clone)]
pub struct PatternSet {
    page_label: Regex,
    shapes: Vec<(PageNumberShape, Regex)>,
    extractors: Vec<(NumberPattern, Regex)>,
    markers: Vec<(MarkerPattern, Regex)>,
}

impl PatternSet {
    /// Compile all tables.
    pub fn new() -> Self {
        Self {
            page_label: compile(r"(?i)^page\s*[0-9]+$"),
            shapes: compile_table(&PAGE_NUMBER_SHAPES),
            extractors: compile_table(&PAGE_NUMBER_EXTRACTORS),
            markers: compile_table(&QUESTION_MARKERS),
        }
    }

    /// Process-wide compiled tables.
    pub fn shared() -> &'static PatternSet {
        static SHARED: OnceLock<PatternSet> = OnceLock::new();
        SHARED.get_or_init(PatternSet::new)
    }

    /// Shape of a page-number token, `None` if it does not look like one.
    ///
    /// Letters disqualify the token unless it is a `page <digits>` label.
    pub fn page_number_shape(&self, text: &str) -> Option<PageNumberShape> {
        let s = text.trim();
        if s.bytes().any(|b| b.is_ascii_alphabetic()) && !self.page_label.is_match(s) {
            return None;
        }
        if s.chars().count() > MAX_PAGE_NUMBER_LEN {
            return None;
        }
        self.shapes
            .iter()
            .find(|(_, re)| re.is_match(s))
            .map(|(shape, _)| *shape)
    }

    /// Whether a token looks like a printed page number.
    pub fn is_valid_page_number(&self, text: &str) -> bool {
        self.page_number_shape(text).is_some()
    }

    /// Read the integer from a page-number token.
    ///
    /// Only the first matching pattern is consulted; its value is returned
    /// unvalidated.
    pub fn extract_page_number(&self, text: &str) -> Option<(NumberPattern, u64)> {
        let s = text.trim();
        self.extractors
            .iter()
            .find_map(|(pattern, re)| re.captures(s).map(|caps| (*pattern, caps)))
            .and_then(|(pattern, caps)| caps[1].parse().ok().map(|n| (pattern, n)))
    }

    /// Question number a token starts with, if any.
    pub fn question_marker(&self, text: &str) -> Option<(MarkerPattern, u32)> {
        let s = text.trim();
        self.markers
            .iter()
            .find_map(|(pattern, re)| re.captures(s).map(|caps| (*pattern, caps)))
            .and_then(|(pattern, caps)| caps[1].parse().ok().map(|n| (pattern, n)))
    }
}

impl Default for PatternSet {
    fn default() -> Self {
        Self::new()
    }
}

/// Whether a token looks like a printed page number.
pub fn is_valid_page_number(text: &str) -> bool {
    PatternSet::shared().is_valid_page_number(text)
}

fn compile(pattern: &str) -> Regex {
    Regex::new(pattern).expect("built-in pattern must compile")
}

fn compile_table<T: Copy>(table: &[(T, &str)]) -> Vec<(T, Regex)> {
    table
        .iter()
        .map(|(tag, pattern)| (*tag, compile(pattern)))
        .collect()
}
