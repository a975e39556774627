//! Layout inference: printed page numbers and question markers.
//!
//! The pipeline for one document is
//! [`extract_document`] → [`PageNumberLocator`] → [`PageNumberResolver`] and
//! [`question_starts`] per page. [`crate::analyze`] wires them together.

mod config;
mod extract;
mod locator;
mod patterns;
mod questions;
mod resolver;

pub use config::LayoutConfig;
pub use extract::{decode_text_safe, extract_document, extract_tokens};
pub use locator::{HorizontalZone, PageNumberConvention, PageNumberLocator, VerticalZone};
pub use patterns::{
    is_valid_page_number, MarkerPattern, NumberPattern, PageNumberShape, PatternSet,
    MAX_PAGE_NUMBER_LEN, PAGE_NUMBER_EXTRACTORS, PAGE_NUMBER_SHAPES, QUESTION_MARKERS,
};
pub use questions::{question_range, question_starts};
pub use resolver::{MatchSource, PageNumberMatch, PageNumberResolver};
