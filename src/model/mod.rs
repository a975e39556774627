//! Document model types.
//!
//! Three layers live here: the decoded page structures handed over by a PDF
//! decoder ([`RawDocument`]), the positioned tokens the layout engine works
//! on ([`PdfDocument`]), and the per-document results it produces
//! ([`DocumentAnalysis`]).

mod analysis;
mod document;
mod page;
mod raw;

pub use analysis::{BatchResponse, DocumentAnalysis, DocumentReport, PageAnalysis};
pub use document::PdfDocument;
pub use page::{Page, TextToken};
pub use raw::{RawDocument, RawPage, RawRun, RawText};
