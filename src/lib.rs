//! # exampage
//!
//! Printed page number and question marker inference for exam PDFs.
//!
//! For every physical page of a document the library infers the page number
//! printed on it and the question numbers that start on it, so a collection
//! of exam papers can be audited for missing pages and missing questions.
//! Everything is heuristic over positioned text: a miss is `None` or an
//! empty list, never an error.
//!
//! ## Quick Start
//!
//! ```no_run
//! use exampage::{analyze_file, render};
//!
//! fn main() -> exampage::Result<()> {
//!     let analysis = analyze_file("paper1.pdf")?;
//!     println!("{:?}", analysis.printed_page_sequence);
//!
//!     let json = render::to_json(&analysis, render::JsonFormat::Pretty)?;
//!     println!("{}", json);
//!     Ok(())
//! }
//! ```
//!
//! ## Pipeline
//!
//! - **Decode**: [`LopdfDecoder`] turns PDF bytes into positioned text
//!   fragments ([`RawDocument`]); pdf2json-shaped dumps load directly.
//! - **Locate**: [`layout::PageNumberLocator`] infers the document's page
//!   number convention from all pages.
//! - **Resolve**: [`layout::PageNumberResolver`] reads each page's number
//!   near that convention.
//! - **Questions**: [`layout::question_starts`] finds question markers.
//! - **Batch**: [`batch::analyze_uploads`] validates and fans a request out
//!   over rayon, keeping submission order.

pub mod analyze;
pub mod batch;
pub mod detect;
pub mod error;
pub mod layout;
pub mod model;
pub mod parser;
pub mod render;

// Re-export commonly used types
pub use analyze::{analyze_document, Analyzer};
pub use batch::{
    analyze_batch, analyze_uploads, run_batch, validate_upload, validate_uploads, BatchOptions,
    BatchPolicy, BatchReport, DocumentSource, JsonDump, Upload, UploadLimits,
};
pub use detect::{detect_format_from_bytes, detect_format_from_path, is_pdf_bytes, PdfFormat};
pub use error::{Error, Result, ValidationError};
pub use layout::LayoutConfig;
pub use model::{
    BatchResponse, DocumentAnalysis, DocumentReport, Page, PageAnalysis, PdfDocument,
    RawDocument, TextToken,
};
pub use parser::{DecodeOptions, ErrorMode, LopdfDecoder, PdfDecoder};
pub use render::JsonFormat;

use std::path::Path;

/// Analyze a PDF file with default geometry.
///
/// # Example
///
/// ```no_run
/// use exampage::analyze_file;
///
/// let analysis = analyze_file("paper1.pdf").unwrap();
/// println!("Pages: {}", analysis.total_pages);
/// ```
pub fn analyze_file<P: AsRef<Path>>(path: P) -> Result<DocumentAnalysis> {
    ExamPage::new().analyze_file(path)
}

/// Analyze an in-memory PDF with default geometry.
pub fn analyze_bytes(file_name: &str, data: &[u8]) -> Result<DocumentAnalysis> {
    ExamPage::new().analyze_bytes(file_name, data)
}

/// Analyze a pdf2json-shaped page structure dump.
///
/// Accepts `{"Pages": [...]}` as well as the older
/// `{"formImage": {"Pages": [...]}}` layout.
pub fn analyze_json(file_name: &str, json: &str) -> Result<DocumentAnalysis> {
    ExamPage::new().analyze_json(file_name, json)
}

/// Decode a PDF file into its positioned text fragments.
pub fn decode_file<P: AsRef<Path>>(path: P) -> Result<RawDocument> {
    LopdfDecoder::new().decode_file(path.as_ref())
}

/// Builder for analyzing exam documents.
///
/// # Example
///
/// ```no_run
/// use exampage::{ExamPage, LayoutConfig};
///
/// let analysis = ExamPage::new()
///     .with_layout(LayoutConfig::default().with_margin(60.0))
///     .lenient()
///     .analyze_file("paper1.pdf")?;
/// # Ok::<(), exampage::Error>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct ExamPage {
    options: BatchOptions,
}

impl ExamPage {
    /// Create a builder with default geometry and strict decoding.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the layout geometry.
    pub fn with_layout(mut self, layout: LayoutConfig) -> Self {
        self.options = self.options.with_layout(layout);
        self
    }

    /// Decode unreadable pages as blank pages instead of failing.
    pub fn lenient(mut self) -> Self {
        self.options = self.options.lenient();
        self
    }

    /// Disable parallel processing of batches.
    pub fn sequential(mut self) -> Self {
        self.options = self.options.sequential();
        self
    }

    /// Report failed documents of a batch instead of failing it.
    pub fn partial(mut self) -> Self {
        self.options = self.options.partial();
        self
    }

    /// Options a batch run would use.
    pub fn options(&self) -> &BatchOptions {
        &self.options
    }

    fn analyzer(&self) -> Analyzer {
        Analyzer::new(self.options.layout.clone())
    }

    fn decoder(&self) -> LopdfDecoder {
        LopdfDecoder::with_options(self.options.decode.clone())
    }

    /// Analyze a PDF file.
    pub fn analyze_file<P: AsRef<Path>>(&self, path: P) -> Result<DocumentAnalysis> {
        let path = path.as_ref();
        let upload = Upload::from_path(path)?;
        self.analyze_bytes(&upload.file_name, &upload.data)
    }

    /// Analyze an in-memory PDF.
    pub fn analyze_bytes(&self, file_name: &str, data: &[u8]) -> Result<DocumentAnalysis> {
        let raw = self.decoder().decode_bytes(data)?;
        Ok(self.analyzer().analyze_raw(file_name, &raw))
    }

    /// Analyze a page structure dump.
    pub fn analyze_json(&self, file_name: &str, json: &str) -> Result<DocumentAnalysis> {
        let raw = RawDocument::from_json_str(json)?;
        Ok(self.analyzer().analyze_raw(file_name, &raw))
    }

    /// Validate and analyze a request of uploaded documents.
    pub fn analyze_uploads(&self, uploads: &[Upload]) -> Result<BatchReport> {
        analyze_uploads(uploads, &self.options)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_analyze_json_form_image_layout() {
        let json = r#"{"formImage":{"Pages":[
            {"Texts":[{"x":60,"y":100,"R":[{"T":"Q1"}]},{"x":300,"y":770,"R":[{"T":"1"}]}]},
            {"Texts":[{"x":60,"y":100,"R":[{"T":"Q2"}]},{"x":300,"y":770,"R":[{"T":"2"}]}]}
        ]}}"#;
        let analysis = analyze_json("dump.json", json).unwrap();
        assert_eq!(analysis.printed_page_sequence, vec![Some(1), Some(2)]);
        assert_eq!(analysis.page_summary[1].range.as_deref(), Some("2"));
    }

    #[test]
    fn test_analyze_json_without_pages() {
        let err = analyze_json("dump.json", r#"{"Meta":{}}"#).unwrap_err();
        assert!(matches!(err, Error::PdfParse(_)));
    }

    #[test]
    fn test_dump_coordinates_keep_full_precision() {
        let raw = RawDocument::from_json_str(
            r#"{"Pages":[{"Texts":[{"x":300,"y":400.00001,"R":[{"T":"4"}]}]}]}"#,
        )
        .unwrap();
        assert_eq!(raw.pages[0].texts.as_ref().unwrap()[0].y, Some(400.00001));

        let doc = layout::extract_document("dump.json", &raw);
        let convention = Analyzer::default().convention(&doc).unwrap();
        assert_eq!(convention.vertical, layout::VerticalZone::Bottom);
    }

    #[test]
    fn test_analyze_bytes_rejects_non_pdf() {
        let err = analyze_bytes("notes.txt", b"plain text").unwrap_err();
        assert!(matches!(err, Error::UnknownFormat));
    }

    #[test]
    fn test_builder_options() {
        let builder = ExamPage::new().lenient().sequential().partial();
        let options = builder.options();
        assert_eq!(options.decode.error_mode, ErrorMode::Lenient);
        assert!(!options.parallel);
        assert_eq!(options.policy, BatchPolicy::Partial);
    }
}
