//! Batch analysis of uploaded documents.
//!
//! Every document in a batch is decoded and analyzed independently and may
//! run on its own rayon worker. Results are gathered in submission order
//! regardless of completion order.

use std::path::Path;

use rayon::prelude::*;

use crate::analyze::Analyzer;
use crate::detect::{sniff_media_type, PDF_MEDIA_TYPE};
use crate::error::{Error, Result, ValidationError};
use crate::layout::LayoutConfig;
use crate::model::{BatchResponse, DocumentAnalysis, DocumentReport, RawDocument};
use crate::parser::{DecodeOptions, LopdfDecoder, PdfDecoder};

/// Maximum number of documents per request.
pub const MAX_FILES: usize = 10;

/// Maximum size of a single document in bytes (20 MB).
pub const MAX_FILE_SIZE: usize = 20 * 1024 * 1024;

/// A submitted PDF document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Upload {
    /// Original file name, echoed back in the analysis
    pub file_name: String,
    /// Declared media type
    pub content_type: String,
    /// File content
    pub data: Vec<u8>,
}

impl Upload {
    /// Create an upload with a declared media type.
    pub fn new(
        file_name: impl Into<String>,
        content_type: impl Into<String>,
        data: impl Into<Vec<u8>>,
    ) -> Self {
        Self {
            file_name: file_name.into(),
            content_type: content_type.into(),
            data: data.into(),
        }
    }

    /// Create an upload whose media type is taken from the content itself.
    pub fn sniffed(file_name: impl Into<String>, data: impl Into<Vec<u8>>) -> Self {
        let data = data.into();
        let content_type = sniff_media_type(&data);
        Self::new(file_name, content_type, data)
    }

    /// Read an upload from disk, naming it after the file.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let data = std::fs::read(path)?;
        Ok(Self::sniffed(display_name(path), data))
    }

    /// Size in bytes.
    pub fn size(&self) -> usize {
        self.data.len()
    }
}

/// A previously extracted page structure dump, analyzed without its PDF.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JsonDump {
    pub file_name: String,
    pub json: String,
}

impl JsonDump {
    pub fn new(file_name: impl Into<String>, json: impl Into<String>) -> Self {
        Self {
            file_name: file_name.into(),
            json: json.into(),
        }
    }

    /// Read a dump from disk, naming it after the file.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        Ok(Self::new(display_name(path), json))
    }
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Anything that can produce a decoded page structure for the batch runner.
pub trait DocumentSource: Send + Sync {
    /// Name reported in the analysis.
    fn file_name(&self) -> &str;

    /// Decode into the page structure the layout pipeline consumes.
    fn decode(&self, options: &DecodeOptions) -> Result<RawDocument>;
}

impl DocumentSource for Upload {
    fn file_name(&self) -> &str {
        &self.file_name
    }

    fn decode(&self, options: &DecodeOptions) -> Result<RawDocument> {
        LopdfDecoder::with_options(options.clone()).decode_bytes(&self.data)
    }
}

impl DocumentSource for JsonDump {
    fn file_name(&self) -> &str {
        &self.file_name
    }

    fn decode(&self, _options: &DecodeOptions) -> Result<RawDocument> {
        RawDocument::from_json_str(&self.json)
    }
}

impl<T: DocumentSource + ?Sized> DocumentSource for Box<T> {
    fn file_name(&self) -> &str {
        (**self).file_name()
    }

    fn decode(&self, options: &DecodeOptions) -> Result<RawDocument> {
        (**self).decode(options)
    }
}

/// Upload contract enforced before any document is decoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadLimits {
    pub max_files: usize,
    pub max_file_size: usize,
    pub media_type: String,
}

impl Default for UploadLimits {
    fn default() -> Self {
        Self {
            max_files: MAX_FILES,
            max_file_size: MAX_FILE_SIZE,
            media_type: PDF_MEDIA_TYPE.to_string(),
        }
    }
}

/// Check a request against the upload contract.
///
/// The first violation is reported; files are checked in submission order.
pub fn validate_uploads(
    uploads: &[Upload],
    limits: &UploadLimits,
) -> std::result::Result<(), ValidationError> {
    if uploads.is_empty() {
        return Err(ValidationError::NoDocuments);
    }
    if uploads.len() > limits.max_files {
        return Err(ValidationError::TooManyFiles {
            count: uploads.len(),
            max: limits.max_files,
        });
    }

    uploads.iter().try_for_each(|upload| validate_upload(upload, limits))
}

/// Check one document against the per-file limits.
pub fn validate_upload(
    upload: &Upload,
    limits: &UploadLimits,
) -> std::result::Result<(), ValidationError> {
    if upload.size() > limits.max_file_size {
        return Err(ValidationError::FileTooLarge {
            file_name: upload.file_name.clone(),
            size: upload.size(),
            max: limits.max_file_size,
        });
    }
    if !upload
        .content_type
        .trim()
        .eq_ignore_ascii_case(&limits.media_type)
    {
        return Err(ValidationError::UnsupportedMediaType {
            file_name: upload.file_name.clone(),
            content_type: upload.content_type.clone(),
        });
    }
    Ok(())
}

/// What happens to a batch when one of its documents fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BatchPolicy {
    /// The first failure in submission order fails the whole batch
    #[default]
    AllOrNothing,
    /// Failed documents are reported alongside the successful ones
    Partial,
}

/// Options for a batch run.
#[derive(Debug, Clone)]
pub struct BatchOptions {
    /// Layout geometry
    pub layout: LayoutConfig,
    /// Decoder options
    pub decode: DecodeOptions,
    /// Analyze documents on the rayon pool
    pub parallel: bool,
    /// Failure policy
    pub policy: BatchPolicy,
    /// Upload contract
    pub limits: UploadLimits,
}

impl Default for BatchOptions {
    fn default() -> Self {
        Self {
            layout: LayoutConfig::default(),
            decode: DecodeOptions::default(),
            parallel: true,
            policy: BatchPolicy::default(),
            limits: UploadLimits::default(),
        }
    }
}

impl BatchOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_layout(mut self, layout: LayoutConfig) -> Self {
        self.layout = layout;
        self
    }

    pub fn with_decode_options(mut self, decode: DecodeOptions) -> Self {
        self.decode = decode;
        self
    }

    pub fn with_policy(mut self, policy: BatchPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_limits(mut self, limits: UploadLimits) -> Self {
        self.limits = limits;
        self
    }

    /// Report failed documents instead of failing the batch.
    pub fn partial(mut self) -> Self {
        self.policy = BatchPolicy::Partial;
        self
    }

    /// Process documents one after another on the calling thread.
    pub fn sequential(mut self) -> Self {
        self.parallel = false;
        self
    }

    /// Decode unreadable pages as blank pages.
    pub fn lenient(mut self) -> Self {
        self.decode = self.decode.lenient();
        self
    }
}

/// Outcome of one document in a batch.
#[derive(Debug)]
pub struct DocumentOutcome {
    pub file_name: String,
    pub result: Result<DocumentAnalysis>,
}

impl DocumentOutcome {
    fn into_report(self) -> DocumentReport {
        match self.result {
            Ok(analysis) => DocumentReport::Analyzed(analysis),
            Err(e) => DocumentReport::Failed {
                file_name: self.file_name,
                error: e.to_string(),
            },
        }
    }
}

/// Decode and analyze every source, keeping submission order.
pub fn analyze_batch<S: DocumentSource>(
    sources: &[S],
    options: &BatchOptions,
) -> Vec<DocumentOutcome> {
    let analyzer = Analyzer::new(options.layout.clone());
    let run = |source: &S| {
        let result = source
            .decode(&options.decode)
            .map(|raw| analyzer.analyze_raw(source.file_name(), &raw));
        if let Err(e) = &result {
            log::warn!("Failed to analyze {}: {}", source.file_name(), e);
        }
        DocumentOutcome {
            file_name: source.file_name().to_string(),
            result,
        }
    };

    if options.parallel && sources.len() > 1 {
        sources.par_iter().map(run).collect()
    } else {
        sources.iter().map(run).collect()
    }
}

/// Gather outcomes, failing on the first error in submission order.
pub fn collect_all(outcomes: Vec<DocumentOutcome>) -> Result<BatchResponse<DocumentAnalysis>> {
    let results = outcomes
        .into_iter()
        .map(|o| o.result)
        .collect::<Result<Vec<_>>>()?;
    Ok(BatchResponse::succeeded(results))
}

/// Gather outcomes, reporting failures per document.
pub fn collect_partial(outcomes: Vec<DocumentOutcome>) -> BatchResponse<DocumentReport> {
    BatchResponse::succeeded(
        outcomes
            .into_iter()
            .map(DocumentOutcome::into_report)
            .collect(),
    )
}

/// Response of a batch run, shaped by its [`BatchPolicy`].
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
#[serde(untagged)]
pub enum BatchReport {
    Complete(BatchResponse<DocumentAnalysis>),
    Partial(BatchResponse<DocumentReport>),
}

impl BatchReport {
    /// Number of entries in the response.
    pub fn len(&self) -> usize {
        match self {
            BatchReport::Complete(r) => r.results.len(),
            BatchReport::Partial(r) => r.results.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of documents that could not be analyzed.
    pub fn failures(&self) -> usize {
        match self {
            BatchReport::Complete(_) => 0,
            BatchReport::Partial(r) => r.results.iter().filter(|d| !d.is_analyzed()).count(),
        }
    }
}

/// Analyze sources and shape the response by policy.
pub fn run_batch<S: DocumentSource>(sources: &[S], options: &BatchOptions) -> Result<BatchReport> {
    if sources.is_empty() {
        return Err(ValidationError::NoDocuments.into());
    }

    let outcomes = analyze_batch(sources, options);
    match options.policy {
        BatchPolicy::AllOrNothing => collect_all(outcomes).map(BatchReport::Complete),
        BatchPolicy::Partial => Ok(BatchReport::Partial(collect_partial(outcomes))),
    }
}

/// Validate a request against the upload contract, then run it.
pub fn analyze_uploads(uploads: &[Upload], options: &BatchOptions) -> Result<BatchReport> {
    validate_uploads(uploads, &options.limits).map_err(Error::from)?;
    log::debug!("Analyzing batch of {} uploads", uploads.len());
    run_batch(uploads, options)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{RawPage, RawText};
    use std::thread;
    use std::time::Duration;

    struct DelayedSource {
        name: String,
        delay_ms: u64,
        fail: bool,
    }

    impl DelayedSource {
        fn new(name: &str, delay_ms: u64, fail: bool) -> Self {
            Self {
                name: name.to_string(),
                delay_ms,
                fail,
            }
        }
    }

    impl DocumentSource for DelayedSource {
        fn file_name(&self) -> &str {
            &self.name
        }

        fn decode(&self, _options: &DecodeOptions) -> Result<RawDocument> {
            thread::sleep(Duration::from_millis(self.delay_ms));
            if self.fail {
                return Err(Error::PdfParse(format!("{} is corrupt", self.name)));
            }
            Ok(RawDocument::new(vec![RawPage::new(vec![RawText::new(
                300.0, 770.0, "1",
            )])]))
        }
    }

    fn pdf_upload(name: &str) -> Upload {
        Upload::new(name, PDF_MEDIA_TYPE, b"%PDF-1.4\n".to_vec())
    }

    #[test]
    fn test_results_keep_submission_order() {
        let sources = vec![
            DelayedSource::new("a.pdf", 60, false),
            DelayedSource::new("b.pdf", 5, false),
            DelayedSource::new("c.pdf", 30, false),
        ];
        let outcomes = analyze_batch(&sources, &BatchOptions::default());
        let names: Vec<_> = outcomes.iter().map(|o| o.file_name.as_str()).collect();
        assert_eq!(names, vec!["a.pdf", "b.pdf", "c.pdf"]);

        let response = collect_all(outcomes).unwrap();
        assert!(response.success);
        assert_eq!(response.results[2].file_name, "c.pdf");
        assert_eq!(response.results[0].printed_page_sequence, vec![Some(1)]);
    }

    #[test]
    fn test_all_or_nothing_reports_first_failure() {
        let sources = vec![
            DelayedSource::new("ok.pdf", 0, false),
            DelayedSource::new("bad1.pdf", 40, true),
            DelayedSource::new("bad2.pdf", 0, true),
        ];
        let err = run_batch(&sources, &BatchOptions::default()).unwrap_err();
        assert_eq!(err.to_string(), "PDF parsing error: bad1.pdf is corrupt");
    }

    #[test]
    fn test_partial_keeps_successes() {
        let sources = vec![
            DelayedSource::new("ok.pdf", 0, false),
            DelayedSource::new("bad.pdf", 0, true),
        ];
        let report = run_batch(&sources, &BatchOptions::new().partial().sequential()).unwrap();
        assert_eq!(report.len(), 2);
        assert_eq!(report.failures(), 1);

        let BatchReport::Partial(response) = report else {
            panic!("expected partial report");
        };
        assert!(response.results[0].is_analyzed());
        assert_eq!(response.results[1].file_name(), "bad.pdf");
    }

    #[test]
    fn test_empty_batch_is_validation_error() {
        let sources: Vec<DelayedSource> = Vec::new();
        let err = run_batch(&sources, &BatchOptions::default()).unwrap_err();
        assert!(err.is_validation());
        assert_eq!(err.to_string(), "Validation failed: PDF files are missing");
    }

    #[test]
    fn test_validate_uploads_limits() {
        let limits = UploadLimits::default();
        assert_eq!(validate_uploads(&[], &limits), Err(ValidationError::NoDocuments));

        let many: Vec<_> = (0..11).map(|i| pdf_upload(&format!("{}.pdf", i))).collect();
        assert_eq!(
            validate_uploads(&many, &limits),
            Err(ValidationError::TooManyFiles { count: 11, max: 10 })
        );
        assert!(validate_uploads(&many[..10], &limits).is_ok());

        let html = Upload::new("page.html", "text/html", b"<html>".to_vec());
        assert!(matches!(
            validate_uploads(&[pdf_upload("a.pdf"), html], &limits),
            Err(ValidationError::UnsupportedMediaType { file_name, .. }) if file_name == "page.html"
        ));
    }

    #[test]
    fn test_validate_upload_size() {
        let limits = UploadLimits {
            max_file_size: 4,
            ..UploadLimits::default()
        };
        assert!(matches!(
            validate_uploads(&[pdf_upload("big.pdf")], &limits),
            Err(ValidationError::FileTooLarge { size: 9, max: 4, .. })
        ));
    }

    #[test]
    fn test_sniffed_upload() {
        assert_eq!(Upload::sniffed("a.pdf", b"%PDF-1.7".to_vec()).content_type, PDF_MEDIA_TYPE);
        assert_eq!(
            Upload::sniffed("a.pdf", b"GIF89a".to_vec()).content_type,
            "application/octet-stream"
        );
    }

    #[test]
    fn test_analyze_uploads_rejects_before_decoding() {
        let uploads = vec![Upload::sniffed("notes.txt", b"hello".to_vec())];
        let err = analyze_uploads(&uploads, &BatchOptions::default()).unwrap_err();
        assert!(err.is_validation());
    }

    #[test]
    fn test_json_dump_source() {
        let dump = JsonDump::new(
            "dump.json",
            r#"{"Pages":[{"Texts":[{"x":300,"y":770,"R":[{"T":"Page%207"}]}]}]}"#,
        );
        let report = run_batch(&[dump], &BatchOptions::default()).unwrap();
        let BatchReport::Complete(response) = report else {
            panic!("expected complete report");
        };
        assert_eq!(response.results[0].printed_page_sequence, vec![Some(7)]);
    }

    #[test]
    fn test_boxed_sources() {
        let sources: Vec<Box<dyn DocumentSource>> = vec![
            Box::new(JsonDump::new("a.json", r#"{"Pages":[{}]}"#)),
            Box::new(DelayedSource::new("b.pdf", 0, false)),
        ];
        let outcomes = analyze_batch(&sources, &BatchOptions::default());
        assert_eq!(outcomes.len(), 2);
        assert!(outcomes.iter().all(|o| o.result.is_ok()));
    }
}
