//! Error types for exampage library.

use std::io;
use thiserror::Error;

/// Result type alias for exampage operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while decoding or analyzing documents.
///
/// Heuristic misses (no printed page number, no question markers, no
/// detectable convention) are never errors; they surface as `None` or
/// empty collections in the analysis.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error when reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The file format is not recognized as PDF.
    #[error("Unknown file format: not a valid PDF")]
    UnknownFormat,

    /// The PDF version is not supported.
    #[error("Unsupported PDF version: {0}")]
    UnsupportedVersion(String),

    /// The decoder could not parse the PDF structure.
    #[error("PDF parsing error: {0}")]
    PdfParse(String),

    /// The PDF document is encrypted.
    #[error("Document is encrypted")]
    Encrypted,

    /// A decoded page structure dump could not be read.
    #[error("Invalid page structure JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// The submitted documents violate the upload contract.
    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationError),
}

impl Error {
    /// Whether this error was raised before any document was analyzed.
    pub fn is_validation(&self) -> bool {
        matches!(self, Error::Validation(_))
    }
}

impl From<lopdf::Error> for Error {
    fn from(err: lopdf::Error) -> Self {
        match err {
            lopdf::Error::IO(e) => Error::Io(e),
            lopdf::Error::Decryption(_) => Error::Encrypted,
            _ => Error::PdfParse(err.to_string()),
        }
    }
}

/// Upload contract violations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// The request carried no documents.
    #[error("PDF files are missing")]
    NoDocuments,

    /// More documents than the per-request limit.
    #[error("Too many files: {count} submitted, at most {max} allowed")]
    TooManyFiles { count: usize, max: usize },

    /// A document exceeds the size limit.
    #[error("File '{file_name}' is {size} bytes, limit is {max} bytes")]
    FileTooLarge {
        file_name: String,
        size: usize,
        max: usize,
    },

    /// A document is not a PDF.
    #[error("Only PDF files are allowed: '{file_name}' is {content_type}")]
    UnsupportedMediaType {
        file_name: String,
        content_type: String,
    },
}
