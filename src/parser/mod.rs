//! PDF decoding into positioned page structures.

mod decoder;
mod options;

pub use decoder::{LopdfDecoder, PdfDecoder};
pub use options::{DecodeOptions, ErrorMode};
