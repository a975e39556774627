//! Decoded page structures, as produced by a PDF-to-text decoder.
//!
//! The shape follows the pdf2json interchange format so that existing dumps
//! can be audited directly:
//!
//! ```json
//! { "Pages": [ { "Texts": [ { "x": 30.1, "y": 48.2, "R": [ { "T": "Page%201" } ] } ] } ] }
//! ```
//!
//! Run text is percent-encoded. Every field is optional: decoders in the
//! wild emit partial structures, and a missing piece must degrade to an
//! empty value rather than fail the document.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{Error, Result};

/// All decoded pages of one document, in file order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RawDocument {
    #[serde(rename = "Pages")]
    pub pages: Vec<RawPage>,
}

impl RawDocument {
    /// Create a document from decoded pages.
    pub fn new(pages: Vec<RawPage>) -> Self {
        Self { pages }
    }

    /// Read a pdf2json-shaped JSON dump.
    ///
    /// The page list is looked up at `Pages`, then at `formImage.Pages`
    /// (older pdf2json releases). A dump without a page list is a decode
    /// failure; anything malformed below page level is tolerated.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(json)?;
        Self::from_value(&value)
    }

    /// Same as [`RawDocument::from_json_str`] for an already parsed value.
    pub fn from_value(value: &Value) -> Result<Self> {
        let pages = value
            .get("Pages")
            .or_else(|| value.get("formImage").and_then(|f| f.get("Pages")))
            .and_then(Value::as_array)
            .ok_or_else(|| Error::PdfParse("decoded structure has no page list".to_string()))?;

        Ok(Self {
            pages: pages.iter().map(RawPage::from).collect(),
        })
    }

    /// Serialize back to pdf2json-shaped JSON.
    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Get the number of pages.
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }
}

/// One decoded page.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "Value")]
pub struct RawPage {
    /// Text fragments, `None` when the decoder gave no sequence at all.
    #[serde(rename = "Texts", skip_serializing_if = "Option::is_none")]
    pub texts: Option<Vec<RawText>>,
}

impl RawPage {
    /// Create a page from text fragments.
    pub fn new(texts: Vec<RawText>) -> Self {
        Self { texts: Some(texts) }
    }
}

impl From<Value> for RawPage {
    fn from(value: Value) -> Self {
        RawPage::from(&value)
    }
}

impl From<&Value> for RawPage {
    fn from(value: &Value) -> Self {
        let texts = value
            .get("Texts")
            .and_then(Value::as_array)
            .map(|texts| texts.iter().map(RawText::from).collect());
        Self { texts }
    }
}

/// One positioned text fragment.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RawText {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub x: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub y: Option<f64>,
    /// Styled runs; only the first one carries the fragment text.
    #[serde(rename = "R")]
    pub runs: Vec<RawRun>,
}

impl RawText {
    /// Create a fragment with a single (already percent-encoded) run.
    pub fn new(x: f64, y: f64, encoded_text: impl Into<String>) -> Self {
        Self {
            x: Some(x),
            y: Some(y),
            runs: vec![RawRun {
                text: Some(encoded_text.into()),
            }],
        }
    }

    /// Text of the first run, if any.
    pub fn first_run_text(&self) -> Option<&str> {
        self.runs.first().and_then(|run| run.text.as_deref())
    }
}

impl From<&Value> for RawText {
    fn from(value: &Value) -> Self {
        let runs = value
            .get("R")
            .and_then(Value::as_array)
            .map(|runs| runs.iter().map(RawRun::from).collect())
            .unwrap_or_default();

        Self {
            x: coordinate(value, "x", "X"),
            y: coordinate(value, "y", "Y"),
            runs,
        }
    }
}

/// One styled run of a text fragment.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RawRun {
    /// Percent-encoded text
    #[serde(rename = "T", skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

impl From<&Value> for RawRun {
    fn from(value: &Value) -> Self {
        Self {
            text: value.get("T").and_then(Value::as_str).map(str::to_string),
        }
    }
}

/// Lowercase key wins unless it is absent or zero, then the uppercase key.
fn coordinate(value: &Value, lower: &str, upper: &str) -> Option<f64> {
    let read = |key: &str| value.get(key).and_then(Value::as_f64);
    let primary = read(lower);
    primary
        .filter(|n| *n != 0.0)
        .or_else(|| read(upper))
        .or(primary)
}
