//! PDF decoder backed by lopdf.
//!
//! Interprets the text operators of each page's content stream and emits one
//! positioned fragment per show-text operation. The vertical axis is flipped
//! so `y` grows downward from the top edge of the MediaBox, and fragment text
//! is percent-encoded, matching the pdf2json interchange shape of
//! [`RawDocument`].

use std::path::Path;

use lopdf::{Dictionary, Document as LopdfDocument, Object, ObjectId, Stream};

use super::options::{DecodeOptions, ErrorMode};
use crate::detect::detect_format_from_bytes;
use crate::error::{Error, Result};
use crate::model::{RawDocument, RawPage, RawText};

/// Letter height, used when a page has no readable MediaBox.
const DEFAULT_PAGE_HEIGHT: f64 = 792.0;

/// Negative TJ adjustment (thousandths of an em) treated as a word gap.
const TJ_SPACE_THRESHOLD: f64 = 200.0;

/// Turns PDF bytes into decoded page structures.
pub trait PdfDecoder: Send + Sync {
    /// Decode an in-memory PDF.
    fn decode_bytes(&self, data: &[u8]) -> Result<RawDocument>;

    /// Decode a PDF file.
    fn decode_file(&self, path: &Path) -> Result<RawDocument> {
        let data = std::fs::read(path)?;
        self.decode_bytes(&data)
    }
}

/// [`PdfDecoder`] implemented on top of `lopdf`.
#[derive(Debug, Clone, Default)]
pub struct LopdfDecoder {
    options: DecodeOptions,
}

impl LopdfDecoder {
    /// Create a decoder with default (strict) options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a decoder with custom options.
    pub fn with_options(options: DecodeOptions) -> Self {
        Self { options }
    }

    /// Decode an already loaded lopdf document.
    pub fn decode_document(&self, doc: &LopdfDocument) -> Result<RawDocument> {
        let page_ids = doc.get_pages();
        let mut pages = Vec::with_capacity(page_ids.len());

        for (page_num, page_id) in page_ids {
            match decode_page(doc, page_id) {
                Ok(page) => pages.push(page),
                Err(e) if self.options.error_mode == ErrorMode::Lenient => {
                    log::warn!("Failed to decode page {}: {}", page_num, e);
                    pages.push(RawPage::default());
                }
                Err(e) => return Err(e),
            }
        }

        Ok(RawDocument::new(pages))
    }
}

impl PdfDecoder for LopdfDecoder {
    fn decode_bytes(&self, data: &[u8]) -> Result<RawDocument> {
        detect_format_from_bytes(data)?;
        let doc = LopdfDocument::load_mem(data)?;
        self.decode_document(&doc)
    }
}

fn decode_page(doc: &LopdfDocument, page_id: ObjectId) -> Result<RawPage> {
    let height = page_height(doc, page_id);
    let fonts = doc
        .get_page_fonts(page_id)
        .map_err(|e| Error::PdfParse(e.to_string()))?;

    let content = page_content(doc, page_id)?;
    if content.is_empty() {
        return Ok(RawPage::new(Vec::new()));
    }
    let content =
        lopdf::content::Content::decode(&content).map_err(|e| Error::PdfParse(e.to_string()))?;

    let mut texts = Vec::new();
    let mut state = GraphicsState::default();
    let mut saved: Vec<GraphicsState> = Vec::new();
    let mut matrix = Matrix::IDENTITY;
    let mut font_name: Vec<u8> = Vec::new();
    let mut in_text_block = false;

    for op in &content.operations {
        let shown = match op.operator.as_str() {
            "q" => {
                saved.push(state.clone());
                None
            }
            "Q" => {
                // Unbalanced Q leaves the state as is
                if let Some(previous) = saved.pop() {
                    state = previous;
                }
                None
            }
            "cm" => {
                if let Some(m) = Matrix::from_operands(&op.operands) {
                    state.ctm = m.multiply(&state.ctm);
                }
                None
            }
            "BT" => {
                in_text_block = true;
                matrix = Matrix::IDENTITY;
                None
            }
            "ET" => {
                in_text_block = false;
                None
            }
            "Tf" => {
                if let Some(Object::Name(name)) = op.operands.first() {
                    font_name = name.clone();
                }
                None
            }
            "TL" => {
                if let Some(leading) = op.operands.first().and_then(get_number) {
                    state.leading = leading;
                }
                None
            }
            "Td" | "TD" => {
                if op.operands.len() >= 2 {
                    let tx = get_number(&op.operands[0]).unwrap_or(0.0);
                    let ty = get_number(&op.operands[1]).unwrap_or(0.0);
                    if op.operator == "TD" {
                        state.leading = -ty;
                    }
                    matrix.translate(tx, ty);
                }
                None
            }
            "Tm" => {
                if let Some(m) = Matrix::from_operands(&op.operands) {
                    matrix = m;
                }
                None
            }
            "T*" => {
                matrix.translate(0.0, -state.leading);
                None
            }
            "Tj" => op
                .operands
                .first()
                .and_then(as_bytes)
                .map(|bytes| decode_string(doc, fonts.get(&font_name), bytes)),
            "TJ" => match op.operands.first() {
                Some(Object::Array(items)) => Some(decode_array(doc, fonts.get(&font_name), items)),
                _ => None,
            },
            "'" | "\"" => {
                matrix.translate(0.0, -state.leading);
                let text_idx = if op.operator == "\"" { 2 } else { 0 };
                op.operands
                    .get(text_idx)
                    .and_then(as_bytes)
                    .map(|bytes| decode_string(doc, fonts.get(&font_name), bytes))
            }
            _ => None,
        };

        if let Some(text) = shown {
            if in_text_block && !text.trim().is_empty() {
                // Text space origin mapped into user space, then flipped
                let (x, y) = state.ctm.apply(matrix.e, matrix.f);
                texts.push(RawText::new(x, height - y, urlencoding::encode(&text)));
            }
        }
    }

    Ok(RawPage::new(texts))
}

/// Page height from the MediaBox, following inherited attributes.
fn page_height(doc: &LopdfDocument, page_id: ObjectId) -> f64 {
    let mut current = doc.get_dictionary(page_id).ok();
    // Page tree depth is small in practice; bound the walk against cycles
    for _ in 0..16 {
        let Some(dict) = current else { break };
        if let Some(height) = media_box_height(doc, dict) {
            return height;
        }
        current = dict
            .get(b"Parent")
            .ok()
            .and_then(|p| p.as_reference().ok())
            .and_then(|r| doc.get_dictionary(r).ok());
    }
    DEFAULT_PAGE_HEIGHT
}

fn media_box_height(doc: &LopdfDocument, dict: &Dictionary) -> Option<f64> {
    let media_box = match dict.get(b"MediaBox").ok()? {
        Object::Reference(r) => doc.get_object(*r).ok()?,
        other => other,
    };
    let values = media_box.as_array().ok()?;
    if values.len() < 4 {
        return None;
    }
    let height = get_number(&values[3])? - get_number(&values[1])?;
    (height > 0.0).then_some(height)
}

/// Decompressed content stream bytes; empty for pages without content.
fn page_content(doc: &LopdfDocument, page_id: ObjectId) -> Result<Vec<u8>> {
    let page_dict = doc
        .get_dictionary(page_id)
        .map_err(|e| Error::PdfParse(e.to_string()))?;

    let Ok(contents) = page_dict.get(b"Contents") else {
        return Ok(Vec::new());
    };

    match contents {
        Object::Reference(r) => match doc.get_object(*r) {
            Ok(Object::Stream(s)) => stream_bytes(s),
            Ok(Object::Array(arr)) => Ok(concat_streams(doc, arr)),
            _ => Err(Error::PdfParse("Invalid content stream".to_string())),
        },
        Object::Array(arr) => Ok(concat_streams(doc, arr)),
        _ => Err(Error::PdfParse("Invalid content stream".to_string())),
    }
}

fn concat_streams(doc: &LopdfDocument, refs: &[Object]) -> Vec<u8> {
    let mut content = Vec::new();
    for obj in refs {
        if let Ok(r) = obj.as_reference() {
            if let Ok(Object::Stream(s)) = doc.get_object(r) {
                if let Ok(data) = stream_bytes(s) {
                    content.extend_from_slice(&data);
                    content.push(b' ');
                }
            }
        }
    }
    content
}

/// Stream data with filters applied; unfiltered streams are returned as is.
fn stream_bytes(stream: &Stream) -> Result<Vec<u8>> {
    if stream.dict.get(b"Filter").is_err() {
        return Ok(stream.content.clone());
    }
    stream
        .decompressed_content()
        .map_err(|e| Error::PdfParse(e.to_string()))
}

fn decode_string(doc: &LopdfDocument, font: Option<&&Dictionary>, bytes: &[u8]) -> String {
    if let Some(encoding) = font.and_then(|f| f.get_font_encoding(doc).ok()) {
        if let Ok(text) = LopdfDocument::decode_text(&encoding, bytes) {
            return text;
        }
    }
    decode_text_simple(bytes)
}

/// TJ array: strings interleaved with kerning adjustments.
fn decode_array(doc: &LopdfDocument, font: Option<&&Dictionary>, items: &[Object]) -> String {
    let mut combined = String::new();
    for item in items {
        match item {
            Object::String(bytes, _) => combined.push_str(&decode_string(doc, font, bytes)),
            other => {
                let Some(adjustment) = get_number(other) else {
                    continue;
                };
                if -adjustment > TJ_SPACE_THRESHOLD
                    && !combined.is_empty()
                    && !combined.ends_with(' ')
                {
                    combined.push(' ');
                }
            }
        }
    }
    combined
}

fn as_bytes(obj: &Object) -> Option<&[u8]> {
    match obj {
        Object::String(bytes, _) => Some(bytes),
        _ => None,
    }
}

fn get_number(obj: &Object) -> Option<f64> {
    match obj {
        Object::Integer(i) => Some(*i as f64),
        Object::Real(r) => Some(f64::from(*r)),
        _ => None,
    }
}

/// Fallback decoding when a font has no usable encoding.
fn decode_text_simple(bytes: &[u8]) -> String {
    if bytes.len() >= 2 && bytes[0] == 0xFE && bytes[1] == 0xFF {
        let utf16: Vec<u16> = bytes[2..]
            .chunks_exact(2)
            .map(|c| u16::from_be_bytes([c[0], c[1]]))
            .collect();
        return String::from_utf16_lossy(&utf16);
    }

    if let Ok(s) = std::str::from_utf8(bytes) {
        return s.to_string();
    }

    // Latin-1
    bytes.iter().map(|&b| b as char).collect()
}

/// Affine transform `[a b c d e f]`, as operands of `cm` and `Tm`.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Matrix {
    a: f64,
    b: f64,
    c: f64,
    d: f64,
    e: f64, // X translation
    f: f64, // Y translation
}

impl Matrix {
    const IDENTITY: Self = Self {
        a: 1.0,
        b: 0.0,
        c: 0.0,
        d: 1.0,
        e: 0.0,
        f: 0.0,
    };

    fn from_operands(operands: &[Object]) -> Option<Self> {
        if operands.len() < 6 {
            return None;
        }
        let n: Vec<f64> = operands
            .iter()
            .take(6)
            .map(|o| get_number(o).unwrap_or(0.0))
            .collect();
        Some(Self {
            a: n[0],
            b: n[1],
            c: n[2],
            d: n[3],
            e: n[4],
            f: n[5],
        })
    }

    /// `self × other`: applies `self` first, then `other`.
    fn multiply(&self, other: &Matrix) -> Matrix {
        Matrix {
            a: self.a * other.a + self.b * other.c,
            b: self.a * other.b + self.b * other.d,
            c: self.c * other.a + self.d * other.c,
            d: self.c * other.b + self.d * other.d,
            e: self.e * other.a + self.f * other.c + other.e,
            f: self.e * other.b + self.f * other.d + other.f,
        }
    }

    /// Move the origin by `(tx, ty)` in the matrix's own space.
    fn translate(&mut self, tx: f64, ty: f64) {
        self.e += tx * self.a + ty * self.c;
        self.f += tx * self.b + ty * self.d;
    }

    fn apply(&self, x: f64, y: f64) -> (f64, f64) {
        (
            self.a * x + self.c * y + self.e,
            self.b * x + self.d * y + self.f,
        )
    }
}

/// The part of the graphics state that `q`/`Q` save and restore.
///
/// Leading lives here rather than in the text matrix: it survives `BT`/`ET`
/// and starts at zero.
#[derive(Debug, Clone)]
struct GraphicsState {
    ctm: Matrix,
    leading: f64,
}

impl Default for GraphicsState {
    fn default() -> Self {
        Self {
            ctm: Matrix::IDENTITY,
            leading: 0.0,
        }
    }
}
