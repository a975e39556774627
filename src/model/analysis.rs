//! Analysis results.
//!
//! Field names serialize in camelCase; downstream consumers depend on the
//! exact names.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// One page's inferred printed number and question markers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageAnalysis {
    /// Printed page number, if one could be resolved
    pub printed_page: Option<u32>,
    /// `"first"` or `"first-last"` of the question markers, `None` without markers
    pub range: Option<String>,
    /// Question numbers starting on this page, first occurrence order
    pub question_starts: Vec<u32>,
}

/// The analysis of one document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentAnalysis {
    pub file_name: String,
    pub total_pages: usize,
    pub printed_page_sequence: Vec<Option<u32>>,
    pub page_summary: Vec<PageAnalysis>,
}

impl DocumentAnalysis {
    /// Build an analysis from per-page results, keeping the sequence and
    /// the summary in lockstep.
    pub fn from_pages(file_name: impl Into<String>, page_summary: Vec<PageAnalysis>) -> Self {
        Self {
            file_name: file_name.into(),
            total_pages: page_summary.len(),
            printed_page_sequence: page_summary.iter().map(|p| p.printed_page).collect(),
            page_summary,
        }
    }

    /// Printed page numbers absent between the lowest and highest resolved
    /// number.
    pub fn missing_pages(&self) -> Vec<u32> {
        let seen: BTreeSet<u32> = self.printed_page_sequence.iter().flatten().copied().collect();
        missing_between(&seen)
    }

    /// Question numbers absent between the lowest and highest marker found
    /// anywhere in the document.
    pub fn question_gaps(&self) -> Vec<u32> {
        let seen: BTreeSet<u32> = self
            .page_summary
            .iter()
            .flat_map(|p| p.question_starts.iter().copied())
            .collect();
        missing_between(&seen)
    }

    /// Number of pages whose printed number could not be resolved.
    pub fn unresolved_pages(&self) -> usize {
        self.printed_page_sequence.iter().filter(|p| p.is_none()).count()
    }
}

fn missing_between(seen: &BTreeSet<u32>) -> Vec<u32> {
    match (seen.first(), seen.last()) {
        (Some(&first), Some(&last)) => (first..=last).filter(|n| !seen.contains(n)).collect(),
        _ => Vec::new(),
    }
}

/// Batch response: `{ "success": true, "results": [...] }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchResponse<T = DocumentAnalysis> {
    pub success: bool,
    pub results: Vec<T>,
}

impl<T> BatchResponse<T> {
    /// A response where every document went through.
    pub fn succeeded(results: Vec<T>) -> Self {
        Self {
            success: true,
            results,
        }
    }
}

/// Per-document entry of a partial-results batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DocumentReport {
    /// The document was analyzed.
    Analyzed(DocumentAnalysis),
    /// The document could not be decoded.
    #[serde(rename_all = "camelCase")]
    Failed { file_name: String, error: String },
}

impl DocumentReport {
    /// Whether this entry carries an analysis.
    pub fn is_analyzed(&self) -> bool {
        matches!(self, DocumentReport::Analyzed(_))
    }

    /// File name of the document this entry describes.
    pub fn file_name(&self) -> &str {
        match self {
            DocumentReport::Analyzed(analysis) => &analysis.file_name,
            DocumentReport::Failed { file_name, .. } => file_name,
        }
    }
}
