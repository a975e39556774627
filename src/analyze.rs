//! Per-document analysis: convention, printed numbers and question markers.

use crate::layout::{
    extract_document, question_range, question_starts, LayoutConfig, PageNumberConvention,
    PageNumberLocator, PageNumberResolver, PatternSet,
};
use crate::model::{DocumentAnalysis, PageAnalysis, PdfDocument, RawDocument};

/// Runs the layout pipeline over whole documents.
///
/// Holds no per-document state; one analyzer can serve any number of
/// documents, sequentially or from several threads.
#[derive(Debug, Clone)]
pub struct Analyzer {
    config: LayoutConfig,
    patterns: &'static PatternSet,
}

impl Analyzer {
    /// Create an analyzer with the given layout geometry.
    pub fn new(config: LayoutConfig) -> Self {
        Self {
            config,
            patterns: PatternSet::shared(),
        }
    }

    /// Layout geometry in use.
    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    /// The page-number convention of a document, if one can be inferred.
    pub fn convention(&self, doc: &PdfDocument) -> Option<PageNumberConvention> {
        PageNumberLocator::new(&self.config, self.patterns).locate(doc.pages())
    }

    /// Analyze a tokenized document.
    pub fn analyze(&self, doc: &PdfDocument) -> DocumentAnalysis {
        let convention = self.convention(doc);
        let resolver = PageNumberResolver::new(&self.config, self.patterns, convention);

        let pages = doc
            .pages()
            .iter()
            .enumerate()
            .map(|(i, page)| {
                let found = resolver.resolve_detailed(page);
                if let Some(m) = found {
                    log::trace!(
                        "{} page {}: printed {} via {:?}/{:?}",
                        doc.name(),
                        i + 1,
                        m.value,
                        m.source,
                        m.pattern
                    );
                }

                let starts = question_starts(page, self.patterns);
                PageAnalysis {
                    printed_page: found.map(|m| m.value),
                    range: question_range(&starts),
                    question_starts: starts,
                }
            })
            .collect();

        let analysis = DocumentAnalysis::from_pages(doc.name(), pages);
        log::debug!(
            "Analyzed {}: {} pages, {} without printed number",
            analysis.file_name,
            analysis.total_pages,
            analysis.unresolved_pages()
        );
        analysis
    }

    /// Tokenize and analyze a decoded document.
    pub fn analyze_raw(&self, name: &str, raw: &RawDocument) -> DocumentAnalysis {
        self.analyze(&extract_document(name, raw))
    }
}

impl Default for Analyzer {
    fn default() -> Self {
        Self::new(LayoutConfig::default())
    }
}

/// Analyze a tokenized document with the given geometry.
pub fn analyze_document(doc: &PdfDocument, config: &LayoutConfig) -> DocumentAnalysis {
    Analyzer::new(config.clone()).analyze(doc)
}
