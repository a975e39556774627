//! Document-level types.

use super::Page;

/// A document ready for layout analysis: a display name plus its pages in
/// file order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PdfDocument {
    name: String,
    pages: Vec<Page>,
}

impl PdfDocument {
    /// Create a document from pages in file order.
    pub fn new(name: impl Into<String>, pages: Vec<Page>) -> Self {
        Self {
            name: name.into(),
            pages,
        }
    }

    /// Display name (usually the original upload file name).
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Pages in file order.
    pub fn pages(&self) -> &[Page] {
        &self.pages
    }

    /// Get the number of pages in the document.
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Get a page by position (1-indexed).
    pub fn get_page(&self, page_num: usize) -> Option<&Page> {
        page_num.checked_sub(1).and_then(|i| self.pages.get(i))
    }

    /// Check if the document has any pages.
    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::TextToken;

    #[test]
    fn test_document_new() {
        let doc = PdfDocument::new("empty.pdf", Vec::new());
        assert!(doc.is_empty());
        assert_eq!(doc.page_count(), 0);
        assert_eq!(doc.name(), "empty.pdf");
    }

    #[test]
    fn test_get_page_is_one_indexed() {
        let page = Page::new(vec![TextToken::new(0.0, 0.0, "1")]);
        let doc = PdfDocument::new("a.pdf", vec![Page::default(), page.clone()]);
        assert!(doc.get_page(0).is_none());
        assert_eq!(doc.get_page(2), Some(&page));
        assert!(doc.get_page(3).is_none());
    }
}
