//! Token extraction: decoded page structures to positioned text tokens.

use crate::model::{Page, PdfDocument, RawDocument, RawPage, TextToken};

/// Percent-decode fragment text, returning the input unchanged when it is
/// not a well-formed encoding.
///
/// A `%` that does not start a two-digit hex escape, or escapes that do
/// not form valid UTF-8, leave the whole string verbatim.
pub fn decode_text_safe(text: &str) -> String {
    if has_malformed_escape(text) {
        return text.to_string();
    }
    match urlencoding::decode(text) {
        Ok(decoded) => decoded.into_owned(),
        Err(_) => text.to_string(),
    }
}

fn has_malformed_escape(text: &str) -> bool {
    let bytes = text.as_bytes();
    bytes.iter().enumerate().any(|(i, &b)| {
        b == b'%'
            && !(bytes.get(i + 1).is_some_and(u8::is_ascii_hexdigit)
                && bytes.get(i + 2).is_some_and(u8::is_ascii_hexdigit))
    })
}

/// Extract the tokens of one decoded page, in file order.
///
/// Never fails: a page without a fragment sequence has no tokens, missing
/// coordinates are 0 and missing text is empty.
pub fn extract_tokens(page: &RawPage) -> Vec<TextToken> {
    let Some(texts) = page.texts.as_deref() else {
        return Vec::new();
    };

    texts
        .iter()
        .map(|t| {
            TextToken::new(
                t.x.unwrap_or(0.0),
                t.y.unwrap_or(0.0),
                decode_text_safe(t.first_run_text().unwrap_or("")),
            )
        })
        .collect()
}

/// Extract every page of a decoded document.
pub fn extract_document(name: impl Into<String>, raw: &RawDocument) -> PdfDocument {
    let pages = raw
        .pages
        .iter()
        .map(|page| Page::new(extract_tokens(page)))
        .collect();
    PdfDocument::new(name, pages)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{RawRun, RawText};

    #[test]
    fn test_decode_text_safe() {
        assert_eq!(decode_text_safe("Page%201"), "Page 1");
        assert_eq!(decode_text_safe("%E2%80%93%204%20%E2%80%93"), "– 4 –");
        assert_eq!(decode_text_safe("plain"), "plain");
        assert_eq!(decode_text_safe("a+b"), "a+b");
    }

    #[test]
    fn test_decode_text_safe_failures_return_input() {
        assert_eq!(decode_text_safe("100%"), "100%");
        assert_eq!(decode_text_safe("%zz1"), "%zz1");
        assert_eq!(decode_text_safe("%FF%20x"), "%FF%20x");
    }

    #[test]
    fn test_extract_tokens_defaults() {
        let page = RawPage::new(vec![
            RawText::new(10.0, 20.0, "Q%201"),
            RawText {
                x: None,
                y: None,
                runs: vec![RawRun { text: None }],
            },
            RawText::default(),
        ]);
        let tokens = extract_tokens(&page);
        assert_eq!(tokens.len(), 3);
        assert_eq!(tokens[0], TextToken::new(10.0, 20.0, "Q 1"));
        assert_eq!(tokens[1], TextToken::new(0.0, 0.0, ""));
        assert_eq!(tokens[2], TextToken::new(0.0, 0.0, ""));
    }

    #[test]
    fn test_extract_tokens_without_sequence() {
        assert!(extract_tokens(&RawPage::default()).is_empty());
    }

    #[test]
    fn test_extract_document_keeps_page_order() {
        let raw = RawDocument::new(vec![
            RawPage::new(vec![RawText::new(0.0, 0.0, "1")]),
            RawPage::default(),
            RawPage::new(vec![RawText::new(0.0, 0.0, "3")]),
        ]);
        let doc = extract_document("exam.pdf", &raw);
        assert_eq!(doc.page_count(), 3);
        assert_eq!(doc.pages()[0].tokens()[0].text, "1");
        assert!(doc.pages()[1].is_empty());
        assert_eq!(doc.pages()[2].tokens()[0].text, "3");
    }
}
