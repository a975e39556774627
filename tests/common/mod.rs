//! Synthetic exam PDFs for integration tests.

#![allow(dead_code)]

use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, Stream};

/// A4 height in points.
pub const PAGE_HEIGHT: i64 = 842;

/// One text fragment in PDF user space (origin bottom-left).
pub type Fragment<'a> = (i64, i64, &'a str);

/// Build a PDF with one page per entry. `None` produces a page without a
/// content stream.
pub fn exam_pdf(pages: &[Option<&[Fragment<'_>]>]) -> Vec<u8> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! { "F1" => font_id },
    });

    let mut kids: Vec<Object> = Vec::new();
    for fragments in pages {
        let mut page = dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Resources" => resources_id,
        };
        if let Some(fragments) = fragments {
            let mut operations = Vec::new();
            for (x, y, text) in fragments.iter() {
                operations.push(Operation::new("BT", vec![]));
                operations.push(Operation::new("Tf", vec!["F1".into(), 11.into()]));
                operations.push(Operation::new("Td", vec![(*x).into(), (*y).into()]));
                operations.push(Operation::new("Tj", vec![Object::string_literal(*text)]));
                operations.push(Operation::new("ET", vec![]));
            }
            let content = Content { operations };
            let content_id =
                doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
            page.set("Contents", content_id);
        }
        kids.push(doc.add_object(page).into());
    }

    let count = kids.len() as i64;
    let pages = dictionary! {
        "Type" => "Pages",
        "Kids" => kids,
        "Count" => count,
        "MediaBox" => vec![0.into(), 0.into(), 595.into(), PAGE_HEIGHT.into()],
    };
    doc.objects.insert(pages_id, Object::Dictionary(pages));
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut buf = Vec::new();
    doc.save_to(&mut buf).unwrap();
    buf
}

/// A five-page paper: cover, three numbered pages of questions, blank page.
pub fn sample_paper() -> Vec<u8> {
    exam_pdf(&[
        Some(&[(60, 760, "Mathematics Paper 2"), (60, 700, "Answer all questions.")]),
        Some(&[
            (60, 742, "1 Simplify the expression."),
            (60, 600, "Q1"),
            (60, 400, "Q2"),
            (290, 40, "2"),
        ]),
        Some(&[(60, 742, "Question 3"), (60, 500, "Q4"), (290, 40, "3")]),
        Some(&[(60, 742, "Q.5 Show that"), (292, 41, "Page 4")]),
        None,
    ])
}
