//! End-to-end analysis of synthetic exam PDFs.

mod common;

use std::fs;

use common::{exam_pdf, sample_paper};
use exampage::layout::{extract_document, VerticalZone};
use exampage::render::{to_json, JsonFormat};
use exampage::{
    analyze_bytes, analyze_file, decode_file, Analyzer, Error, ExamPage, LayoutConfig,
    LopdfDecoder, PdfDecoder, RawDocument,
};

#[test]
fn test_sample_paper() {
    let analysis = analyze_bytes("paper2.pdf", &sample_paper()).unwrap();

    assert_eq!(analysis.file_name, "paper2.pdf");
    assert_eq!(analysis.total_pages, 5);
    assert_eq!(
        analysis.printed_page_sequence,
        vec![None, Some(2), Some(3), Some(4), None]
    );

    let summary = &analysis.page_summary;
    assert!(summary[0].question_starts.is_empty());
    assert_eq!(summary[1].question_starts, vec![1, 2]);
    assert_eq!(summary[1].range.as_deref(), Some("1-2"));
    assert_eq!(summary[2].range.as_deref(), Some("3-4"));
    assert_eq!(summary[3].question_starts, vec![5]);
    assert_eq!(summary[4].range, None);

    assert!(analysis.missing_pages().is_empty());
    assert!(analysis.question_gaps().is_empty());
}

#[test]
fn test_convention_is_bottom() {
    let raw = LopdfDecoder::new().decode_bytes(&sample_paper()).unwrap();
    let doc = extract_document("paper2.pdf", &raw);
    let convention = Analyzer::default().convention(&doc).unwrap();
    assert_eq!(convention.vertical, VerticalZone::Bottom);
    assert!(convention.y > 800.0);
}

#[test]
fn test_header_numbers() {
    let pdf = exam_pdf(&[
        Some(&[(520, 810, "1"), (60, 700, "Q1")]),
        Some(&[(520, 810, "2"), (60, 700, "Q3")]),
        Some(&[(520, 810, "4"), (60, 700, "Q4")]),
    ]);
    let analysis = analyze_bytes("header.pdf", &pdf).unwrap();
    assert_eq!(
        analysis.printed_page_sequence,
        vec![Some(1), Some(2), Some(4)]
    );
    assert_eq!(analysis.missing_pages(), vec![3]);
    assert_eq!(analysis.question_gaps(), vec![2]);
}

#[test]
fn test_no_page_numbers_anywhere() {
    let pdf = exam_pdf(&[Some(&[(60, 700, "Q1 Explain")]), Some(&[(60, 700, "Turn over")])]);
    let analysis = analyze_bytes("plain.pdf", &pdf).unwrap();
    assert_eq!(analysis.printed_page_sequence, vec![None, None]);
    assert_eq!(analysis.page_summary[0].question_starts, vec![1]);
}

#[test]
fn test_analyze_file_uses_file_name() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("biology-p1.pdf");
    fs::write(&path, sample_paper()).unwrap();

    let analysis = analyze_file(&path).unwrap();
    assert_eq!(analysis.file_name, "biology-p1.pdf");
    assert_eq!(analysis.total_pages, 5);
}

#[test]
fn test_decode_file_round_trips_through_json() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("paper.pdf");
    fs::write(&path, sample_paper()).unwrap();

    let raw = decode_file(&path).unwrap();
    let dump = raw.to_json_string().unwrap();
    let reloaded = RawDocument::from_json_str(&dump).unwrap();

    let from_pdf = Analyzer::default().analyze_raw("paper.pdf", &raw);
    let from_dump = Analyzer::default().analyze_raw("paper.pdf", &reloaded);
    assert_eq!(from_pdf, from_dump);
}

#[test]
fn test_custom_geometry() {
    // Numbers at or above the configured maximum never resolve.
    let pdf = exam_pdf(&[Some(&[(290, 40, "7")]), Some(&[(290, 40, "- 8 -")])]);
    let config = LayoutConfig::default().with_max_page_number(8);
    let analysis = ExamPage::new()
        .with_layout(config)
        .analyze_bytes("small.pdf", &pdf)
        .unwrap();
    assert_eq!(analysis.printed_page_sequence, vec![Some(7), None]);
}

#[test]
fn test_garbage_is_rejected() {
    let err = analyze_bytes("photo.jpg", &[0xFF, 0xD8, 0xFF, 0xE0]).unwrap_err();
    assert!(matches!(err, Error::UnknownFormat));

    let err = analyze_bytes("broken.pdf", b"%PDF-1.7\nthis is not a pdf").unwrap_err();
    assert!(!err.is_validation());
}

#[test]
fn test_json_output_shape() {
    let analysis = analyze_bytes("paper2.pdf", &sample_paper()).unwrap();
    let json = to_json(&analysis, JsonFormat::Compact).unwrap();
    assert!(json.starts_with(
        r#"{"fileName":"paper2.pdf","totalPages":5,"printedPageSequence":[null,2,3,4,null]"#
    ));
    assert!(json.contains(r#"{"printedPage":2,"range":"1-2","questionStarts":[1,2]}"#));
}
