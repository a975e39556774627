//! Benchmarks for exampage analysis throughput.
//!
//! Run with: cargo bench

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use exampage::model::{RawDocument, RawPage, RawText};
use exampage::{Analyzer, BatchOptions, JsonDump};

/// A decoded exam with question text, markers and a footer number per page.
fn create_raw_exam(page_count: usize) -> RawDocument {
    let pages = (1..=page_count)
        .map(|p| {
            let mut texts = vec![RawText::new(60.0, 60.0, "Candidate%20number")];
            for q in 0..4 {
                let number = (p - 1) * 4 + q + 1;
                texts.push(RawText::new(
                    60.0,
                    120.0 + q as f64 * 150.0,
                    format!("Q{}", number),
                ));
                texts.push(RawText::new(
                    90.0,
                    140.0 + q as f64 * 150.0,
                    "Explain%20your%20answer%20with%20reference%20to%20the%20diagram.",
                ));
            }
            texts.push(RawText::new(298.0, 770.0, format!("Page%20{}", p)));
            RawPage::new(texts)
        })
        .collect();
    RawDocument::new(pages)
}

/// Benchmark the layout pipeline at various document sizes.
fn bench_analyze(c: &mut Criterion) {
    let mut group = c.benchmark_group("analyze");
    let analyzer = Analyzer::default();

    for page_count in [1, 20, 100].iter() {
        let raw = create_raw_exam(*page_count);
        group.bench_function(format!("{}_pages", page_count), |b| {
            b.iter(|| analyzer.analyze_raw("bench.pdf", black_box(&raw)));
        });
    }

    group.finish();
}

/// Benchmark batch fan-out, parallel vs sequential.
fn bench_batch(c: &mut Criterion) {
    let json = create_raw_exam(40).to_json_string().unwrap();
    let dumps: Vec<JsonDump> = (0..10)
        .map(|i| JsonDump::new(format!("paper{}.json", i), json.clone()))
        .collect();

    let mut group = c.benchmark_group("batch");
    group.bench_function("parallel", |b| {
        let options = BatchOptions::new();
        b.iter(|| exampage::analyze_batch(black_box(&dumps), &options));
    });
    group.bench_function("sequential", |b| {
        let options = BatchOptions::new().sequential();
        b.iter(|| exampage::analyze_batch(black_box(&dumps), &options));
    });
    group.finish();
}

/// Benchmark PDF format detection.
fn bench_format_detection(c: &mut Criterion) {
    let header = b"%PDF-1.7\n%\xE2\xE3\xCF\xD3\n";
    let non_pdf_data = b"Not a PDF file at all, just random text content";

    c.bench_function("detect_valid_pdf", |b| {
        b.iter(|| exampage::detect_format_from_bytes(black_box(header)).unwrap());
    });

    c.bench_function("detect_non_pdf", |b| {
        b.iter(|| exampage::detect_format_from_bytes(black_box(non_pdf_data)).is_err());
    });
}

criterion_group!(benches, bench_analyze, bench_batch, bench_format_detection);
criterion_main!(benches);
