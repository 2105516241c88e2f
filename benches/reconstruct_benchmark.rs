//! Benchmarks for unplate cleaning performance.
//!
//! Run with: cargo bench
//!
//! These benchmarks run on synthetic documents with running headers,
//! numbered footers and one table per page.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use unplate::{Document, Engine, EngineOptions, Page, RawTable, TextFragment};

/// Creates a synthetic document with the given number of pages.
fn create_test_document(page_count: u32) -> Document {
    let mut doc = Document::new();
    for n in 1..=page_count {
        let mut page = Page::letter(n);
        page.push_line("Northwind Trust — Quarterly Statement", 72.0, 30.0);
        for line in 0..30 {
            page.push_line(
                format!("Paragraph line {} of page {} with some ordinary body text.", line, n),
                72.0,
                100.0 + line as f32 * 14.0,
            );
        }

        let base = page.fragments.len() as u32;
        for row in 0..4u32 {
            for col in 0..3u32 {
                page.add_fragment(TextFragment::new(
                    format!("r{}c{}", row, col),
                    110.0 + col as f32 * 100.0,
                    545.0 + row as f32 * 20.0,
                    base + row,
                ));
            }
        }
        let rows: Vec<Vec<String>> = (0..4)
            .map(|row| (0..3).map(|col| format!("r{}c{}", row, col)).collect())
            .collect();
        page.add_table(RawTable::from_grid((100.0, 540.0), 100.0, 20.0, &rows));

        page.push_line(format!("Confidential — Page {}", n), 72.0, 760.0);
        doc.add_page(page);
    }
    doc
}

/// Benchmark whole-document processing at various sizes.
fn bench_processing(c: &mut Criterion) {
    let mut group = c.benchmark_group("process");

    for page_count in [1, 10, 50].iter() {
        let doc = create_test_document(*page_count);
        let parallel = Engine::new(EngineOptions::default()).unwrap();
        let sequential = Engine::new(EngineOptions::new().sequential()).unwrap();

        group.bench_function(format!("{}_pages_parallel", page_count), |b| {
            b.iter(|| parallel.process(black_box(&doc)));
        });
        group.bench_function(format!("{}_pages_sequential", page_count), |b| {
            b.iter(|| sequential.process(black_box(&doc)));
        });
    }

    group.finish();
}

/// Benchmark the cross-page line analysis alone.
fn bench_analysis(c: &mut Criterion) {
    let doc = create_test_document(50);
    let analyzer = unplate::LineFrequencyAnalyzer::new(Default::default()).unwrap();

    c.bench_function("analyze_50_pages", |b| {
        b.iter(|| analyzer.analyze(black_box(&doc.pages)));
    });
}

/// Benchmark builder pattern overhead.
fn bench_builder_creation(c: &mut Criterion) {
    c.bench_function("builder_creation", |b| {
        b.iter(|| {
            let _builder = unplate::Unplate::new()
                .with_band_height(60.0)
                .with_frontmatter()
                .sequential();
        });
    });
}

criterion_group!(benches, bench_processing, bench_analysis, bench_builder_creation);
criterion_main!(benches);
