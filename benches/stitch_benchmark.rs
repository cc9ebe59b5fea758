//! Benchmarks for the extraction core.
//!
//! Run with: cargo bench
//!
//! Inputs are synthetic pages and fragments, so no PDF decoding is measured.

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use gradesheet::extract::stitch::GRADE_HEADER;
use gradesheet::{DocumentSegmenter, FieldMatcher, PageText, TableFragment, TableStitcher};

/// Fragments of a grade table split over `pages` pages, 20 rows each.
fn grade_pages(pages: usize) -> Vec<Vec<TableFragment>> {
    (0..pages)
        .map(|p| {
            let mut rows: Vec<Vec<String>> = Vec::new();
            if p == 0 {
                rows.push(GRADE_HEADER.iter().map(|s| s.to_string()).collect());
            }
            for r in 0..20 {
                let subject = if r % 5 == 4 {
                    format!("Moyenne bloc {}", r)
                } else {
                    format!("UE{}{:02} Matière {}", p, r, r)
                };
                rows.push(vec![
                    subject,
                    "12/20".to_string(),
                    "Validé".to_string(),
                    format!("S{}", p % 2 + 1),
                    "3".to_string(),
                ]);
            }
            vec![TableFragment::from_strings(rows)]
        })
        .collect()
}

/// A cover page followed by `students` students of 3 pages each.
fn student_pages(students: usize) -> Vec<PageText> {
    let mut pages = vec![PageText::new(["Relevés de notes", "Promotion 2024"])];
    for s in 0..students {
        for _ in 0..3 {
            pages.push(PageText::new([
                "Université".to_string(),
                "Session unique 2023-2024".to_string(),
                format!("Étudiant {}", s),
                "Licence".to_string(),
                format!("N° Etudiant: {}", 1000 + s),
                format!("INE: X{:06}", s),
                "Né le 1 janvier 2000 à Lyon".to_string(),
            ]));
        }
    }
    pages
}

/// Benchmark table stitching at various document sizes.
fn bench_stitching(c: &mut Criterion) {
    let mut group = c.benchmark_group("stitching");
    let stitcher = TableStitcher::default();

    for pages in [1, 10, 50].iter() {
        let data = grade_pages(*pages);
        group.bench_function(format!("{}_pages", pages), |b| {
            b.iter(|| stitcher.stitch(black_box(&data).iter().map(Vec::as_slice)));
        });
    }

    group.finish();
}

/// Benchmark field matching on one page.
fn bench_field_matching(c: &mut Criterion) {
    let matcher = FieldMatcher::new();
    let page = &student_pages(1)[1];

    c.bench_function("match_page", |b| {
        b.iter(|| matcher.match_page(black_box(page)));
    });
}

/// Benchmark segmentation of a multi-student document.
fn bench_segmentation(c: &mut Criterion) {
    let segmenter = DocumentSegmenter::new();
    let pages = student_pages(100);

    c.bench_function("segment_100_students", |b| {
        b.iter(|| segmenter.segment(black_box(&pages)));
    });
}

criterion_group!(
    benches,
    bench_stitching,
    bench_field_matching,
    bench_segmentation,
);
criterion_main!(benches);
