use criterion::{Criterion, criterion_group, criterion_main};
use crokinole_core::*;
use std::hint::black_box;

fn classify_concentric(c: &mut Criterion) {
    let classifier = ZoneClassifier::new(ReferenceSurface::concentric());
    let points: Vec<_> = (0..500)
        .map(|i| Point::new(f64::from(i) * 1.2, f64::from(i)))
        .collect();

    c.bench_function("classify_concentric", |b| {
        b.iter(|| {
            points
                .iter()
                .map(|&point| classifier.classify(black_box(point)).points as u32)
                .sum::<u32>()
        })
    });
}

fn classify_tolerant(c: &mut Criterion) {
    // every sample misses the exact table and has to scan with tolerance
    let surface = ReferenceSurface::filled(CANONICAL_SIZE, Rgb(3, 188, 252)).unwrap();
    let classifier = ZoneClassifier::new(surface);

    c.bench_function("classify_tolerant", |b| {
        b.iter(|| classifier.classify(black_box(Point::new(300.0, 250.0))))
    });
}

criterion_group!(benches, classify_concentric, classify_tolerant);
criterion_main!(benches);
