//! Benchmark for comparable selection over pools in the hundreds.
//!
//! The whole pipeline is expected to complete in well under a second for
//! realistic pool sizes; this tracks the selection stage, which dominates.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use valuation_engine::selection::select_top_comparables;
use valuation_engine::PropertyRecord;

fn synthetic_pool(size: usize) -> Vec<PropertyRecord> {
    (0..size)
        .map(|i| {
            let spread = (i % 37) as f64;
            PropertyRecord {
                address: format!("{i} Synthetic Way"),
                latitude: 30.20 + spread * 0.005,
                longitude: -97.80 + spread * 0.004,
                sqft: Some(1400.0 + spread * 60.0),
                bedrooms: 2.0 + (i % 4) as f64,
                bathrooms: 1.0 + (i % 3) as f64,
                year_built: Some(1960 + (i % 60) as i32),
                has_private_pool: i % 3 == 0,
                has_garage: i % 2 == 0,
                sale_price: Some(300_000.0 + spread * 12_000.0),
                days_since_sale: Some(15 + (i % 300) as i64),
                ..Default::default()
            }
        })
        .collect()
}

fn subject() -> PropertyRecord {
    PropertyRecord {
        address: "123 Main Street, Austin, TX 78701".into(),
        latitude: 30.2672,
        longitude: -97.7431,
        sqft: Some(2400.0),
        bedrooms: 4.0,
        bathrooms: 3.0,
        year_built: Some(2010),
        has_private_pool: true,
        has_garage: true,
        ..Default::default()
    }
}

fn bench_selection(c: &mut Criterion) {
    let subject = subject();
    let mut group = c.benchmark_group("select_top_comparables");

    for size in [50, 200, 500] {
        let pool = synthetic_pool(size);
        group.bench_with_input(BenchmarkId::from_parameter(size), &pool, |b, pool| {
            b.iter(|| select_top_comparables(black_box(&subject), black_box(pool), 5));
        });
    }
    group.finish();
}

criterion_group!(benches, bench_selection);
criterion_main!(benches);
