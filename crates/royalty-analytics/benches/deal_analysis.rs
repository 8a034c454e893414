//! Benchmarks for the deal analysis pipeline.
//!
//! Run with: cargo bench -p royalty-analytics

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};

use royalty_analytics::prelude::*;

// =============================================================================
// TEST DATA GENERATORS
// =============================================================================

/// Monthly payouts over `years` years, drifting by `drift` a year.
fn monthly_records(years: i32, drift: f64) -> Vec<EarningsRecord> {
    (0..years)
        .flat_map(|y| {
            (0..12).map(move |m| {
                let wobble = f64::from((y * 7 + m * 3) % 11) * 4.0;
                EarningsRecord::new(2000 + y, (900.0 + drift * f64::from(y)) / 12.0 + wobble)
            })
        })
        .collect()
}

fn priced_request(records: Vec<EarningsRecord>, years_remaining: u32) -> DealRequest {
    DealRequest::new(records, years_remaining).with_prices(ListingPrices {
        listing_price: 6_000.0,
        min_bid: 5_000.0,
        last_transaction: 6_500.0,
        marketplace_median: 6_200.0,
    })
}

// =============================================================================
// BENCHMARKS
// =============================================================================

fn bench_analyze_deal(c: &mut Criterion) {
    let mut group = c.benchmark_group("analyze_deal");

    for history in [3, 10, 25] {
        let growing = priced_request(monthly_records(history, 15.0), 10);
        group.bench_with_input(BenchmarkId::new("linear", history), &growing, |b, req| {
            b.iter(|| analyze_deal(black_box(req)));
        });

        let decaying = priced_request(monthly_records(history, -400.0 / f64::from(history)), 10);
        group.bench_with_input(BenchmarkId::new("decay", history), &decaying, |b, req| {
            b.iter(|| analyze_deal(black_box(req)));
        });
    }

    group.finish();
}

fn bench_implied_return(c: &mut Criterion) {
    let settings = SolverSettings::default();
    let flows: Vec<f64> = (0..20).map(|i| 1_000.0 - 30.0 * f64::from(i)).collect();

    c.bench_function("implied_return_20y", |b| {
        b.iter(|| implied_return(black_box(&flows), black_box(7_500.0), &settings));
    });
}

criterion_group!(benches, bench_analyze_deal, bench_implied_return);
criterion_main!(benches);
