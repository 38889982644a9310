//! Performance benchmarks for payload construction and statistics reduction

use criterion::{criterion_group, criterion_main, Criterion};
use std::hint::black_box;
use rtt_bench::models::{ResultSet, Sample};
use rtt_bench::stats::analyze_result_set;
use rtt_bench::types::{create_payload, validate_payload, Outcome};
use std::time::Duration;

fn bench_payload(c: &mut Criterion) {
    c.bench_function("create_payload_64k", |b| {
        b.iter(|| create_payload(black_box(65536)))
    });

    let payload = create_payload(65536);
    let echoed = payload.clone();
    c.bench_function("validate_payload_64k", |b| {
        b.iter(|| validate_payload(black_box(&payload), black_box(&echoed)))
    });
}

fn bench_stats(c: &mut Criterion) {
    // Default sweep shape: 18 sizes, 1000 measurements each
    let mut set = ResultSet::new("bench_client");
    for exp in 0..18u32 {
        let size = 1usize << exp;
        for iteration in 1..=1000u32 {
            let outcome = if iteration % 97 == 0 {
                Outcome::Timeout
            } else {
                Outcome::Ok
            };
            set.push(Sample {
                size,
                iteration,
                rtt: Duration::from_micros(100 + (iteration as u64 * 7) % 500),
                outcome,
            });
        }
    }
    set.seal();

    c.bench_function("analyze_result_set_18x1000", |b| {
        b.iter(|| analyze_result_set(black_box(&set)))
    });
}

criterion_group!(benches, bench_payload, bench_stats);
criterion_main!(benches);
