// Benchmark for the decision rule and history buffer
// Run with: cargo bench

use chrono::Local;
use criterion::{Criterion, criterion_group, criterion_main};
use hearth_rs::control::{HistoryBuffer, Reading, decide};
use std::hint::black_box;

fn bench_decide(c: &mut Criterion) {
    let readings: Vec<Option<f64>> = (0..10_000)
        .map(|i| if i % 97 == 0 { None } else { Some(19.0 + (i % 60) as f64 * 0.1) })
        .collect();
    c.bench_function("decide over 10k readings", |b| {
        b.iter(|| {
            let mut output = false;
            for r in &readings {
                output = decide(black_box(*r), 22.0, output);
            }
            output
        });
    });
}

fn bench_history_push(c: &mut Criterion) {
    let now = Local::now();
    c.bench_function("history push 10k into 120", |b| {
        b.iter(|| {
            let mut history = HistoryBuffer::new(120);
            for i in 0..10_000 {
                history.push(Reading::new(now, black_box(i as f64)));
            }
            history.len()
        });
    });
}

criterion_group!(benches, bench_decide, bench_history_push);
criterion_main!(benches);
