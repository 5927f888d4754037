// benches/engine_bench.rs
//! Serial vs multicore engine comparison on a sampling workload

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use rand::Rng;
use renderflow::{MulticoreEngine, RenderEngine, SerialEngine, WorkerContext};

const TASKS: usize = 64;
const SAMPLES_PER_TASK: u64 = 20_000;

fn sample(samples: u64, context: &mut WorkerContext) -> f64 {
    let rng = context.rng();
    let mut acc = 0.0;
    for _ in 0..samples {
        let x: f64 = rng.gen();
        acc += x * x;
    }
    acc / samples as f64
}

fn bench_engines(c: &mut Criterion) {
    let mut group = c.benchmark_group("render_engines");
    group.throughput(Throughput::Elements(TASKS as u64 * SAMPLES_PER_TASK));

    group.bench_function("serial", |b| {
        let engine = SerialEngine::new();
        b.iter(|| {
            let mut total = 0.0;
            engine
                .run(vec![SAMPLES_PER_TASK; TASKS], &sample, &mut |r| total += r)
                .unwrap();
            total
        });
    });

    for workers in [2usize, 4, 8] {
        group.bench_with_input(
            BenchmarkId::new("multicore", workers),
            &workers,
            |b, &workers| {
                let engine = MulticoreEngine::with_processes(workers).unwrap();
                b.iter(|| {
                    let mut total = 0.0;
                    engine
                        .run(vec![SAMPLES_PER_TASK; TASKS], &sample, &mut |r| total += r)
                        .unwrap();
                    total
                });
            },
        );
    }

    group.finish();
}

criterion_group!(benches, bench_engines);
criterion_main!(benches);
