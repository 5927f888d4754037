// src/main.rs
//! Renderflow demo workload
//!
//! Estimates π by Monte-Carlo sampling through the configured engine
//! backend. Doubles as a smoke test for worker scheduling and per-worker
//! randomness: a correlated random stream across workers shows up as a
//! biased estimate.

use anyhow::Result;
use rand::Rng;
use renderflow::utils::telemetry::init_tracing;
use renderflow::{EngineConfig, WorkerContext};
use std::time::Instant;
use tracing::info;

const TASKS: usize = 256;
const SAMPLES_PER_TASK: u64 = 100_000;

fn sample_circle(samples: u64, context: &mut WorkerContext) -> u64 {
    let rng = context.rng();
    let mut hits = 0;
    for _ in 0..samples {
        let x: f64 = rng.gen();
        let y: f64 = rng.gen();
        if x * x + y * y <= 1.0 {
            hits += 1;
        }
    }
    hits
}

fn main() -> Result<()> {
    init_tracing();
    info!("Starting renderflow demo v{}", env!("CARGO_PKG_VERSION"));

    let config = EngineConfig::load()?;
    info!("Configuration loaded: {:?}", config);

    let engine = config.build_engine::<u64, u64>()?;
    info!("Engine ready with {} workers", engine.worker_count());

    let tasks = vec![SAMPLES_PER_TASK; TASKS];
    let mut hits = 0u64;

    let started = Instant::now();
    engine.run(tasks, &sample_circle, &mut |task_hits| hits += task_hits)?;
    let elapsed = started.elapsed();

    let total_samples = TASKS as u64 * SAMPLES_PER_TASK;
    let estimate = 4.0 * hits as f64 / total_samples as f64;
    info!(
        "Render complete: pi ~= {:.6} from {} samples in {:?}",
        estimate, total_samples, elapsed
    );

    Ok(())
}
