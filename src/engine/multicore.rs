// src/engine/multicore.rs
//! Multicore render engine
//!
//! Distributes tasks across a fixed-size pool of worker threads:
//!
//! ```text
//! caller ──run()──▶ Producer ──▶ [task channel] ──▶ Worker 0..W
//!                                                      │ render(task)
//!   update(result) ◀── consumer ◀── [result channel] ◀─┘
//! ```
//!
//! One producer thread feeds the task channel in submission order, `W`
//! workers race to consume from it, and the calling thread drains exactly
//! one outcome per task from the result channel before signalling shutdown.
//! Workers terminate on a dedicated sentinel, one per worker, and every
//! spawned thread is joined before `run` returns.

use crate::engine::context::WorkerContext;
use crate::engine::interface::{
    panic_message, RenderEngine, RenderFn, TaskFault, TaskOutcome, UpdateFn,
};
use crate::utils::errors::{EngineError, Result};
use crossbeam_channel::{unbounded, Receiver, Sender};
use std::num::NonZeroUsize;
use std::panic::{self, AssertUnwindSafe};
use std::thread;
use tracing::{debug, trace, warn};

/// Configuration for the multicore engine
#[derive(Debug, Clone, Default)]
pub struct MulticoreConfig {
    /// Worker count; `None` selects the host's logical core count
    pub processes: Option<usize>,

    /// Run-level seed for derived per-worker random streams; `None` seeds
    /// every worker independently from OS entropy
    pub seed: Option<u64>,
}

/// Render engine distributing work across multiple CPU cores
#[derive(Debug, Clone)]
pub struct MulticoreEngine {
    processes: usize,
    seed: Option<u64>,
}

impl MulticoreEngine {
    /// Create an engine using every logical core on the host
    pub fn new() -> Self {
        Self {
            processes: logical_cores(),
            seed: None,
        }
    }

    /// Create an engine with a fixed worker count
    pub fn with_processes(processes: usize) -> Result<Self> {
        let mut engine = Self::new();
        engine.set_processes(Some(processes))?;
        Ok(engine)
    }

    /// Create an engine from a [`MulticoreConfig`]
    pub fn with_config(config: MulticoreConfig) -> Result<Self> {
        let mut engine = Self::new();
        engine.set_processes(config.processes)?;
        engine.seed = config.seed;
        Ok(engine)
    }

    /// Current worker count
    pub fn processes(&self) -> usize {
        self.processes
    }

    /// Set the worker count.
    ///
    /// `None` resolves to the host's logical core count at call time. A zero
    /// count is rejected and the prior configuration is left unchanged.
    pub fn set_processes(&mut self, processes: Option<usize>) -> Result<()> {
        match processes {
            None => self.processes = logical_cores(),
            Some(0) => return Err(EngineError::InvalidWorkerCount),
            Some(count) => self.processes = count,
        }
        Ok(())
    }

    /// Set or clear the run-level seed for per-worker random streams
    pub fn set_seed(&mut self, seed: Option<u64>) {
        self.seed = seed;
    }
}

impl Default for MulticoreEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl<T, R> RenderEngine<T, R> for MulticoreEngine
where
    T: Send,
    R: Send,
{
    fn run(
        &self,
        tasks: Vec<T>,
        render: RenderFn<'_, T, R>,
        update: UpdateFn<'_, R>,
    ) -> Result<()> {
        let total = tasks.len();
        let workers = self.processes;
        debug!("Starting multicore render: {} tasks across {} workers", total, workers);

        let failed = thread::scope(|scope| -> Result<usize> {
            let (task_tx, task_rx) = unbounded::<Envelope<T>>();
            let (result_tx, result_rx) = unbounded::<TaskOutcome<R>>();

            // Producer: feeds tasks in submission order, never renders.
            let producer_tx = task_tx.clone();
            scope.spawn(move || {
                for task in tasks {
                    if producer_tx.send(Envelope::Task(task)).is_err() {
                        break;
                    }
                }
                trace!("Producer finished");
            });

            for worker_id in 0..workers {
                let task_rx = task_rx.clone();
                let result_tx = result_tx.clone();
                let run_seed = self.seed;
                scope.spawn(move || worker_loop(worker_id, run_seed, &task_rx, &result_tx, render));
            }

            // Only workers may produce results.
            drop(result_tx);

            // Consume exactly one outcome per submitted task, in completion
            // order. Folding happens here, on the calling thread, so `update`
            // needs no synchronization.
            let mut failed = 0usize;
            for _ in 0..total {
                match result_rx.recv() {
                    Ok(TaskOutcome::Rendered(result)) => update(result),
                    Ok(TaskOutcome::Failed(fault)) => {
                        warn!(
                            "Render task failed on worker {}: {}",
                            fault.worker_id, fault.message
                        );
                        failed += 1;
                    }
                    Err(_) => return Err(EngineError::ResultChannelClosed),
                }
            }

            // One shutdown sentinel per worker. On the error path above the
            // channel is dropped instead, which workers also treat as
            // shutdown, so no thread can block past this scope.
            for _ in 0..workers {
                let _ = task_tx.send(Envelope::Shutdown);
            }

            Ok(failed)
            // Scope exit joins the producer and every worker.
        })?;

        if failed > 0 {
            return Err(EngineError::TasksFailed { failed, total });
        }

        debug!("Multicore render of {} tasks complete", total);
        Ok(())
    }

    fn worker_count(&self) -> usize {
        self.processes
    }
}

/// Value transported on the task channel.
///
/// `Shutdown` is a dedicated sentinel, distinct from every task value by
/// construction, so no legal task can be mistaken for a termination request.
enum Envelope<T> {
    Task(T),
    Shutdown,
}

fn worker_loop<T, R>(
    worker_id: usize,
    run_seed: Option<u64>,
    tasks: &Receiver<Envelope<T>>,
    results: &Sender<TaskOutcome<R>>,
    render: RenderFn<'_, T, R>,
) where
    T: Send,
    R: Send,
{
    // Worker-local reseed: no worker inherits the caller's random state.
    let mut context = WorkerContext::new(worker_id, run_seed);
    trace!("Worker {} started", worker_id);

    loop {
        // A disconnected channel means the run is over; treat it as shutdown.
        let envelope = match tasks.recv() {
            Ok(envelope) => envelope,
            Err(_) => break,
        };

        let task = match envelope {
            Envelope::Task(task) => task,
            Envelope::Shutdown => {
                trace!("Worker {} received shutdown signal", worker_id);
                break;
            }
        };

        let outcome = match panic::catch_unwind(AssertUnwindSafe(|| render(task, &mut context))) {
            Ok(result) => TaskOutcome::Rendered(result),
            Err(payload) => TaskOutcome::Failed(TaskFault {
                worker_id,
                message: panic_message(payload),
            }),
        };

        if results.send(outcome).is_err() {
            break;
        }
    }

    trace!("Worker {} stopped", worker_id);
}

fn logical_cores() -> usize {
    thread::available_parallelism()
        .map(NonZeroUsize::get)
        .unwrap_or(1)
}
