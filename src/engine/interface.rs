// src/engine/interface.rs
//! Render engine capability contract
//!
//! A render workload is expressed as a list of opaque task values plus two
//! callables: `render` turns one task into one result and runs wherever the
//! engine schedules it, while `update` folds each result into caller-owned
//! state and always runs on the calling thread. Backends implementing
//! [`RenderEngine`] decide how tasks are distributed; callers stay
//! backend-agnostic, including through `Box<dyn RenderEngine<T, R>>`.

use crate::engine::context::WorkerContext;
use crate::utils::errors::Result;
use std::any::Any;

/// User-supplied render callable.
///
/// Must be a pure function of the task and the supplied context: in the
/// multicore backend it executes on a worker thread with no access to caller
/// state beyond what the closure captures by value. Randomness must come from
/// the context's worker-local generator.
pub type RenderFn<'a, T, R> = &'a (dyn Fn(T, &mut WorkerContext) -> R + Sync);

/// User-supplied update callable.
///
/// Invoked once per rendered result, always on the calling thread, so it may
/// freely mutate captured caller state without synchronization. Results
/// arrive in completion order, not submission order.
pub type UpdateFn<'a, R> = &'a mut (dyn FnMut(R) + 'a);

/// Common contract satisfied by every render engine backend.
///
/// `T` is the caller's task type and `R` the result type; both cross the
/// boundary into worker execution contexts and therefore must be `Send`.
pub trait RenderEngine<T, R>
where
    T: Send,
    R: Send,
{
    /// Execute `render` once per element of `tasks` and fold every result
    /// into caller state via `update`.
    ///
    /// Blocks until each task has been rendered and each surviving result has
    /// been passed to `update`. If any render invocation panics, the run
    /// still completes the remaining tasks and then reports
    /// [`EngineError::TasksFailed`](crate::EngineError::TasksFailed).
    fn run(&self, tasks: Vec<T>, render: RenderFn<'_, T, R>, update: UpdateFn<'_, R>)
        -> Result<()>;

    /// Number of concurrent execution contexts this engine uses to process
    /// tasks (1 for the sequential backend).
    fn worker_count(&self) -> usize;
}

/// Outcome of a single render task, as transported on the result channel.
///
/// Faults travel the same path as rendered results so a run over `n` tasks
/// always delivers exactly `n` outcomes to the consumer loop, failures
/// included.
#[derive(Debug)]
pub(crate) enum TaskOutcome<R> {
    Rendered(R),
    Failed(TaskFault),
}

/// A render invocation that panicked inside a worker
#[derive(Debug, Clone)]
pub(crate) struct TaskFault {
    pub worker_id: usize,
    pub message: String,
}

/// Extract a printable message from a panic payload
pub(crate) fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "render task panicked".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::multicore::MulticoreEngine;
    use crate::engine::serial::SerialEngine;

    #[test]
    fn test_backends_are_interchangeable_as_trait_objects() {
        let engines: Vec<Box<dyn RenderEngine<u32, u32>>> = vec![
            Box::new(SerialEngine::new()),
            Box::new(MulticoreEngine::with_processes(2).unwrap()),
        ];

        let render = |task: u32, _context: &mut WorkerContext| task + 1;
        for engine in engines {
            let mut total = 0;
            engine.run(vec![1, 2, 3], &render, &mut |r| total += r).unwrap();
            assert_eq!(total, 9);
        }
    }

    #[test]
    fn test_panic_message_extraction() {
        assert_eq!(panic_message(Box::new("boom")), "boom");
        assert_eq!(panic_message(Box::new("boom".to_string())), "boom");
        assert_eq!(panic_message(Box::new(17u32)), "render task panicked");
    }
}
