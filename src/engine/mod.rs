// src/engine/mod.rs
//! Render workflow engines
//!
//! This module provides the task-execution abstraction at the heart of the
//! crate:
//!
//! - **Interface**: the [`RenderEngine`] contract shared by every backend
//! - **Context**: per-worker identity and independently seeded randomness
//! - **Serial**: single-threaded baseline for debugging and ground truth
//! - **Multicore**: producer/worker-pool/consumer pipeline over channels
//!
//! # Workflow
//!
//! A render workload is split by the caller into small, self-contained tasks.
//! The engine distributes them to its workers, each worker maps a task to a
//! result via the user-supplied `render` callable, and the calling thread
//! folds every result into caller state via `update`. Submission order is
//! preserved on dispatch only; results arrive in completion order.

pub mod context;
pub mod interface;
pub mod multicore;
pub mod serial;

// Re-export commonly used types
pub use context::WorkerContext;
pub use interface::{RenderEngine, RenderFn, UpdateFn};
pub use multicore::{MulticoreConfig, MulticoreEngine};
pub use serial::SerialEngine;
