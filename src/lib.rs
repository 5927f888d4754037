// src/lib.rs
//! Renderflow
//!
//! A pluggable task-execution engine that decouples how work is split into
//! independent units from how those units are executed. Callers describe a
//! workload as a list of opaque tasks plus two callables — `render` maps a
//! task to a result on one of the engine's workers, `update` folds each
//! result into caller state on the calling thread — and stay agnostic of
//! whether execution is sequential or fanned out across a pool of worker
//! threads.
//!
//! # Architecture
//!
//! The crate is structured into three modules:
//!
//! - **engine**: the [`RenderEngine`] contract and its serial and multicore
//!   backends, including per-worker randomness and the shutdown protocol
//! - **mesh**: restricted VTK triangle-mesh reader/writer, an external
//!   collaborator used by render/update callables rather than the engine
//! - **utils**: error taxonomy, layered configuration, tracing setup

// Public module exports
pub mod engine;
pub mod mesh;
pub mod utils;

// Re-export commonly used types
pub use engine::{
    MulticoreConfig, MulticoreEngine, RenderEngine, RenderFn, SerialEngine, UpdateFn,
    WorkerContext,
};
pub use mesh::TriangleMesh;
pub use utils::config::{Backend, EngineConfig};
pub use utils::errors::{EngineError, Result};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
