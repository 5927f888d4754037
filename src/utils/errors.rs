// src/utils/errors.rs
//! Error types for the renderflow crate

use thiserror::Error;

/// Result type alias used throughout the crate
pub type Result<T> = std::result::Result<T, EngineError>;

/// Errors produced by the engines, their configuration and the mesh I/O layer
#[derive(Error, Debug)]
pub enum EngineError {
    /// Rejected at configuration time, before any run starts
    #[error("worker count must be greater than zero")]
    InvalidWorkerCount,

    /// One or more render tasks panicked during a run. The run still delivered
    /// every surviving result to `update` before reporting this.
    #[error("{failed} of {total} render tasks failed")]
    TasksFailed { failed: usize, total: usize },

    /// Workers disconnected before delivering every result
    #[error("result channel closed before all results were received")]
    ResultChannelClosed,

    /// Configuration file or environment could not be read
    #[error("configuration error: {0}")]
    Config(#[from] config::ConfigError),

    /// A mesh file violates the restricted VTK subset
    #[error("mesh file is not in the expected VTK format: {0}")]
    MeshFormat(String),

    /// Mesh geometry or attached data arrays are inconsistent
    #[error("mesh data is inconsistent: {0}")]
    MeshData(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
