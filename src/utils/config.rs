// src/utils/config.rs
//! Engine configuration
//!
//! Configuration is layered: built-in defaults, then an optional
//! `renderflow.{toml,yaml,json}` file in the working directory, then
//! `RENDERFLOW_*` environment variables. The loaded configuration acts as a
//! factory so deployments can switch backends without code changes.

use crate::engine::{MulticoreConfig, MulticoreEngine, RenderEngine, SerialEngine};
use crate::utils::errors::Result;
use config::{Config, Environment, File};
use serde::Deserialize;

/// Engine backend selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    /// Single-threaded baseline engine
    Serial,

    /// Worker-pool engine spanning multiple CPU cores
    Multicore,
}

/// Top-level engine configuration
#[derive(Debug, Clone, Deserialize)]
pub struct EngineConfig {
    /// Which engine backend to construct
    #[serde(default = "default_backend")]
    pub backend: Backend,

    /// Worker count for the multicore backend; `None` selects every logical
    /// core on the host
    #[serde(default)]
    pub processes: Option<usize>,

    /// Run-level seed for derived per-worker random streams
    #[serde(default)]
    pub seed: Option<u64>,
}

fn default_backend() -> Backend {
    Backend::Multicore
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            backend: Backend::Multicore,
            processes: None,
            seed: None,
        }
    }
}

impl EngineConfig {
    /// Load configuration from file and environment
    pub fn load() -> Result<Self> {
        let settings = Config::builder()
            .add_source(File::with_name("renderflow").required(false))
            .add_source(Environment::with_prefix("RENDERFLOW"))
            .build()?;

        Ok(settings.try_deserialize()?)
    }

    /// Construct the configured engine backend
    pub fn build_engine<T, R>(&self) -> Result<Box<dyn RenderEngine<T, R> + Send + Sync>>
    where
        T: Send,
        R: Send,
    {
        match self.backend {
            Backend::Serial => {
                let engine = match self.seed {
                    Some(seed) => SerialEngine::with_seed(seed),
                    None => SerialEngine::new(),
                };
                Ok(Box::new(engine))
            }
            Backend::Multicore => {
                let engine = MulticoreEngine::with_config(MulticoreConfig {
                    processes: self.processes,
                    seed: self.seed,
                })?;
                Ok(Box::new(engine))
            }
        }
    }
}
