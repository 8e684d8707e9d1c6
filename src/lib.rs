//! pipeflow
//!
//! Fachada del workspace:
//! - re-exporta `pipeflow_core` (engine, cadenas, cache) y
//!   `pipeflow_persistence` (store en disco, configuración);
//! - `demo`: la cadena `AtoB -> BtoC -> CtoD` usada por el binario
//!   `pipeflow-demo` y los tests de integración.

pub mod demo;

pub use pipeflow_core;
pub use pipeflow_persistence;

pub use pipeflow_core::{Chain, ChainBuilder, PipelineError, Pipeline, ResumePolicy, Step, WorkflowEngine};
pub use pipeflow_persistence::{CacheConfig, FsCacheStore, PersistenceError};
