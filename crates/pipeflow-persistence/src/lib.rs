//! pipeflow-persistence
//!
//! Implementación durable del contrato `CacheStore` del core más la carga de
//! configuración desde `.env` / entorno.
//!
//! Módulos:
//! - `fs`: `FsCacheStore`, una entrada por archivo.
//! - `config`: `CacheConfig` desde variables `PIPEFLOW_*`.
//! - `error`: `PersistenceError` y su mapeo a `CacheError`.

pub mod config;
pub mod error;
pub mod fs;

use std::sync::Arc;

use pipeflow_core::{LogObserver, WorkflowEngine};

pub use config::{load_dotenv, CacheConfig};
pub use error::PersistenceError;
pub use fs::FsCacheStore;

/// Engine sobre `FsCacheStore` configurado según `config`, con eventos
/// enviados al facade `log`.
pub fn build_engine(config: &CacheConfig) -> Result<WorkflowEngine, PersistenceError> {
    let store = FsCacheStore::open(&config.cache_dir)?;
    Ok(WorkflowEngine::builder().store(Arc::new(store))
                                .codec(Arc::new(config.codec()))
                                .observer(Arc::new(LogObserver))
                                .default_policy(config.default_policy)
                                .build())
}

/// Igual que `build_engine` leyendo la configuración del entorno.
pub fn build_engine_from_env() -> Result<WorkflowEngine, PersistenceError> {
    let config = CacheConfig::from_env()?;
    build_engine(&config)
}
