//! Eventos de ejecución y hook de observabilidad.

mod observer;
mod types;

pub use observer::{ExecutionObserver, InMemoryObserver, LogObserver, NoopObserver};
pub use types::{ExecutionEvent, ExecutionEventKind};
