//! pipeflow-core: motor lineal reanudable de pasos tipados.
//!
//! Un workflow es una cadena ordenada de `Step`s cuyo output se persiste en un
//! `CacheStore`. Al re-ejecutar el mismo workflow (mismo nombre) el engine
//! busca hacia atrás el checkpoint más avanzado y continúa desde ahí.
pub mod cache;
pub mod chain;
pub mod constants;
pub mod engine;
pub mod errors;
pub mod event;
pub mod hashing;
pub mod pipeline;
pub mod step;

pub use cache::{CacheKey, CacheStore, CacheableResult, Cacher, Codec, InMemoryCacheStore, JsonCodec};
pub use chain::{Chain, ChainBuilder, SameAs, StepLinker};
pub use engine::{EngineBuilder, ExecutionOptions, ExecutionRequest, ResumePoint, ResumePolicy, RunReport, WorkflowEngine};
pub use errors::{CacheError, ErrorClass, PipelineError};
pub use event::{ExecutionEvent, ExecutionEventKind, ExecutionObserver, InMemoryObserver, LogObserver, NoopObserver};
pub use pipeline::Pipeline;
pub use step::{AnyStep, AnyValue, FnStep, Step, StepError, TypeDescriptor};

// Las macros `typed_step!` y `cacheable_result!` se exportan en la raíz vía #[macro_export].
