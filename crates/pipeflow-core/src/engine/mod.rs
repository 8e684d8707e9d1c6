//! Engine module: resumable execution of a `Chain` against a cache.
//!
//! Provides the engine, its builder, the resume policy and the per-run
//! request/report types.

pub mod builder;
pub mod core;
pub mod policy;
pub mod request;

pub use self::core::WorkflowEngine;
pub use builder::EngineBuilder;
pub use policy::ResumePolicy;
pub use request::{ExecutionOptions, ExecutionRequest, ResumePoint, RunReport};
