//! Builder para `WorkflowEngine`.
//!
//! Todas las dependencias tienen default razonable:
//! - store: `InMemoryCacheStore` nuevo,
//! - codec: `JsonCodec` pretty,
//! - observer: `NoopObserver`,
//! - política: `ResumePolicy::IgnoreAndOverwrite`.
//!
//! ```ignore
//! let engine = WorkflowEngine::builder()
//!     .store(Arc::new(FsCacheStore::open("/tmp/cache")?))
//!     .observer(Arc::new(LogObserver))
//!     .default_policy(ResumePolicy::UseIfPresent)
//!     .build();
//! ```

use std::sync::Arc;

use super::{ResumePolicy, WorkflowEngine};
use crate::cache::{CacheStore, Cacher, Codec, InMemoryCacheStore, JsonCodec};
use crate::event::{ExecutionObserver, NoopObserver};

pub struct EngineBuilder {
    store: Option<Arc<dyn CacheStore>>,
    codec: Arc<dyn Codec>,
    observer: Arc<dyn ExecutionObserver>,
    default_policy: ResumePolicy,
}

impl Default for EngineBuilder {
    fn default() -> Self {
        Self { store: None,
               codec: Arc::new(JsonCodec::default()),
               observer: Arc::new(NoopObserver),
               default_policy: ResumePolicy::default() }
    }
}

impl EngineBuilder {
    #[inline]
    pub fn store(mut self, store: Arc<dyn CacheStore>) -> Self {
        self.store = Some(store);
        self
    }

    #[inline]
    pub fn codec(mut self, codec: Arc<dyn Codec>) -> Self {
        self.codec = codec;
        self
    }

    #[inline]
    pub fn observer(mut self, observer: Arc<dyn ExecutionObserver>) -> Self {
        self.observer = observer;
        self
    }

    #[inline]
    pub fn default_policy(mut self, policy: ResumePolicy) -> Self {
        self.default_policy = policy;
        self
    }

    pub fn build(self) -> WorkflowEngine {
        let store: Arc<dyn CacheStore> = match self.store {
            Some(store) => store,
            None => Arc::new(InMemoryCacheStore::new()),
        };
        WorkflowEngine::from_parts(Cacher::new(store, self.codec), self.observer, self.default_policy)
    }
}
