use std::sync::Arc;

use log::debug;

use super::{CacheEnvelope, CacheKey, CacheStore, Codec, JsonCodec, ResultPersistence};
use crate::errors::CacheError;
use crate::step::AnyValue;

/// Une un `CacheStore` con un `Codec` y traduce entre `AnyValue` y bytes
/// usando los ganchos de persistencia de cada step.
#[derive(Clone)]
pub struct Cacher {
    store: Arc<dyn CacheStore>,
    codec: Arc<dyn Codec>,
}

impl Cacher {
    pub fn new(store: Arc<dyn CacheStore>, codec: Arc<dyn Codec>) -> Self {
        Self { store, codec }
    }

    /// Cacher JSON (pretty) sobre el store dado.
    pub fn json(store: Arc<dyn CacheStore>) -> Self {
        Self::new(store, Arc::new(JsonCodec::default()))
    }

    pub fn store(&self) -> &Arc<dyn CacheStore> {
        &self.store
    }

    pub fn key_for(workflow: &str, persistence: &ResultPersistence) -> CacheKey {
        CacheKey::new(workflow, persistence.identity())
    }

    /// Lee y decodifica la entrada de `(workflow, identidad)`. `Ok(None)` es
    /// ausencia; los errores distinguen store, codec, identidad y esquema.
    pub fn load(&self, workflow: &str, persistence: &ResultPersistence) -> Result<Option<AnyValue>, CacheError> {
        let key = Self::key_for(workflow, persistence);
        let Some(bytes) = self.store.load(&key)? else {
            return Ok(None);
        };
        let envelope = self.codec.decode(&bytes)?;
        if envelope.result_type != persistence.identity() {
            return Err(CacheError::IdentityMismatch { expected: persistence.identity().to_string(),
                                                      found: envelope.result_type });
        }
        if envelope.schema_version != persistence.schema_version() {
            return Err(CacheError::SchemaMismatch { result_type: envelope.result_type,
                                                    expected: persistence.schema_version(),
                                                    found: envelope.schema_version });
        }
        persistence.from_json(envelope.payload).map(Some)
    }

    pub fn save(&self, workflow: &str, persistence: &ResultPersistence, value: &AnyValue) -> Result<(), CacheError> {
        let key = Self::key_for(workflow, persistence);
        let payload = persistence.to_json(value)?;
        let envelope = CacheEnvelope::new(persistence.identity(), persistence.schema_version(), payload);
        let bytes = self.codec.encode(&envelope)?;
        debug!("caching {} bytes under {}", bytes.len(), key);
        self.store.save(&key, &bytes)
    }
}

impl std::fmt::Debug for Cacher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Cacher").finish_non_exhaustive()
    }
}
