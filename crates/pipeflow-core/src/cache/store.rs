use dashmap::DashMap;

use super::CacheKey;
use crate::errors::CacheError;

/// Persistencia clave/valor de outputs serializados.
///
/// Contrato:
/// - `load` devuelve `Ok(None)` ante ausencia. Cualquier `Err` es tratado por
///   el engine igual que un miss.
/// - `save` sobrescribe la entrada existente; un `Err` aborta la ejecución.
/// - No se asume atomicidad ni aislamiento entre ejecuciones concurrentes del
///   mismo workflow (último escritor gana).
pub trait CacheStore: Send + Sync {
    fn load(&self, key: &CacheKey) -> Result<Option<Vec<u8>>, CacheError>;
    fn save(&self, key: &CacheKey, bytes: &[u8]) -> Result<(), CacheError>;
    /// Número de entradas guardadas.
    fn entry_count(&self) -> Result<usize, CacheError>;
}

/// Store en memoria; útil para tests y para workflows de vida corta.
#[derive(Debug, Default)]
pub struct InMemoryCacheStore {
    inner: DashMap<CacheKey, Vec<u8>>,
}

impl InMemoryCacheStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, key: &CacheKey) -> bool {
        self.inner.contains_key(key)
    }

    pub fn remove(&self, key: &CacheKey) -> Option<Vec<u8>> {
        self.inner.remove(key).map(|(_, bytes)| bytes)
    }
}

impl CacheStore for InMemoryCacheStore {
    fn load(&self, key: &CacheKey) -> Result<Option<Vec<u8>>, CacheError> {
        Ok(self.inner.get(key).map(|entry| entry.value().clone()))
    }

    fn save(&self, key: &CacheKey, bytes: &[u8]) -> Result<(), CacheError> {
        self.inner.insert(key.clone(), bytes.to_vec());
        Ok(())
    }

    fn entry_count(&self) -> Result<usize, CacheError> {
        Ok(self.inner.len())
    }
}
