use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::hashing::hash_value;

/// Clave nominal de una entrada de cache.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CacheKey {
    pub workflow: String,
    pub result_type: String,
}

impl CacheKey {
    pub fn new(workflow: impl Into<String>, result_type: impl Into<String>) -> Self {
        Self { workflow: workflow.into(),
               result_type: result_type.into() }
    }

    /// Digest estable de la clave, apto para nombres de archivo. A diferencia
    /// de concatenar `workflow + result_type`, `("ab", "c")` y `("a", "bc")`
    /// producen digests distintos.
    pub fn fingerprint(&self) -> String {
        hash_value(&json!({ "workflow": self.workflow, "result_type": self.result_type }))
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.workflow, self.result_type)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fingerprint_is_deterministic_and_unambiguous() {
        let a = CacheKey::new("ab", "c");
        let b = CacheKey::new("a", "bc");
        assert_eq!(a.fingerprint(), CacheKey::new("ab", "c").fingerprint());
        assert_ne!(a.fingerprint(), b.fingerprint());
        assert_eq!(a.fingerprint().len(), 64);
    }
}
