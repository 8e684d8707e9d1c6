use std::fmt;

use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;

use crate::errors::CacheError;
use crate::step::AnyValue;

/// Tipo de output que acepta ser persistido por el engine.
///
/// Se implementa explícitamente (o con `cacheable_result!`): un step cuyo
/// output no lo implementa sólo puede encadenarse como transitorio.
pub trait CacheableResult: Serialize + DeserializeOwned + Send + 'static {
    /// Versión de esquema; incrementar ante cambios incompatibles. Entradas con
    /// otra versión se leen como miss.
    const SCHEMA_VERSION: u32 = 1;

    /// Identidad nominal usada como segunda mitad de la `CacheKey`.
    fn result_type_identity() -> String {
        std::any::type_name::<Self>().to_string()
    }
}

/// Ganchos de persistencia capturados al borrar el tipo de un step cuyo output
/// es `CacheableResult`.
#[derive(Clone)]
pub struct ResultPersistence {
    identity: String,
    schema_version: u32,
    to_json: fn(&AnyValue) -> Result<Value, CacheError>,
    from_json: fn(Value) -> Result<AnyValue, CacheError>,
}

impl ResultPersistence {
    pub fn of<T: CacheableResult>() -> Self {
        Self { identity: T::result_type_identity(),
               schema_version: T::SCHEMA_VERSION,
               to_json: encode_as::<T>,
               from_json: decode_as::<T> }
    }

    pub fn identity(&self) -> &str {
        &self.identity
    }

    pub fn schema_version(&self) -> u32 {
        self.schema_version
    }

    pub(crate) fn to_json(&self, value: &AnyValue) -> Result<Value, CacheError> {
        (self.to_json)(value)
    }

    pub(crate) fn from_json(&self, payload: Value) -> Result<AnyValue, CacheError> {
        (self.from_json)(payload)
    }
}

impl fmt::Debug for ResultPersistence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResultPersistence")
         .field("identity", &self.identity)
         .field("schema_version", &self.schema_version)
         .finish()
    }
}

fn encode_as<T: CacheableResult>(value: &AnyValue) -> Result<Value, CacheError> {
    let typed = value.downcast_ref::<T>().ok_or_else(|| {
                                             CacheError::Encode(format!("expected {}, value holds {}",
                                                                        std::any::type_name::<T>(),
                                                                        value.type_descriptor()))
                                         })?;
    serde_json::to_value(typed).map_err(|e| CacheError::Encode(e.to_string()))
}

fn decode_as<T: CacheableResult>(payload: Value) -> Result<AnyValue, CacheError> {
    serde_json::from_value::<T>(payload).map(AnyValue::new)
                                        .map_err(|e| CacheError::Decode(e.to_string()))
}
