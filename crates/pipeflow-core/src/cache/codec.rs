use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::constants::ENVELOPE_VERSION;
use crate::errors::CacheError;

/// Forma persistida de un output: el payload va acompañado de la identidad y
/// versión de esquema con que se escribió, para detectar entradas ajenas o
/// viejas al leer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheEnvelope {
    pub envelope_version: u32,
    pub result_type: String,
    pub schema_version: u32,
    pub payload: Value,
}

impl CacheEnvelope {
    pub fn new(result_type: impl Into<String>, schema_version: u32, payload: Value) -> Self {
        Self { envelope_version: ENVELOPE_VERSION,
               result_type: result_type.into(),
               schema_version,
               payload }
    }
}

/// Par encode/decode entre `CacheEnvelope` y bytes.
pub trait Codec: Send + Sync {
    fn encode(&self, envelope: &CacheEnvelope) -> Result<Vec<u8>, CacheError>;
    fn decode(&self, bytes: &[u8]) -> Result<CacheEnvelope, CacheError>;
}

/// Codec JSON (pretty-print por defecto, legible al inspeccionar el store).
#[derive(Debug, Clone, Copy)]
pub struct JsonCodec {
    pub pretty: bool,
}

impl JsonCodec {
    pub fn compact() -> Self {
        Self { pretty: false }
    }
}

impl Default for JsonCodec {
    fn default() -> Self {
        Self { pretty: true }
    }
}

impl Codec for JsonCodec {
    fn encode(&self, envelope: &CacheEnvelope) -> Result<Vec<u8>, CacheError> {
        let res = if self.pretty { serde_json::to_vec_pretty(envelope) } else { serde_json::to_vec(envelope) };
        res.map_err(|e| CacheError::Encode(e.to_string()))
    }

    fn decode(&self, bytes: &[u8]) -> Result<CacheEnvelope, CacheError> {
        let envelope: CacheEnvelope = serde_json::from_slice(bytes).map_err(|e| CacheError::Decode(e.to_string()))?;
        if envelope.envelope_version != ENVELOPE_VERSION {
            return Err(CacheError::Decode(format!("unsupported envelope version {}", envelope.envelope_version)));
        }
        Ok(envelope)
    }
}
