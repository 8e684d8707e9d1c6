//! Digest BLAKE3 en hex de valores JSON canónicos.

use serde_json::Value;

use super::to_canonical_json;

/// Hash de la forma canónica de un `Value`; el orden de las claves no
/// cambia el resultado.
pub fn hash_value(value: &Value) -> String {
    blake3::hash(to_canonical_json(value).as_bytes()).to_hex().to_string()
}
