//! Constantes del motor.
//!
//! `ENVELOPE_VERSION` forma parte de cada entrada persistida; cambiarlo hace que
//! las entradas existentes se lean como miss.

/// Versión del formato del sobre (`CacheEnvelope`) escrito en el store.
pub const ENVELOPE_VERSION: u32 = 1;

/// Separador usado al describir una cadena: `"AtoB -> BtoC"`.
pub const NAME_SEPARATOR: &str = " -> ";
