//! Hashing y canonicalización JSON usados para derivar nombres estables de
//! entradas de cache.

pub mod canonical_json;
pub mod hash;

pub use canonical_json::to_canonical_json;
pub use hash::hash_value;
