//! Contrato de cache consumido por el engine.
//!
//! - `CacheStore`: persistencia clave/valor de bytes (colaborador externo).
//! - `Codec`: codifica `CacheEnvelope` a bytes y viceversa.
//! - `CacheableResult`: opt-in de un tipo de output a la persistencia.
//! - `Cacher`: pegamento store + codec que trabaja con `AnyValue`.
//!
//! Identidad de una entrada: `(workflow, result_type)`. No incluye hash del
//! input, por lo que dos inputs distintos bajo el mismo nombre de workflow
//! comparten slot.

mod cacheable;
mod cacher;
mod codec;
mod key;
mod store;

pub use cacheable::{CacheableResult, ResultPersistence};
pub use cacher::Cacher;
pub use codec::{CacheEnvelope, Codec, JsonCodec};
pub use key::CacheKey;
pub use store::{CacheStore, InMemoryCacheStore};
