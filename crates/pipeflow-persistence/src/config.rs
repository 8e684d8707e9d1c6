//! Carga de configuración del cache desde variables de entorno.
//!
//! | variable                  | default                         |
//! |---------------------------|---------------------------------|
//! | `PIPEFLOW_CACHE_DIR`      | `<tmp>/_pipeflow_cache`         |
//! | `PIPEFLOW_PRETTY_JSON`    | `true`                          |
//! | `PIPEFLOW_RESUME_POLICY`  | `ignore-and-overwrite`          |

use std::env;
use std::path::{Path, PathBuf};

use dotenvy::dotenv;
use log::debug;
use once_cell::sync::Lazy;
use pipeflow_core::{JsonCodec, ResumePolicy};

use crate::error::PersistenceError;

pub const CACHE_DIR_VAR: &str = "PIPEFLOW_CACHE_DIR";
pub const PRETTY_JSON_VAR: &str = "PIPEFLOW_PRETTY_JSON";
pub const RESUME_POLICY_VAR: &str = "PIPEFLOW_RESUME_POLICY";

/// Directorio bajo `env::temp_dir()` usado cuando no se configura otro.
pub const DEFAULT_CACHE_DIR_NAME: &str = "_pipeflow_cache";

// Ruta del `.env` aplicado al proceso; `None` si no se encontró ninguno.
static DOTENV_FILE: Lazy<Option<PathBuf>> = Lazy::new(|| match dotenv() {
    Ok(path) => {
        debug!("loaded environment from {}", path.display());
        Some(path)
    }
    Err(_) => None,
});

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheConfig {
    pub cache_dir: PathBuf,
    pub pretty_json: bool,
    pub default_policy: ResumePolicy,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self { cache_dir: env::temp_dir().join(DEFAULT_CACHE_DIR_NAME),
               pretty_json: true,
               default_policy: ResumePolicy::default() }
    }
}

impl CacheConfig {
    pub fn from_env() -> Result<Self, PersistenceError> {
        load_dotenv();
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Igual que `from_env` pero leyendo de una función arbitraria (tests,
    /// archivos de configuración propios).
    pub fn from_lookup<F>(lookup: F) -> Result<Self, PersistenceError>
        where F: Fn(&str) -> Option<String>
    {
        let defaults = Self::default();
        let cache_dir = lookup(CACHE_DIR_VAR).filter(|v| !v.trim().is_empty())
                                             .map(PathBuf::from)
                                             .unwrap_or(defaults.cache_dir);
        let pretty_json = match lookup(PRETTY_JSON_VAR) {
            Some(raw) => parse_bool(&raw).ok_or_else(|| {
                                             PersistenceError::InvalidConfig(format!("{PRETTY_JSON_VAR}=`{raw}` is not a boolean"))
                                         })?,
            None => defaults.pretty_json,
        };
        let default_policy = match lookup(RESUME_POLICY_VAR) {
            Some(raw) => raw.parse::<ResumePolicy>()
                            .map_err(|e| PersistenceError::InvalidConfig(format!("{RESUME_POLICY_VAR}: {e}")))?,
            None => defaults.default_policy,
        };
        Ok(Self { cache_dir,
                  pretty_json,
                  default_policy })
    }

    pub fn codec(&self) -> JsonCodec {
        JsonCodec { pretty: self.pretty_json }
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Aplica el `.env` más cercano (una sola vez por proceso) y devuelve su ruta.
/// `from_env` lo llama por su cuenta.
pub fn load_dotenv() -> Option<&'static Path> {
    DOTENV_FILE.as_deref()
}
