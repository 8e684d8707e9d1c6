//! Store de cache sobre el sistema de archivos.
//!
//! Cada entrada vive en `root/<fp[..2]>/<fp>.cache`, donde `fp` es el
//! fingerprint de la `CacheKey`. Las escrituras van a un archivo temporal en
//! el mismo directorio y luego se renombran, de modo que un lector nunca ve
//! una entrada a medio escribir.

use std::env;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use chrono::Local;
use log::{debug, info};
use pipeflow_core::{CacheError, CacheKey, CacheStore};
use uuid::Uuid;
use walkdir::WalkDir;

use crate::config::DEFAULT_CACHE_DIR_NAME;
use crate::error::PersistenceError;

/// Extensión de los archivos de entrada.
pub const ENTRY_EXTENSION: &str = "cache";

#[derive(Debug, Clone)]
pub struct FsCacheStore {
    root: PathBuf,
}

impl FsCacheStore {
    /// Abre (creando si hace falta) un store en `root`.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self, PersistenceError> {
        let root = root.into();
        fs::create_dir_all(&root)?;
        info!("cache store opened at {}", root.display());
        Ok(Self { root })
    }

    /// Store nuevo en un directorio con nombre por timestamp bajo
    /// `<tmp>/_pipeflow_cache`.
    pub fn temporary() -> Result<Self, PersistenceError> {
        Self::temporary_in(env::temp_dir().join(DEFAULT_CACHE_DIR_NAME))
    }

    /// Store nuevo en `parent/<YYYY-MM-DD_HH-MM-SS>_<sufijo>`.
    pub fn temporary_in(parent: impl AsRef<Path>) -> Result<Self, PersistenceError> {
        let suffix = Uuid::new_v4().simple().to_string();
        let name = format!("{}_{}", Local::now().format("%Y-%m-%d_%H-%M-%S"), &suffix[..8]);
        Self::open(parent.as_ref().join(name))
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn entry_path(&self, key: &CacheKey) -> PathBuf {
        let fingerprint = key.fingerprint();
        let shard = fingerprint.get(..2).unwrap_or_default();
        self.root.join(shard).join(format!("{fingerprint}.{ENTRY_EXTENSION}"))
    }

    pub fn contains(&self, key: &CacheKey) -> bool {
        self.entry_path(key).is_file()
    }

    /// Cantidad de entradas guardadas bajo `root`.
    pub fn number_of_saved_entries(&self) -> Result<usize, PersistenceError> {
        let mut count = 0;
        for entry in WalkDir::new(&self.root).min_depth(1) {
            let entry = entry?;
            if entry.file_type().is_file() && is_entry_file(entry.path()) {
                count += 1;
            }
        }
        Ok(count)
    }

    /// Borra la entrada de `key`. Devuelve `false` si no existía.
    pub fn remove(&self, key: &CacheKey) -> Result<bool, PersistenceError> {
        match fs::remove_file(self.entry_path(key)) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    /// Borra todas las entradas; el directorio raíz se conserva.
    pub fn clear(&self) -> Result<(), PersistenceError> {
        fs::remove_dir_all(&self.root)?;
        fs::create_dir_all(&self.root)?;
        Ok(())
    }

    fn write_entry(&self, path: &Path, bytes: &[u8]) -> Result<(), PersistenceError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let tmp = path.with_extension(format!("{}.tmp", Uuid::new_v4().simple()));
        fs::write(&tmp, bytes)?;
        if let Err(e) = fs::rename(&tmp, path) {
            let _ = fs::remove_file(&tmp);
            return Err(e.into());
        }
        Ok(())
    }
}

fn is_entry_file(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == ENTRY_EXTENSION)
}

impl CacheStore for FsCacheStore {
    fn load(&self, key: &CacheKey) -> Result<Option<Vec<u8>>, CacheError> {
        match fs::read(self.entry_path(key)) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(PersistenceError::from(e).read_failure(key)),
        }
    }

    fn save(&self, key: &CacheKey, bytes: &[u8]) -> Result<(), CacheError> {
        let path = self.entry_path(key);
        self.write_entry(&path, bytes).map_err(|e| e.write_failure(key))?;
        debug!("wrote {} ({} bytes) for {key}", path.display(), bytes.len());
        Ok(())
    }

    fn entry_count(&self) -> Result<usize, CacheError> {
        self.number_of_saved_entries()
            .map_err(|e| CacheError::Read { key: self.root.display().to_string(),
                                            reason: e.to_string() })
    }
}
