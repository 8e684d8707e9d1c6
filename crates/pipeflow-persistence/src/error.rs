//! Errores de persistencia.
//! Mapea errores de IO / configuración a variantes semánticas y, en el borde
//! con el core, a `CacheError`.

use std::io::{self, ErrorKind};

use pipeflow_core::{CacheError, CacheKey};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("not found: {0}")]
    NotFound(String),
    #[error("permission denied: {0}")]
    PermissionDenied(String),
    #[error("transient IO error (retryable): {0}")]
    TransientIo(String),
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("unknown persistence error: {0}")]
    Unknown(String),
}

impl PersistenceError {
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::TransientIo(_))
    }

    pub(crate) fn read_failure(self, key: &CacheKey) -> CacheError {
        CacheError::Read { key: key.to_string(),
                           reason: self.to_string() }
    }

    pub(crate) fn write_failure(self, key: &CacheKey) -> CacheError {
        CacheError::Write { key: key.to_string(),
                            reason: self.to_string() }
    }
}

impl From<io::Error> for PersistenceError {
    fn from(err: io::Error) -> Self {
        match err.kind() {
            ErrorKind::NotFound => Self::NotFound(err.to_string()),
            ErrorKind::PermissionDenied => Self::PermissionDenied(err.to_string()),
            ErrorKind::Interrupted | ErrorKind::WouldBlock | ErrorKind::TimedOut | ErrorKind::UnexpectedEof => {
                Self::TransientIo(err.to_string())
            }
            other => Self::Unknown(format!("io error kind {other:?}: {err}")),
        }
    }
}

impl From<walkdir::Error> for PersistenceError {
    fn from(err: walkdir::Error) -> Self {
        let path = err.path().map(|p| p.display().to_string()).unwrap_or_default();
        match err.into_io_error() {
            Some(io) => Self::from(io),
            None => Self::Unknown(format!("filesystem loop while walking {path}")),
        }
    }
}
