//! Errores del core.
//!
//! `PipelineError` es terminal para la ejecución en curso: el engine no
//! reintenta. Los problemas de lectura de cache (`CacheError` en `load`) nunca
//! llegan aquí; el engine los registra y los trata como miss.

use thiserror::Error;

use crate::step::StepError;

/// Clase gruesa de un `PipelineError`, útil para decidir si re-ejecutar el
/// workflow tiene sentido o si hay un bug de autoría / del engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorClass {
    /// La cadena no pudo construirse.
    Validation,
    /// Un valor de tipo incorrecto llegó a un step ya validado.
    Authoring,
    /// La transformación de un step falló.
    Step,
    /// El output no pudo persistirse.
    Cache,
    /// Invariante interno roto (defecto del engine).
    Invariant,
}

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("chain must contain at least one step")]
    EmptyChain,

    #[error("cannot link `{step}` at position {position}: it expects {expected} but `{previous}` produces {found}")]
    ChainValidation {
        position: usize,
        previous: String,
        step: String,
        expected: String,
        found: String,
    },

    #[error("step `{step}` cannot perform: expected input of type {expected}, got {found}")]
    TypeMismatch { step: String, expected: String, found: String },

    #[error("step `{step}` failed: {source}")]
    StepExecution {
        step: String,
        #[source]
        source: StepError,
    },

    #[error("could not persist output of step `{step}`: {source}")]
    CacheWrite {
        step: String,
        #[source]
        source: CacheError,
    },

    #[error("internal invariant broken: {0}")]
    Internal(String),
}

impl PipelineError {
    pub fn class(&self) -> ErrorClass {
        match self {
            Self::EmptyChain | Self::ChainValidation { .. } => ErrorClass::Validation,
            Self::TypeMismatch { .. } => ErrorClass::Authoring,
            Self::StepExecution { .. } => ErrorClass::Step,
            Self::CacheWrite { .. } => ErrorClass::Cache,
            Self::Internal(_) => ErrorClass::Invariant,
        }
    }

    /// Nombre del step involucrado, si el error lo identifica.
    pub fn step_name(&self) -> Option<&str> {
        match self {
            Self::ChainValidation { step, .. }
            | Self::TypeMismatch { step, .. }
            | Self::StepExecution { step, .. }
            | Self::CacheWrite { step, .. } => Some(step),
            Self::EmptyChain | Self::Internal(_) => None,
        }
    }
}

/// Errores del contrato de cache (store + codec).
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CacheError {
    #[error("cache read failed for {key}: {reason}")]
    Read { key: String, reason: String },
    #[error("cache write failed for {key}: {reason}")]
    Write { key: String, reason: String },
    #[error("could not encode cached value: {0}")]
    Encode(String),
    #[error("could not decode cached value: {0}")]
    Decode(String),
    #[error("cached entry holds `{found}`, expected `{expected}`")]
    IdentityMismatch { expected: String, found: String },
    #[error("schema version mismatch for `{result_type}`: expected {expected}, found {found}")]
    SchemaMismatch { result_type: String, expected: u32, found: u32 },
}

/// Error al interpretar el nombre de una `ResumePolicy`.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("unknown resume policy `{0}` (expected ignore-and-overwrite, use-if-present or use-but-also-overwrite)")]
pub struct UnknownPolicy(pub String);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classes_separate_invariant_breaks_from_step_failures() {
        let internal = PipelineError::Internal("final cast".into());
        let step = PipelineError::StepExecution { step: "AtoB".into(),
                                                  source: "boom".into() };
        assert_eq!(internal.class(), ErrorClass::Invariant);
        assert_eq!(step.class(), ErrorClass::Step);
        assert_eq!(step.step_name(), Some("AtoB"));
        assert!(internal.step_name().is_none());
    }

    #[test]
    fn step_execution_exposes_cause_as_source() {
        use std::error::Error as _;
        let err = PipelineError::StepExecution { step: "CtoD".into(),
                                                 source: "disk on fire".into() };
        let cause = err.source().map(|s| s.to_string());
        assert_eq!(cause.as_deref(), Some("disk on fire"));
        assert!(err.to_string().contains("CtoD"));
    }
}
