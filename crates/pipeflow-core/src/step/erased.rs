//! Borrado de tipos de steps.
//!
//! `AnyStep` guarda un `Step` concreto detrás de una invocación uniforme
//! `invoke(AnyValue) -> AnyValue`, conservando nombre, descriptores de
//! input/output y, si el output es `CacheableResult`, los ganchos para
//! persistirlo. La comprobación de tipos entre steps vecinos ocurre al
//! construir la cadena (`bind`, `StepLinker`, `Chain::from_steps`); `invoke`
//! sólo vuelve a verificar el input como red de seguridad.

use std::fmt;
use std::sync::Arc;

use super::{AnyValue, Step, TypeDescriptor};
use crate::cache::{CacheableResult, ResultPersistence};
use crate::constants::NAME_SEPARATOR;
use crate::errors::PipelineError;

type ErasedFn = dyn Fn(AnyValue) -> Result<AnyValue, PipelineError> + Send + Sync;

#[derive(Clone)]
pub struct AnyStep {
    name: String,
    input: TypeDescriptor,
    output: TypeDescriptor,
    persistence: Option<ResultPersistence>,
    perform: Arc<ErasedFn>,
}

impl AnyStep {
    /// Borra un step cuyo output se persiste en cada ejecución.
    pub fn cached<S>(step: S) -> Self
        where S: Step + Send + Sync + 'static,
              S::Input: Send + 'static,
              S::Output: CacheableResult
    {
        Self::erase(step, Some(ResultPersistence::of::<S::Output>()))
    }

    /// Borra un step cuyo output nunca toca el cache.
    pub fn transient<S>(step: S) -> Self
        where S: Step + Send + Sync + 'static,
              S::Input: Send + 'static,
              S::Output: Send + 'static
    {
        Self::erase(step, None)
    }

    fn erase<S>(step: S, persistence: Option<ResultPersistence>) -> Self
        where S: Step + Send + Sync + 'static,
              S::Input: Send + 'static,
              S::Output: Send + 'static
    {
        let name = step.name();
        let step_name = name.clone();
        let perform: Arc<ErasedFn> = Arc::new(move |value: AnyValue| {
            let input = value.downcast::<S::Input>().map_err(|wrong| PipelineError::TypeMismatch {
                step: step_name.clone(),
                expected: std::any::type_name::<S::Input>().to_string(),
                found: wrong.type_descriptor().name().to_string(),
            })?;
            step.perform(input)
                .map(AnyValue::new)
                .map_err(|source| PipelineError::StepExecution { step: step_name.clone(),
                                                                 source })
        });
        Self { name,
               input: TypeDescriptor::of::<S::Input>(),
               output: TypeDescriptor::of::<S::Output>(),
               persistence,
               perform }
    }

    /// Construcción directa a partir de partes; no valida que `perform`
    /// respete los descriptores declarados.
    #[cfg(test)]
    pub(crate) fn from_parts(name: &str,
                             input: TypeDescriptor,
                             output: TypeDescriptor,
                             perform: Arc<ErasedFn>)
                             -> Self {
        Self { name: name.to_string(),
               input,
               output,
               persistence: None,
               perform }
    }

    /// Reemplaza el nombre (por defecto el nombre corto del tipo del step).
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn input_type(&self) -> TypeDescriptor {
        self.input
    }

    pub fn output_type(&self) -> TypeDescriptor {
        self.output
    }

    pub fn is_persistable(&self) -> bool {
        self.persistence.is_some()
    }

    pub fn persistence(&self) -> Option<&ResultPersistence> {
        self.persistence.as_ref()
    }

    /// Identidad nominal del output en el cache, si es persistible.
    pub fn result_type_identity(&self) -> Option<&str> {
        self.persistence.as_ref().map(ResultPersistence::identity)
    }

    pub fn invoke(&self, value: AnyValue) -> Result<AnyValue, PipelineError> {
        if value.type_descriptor() != self.input {
            return Err(PipelineError::TypeMismatch { step: self.name.clone(),
                                                     expected: self.input.name().to_string(),
                                                     found: value.type_descriptor().name().to_string() });
        }
        (self.perform)(value)
    }

    /// Compone `self` seguido de `next` en una sola unidad.
    ///
    /// Falla con `ChainValidation` si el output de `self` no es el input de
    /// `next`. La unidad resultante se llama `"self -> next"`, consume el input
    /// de `self`, produce el output de `next` y hereda la persistencia de
    /// `next`.
    pub fn bind(&self, next: &AnyStep) -> Result<AnyStep, PipelineError> {
        check_adjacent(1, self, next)?;
        let first = Arc::clone(&self.perform);
        let first_name = self.name.clone();
        let first_input = self.input;
        let second = next.clone();
        let perform: Arc<ErasedFn> = Arc::new(move |value: AnyValue| {
            if value.type_descriptor() != first_input {
                return Err(PipelineError::TypeMismatch { step: first_name.clone(),
                                                         expected: first_input.name().to_string(),
                                                         found: value.type_descriptor().name().to_string() });
            }
            let intermediate = first(value)?;
            second.invoke(intermediate)
        });
        Ok(AnyStep { name: format!("{}{}{}", self.name, NAME_SEPARATOR, next.name),
                     input: self.input,
                     output: next.output,
                     persistence: next.persistence.clone(),
                     perform })
    }
}

/// Verifica que `next` (en `position`) acepte el output de `previous`.
pub(crate) fn check_adjacent(position: usize, previous: &AnyStep, next: &AnyStep) -> Result<(), PipelineError> {
    if previous.output == next.input {
        return Ok(());
    }
    Err(PipelineError::ChainValidation { position,
                                         previous: previous.name.clone(),
                                         step: next.name.clone(),
                                         expected: next.input.name().to_string(),
                                         found: previous.output.name().to_string() })
}

/// Verifica que `next` (en `position`) no persista el mismo tipo de
/// resultado que algún step de `earlier`.
pub(crate) fn check_unique_result(position: usize, earlier: &[AnyStep], next: &AnyStep) -> Result<(), PipelineError> {
    let Some(identity) = next.result_type_identity() else {
        return Ok(());
    };
    match earlier.iter().find(|step| step.result_type_identity() == Some(identity)) {
        Some(owner) => Err(PipelineError::ChainValidation { position,
                                                            previous: owner.name.clone(),
                                                            step: next.name.clone(),
                                                            expected: "a result type not already cached in this chain"
                                                                .to_string(),
                                                            found: identity.to_string() }),
        None => Ok(()),
    }
}

impl fmt::Debug for AnyStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AnyStep")
         .field("name", &self.name)
         .field("input", &self.input)
         .field("output", &self.output)
         .field("persistable", &self.is_persistable())
         .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::step::FnStep;

    fn len_step() -> AnyStep {
        AnyStep::transient(FnStep::new("len", |s: String| Ok(s.len())))
    }

    fn double_step() -> AnyStep {
        AnyStep::transient(FnStep::new("double", |n: usize| Ok(n * 2)))
    }

    #[test]
    fn invoke_runs_wrapped_step() {
        let out = len_step().invoke(AnyValue::new("four".to_string())).unwrap();
        assert_eq!(out.downcast::<usize>().ok(), Some(4));
    }

    #[test]
    fn invoke_rejects_wrong_input_type() {
        let err = len_step().invoke(AnyValue::new(3u8)).unwrap_err();
        match err {
            PipelineError::TypeMismatch { step, expected, found } => {
                assert_eq!(step, "len");
                assert_eq!(expected, std::any::type_name::<String>());
                assert_eq!(found, "u8");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn bind_composes_in_order() {
        let composed = len_step().bind(&double_step()).unwrap();
        assert_eq!(composed.name(), "len -> double");
        assert_eq!(composed.input_type(), TypeDescriptor::of::<String>());
        assert_eq!(composed.output_type(), TypeDescriptor::of::<usize>());
        let out = composed.invoke(AnyValue::new("abc".to_string())).unwrap();
        assert_eq!(out.downcast::<usize>().ok(), Some(6));
    }

    #[test]
    fn bind_rejects_incompatible_successor() {
        let err = double_step().bind(&len_step()).unwrap_err();
        assert!(matches!(err, PipelineError::ChainValidation { position: 1, .. }), "got {err:?}");
    }

    #[test]
    fn transient_steps_have_no_cache_identity() {
        assert!(!len_step().is_persistable());
        assert!(len_step().result_type_identity().is_none());
    }
}
