//! Cadenas de steps.
//!
//! Una `Chain<I, O>` es una secuencia ordenada, no vacía e inmutable de
//! `AnyStep` en la que el output de cada step es el input del siguiente, el
//! primer input es `I` y el último output es `O`. Además, dos steps
//! persistibles no pueden producir el mismo tipo de resultado: compartirían
//! la entrada de cache dentro de una misma ejecución. La invariante se impone
//! al construirla, nunca durante la ejecución. Tres caminos de construcción:
//! - `ChainBuilder`: tipado, adyacencia verificada en compilación y slots de
//!   cache verificados en `build`.
//! - `StepLinker`: dinámico, adyacencia verificada en cada `link`.
//! - `Chain::from_steps`: valida una lista ya borrada.

mod builder;
mod linker;

pub use builder::{ChainBuilder, SameAs};
pub use linker::StepLinker;

use std::fmt;
use std::marker::PhantomData;

use crate::constants::NAME_SEPARATOR;
use crate::errors::PipelineError;
use crate::step::erased::{check_adjacent, check_unique_result};
use crate::step::{AnyStep, TypeDescriptor};

pub struct Chain<I, O> {
    steps: Vec<AnyStep>,
    _io: PhantomData<fn(I) -> O>,
}

impl<I: 'static, O: 'static> Chain<I, O> {
    /// Valida una lista de steps borrados y la convierte en cadena.
    pub fn from_steps(steps: Vec<AnyStep>) -> Result<Self, PipelineError> {
        validate::<I, O>(&steps)?;
        Ok(Self::from_validated(steps))
    }

    pub(crate) fn from_validated(steps: Vec<AnyStep>) -> Self {
        Self { steps, _io: PhantomData }
    }

    pub fn steps(&self) -> &[AnyStep] {
        &self.steps
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Siempre `false` para una cadena construida; existe por simetría con `len`.
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn last_index(&self) -> usize {
        self.steps.len().saturating_sub(1)
    }

    pub fn step_names(&self) -> Vec<&str> {
        self.steps.iter().map(AnyStep::name).collect()
    }

    /// `"AtoB -> BtoC -> CtoD"`.
    pub fn description(&self) -> String {
        self.step_names().join(NAME_SEPARATOR)
    }

    pub fn input_type(&self) -> TypeDescriptor {
        TypeDescriptor::of::<I>()
    }

    pub fn output_type(&self) -> TypeDescriptor {
        TypeDescriptor::of::<O>()
    }
}

impl<I, O> Clone for Chain<I, O> {
    fn clone(&self) -> Self {
        Self { steps: self.steps.clone(),
               _io: PhantomData }
    }
}

impl<I, O> fmt::Debug for Chain<I, O> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Chain")
         .field("input", &std::any::type_name::<I>())
         .field("output", &std::any::type_name::<O>())
         .field("steps", &self.steps)
         .finish()
    }
}

/// Comprueba no-vacía, input/output de los extremos, adyacencia y unicidad
/// de los slots de cache.
pub(crate) fn validate<I: 'static, O: 'static>(steps: &[AnyStep]) -> Result<(), PipelineError> {
    let (Some(first), Some(last)) = (steps.first(), steps.last()) else {
        return Err(PipelineError::EmptyChain);
    };
    let declared_input = TypeDescriptor::of::<I>();
    if first.input_type() != declared_input {
        return Err(PipelineError::ChainValidation { position: 0,
                                                    previous: "<chain input>".into(),
                                                    step: first.name().to_string(),
                                                    expected: first.input_type().name().to_string(),
                                                    found: declared_input.name().to_string() });
    }
    for (i, pair) in steps.windows(2).enumerate() {
        check_adjacent(i + 1, &pair[0], &pair[1])?;
    }
    for (i, step) in steps.iter().enumerate().skip(1) {
        check_unique_result(i, &steps[..i], step)?;
    }
    let declared_output = TypeDescriptor::of::<O>();
    if last.output_type() != declared_output {
        return Err(PipelineError::ChainValidation { position: steps.len(),
                                                    previous: last.name().to_string(),
                                                    step: "<chain output>".into(),
                                                    expected: declared_output.name().to_string(),
                                                    found: last.output_type().name().to_string() });
    }
    Ok(())
}
