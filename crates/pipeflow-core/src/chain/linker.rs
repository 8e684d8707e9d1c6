use super::Chain;
use crate::errors::PipelineError;
use crate::step::erased::{check_adjacent, check_unique_result};
use crate::step::AnyStep;

/// Constructor dinámico de cadenas: agrega steps borrados de a uno,
/// validando en cada `link` la adyacencia y que no se repita el tipo de
/// resultado persistido, devolviendo error en lugar de depender del sistema
/// de tipos.
#[derive(Debug, Clone)]
pub struct StepLinker {
    steps: Vec<AnyStep>,
}

impl StepLinker {
    pub fn new(first: AnyStep) -> Self {
        Self { steps: vec![first] }
    }

    pub fn link(mut self, next: AnyStep) -> Result<Self, PipelineError> {
        if let Some(previous) = self.steps.last() {
            check_adjacent(self.steps.len(), previous, &next)?;
        }
        check_unique_result(self.steps.len(), &self.steps, &next)?;
        self.steps.push(next);
        Ok(self)
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Cierra la cadena comprobando que sus extremos sean `I` y `O`.
    pub fn finish<I: 'static, O: 'static>(self) -> Result<Chain<I, O>, PipelineError> {
        Chain::from_steps(self.steps)
    }
}
