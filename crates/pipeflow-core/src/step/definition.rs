use super::value::short_type_name;

/// Causa de fallo de un step; el engine la envuelve en
/// `PipelineError::StepExecution`.
pub type StepError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Unidad de trabajo nombrada que convierte `Input` en `Output`.
///
/// Implementaciones no deben ocuparse del cache: es el engine quien decide si
/// el step se ejecuta o si su output se lee del store.
pub trait Step {
    type Input;
    type Output;

    /// Nombre legible. Por defecto el nombre corto del tipo (`AtoB`).
    fn name(&self) -> String {
        short_type_name(std::any::type_name::<Self>())
    }

    fn perform(&self, input: Self::Input) -> Result<Self::Output, StepError>;
}
