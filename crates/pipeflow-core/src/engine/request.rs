use uuid::Uuid;

use super::ResumePolicy;
use crate::chain::Chain;

/// Opciones de una ejecución: índice de inicio (por defecto el último step)
/// y política (por defecto la del engine).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExecutionOptions {
    pub start_index: Option<usize>,
    pub policy: Option<ResumePolicy>,
}

impl ExecutionOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn start_at(mut self, index: usize) -> Self {
        self.start_index = Some(index);
        self
    }

    pub fn with_policy(mut self, policy: ResumePolicy) -> Self {
        self.policy = Some(policy);
        self
    }
}

/// Petición completa de ejecución.
#[derive(Debug)]
pub struct ExecutionRequest<'a, I, O> {
    pub workflow: &'a str,
    pub chain: &'a Chain<I, O>,
    pub input: I,
    pub options: ExecutionOptions,
}

impl<'a, I, O> ExecutionRequest<'a, I, O> {
    pub fn new(workflow: &'a str, chain: &'a Chain<I, O>, input: I) -> Self {
        Self { workflow,
               chain,
               input,
               options: ExecutionOptions::default() }
    }

    pub fn start_at(mut self, index: usize) -> Self {
        self.options = self.options.start_at(index);
        self
    }

    pub fn with_policy(mut self, policy: ResumePolicy) -> Self {
        self.options = self.options.with_policy(policy);
        self
    }

    pub fn with_options(mut self, options: ExecutionOptions) -> Self {
        self.options = options;
        self
    }
}

/// Desde dónde continuó una ejecución.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResumePoint {
    /// El output del último step estaba en cache (fast path).
    LastStepCached,
    /// Se reanudó con el output en cache del step indicado.
    AfterStep(usize),
    /// Sin checkpoint: se partió del input externo.
    BeforeFirstStep,
}

/// Resultado de una ejecución junto con sus contadores.
#[derive(Debug, Clone)]
pub struct RunReport<O> {
    pub run_id: Uuid,
    pub output: O,
    pub resume_point: ResumePoint,
    /// Steps que realmente ejecutaron su transformación.
    pub executed_steps: usize,
}
