//! `Pipeline`: una cadena con nombre atada a un engine compartido.
//!
//! El nombre por defecto es la descripción de la cadena (`"AtoB -> BtoC"`) y
//! se usa como nombre de workflow en el cache. Un `Pipeline` es a su vez un
//! `Step`, así que puede anidarse dentro de otra cadena.

use std::fmt;
use std::sync::Arc;

use crate::chain::Chain;
use crate::engine::{ExecutionOptions, ExecutionRequest, RunReport, WorkflowEngine};
use crate::errors::PipelineError;
use crate::step::{Step, StepError};

pub struct Pipeline<I, O> {
    description: String,
    chain: Chain<I, O>,
    engine: Arc<WorkflowEngine>,
    options: ExecutionOptions,
}

impl<I: Send + 'static, O: 'static> Pipeline<I, O> {
    pub fn new(chain: Chain<I, O>, engine: Arc<WorkflowEngine>) -> Self {
        Self { description: chain.description(),
               chain,
               engine,
               options: ExecutionOptions::default() }
    }

    /// Usa `name` como nombre de workflow en lugar de la descripción.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.description = name.into();
        self
    }

    pub fn with_options(mut self, options: ExecutionOptions) -> Self {
        self.options = options;
        self
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn chain(&self) -> &Chain<I, O> {
        &self.chain
    }

    pub fn engine(&self) -> &Arc<WorkflowEngine> {
        &self.engine
    }

    pub fn run(&self, input: I) -> Result<RunReport<O>, PipelineError> {
        let request = ExecutionRequest::new(&self.description, &self.chain, input).with_options(self.options);
        self.engine.run(request)
    }

    pub fn perform(&self, input: I) -> Result<O, PipelineError> {
        self.run(input).map(|report| report.output)
    }
}

impl<I: Send + 'static, O: 'static> Step for Pipeline<I, O> {
    type Input = I;
    type Output = O;

    fn name(&self) -> String {
        self.description.clone()
    }

    fn perform(&self, input: I) -> Result<O, StepError> {
        Pipeline::perform(self, input).map_err(StepError::from)
    }
}

impl<I, O> Clone for Pipeline<I, O> {
    fn clone(&self) -> Self {
        Self { description: self.description.clone(),
               chain: self.chain.clone(),
               engine: Arc::clone(&self.engine),
               options: self.options }
    }
}

impl<I, O> fmt::Debug for Pipeline<I, O> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pipeline")
         .field("description", &self.description)
         .field("options", &self.options)
         .field("chain", &self.chain)
         .finish_non_exhaustive()
    }
}
