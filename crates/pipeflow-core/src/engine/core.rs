//! Core WorkflowEngine implementation

use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use chrono::Utc;
use log::debug;
use uuid::Uuid;

use super::{EngineBuilder, ExecutionOptions, ExecutionRequest, ResumePoint, ResumePolicy, RunReport};
use crate::cache::{CacheStore, Cacher};
use crate::chain::Chain;
use crate::errors::PipelineError;
use crate::event::{ExecutionEvent, ExecutionEventKind, ExecutionObserver};
use crate::step::{AnyStep, AnyValue};

/// Motor de ejecución reanudable.
///
/// Para cada ejecución:
/// 1. fast path: si se pide empezar en el último step y su output está en
///    cache, se devuelve sin ejecutar nada;
/// 2. escaneo hacia atrás desde el índice de inicio hasta 0 buscando el
///    checkpoint más avanzado; sin checkpoint se parte del input externo;
/// 3. ejecución hacia adelante aplicando la `ResumePolicy`, persistiendo cada
///    output persistible;
/// 4. conversión del valor final al `O` declarado por la cadena.
///
/// Ejecución síncrona, un step tras otro. No hay exclusión mutua entre
/// ejecuciones concurrentes del mismo workflow sobre el mismo store.
pub struct WorkflowEngine {
    cacher: Cacher,
    observer: Arc<dyn ExecutionObserver>,
    default_policy: ResumePolicy,
    last_run_executed: AtomicUsize,
}

/// Estado transitorio de una ejecución.
struct RunContext<'w> {
    run_id: Uuid,
    workflow: &'w str,
    seq: u64,
    executed: usize,
    cursor: Option<usize>,
}

impl<'w> RunContext<'w> {
    fn new(workflow: &'w str) -> Self {
        Self { run_id: Uuid::new_v4(),
               workflow,
               seq: 0,
               executed: 0,
               cursor: None }
    }
}

impl WorkflowEngine {
    /// Crea un nuevo builder para configurar el engine
    #[inline]
    pub fn builder() -> EngineBuilder {
        EngineBuilder::default()
    }

    /// Engine JSON sobre el store dado, sin observer.
    pub fn new(store: Arc<dyn CacheStore>) -> Self {
        Self::builder().store(store).build()
    }

    /// Engine con store en memoria.
    pub fn in_memory() -> Self {
        Self::builder().build()
    }

    pub(crate) fn from_parts(cacher: Cacher, observer: Arc<dyn ExecutionObserver>, default_policy: ResumePolicy) -> Self {
        Self { cacher,
               observer,
               default_policy,
               last_run_executed: AtomicUsize::new(0) }
    }

    pub fn cacher(&self) -> &Cacher {
        &self.cacher
    }

    pub fn default_policy(&self) -> ResumePolicy {
        self.default_policy
    }

    /// Steps que ejecutaron trabajo en la ejecución más reciente de este
    /// engine (se reinicia al comenzar cada ejecución).
    pub fn steps_performed_in_last_run(&self) -> usize {
        self.last_run_executed.load(Ordering::Relaxed)
    }

    /// Ejecuta `chain` bajo el nombre `workflow`.
    ///
    /// `start_index` por defecto es el último step; `policy` por defecto es la
    /// del engine.
    pub fn execute<I, O>(&self,
                         workflow: &str,
                         chain: &Chain<I, O>,
                         input: I,
                         start_index: Option<usize>,
                         policy: Option<ResumePolicy>)
                         -> Result<O, PipelineError>
        where I: Send + 'static,
              O: 'static
    {
        let options = ExecutionOptions { start_index, policy };
        self.run(ExecutionRequest::new(workflow, chain, input).with_options(options))
            .map(|report| report.output)
    }

    /// Igual que `execute` pero devuelve el `RunReport` completo.
    pub fn run<I, O>(&self, request: ExecutionRequest<'_, I, O>) -> Result<RunReport<O>, PipelineError>
        where I: Send + 'static,
              O: 'static
    {
        let ExecutionRequest { workflow,
                               chain,
                               input,
                               options, } = request;
        let steps = chain.steps();
        let Some(last) = steps.len().checked_sub(1) else {
            return Err(PipelineError::EmptyChain);
        };
        let start = match options.start_index {
            Some(index) if index > last => {
                debug!("[{workflow}] start index {index} beyond last step {last}, clamping");
                last
            }
            Some(index) => index,
            None => last,
        };
        let policy = options.policy.unwrap_or(self.default_policy);

        self.last_run_executed.store(0, Ordering::Relaxed);
        let mut ctx = RunContext::new(workflow);
        self.emit(&mut ctx,
                  ExecutionEventKind::RunStarted { start_index: start,
                                                   step_count: steps.len(),
                                                   policy });

        let result = self.resume(&mut ctx, steps, AnyValue::new(input), start, policy)
                         .and_then(|(value, resume_point)| {
                             reconcile(workflow, chain, value).map(|output| (output, resume_point))
                         });
        let executed_steps = ctx.executed;
        self.last_run_executed.store(executed_steps, Ordering::Relaxed);

        match result {
            Ok((output, resume_point)) => {
                self.emit(&mut ctx, ExecutionEventKind::RunCompleted { executed_steps });
                Ok(RunReport { run_id: ctx.run_id,
                               output,
                               resume_point,
                               executed_steps })
            }
            Err(err) => {
                let step_index = ctx.cursor;
                self.emit(&mut ctx,
                          ExecutionEventKind::RunFailed { step_index,
                                                          executed_steps,
                                                          error: err.to_string() });
                Err(err)
            }
        }
    }

    fn resume(&self,
              ctx: &mut RunContext<'_>,
              steps: &[AnyStep],
              input: AnyValue,
              start: usize,
              policy: ResumePolicy)
              -> Result<(AnyValue, ResumePoint), PipelineError> {
        let last = steps.len() - 1;

        // Fast path: el último output ya estaba calculado.
        let mut scan_from = Some(start);
        if start == last {
            if let Some(cached) = self.lookup(ctx, last, &steps[last]) {
                self.emit(ctx,
                          ExecutionEventKind::FastPathHit { step_index: last,
                                                            step_name: steps[last].name().to_string() });
                return Ok((cached, ResumePoint::LastStepCached));
            }
            // El último índice ya fue consultado.
            scan_from = last.checked_sub(1);
        }

        let found = match scan_from {
            Some(from) => self.find_resume_point(ctx, steps, from),
            None => None,
        };
        let (mut current, resume_point) = match found {
            Some((index, cached)) => {
                self.emit(ctx,
                          ExecutionEventKind::ResumePointFound { step_index: index,
                                                                 step_name: steps[index].name().to_string() });
                (cached, ResumePoint::AfterStep(index))
            }
            None => {
                self.emit(ctx, ExecutionEventKind::NoResumePoint { scanned_from: scan_from });
                (input, ResumePoint::BeforeFirstStep)
            }
        };

        let first_pending = match resume_point {
            ResumePoint::AfterStep(index) => index + 1,
            ResumePoint::BeforeFirstStep | ResumePoint::LastStepCached => 0,
        };
        for (index, step) in steps.iter().enumerate().skip(first_pending) {
            ctx.cursor = Some(index);
            current = self.advance(ctx, index, step, current, policy)?;
        }
        ctx.cursor = None;
        Ok((current, resume_point))
    }

    /// Primer checkpoint encontrado recorriendo `from..=0`.
    fn find_resume_point(&self, ctx: &mut RunContext<'_>, steps: &[AnyStep], from: usize) -> Option<(usize, AnyValue)> {
        (0..=from).rev()
                  .find_map(|index| self.lookup(ctx, index, &steps[index]).map(|cached| (index, cached)))
    }

    fn advance(&self,
               ctx: &mut RunContext<'_>,
               index: usize,
               step: &AnyStep,
               input: AnyValue,
               policy: ResumePolicy)
               -> Result<AnyValue, PipelineError> {
        match policy {
            ResumePolicy::IgnoreAndOverwrite => self.perform_and_cache(ctx, index, step, input),
            ResumePolicy::UseIfPresent => match self.lookup(ctx, index, step) {
                Some(cached) => {
                    self.emit(ctx,
                              ExecutionEventKind::StepSkippedFromCache { step_index: index,
                                                                         step_name: step.name().to_string() });
                    Ok(cached)
                }
                None => self.perform_and_cache(ctx, index, step, input),
            },
            ResumePolicy::UseButAlsoOverwrite => match self.lookup(ctx, index, step) {
                Some(cached) => {
                    // El valor recalculado sólo refresca el cache.
                    self.perform_and_cache(ctx, index, step, input)?;
                    self.emit(ctx,
                              ExecutionEventKind::StepRefreshed { step_index: index,
                                                                  step_name: step.name().to_string() });
                    Ok(cached)
                }
                None => self.perform_and_cache(ctx, index, step, input),
            },
        }
    }

    fn perform_and_cache(&self,
                         ctx: &mut RunContext<'_>,
                         index: usize,
                         step: &AnyStep,
                         input: AnyValue)
                         -> Result<AnyValue, PipelineError> {
        ctx.executed += 1;
        let output = step.invoke(input)?;
        let persisted = match step.persistence() {
            Some(persistence) => {
                self.cacher
                    .save(ctx.workflow, persistence, &output)
                    .map_err(|source| PipelineError::CacheWrite { step: step.name().to_string(),
                                                                  source })?;
                true
            }
            None => false,
        };
        self.emit(ctx,
                  ExecutionEventKind::StepExecuted { step_index: index,
                                                     step_name: step.name().to_string(),
                                                     persisted });
        Ok(output)
    }

    /// Output en cache del step, o `None`. Fallos de lectura cuentan como miss.
    fn lookup(&self, ctx: &mut RunContext<'_>, index: usize, step: &AnyStep) -> Option<AnyValue> {
        let persistence = step.persistence()?;
        match self.cacher.load(ctx.workflow, persistence) {
            Ok(hit) => hit,
            Err(err) => {
                debug!("[{}] cache read for `{}` failed: {err}", ctx.workflow, step.name());
                self.emit(ctx,
                          ExecutionEventKind::CacheReadFailed { step_index: index,
                                                                step_name: step.name().to_string(),
                                                                reason: err.to_string() });
                None
            }
        }
    }

    fn emit(&self, ctx: &mut RunContext<'_>, kind: ExecutionEventKind) {
        let event = ExecutionEvent { seq: ctx.seq,
                                     run_id: ctx.run_id,
                                     workflow: ctx.workflow.to_string(),
                                     kind,
                                     ts: Utc::now() };
        ctx.seq += 1;
        self.observer.on_event(&event);
    }
}

/// Convierte el valor final al output declarado. La cadena fue validada al
/// construirse, así que un fallo aquí es un defecto del engine.
fn reconcile<I: 'static, O: 'static>(workflow: &str, chain: &Chain<I, O>, value: AnyValue) -> Result<O, PipelineError> {
    value.downcast::<O>().map_err(|wrong| {
                             PipelineError::Internal(format!("workflow `{workflow}` ({}) produced {} but the chain declares {}",
                                                             chain.description(),
                                                             wrong.type_descriptor(),
                                                             std::any::type_name::<O>()))
                         })
}

impl fmt::Debug for WorkflowEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WorkflowEngine")
         .field("default_policy", &self.default_policy)
         .field("last_run_executed", &self.steps_performed_in_last_run())
         .finish_non_exhaustive()
    }
}

impl Default for WorkflowEngine {
    fn default() -> Self {
        Self::in_memory()
    }
}
