use std::sync::{Mutex, MutexGuard, PoisonError};

use log::{debug, info, warn};
use uuid::Uuid;

use super::{ExecutionEvent, ExecutionEventKind};

/// Hook de observabilidad del engine. Las implementaciones no deben fallar
/// ni bloquear: se invocan en línea entre steps.
pub trait ExecutionObserver: Send + Sync {
    fn on_event(&self, event: &ExecutionEvent);
}

/// Descarta todos los eventos.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl ExecutionObserver for NoopObserver {
    fn on_event(&self, _event: &ExecutionEvent) {}
}

/// Reenvía los eventos al facade `log`.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogObserver;

impl ExecutionObserver for LogObserver {
    fn on_event(&self, event: &ExecutionEvent) {
        let wf = &event.workflow;
        match &event.kind {
            ExecutionEventKind::RunStarted { start_index, step_count, policy } => {
                info!("[{wf}] run {} started at step {start_index}/{step_count} ({policy})", event.run_id)
            }
            ExecutionEventKind::FastPathHit { step_name, .. } => info!("[{wf}] last step `{step_name}` already cached"),
            ExecutionEventKind::CacheReadFailed { step_name, reason, .. } => {
                warn!("[{wf}] cache read for `{step_name}` failed, treating as miss: {reason}")
            }
            ExecutionEventKind::ResumePointFound { step_index, step_name } => {
                info!("[{wf}] resuming after `{step_name}` (index {step_index})")
            }
            ExecutionEventKind::NoResumePoint { .. } => info!("[{wf}] no checkpoint found, starting from input"),
            ExecutionEventKind::StepExecuted { step_name, persisted, .. } => {
                debug!("[{wf}] performed `{step_name}` (persisted: {persisted})")
            }
            ExecutionEventKind::StepSkippedFromCache { step_name, .. } => debug!("[{wf}] `{step_name}` served from cache"),
            ExecutionEventKind::StepRefreshed { step_name, .. } => {
                debug!("[{wf}] `{step_name}` refreshed, continuing with previous cached value")
            }
            ExecutionEventKind::RunCompleted { executed_steps } => info!("[{wf}] completed, {executed_steps} step(s) performed"),
            ExecutionEventKind::RunFailed { error, .. } => warn!("[{wf}] failed: {error}"),
        }
    }
}

/// Acumula eventos en memoria; pensado para tests y diagnósticos.
#[derive(Debug, Default)]
pub struct InMemoryObserver {
    events: Mutex<Vec<ExecutionEvent>>,
}

impl InMemoryObserver {
    pub fn new() -> Self {
        Self::default()
    }

    fn guard(&self) -> MutexGuard<'_, Vec<ExecutionEvent>> {
        // Un panic en otro hilo no invalida los eventos ya registrados.
        self.events.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn events(&self) -> Vec<ExecutionEvent> {
        self.guard().clone()
    }

    pub fn events_for(&self, run_id: Uuid) -> Vec<ExecutionEvent> {
        self.guard().iter().filter(|e| e.run_id == run_id).cloned().collect()
    }

    /// Códigos de los eventos de la ejecución más reciente.
    pub fn last_run_codes(&self) -> Vec<&'static str> {
        let events = self.guard();
        let Some(last_run) = events.last().map(|e| e.run_id) else {
            return Vec::new();
        };
        events.iter().filter(|e| e.run_id == last_run).map(|e| e.kind.code()).collect()
    }

    pub fn clear(&self) {
        self.guard().clear();
    }
}

impl ExecutionObserver for InMemoryObserver {
    fn on_event(&self, event: &ExecutionEvent) {
        self.guard().push(event.clone());
    }
}
