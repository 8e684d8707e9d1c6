//! Tipos de evento emitidos por el `WorkflowEngine`.
//!
//! Rol en el flujo:
//! - Cada ejecución emite eventos ordenados (`seq`) a un
//!   `ExecutionObserver` inyectado.
//! - Permiten verificar decisiones del engine (punto de reanudación, steps
//!   ejecutados vs. leídos del cache) sin capturar salida de consola.
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::engine::ResumePolicy;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExecutionEventKind {
    /// Primer evento de toda ejecución. `start_index` ya está acotado al
    /// último step.
    RunStarted {
        start_index: usize,
        step_count: usize,
        policy: ResumePolicy,
    },
    /// El output del último step estaba en cache; no se ejecuta nada.
    FastPathHit { step_index: usize, step_name: String },
    /// Una lectura de cache falló y se trató como miss.
    CacheReadFailed {
        step_index: usize,
        step_name: String,
        reason: String,
    },
    /// El escaneo hacia atrás encontró el checkpoint más avanzado.
    ResumePointFound { step_index: usize, step_name: String },
    /// Ningún checkpoint en el rango escaneado: se parte del input externo.
    NoResumePoint { scanned_from: Option<usize> },
    /// El step ejecutó su transformación (cache miss o política que obliga).
    StepExecuted {
        step_index: usize,
        step_name: String,
        persisted: bool,
    },
    /// El step no se ejecutó: se usó su output en cache.
    StepSkippedFromCache { step_index: usize, step_name: String },
    /// El step se re-ejecutó y sobrescribió el cache, pero la ejecución
    /// continúa con el valor que estaba en cache.
    StepRefreshed { step_index: usize, step_name: String },
    RunCompleted { executed_steps: usize },
    RunFailed {
        step_index: Option<usize>,
        executed_steps: usize,
        error: String,
    },
}

impl ExecutionEventKind {
    /// Código de una letra, útil para aserciones compactas sobre secuencias.
    pub fn code(&self) -> &'static str {
        match self {
            Self::RunStarted { .. } => "R",
            Self::FastPathHit { .. } => "L",
            Self::CacheReadFailed { .. } => "E",
            Self::ResumePointFound { .. } => "P",
            Self::NoResumePoint { .. } => "N",
            Self::StepExecuted { .. } => "X",
            Self::StepSkippedFromCache { .. } => "K",
            Self::StepRefreshed { .. } => "U",
            Self::RunCompleted { .. } => "C",
            Self::RunFailed { .. } => "F",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecutionEvent {
    pub seq: u64, // orden dentro de la ejecución
    pub run_id: Uuid,
    pub workflow: String,
    pub kind: ExecutionEventKind,
    pub ts: DateTime<Utc>, // metadato
}
