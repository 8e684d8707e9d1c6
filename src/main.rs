//! pipeflow-demo: ejecuta la cadena `AtoB -> BtoC -> CtoD` sobre un store en
//! disco y muestra cómo se reanuda.
//!
//! Configuración vía `.env` / entorno (`PIPEFLOW_CACHE_DIR`,
//! `PIPEFLOW_PRETTY_JSON`, `PIPEFLOW_RESUME_POLICY`); nivel de log vía
//! `RUST_LOG`.

use std::error::Error;
use std::process::ExitCode;
use std::sync::Arc;

use log::info;
use pipeflow::demo::{abcd_chain, A, D};
use pipeflow::pipeflow_core::{Cacher, ChainBuilder, LogObserver, Pipeline, ResumePolicy, WorkflowEngine};
use pipeflow::pipeflow_persistence::{load_dotenv, CacheConfig, FsCacheStore};
use tracing_subscriber::EnvFilter;

const WORKFLOW: &str = "demo";

fn main() -> ExitCode {
    tracing_subscriber::fmt().with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                                                 "pipeflow=info,pipeflow_core=info,pipeflow_persistence=info".into()
                                             }))
                             .with_target(false)
                             .init();

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("pipeflow-demo: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<(), Box<dyn Error>> {
    if let Some(path) = load_dotenv() {
        info!("using {}", path.display());
    }
    let config = CacheConfig::from_env()?;
    let store = Arc::new(FsCacheStore::temporary_in(&config.cache_dir)?);
    let engine = Arc::new(WorkflowEngine::builder().store(store.clone())
                                                   .codec(Arc::new(config.codec()))
                                                   .observer(Arc::new(LogObserver))
                                                   .default_policy(config.default_policy)
                                                   .build());
    let chain = abcd_chain()?;
    println!("cache dir: {}", store.root().display());
    println!("pipeline: {}", chain.description());

    // Ejecución en frío: los tres steps trabajan.
    let out = engine.execute(WORKFLOW, &chain, A { int: 42 }, None, None)?;
    println!("[cold]   {out:?} matches={} (performed {})",
             out == D::wrapping(42),
             engine.steps_performed_in_last_run());

    // Re-ejecución: el último output ya está en disco.
    let out = engine.execute(WORKFLOW, &chain, A { int: 42 }, None, None)?;
    println!("[cached] {out:?} (performed {})", engine.steps_performed_in_last_run());

    // Se borran C y D: la búsqueda hacia atrás encuentra B.
    for step in &chain.steps()[1..] {
        if let Some(persistence) = step.persistence() {
            store.remove(&Cacher::key_for(WORKFLOW, persistence))?;
        }
    }
    let out = engine.execute(WORKFLOW, &chain, A { int: 42 }, Some(0), Some(ResumePolicy::IgnoreAndOverwrite))?;
    println!("[resume] {out:?} (performed {})", engine.steps_performed_in_last_run());

    // Un Pipeline es a su vez un Step y puede anidarse.
    let inner = Pipeline::new(chain.clone(), Arc::clone(&engine));
    let outer = Pipeline::new(ChainBuilder::start(inner).build()?, Arc::clone(&engine)).with_name("nested-demo");
    let report = outer.run(A { int: 7 })?;
    println!("[nested] {:?} via `{}` ({:?})", report.output, outer.description(), report.resume_point);

    info!("{} entries saved under {}", store.number_of_saved_entries()?, store.root().display());
    Ok(())
}
