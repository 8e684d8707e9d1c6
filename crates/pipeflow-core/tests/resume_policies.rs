mod common;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use common::*;
use pipeflow_core::{CacheError, CacheKey, CacheStore, CacheableResult, ChainBuilder, ErrorClass, ExecutionEventKind,
                    FnStep, PipelineError, ResumePolicy, WorkflowEngine};

const WF: &str = "policies";

/// B en cache para A(5) y un D obsoleto calculado con otro input.
fn seeded() -> Harness {
    let h = harness();
    seed(&h.engine, WF, b_of(5));
    seed(&h.engine, WF, d_of(77));
    h
}

#[test]
fn default_policy_is_ignore_and_overwrite() {
    assert_eq!(WorkflowEngine::in_memory().default_policy(), ResumePolicy::IgnoreAndOverwrite);
}

#[test]
fn use_if_present_serves_later_steps_from_cache() {
    let h = seeded();
    let out = h.engine
               .execute(WF, &abcd_chain(), a(5), Some(1), Some(ResumePolicy::UseIfPresent))
               .unwrap();

    assert_eq!(out, d_of(77));
    assert_eq!(h.engine.steps_performed_in_last_run(), 1);
    assert_eq!(h.observer.last_run_codes(), vec!["R", "P", "X", "K", "C"]);
}

#[test]
fn ignore_and_overwrite_recomputes_later_steps() {
    let h = seeded();
    let out = h.engine.execute(WF, &abcd_chain(), a(5), Some(1), None).unwrap();

    assert_eq!(out, d_of(5));
    assert_eq!(h.engine.steps_performed_in_last_run(), 2);
    assert_eq!(h.observer.last_run_codes(), vec!["R", "P", "X", "X", "C"]);
    assert_eq!(cached::<D>(&h.engine, WF), Some(d_of(5)));
}

#[test]
fn use_but_also_overwrite_returns_cached_and_refreshes_store() {
    let h = seeded();
    let out = h.engine
               .execute(WF, &abcd_chain(), a(5), Some(1), Some(ResumePolicy::UseButAlsoOverwrite))
               .unwrap();

    assert_eq!(out, d_of(77));
    assert_eq!(h.engine.steps_performed_in_last_run(), 2);
    assert_eq!(h.observer.last_run_codes(), vec!["R", "P", "X", "X", "U", "C"]);
    assert_eq!(cached::<D>(&h.engine, WF), Some(d_of(5)));
}

#[test]
fn engine_default_policy_applies_when_request_has_none() {
    let h = seeded();
    let engine = WorkflowEngine::builder().store(h.store.clone())
                                          .default_policy(ResumePolicy::UseIfPresent)
                                          .build();
    let out = engine.execute(WF, &abcd_chain(), a(5), Some(1), None).unwrap();
    assert_eq!(out, d_of(77));
    assert_eq!(engine.steps_performed_in_last_run(), 1);
}

#[test]
fn unreadable_entry_is_treated_as_miss() {
    let h = harness();
    let key = CacheKey::new(WF, D::result_type_identity());
    h.store.save(&key, b"definitely not json").unwrap();

    let out = h.engine.execute(WF, &abcd_chain(), a(8), None, None).unwrap();

    assert_eq!(out, d_of(8));
    assert_eq!(h.observer.last_run_codes(), vec!["R", "E", "N", "X", "X", "X", "C"]);
    let reason = h.observer.events().into_iter().find_map(|e| match e.kind {
                                                    ExecutionEventKind::CacheReadFailed { step_index, reason, .. } => {
                                                        Some((step_index, reason))
                                                    }
                                                    _ => None,
                                                });
    assert!(matches!(reason, Some((2, ref r)) if r.contains("decode")), "got {reason:?}");
    assert_eq!(cached::<D>(&h.engine, WF), Some(d_of(8)));
}

struct ReadOnlyStore;

impl CacheStore for ReadOnlyStore {
    fn load(&self, _key: &CacheKey) -> Result<Option<Vec<u8>>, CacheError> {
        Ok(None)
    }

    fn save(&self, key: &CacheKey, _bytes: &[u8]) -> Result<(), CacheError> {
        Err(CacheError::Write { key: key.to_string(),
                                reason: "read-only".into() })
    }

    fn entry_count(&self) -> Result<usize, CacheError> {
        Ok(0)
    }
}

#[test]
fn failed_cache_write_aborts_run() {
    let observer = Arc::new(pipeflow_core::InMemoryObserver::new());
    let engine = WorkflowEngine::builder().store(Arc::new(ReadOnlyStore))
                                          .observer(observer.clone())
                                          .build();

    let err = engine.execute(WF, &abcd_chain(), a(1), None, None).unwrap_err();

    assert!(matches!(err, PipelineError::CacheWrite { ref step, .. } if step == "AtoB"), "got {err:?}");
    assert_eq!(err.class(), ErrorClass::Cache);
    assert_eq!(engine.steps_performed_in_last_run(), 1);
    assert_eq!(observer.last_run_codes(), vec!["R", "N", "F"]);
}

#[test]
fn step_failure_aborts_and_rerun_resumes_from_checkpoint() {
    let h = harness();
    let failing = Arc::new(AtomicBool::new(true));
    let flag = failing.clone();
    let flaky = FnStep::new("flaky", move |b: B| {
        if flag.load(Ordering::SeqCst) {
            Err("transient outage".into())
        } else {
            Ok(C { b })
        }
    });
    let chain = ChainBuilder::start(AtoB).then(flaky).then(CtoD).build().unwrap();

    let err = h.engine.execute(WF, &chain, a(4), None, None).unwrap_err();
    assert_eq!(err.class(), ErrorClass::Step);
    assert_eq!(err.step_name(), Some("flaky"));
    assert_eq!(h.observer.last_run_codes(), vec!["R", "N", "X", "F"]);
    let failed_at = h.observer.events().into_iter().find_map(|e| match e.kind {
                                                       ExecutionEventKind::RunFailed { step_index, .. } => step_index,
                                                       _ => None,
                                                   });
    assert_eq!(failed_at, Some(1));

    failing.store(false, Ordering::SeqCst);
    let out = h.engine.execute(WF, &chain, a(4), None, None).unwrap();
    assert_eq!(out, d_of(4));
    assert_eq!(h.engine.steps_performed_in_last_run(), 2);
    assert_eq!(h.observer.last_run_codes(), vec!["R", "P", "X", "X", "C"]);
}
