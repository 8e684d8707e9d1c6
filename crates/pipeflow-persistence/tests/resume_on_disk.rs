use std::sync::Arc;

use pipeflow_core::{cacheable_result, typed_step, ChainBuilder, ExecutionRequest, InMemoryObserver, JsonCodec,
                    ResumePoint, WorkflowEngine};
use pipeflow_persistence::{build_engine, CacheConfig, FsCacheStore};
use serde::{Deserialize, Serialize};
use tempfile::TempDir;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct Raw(String);
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct Words(Vec<String>);
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct Count(usize);
cacheable_result!(Raw, Words, Count);

typed_step!(Load: String => Raw, |s| Raw(s));
typed_step!(Split: Raw => Words, |r| Words(r.0.split_whitespace().map(str::to_string).collect()));
typed_step!(Tally: Words => Count, |w| Count(w.0.len()));

fn engine_at(dir: &TempDir) -> (WorkflowEngine, Arc<InMemoryObserver>) {
    let observer = Arc::new(InMemoryObserver::new());
    let engine = WorkflowEngine::builder().store(Arc::new(FsCacheStore::open(dir.path()).unwrap()))
                                          .codec(Arc::new(JsonCodec::compact()))
                                          .observer(observer.clone())
                                          .build();
    (engine, observer)
}

#[test]
fn second_engine_instance_resumes_from_disk() {
    let dir = TempDir::new().unwrap();
    let chain = ChainBuilder::start(Load).then(Split).then(Tally).build().unwrap();

    let (first, _) = engine_at(&dir);
    let out = first.execute("words", &chain, "a b c".to_string(), None, None).unwrap();
    assert_eq!(out, Count(3));
    assert_eq!(first.steps_performed_in_last_run(), 3);
    drop(first);

    let (second, observer) = engine_at(&dir);
    let out = second.execute("words", &chain, "a b c".to_string(), None, None).unwrap();
    assert_eq!(out, Count(3));
    assert_eq!(second.steps_performed_in_last_run(), 0);
    assert_eq!(observer.last_run_codes(), vec!["R", "L", "C"]);
}

#[test]
fn removing_last_entry_resumes_from_previous_step() {
    let dir = TempDir::new().unwrap();
    let store = FsCacheStore::open(dir.path()).unwrap();
    let chain = ChainBuilder::start(Load).then(Split).then(Tally).build().unwrap();
    let (engine, _) = engine_at(&dir);
    engine.execute("words", &chain, "x y".to_string(), None, None).unwrap();

    let tally_key = pipeflow_core::Cacher::key_for("words", chain.steps()[2].persistence().unwrap());
    assert!(store.remove(&tally_key).unwrap());
    assert_eq!(store.number_of_saved_entries().unwrap(), 2);

    let report = engine.run(ExecutionRequest::new("words", &chain, "x y".to_string())).unwrap();
    assert_eq!(report.output, Count(2));
    assert_eq!(report.resume_point, ResumePoint::AfterStep(1));
    assert_eq!(report.executed_steps, 1);
}

#[test]
fn engine_built_from_config_writes_pretty_json_files() {
    let dir = TempDir::new().unwrap();
    let config = CacheConfig { cache_dir: dir.path().join("cache"),
                               ..CacheConfig::default() };
    let engine = build_engine(&config).unwrap();
    let chain = ChainBuilder::start(Load).then(Split).build().unwrap();
    engine.execute("pretty", &chain, "hello world".to_string(), None, None).unwrap();

    let store = FsCacheStore::open(&config.cache_dir).unwrap();
    let key = pipeflow_core::Cacher::key_for("pretty", chain.steps()[1].persistence().unwrap());
    let text = std::fs::read_to_string(store.entry_path(&key)).unwrap();
    assert!(text.contains('\n'));
    assert!(text.contains("\"hello\""));
    assert_eq!(store.number_of_saved_entries().unwrap(), 2);
}
