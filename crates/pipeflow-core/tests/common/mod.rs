#![allow(dead_code)]

use std::sync::Arc;

use pipeflow_core::cache::ResultPersistence;
use pipeflow_core::{cacheable_result, typed_step, AnyValue, CacheableResult, Chain, ChainBuilder, InMemoryCacheStore,
                    InMemoryObserver, WorkflowEngine};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct A {
    pub int: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct B {
    pub a: A,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct C {
    pub b: B,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct D {
    pub c: C,
}

cacheable_result!(A, B, C, D);

typed_step!(pub AtoB: A => B, |a| B { a });
typed_step!(pub BtoC: B => C, |b| C { b });
typed_step!(pub CtoD: C => D, |c| D { c });

pub fn a(int: i64) -> A {
    A { int }
}

pub fn b_of(int: i64) -> B {
    B { a: a(int) }
}

pub fn c_of(int: i64) -> C {
    C { b: b_of(int) }
}

pub fn d_of(int: i64) -> D {
    D { c: c_of(int) }
}

/// `AtoB -> BtoC -> CtoD`, todos persistibles.
pub fn abcd_chain() -> Chain<A, D> {
    ChainBuilder::start(AtoB).then(BtoC).then(CtoD).build().expect("valid chain")
}

pub struct Harness {
    pub store: Arc<InMemoryCacheStore>,
    pub observer: Arc<InMemoryObserver>,
    pub engine: WorkflowEngine,
}

pub fn harness() -> Harness {
    let store = Arc::new(InMemoryCacheStore::new());
    let observer = Arc::new(InMemoryObserver::new());
    let engine = WorkflowEngine::builder().store(store.clone())
                                          .observer(observer.clone())
                                          .build();
    Harness { store, observer, engine }
}

/// Escribe `value` en el cache como si lo hubiera producido un step anterior.
pub fn seed<T: CacheableResult>(engine: &WorkflowEngine, workflow: &str, value: T) {
    engine.cacher()
          .save(workflow, &ResultPersistence::of::<T>(), &AnyValue::new(value))
          .expect("seeding cache");
}

/// Lee el valor en cache para `T`, si existe.
pub fn cached<T: CacheableResult>(engine: &WorkflowEngine, workflow: &str) -> Option<T> {
    engine.cacher()
          .load(workflow, &ResultPersistence::of::<T>())
          .expect("reading cache")
          .and_then(|value| value.downcast::<T>().ok())
}
