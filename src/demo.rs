//! Tipos y steps de demostración: cada step envuelve su input una capa más.
//!
//! `A(42)` → `B(A(42))` → `C(B(A(42)))` → `D(C(B(A(42))))`.

use serde::{Deserialize, Serialize};

use pipeflow_core::{cacheable_result, typed_step, Chain, ChainBuilder, PipelineError};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct A {
    pub int: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct B {
    pub a: A,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct C {
    pub b: B,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct D {
    pub c: C,
}

cacheable_result!(A, B, C, D);

typed_step!(pub AtoB: A => B, |a| B { a });
typed_step!(pub BtoC: B => C, |b| C { b });
typed_step!(pub CtoD: C => D, |c| D { c });

impl D {
    /// Valor esperado de la cadena completa para `A(int)`.
    pub fn wrapping(int: i64) -> Self {
        D { c: C { b: B { a: A { int } } } }
    }
}

pub fn abcd_chain() -> Result<Chain<A, D>, PipelineError> {
    ChainBuilder::start(AtoB).then(BtoC).then(CtoD).build()
}
