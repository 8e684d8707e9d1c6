use std::marker::PhantomData;

use super::Chain;
use crate::cache::CacheableResult;
use crate::errors::PipelineError;
use crate::step::erased::check_unique_result;
use crate::step::{AnyStep, Step};

/// Marker trait to assert two types are the same at compile time.
/// Implemented only for identical types (T: SameAs<T> for all T).
pub trait SameAs<T> {}
impl<T> SameAs<T> for T {}

/// Typed chain builder that enforces at compile time that the next step's
/// input matches the previous step's output.
///
/// Usage:
///   let chain: Chain<A, D> = ChainBuilder::start(AtoB).then(BtoC).then(CtoD).build()?;
///
/// `then` persists the new step's output; `then_transient` keeps it out of
/// the cache (its output type need not be `CacheableResult`). A type can be
/// persisted by one step only: repeat it with `then_transient`.
pub struct ChainBuilder<I, O> {
    steps: Vec<AnyStep>,
    _io: PhantomData<fn(I) -> O>,
}

impl<I: Send + 'static, O: Send + 'static> ChainBuilder<I, O> {
    pub fn start<S>(step: S) -> Self
        where S: Step<Input = I, Output = O> + Send + Sync + 'static,
              O: CacheableResult
    {
        Self { steps: vec![AnyStep::cached(step)],
               _io: PhantomData }
    }

    pub fn start_transient<S>(step: S) -> Self
        where S: Step<Input = I, Output = O> + Send + Sync + 'static
    {
        Self { steps: vec![AnyStep::transient(step)],
               _io: PhantomData }
    }

    /// Append a new step, enforcing N::Input == O at compile time.
    ///
    /// ```compile_fail
    /// use pipeflow_core::{ChainBuilder, FnStep};
    /// // `upper` expects a String but `len` produces usize.
    /// let _ = ChainBuilder::start_transient(FnStep::new("len", |s: String| Ok(s.len())))
    ///     .then_transient(FnStep::new("upper", |s: String| Ok(s.to_uppercase())));
    /// ```
    pub fn then<N>(self, next: N) -> ChainBuilder<I, N::Output>
        where N: Step + Send + Sync + 'static,
              N::Input: SameAs<O> + Send + 'static,
              N::Output: CacheableResult
    {
        self.push(AnyStep::cached(next))
    }

    pub fn then_transient<N>(self, next: N) -> ChainBuilder<I, N::Output>
        where N: Step + Send + Sync + 'static,
              N::Input: SameAs<O> + Send + 'static,
              N::Output: Send + 'static
    {
        self.push(AnyStep::transient(next))
    }

    fn push<P>(mut self, next: AnyStep) -> ChainBuilder<I, P> {
        debug_assert!(self.steps.last().is_some_and(|prev| prev.output_type() == next.input_type()),
                      "SameAs bound must keep adjacent types equal");
        self.steps.push(next);
        ChainBuilder { steps: self.steps,
                       _io: PhantomData }
    }

    /// Build the chain. Adjacency is already guaranteed by `then`; fails with
    /// `ChainValidation` when two persisted steps share a result type.
    pub fn build(self) -> Result<Chain<I, O>, PipelineError> {
        for (i, step) in self.steps.iter().enumerate().skip(1) {
            check_unique_result(i, &self.steps[..i], step)?;
        }
        Ok(Chain::from_validated(self.steps))
    }
}
