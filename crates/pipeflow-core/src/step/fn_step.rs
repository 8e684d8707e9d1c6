use std::fmt;
use std::marker::PhantomData;

use super::{Step, StepError};

/// Step respaldado por un closure. Útil para pasos ad hoc que no merecen un
/// tipo propio.
pub struct FnStep<I, O, F> {
    name: String,
    f: F,
    _io: PhantomData<fn(I) -> O>,
}

impl<I, O, F> FnStep<I, O, F> where F: Fn(I) -> Result<O, StepError>
{
    pub fn new(name: impl Into<String>, f: F) -> Self {
        Self { name: name.into(),
               f,
               _io: PhantomData }
    }
}

impl<I, O, F> Step for FnStep<I, O, F> where F: Fn(I) -> Result<O, StepError>
{
    type Input = I;
    type Output = O;

    fn name(&self) -> String {
        self.name.clone()
    }

    fn perform(&self, input: I) -> Result<O, StepError> {
        (self.f)(input)
    }
}

impl<I, O, F> fmt::Debug for FnStep<I, O, F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnStep").field("name", &self.name).finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn closure_step_keeps_given_name() {
        let double = FnStep::new("double", |x: u32| Ok(x * 2));
        assert_eq!(double.name(), "double");
        assert_eq!(double.perform(21).unwrap(), 42);
    }

    #[test]
    fn closure_step_propagates_failure() {
        let fails = FnStep::new("fails", |_: u32| -> Result<u32, StepError> { Err("nope".into()) });
        let err = fails.perform(1).unwrap_err();
        assert_eq!(err.to_string(), "nope");
    }
}
