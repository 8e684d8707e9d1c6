//! Definiciones relacionadas a Steps.
//!
//! Un Step transforma un input tipado en un output tipado. Este módulo define:
//! - `Step`: interfaz tipada que implementan los autores.
//! - `FnStep`: step construido a partir de un closure.
//! - `AnyStep` / `AnyValue`: borrado de tipos para almacenar steps
//!   heterogéneos en una lista e invocarlos de forma uniforme.
//! - macros `typed_step!` y `cacheable_result!`.

pub mod definition;
pub mod erased;
pub mod fn_step;
pub mod macros;
pub mod value;

pub use definition::{Step, StepError};
pub use erased::AnyStep;
pub use fn_step::FnStep;
pub use value::{short_type_name, AnyValue, TypeDescriptor};
