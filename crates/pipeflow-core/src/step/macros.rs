//! Macros utilitarias para reducir boilerplate al declarar Steps y resultados
//! persistibles.
//!
//! Exportadas en la raíz del crate:
//!   use pipeflow_core::{cacheable_result, typed_step};

/// Declara un step unitario (struct sin campos) e implementa `Step`.
///
/// Formas soportadas:
/// - `typed_step!(pub AtoB: A => B, |a| B { a });`: transformación infalible.
/// - `typed_step!(pub Parse: String => u32, try |s| Ok(s.parse::<u32>()?));`:
///   el cuerpo devuelve `Result<_, StepError>`.
///
/// El nombre del step es el nombre del struct.
#[macro_export]
macro_rules! typed_step {
    // Cuerpo falible
    ($(#[$meta:meta])* $vis:vis $name:ident : $inp:ty => $out:ty, try |$arg:ident| $body:expr $(,)?) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, Default)]
        $vis struct $name;
        impl $crate::step::Step for $name {
            type Input = $inp;
            type Output = $out;
            fn perform(&self, $arg: Self::Input) -> ::std::result::Result<Self::Output, $crate::step::StepError> {
                $body
            }
        }
    };
    // Cuerpo infalible
    ($(#[$meta:meta])* $vis:vis $name:ident : $inp:ty => $out:ty, |$arg:ident| $body:expr $(,)?) => {
        $crate::typed_step!($(#[$meta])* $vis $name : $inp => $out, try |$arg| ::std::result::Result::Ok($body));
    };
}

/// Marca uno o más tipos como `CacheableResult` con identidad y versión por
/// defecto.
#[macro_export]
macro_rules! cacheable_result {
    ($($ty:ty),+ $(,)?) => {
        $(impl $crate::cache::CacheableResult for $ty {})+
    };
}
