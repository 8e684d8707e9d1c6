//! Descriptores de tipo y valores con tipo borrado.

use std::any::{Any, TypeId};
use std::fmt;
use std::hash::{Hash, Hasher};

/// Identidad de un tipo en runtime: `TypeId` para comparar, nombre para
/// diagnósticos.
#[derive(Clone, Copy)]
pub struct TypeDescriptor {
    id: TypeId,
    name: &'static str,
}

impl TypeDescriptor {
    pub fn of<T: ?Sized + 'static>() -> Self {
        Self { id: TypeId::of::<T>(),
               name: std::any::type_name::<T>() }
    }

    pub fn id(&self) -> TypeId {
        self.id
    }

    /// Nombre completo (`my_crate::model::D`).
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Nombre sin rutas de módulo (`D`).
    pub fn short_name(&self) -> String {
        short_type_name(self.name)
    }
}

impl PartialEq for TypeDescriptor {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for TypeDescriptor {}

impl Hash for TypeDescriptor {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Debug for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TypeDescriptor({})", self.name)
    }
}

impl fmt::Display for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

/// Quita las rutas de módulo de un nombre de tipo, también dentro de
/// genéricos: `alloc::vec::Vec<core::option::Option<u8>>` -> `Vec<Option<u8>>`.
pub fn short_type_name(full: &str) -> String {
    let mut out = String::with_capacity(full.len());
    let mut segment_start = 0;
    for (i, c) in full.char_indices() {
        if matches!(c, '<' | '>' | ',' | ' ' | '(' | ')' | '[' | ']' | ';' | '&') {
            push_last_segment(&mut out, &full[segment_start..i]);
            out.push(c);
            segment_start = i + c.len_utf8();
        }
    }
    push_last_segment(&mut out, &full[segment_start..]);
    out
}

fn push_last_segment(out: &mut String, segment: &str) {
    out.push_str(segment.rsplit("::").next().unwrap_or(segment));
}

/// Valor encadenado entre steps borrados. Conserva su `TypeDescriptor` para
/// poder reportar el tipo real cuando una invocación no coincide.
pub struct AnyValue {
    value: Box<dyn Any + Send>,
    type_desc: TypeDescriptor,
}

impl AnyValue {
    pub fn new<T: Any + Send>(value: T) -> Self {
        Self { value: Box::new(value),
               type_desc: TypeDescriptor::of::<T>() }
    }

    pub fn type_descriptor(&self) -> TypeDescriptor {
        self.type_desc
    }

    pub fn is<T: Any>(&self) -> bool {
        self.value.is::<T>()
    }

    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.value.downcast_ref::<T>()
    }

    /// Recupera el valor tipado o devuelve `self` intacto si el tipo no coincide.
    pub fn downcast<T: Any>(self) -> Result<T, AnyValue> {
        let type_desc = self.type_desc;
        match self.value.downcast::<T>() {
            Ok(boxed) => Ok(*boxed),
            Err(value) => Err(AnyValue { value, type_desc }),
        }
    }
}

impl fmt::Debug for AnyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AnyValue<{}>", self.type_desc.short_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_names_strip_paths_inside_generics() {
        assert_eq!(short_type_name("alloc::vec::Vec<core::option::Option<u8>>"), "Vec<Option<u8>>");
        assert_eq!(short_type_name("(u8, alloc::string::String)"), "(u8, String)");
        assert_eq!(short_type_name("my_crate::steps::AtoB"), "AtoB");
        assert_eq!(short_type_name("[my::A; 3]"), "[A; 3]");
    }

    #[test]
    fn downcast_roundtrip_and_mismatch() {
        let v = AnyValue::new(7u32);
        assert!(v.is::<u32>());
        assert_eq!(v.type_descriptor(), TypeDescriptor::of::<u32>());
        let v = match v.downcast::<String>() {
            Ok(_) => panic!("u32 must not downcast to String"),
            Err(original) => original,
        };
        assert_eq!(v.type_descriptor().name(), "u32");
        assert_eq!(v.downcast::<u32>().ok(), Some(7));
    }

    #[test]
    fn descriptors_compare_by_type_id() {
        assert_eq!(TypeDescriptor::of::<String>(), TypeDescriptor::of::<String>());
        assert_ne!(TypeDescriptor::of::<String>(), TypeDescriptor::of::<&'static str>());
    }
}
