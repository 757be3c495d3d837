//! Source type resolution.
//!
//! grits uses declared types only; there is no inference. Two value
//! types exist, and every other type name resolves to [`GritsType::Void`].

/// A resolved grits type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GritsType {
    /// Signed 64-bit integer, spelled `int`.
    Int,
    /// 64-bit floating point, spelled `double`.
    Double,
    /// No value. Also the fallback for unrecognized type names, which is
    /// deliberately lenient: an extern declared with an unknown return
    /// type still registers with a `void` signature.
    Void,
}

impl GritsType {
    /// Resolve a source type name. Never fails; unrecognized names fall
    /// back to [`GritsType::Void`].
    pub fn from_name(name: &str) -> GritsType {
        match name {
            "int" => GritsType::Int,
            "double" => GritsType::Double,
            _ => GritsType::Void,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::GritsType;

    #[test]
    fn known_names_resolve() {
        assert_eq!(GritsType::from_name("int"), GritsType::Int);
        assert_eq!(GritsType::from_name("double"), GritsType::Double);
        assert_eq!(GritsType::from_name("void"), GritsType::Void);
    }

    #[test]
    fn unknown_names_fall_back_to_void() {
        assert_eq!(GritsType::from_name("quux"), GritsType::Void);
        assert_eq!(GritsType::from_name(""), GritsType::Void);
    }
}
