//! Static type hints.

use ember_ir::CastType;

/// Primitive type an expression is statically known to produce.
///
/// Absence of a hint (`None` in the side table) means the type is only known
/// at run time.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum StaticType {
    Long,
    Double,
    String,
    Boolean,
}

impl StaticType {
    pub fn of_cast(ty: CastType) -> StaticType {
        match ty {
            CastType::Long => StaticType::Long,
            CastType::Double => StaticType::Double,
            CastType::String => StaticType::String,
            CastType::Boolean => StaticType::Boolean,
        }
    }

    pub fn is_long(hint: Option<StaticType>) -> bool {
        hint == Some(StaticType::Long)
    }

    pub fn is_double(hint: Option<StaticType>) -> bool {
        hint == Some(StaticType::Double)
    }
}
