use crate::kind::Kind;

/// A value as it travels through a native call slot. `O` is the host's object handle; a null
/// reference is `Reference(None)`.
#[derive(Debug, Clone, PartialEq)]
pub enum RawValue<O> {
    Int(i32),
    Long(i64),
    Short(i16),
    Char(u16),
    Boolean(bool),
    Byte(i8),
    Float(f32),
    Double(f64),
    Reference(Option<O>),
}

impl<O> RawValue<O> {
    pub fn kind(&self) -> Kind {
        match self {
            RawValue::Int(_) => Kind::Int,
            RawValue::Long(_) => Kind::Long,
            RawValue::Short(_) => Kind::Short,
            RawValue::Char(_) => Kind::Char,
            RawValue::Boolean(_) => Kind::Boolean,
            RawValue::Byte(_) => Kind::Byte,
            RawValue::Float(_) => Kind::Float,
            RawValue::Double(_) => Kind::Double,
            RawValue::Reference(_) => Kind::Reference,
        }
    }

    pub fn unwrap_object(self) -> Option<Option<O>> {
        match self {
            RawValue::Reference(obj) => Some(obj),
            _ => None,
        }
    }
}

/// Rust carrier types for each non-void kind. The typed field and call operations are written
/// once over this trait and instantiated per kind.
pub trait KindValue<O>: Sized {
    const KIND: Kind;

    fn into_raw(self) -> RawValue<O>;

    fn from_raw(raw: RawValue<O>) -> Option<Self>;

    /// What a typed operation hands back to native callers once it has failed.
    fn invalid_default() -> Self;
}

macro_rules! primitive_kind_value {
    ($rust_type:ty, $variant:ident, $default:expr) => {
        impl<O> KindValue<O> for $rust_type {
            const KIND: Kind = Kind::$variant;

            fn into_raw(self) -> RawValue<O> {
                RawValue::$variant(self)
            }

            fn from_raw(raw: RawValue<O>) -> Option<Self> {
                match raw {
                    RawValue::$variant(inner) => Some(inner),
                    _ => None,
                }
            }

            fn invalid_default() -> Self {
                $default
            }
        }
    };
}

primitive_kind_value!(i32, Int, 0);
primitive_kind_value!(i64, Long, 0);
primitive_kind_value!(i16, Short, 0);
primitive_kind_value!(u16, Char, 0);
primitive_kind_value!(bool, Boolean, false);
primitive_kind_value!(i8, Byte, 0);
primitive_kind_value!(f32, Float, 0.0);
primitive_kind_value!(f64, Double, 0.0);

impl<O> KindValue<O> for Option<O> {
    const KIND: Kind = Kind::Reference;

    fn into_raw(self) -> RawValue<O> {
        RawValue::Reference(self)
    }

    fn from_raw(raw: RawValue<O>) -> Option<Self> {
        raw.unwrap_object()
    }

    fn invalid_default() -> Self {
        None
    }
}
