use strum::IntoEnumIterator;
use strum_macros::{Display, EnumCount, EnumIter};

/// Number of primitive kinds, i.e. every kind other than `Reference` and `Void`.
pub const PRIMITIVE_KIND_COUNT: usize = 8;

/// The closed set of value categories every typed operation dispatches over.
///
/// The discriminants of the eight primitive kinds are dense from zero so that they can index
/// fixed size tables directly (see [`Kind::primitive_index`]).
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Display, EnumIter, EnumCount)]
#[repr(u8)]
pub enum Kind {
    Int = 0,
    Long = 1,
    Short = 2,
    Char = 3,
    Boolean = 4,
    Byte = 5,
    Float = 6,
    Double = 7,
    Reference = 8,
    Void = 9,
}

impl Kind {
    pub fn primitives() -> impl Iterator<Item=Kind> {
        Kind::iter().filter(|kind| kind.is_primitive())
    }

    pub fn is_primitive(&self) -> bool {
        self.primitive_index().is_some()
    }

    pub fn primitive_index(&self) -> Option<usize> {
        match self {
            Kind::Int |
            Kind::Long |
            Kind::Short |
            Kind::Char |
            Kind::Boolean |
            Kind::Byte |
            Kind::Float |
            Kind::Double => Some(*self as u8 as usize),
            Kind::Reference | Kind::Void => None,
        }
    }

    pub fn descriptor_char(&self) -> char {
        match self {
            Kind::Int => 'I',
            Kind::Long => 'J',
            Kind::Short => 'S',
            Kind::Char => 'C',
            Kind::Boolean => 'Z',
            Kind::Byte => 'B',
            Kind::Float => 'F',
            Kind::Double => 'D',
            Kind::Reference => 'L',
            Kind::Void => 'V',
        }
    }

    /// Inverse of [`Kind::descriptor_char`] for the base types and void. Class and array
    /// descriptors are not single characters, so `L` and `[` are not accepted here.
    pub fn from_base_type_char(c: char) -> Option<Kind> {
        Some(match c {
            'I' => Kind::Int,
            'J' => Kind::Long,
            'S' => Kind::Short,
            'C' => Kind::Char,
            'Z' => Kind::Boolean,
            'B' => Kind::Byte,
            'F' => Kind::Float,
            'D' => Kind::Double,
            'V' => Kind::Void,
            _ => return None,
        })
    }

    pub fn java_name(&self) -> &'static str {
        match self {
            Kind::Int => "int",
            Kind::Long => "long",
            Kind::Short => "short",
            Kind::Char => "char",
            Kind::Boolean => "boolean",
            Kind::Byte => "byte",
            Kind::Float => "float",
            Kind::Double => "double",
            Kind::Reference => "java.lang.Object",
            Kind::Void => "void",
        }
    }

    /// Internal name of the class whose instances box this kind. `Void` has a holder class but
    /// no instances, and references are never boxed.
    pub fn wrapper_class_name(&self) -> Option<&'static str> {
        Some(match self {
            Kind::Int => "java/lang/Integer",
            Kind::Long => "java/lang/Long",
            Kind::Short => "java/lang/Short",
            Kind::Char => "java/lang/Character",
            Kind::Boolean => "java/lang/Boolean",
            Kind::Byte => "java/lang/Byte",
            Kind::Float => "java/lang/Float",
            Kind::Double => "java/lang/Double",
            Kind::Void => "java/lang/Void",
            Kind::Reference => return None,
        })
    }

    /// Name used in messages reported back to the managed side, e.g. "expected Integer".
    pub fn wrapper_simple_name(&self) -> &'static str {
        match self {
            Kind::Int => "Integer",
            Kind::Long => "Long",
            Kind::Short => "Short",
            Kind::Char => "Character",
            Kind::Boolean => "Boolean",
            Kind::Byte => "Byte",
            Kind::Float => "Float",
            Kind::Double => "Double",
            Kind::Reference => "Object",
            Kind::Void => "Void",
        }
    }

    pub fn unwrap_method_name(&self) -> Option<&'static str> {
        Some(match self {
            Kind::Int => "intValue",
            Kind::Long => "longValue",
            Kind::Short => "shortValue",
            Kind::Char => "charValue",
            Kind::Boolean => "booleanValue",
            Kind::Byte => "byteValue",
            Kind::Float => "floatValue",
            Kind::Double => "doubleValue",
            Kind::Reference | Kind::Void => return None,
        })
    }
}
