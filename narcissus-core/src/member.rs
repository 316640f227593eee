use narcissus_common::{BridgeResult, Kind};

use crate::registry::PrimitiveRegistry;
use crate::runtime::JavaRuntime;

pub const ACC_STATIC: u16 = 0x0008;

#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum MemberCategory {
    Method,
    Constructor,
    Field,
}

impl MemberCategory {
    /// Name of the runtime's internal enumerator, which skips the accessibility filtering the
    /// public `getDeclared*` methods apply.
    pub fn internal_enumerator_name(&self) -> &'static str {
        match self {
            MemberCategory::Method => "getDeclaredMethods0",
            MemberCategory::Constructor => "getDeclaredConstructors0",
            MemberCategory::Field => "getDeclaredFields0",
        }
    }

    /// The single boolean parameter is `publicOnly`.
    pub fn internal_enumerator_signature(&self) -> &'static str {
        match self {
            MemberCategory::Method => "(Z)[Ljava/lang/reflect/Method;",
            MemberCategory::Constructor => "(Z)[Ljava/lang/reflect/Constructor;",
            MemberCategory::Field => "(Z)[Ljava/lang/reflect/Field;",
        }
    }

    pub fn reflective_class_name(&self) -> &'static str {
        match self {
            MemberCategory::Method => "java/lang/reflect/Method",
            MemberCategory::Constructor => "java/lang/reflect/Constructor",
            MemberCategory::Field => "java/lang/reflect/Field",
        }
    }

    pub fn plural(&self) -> &'static str {
        match self {
            MemberCategory::Method => "methods",
            MemberCategory::Constructor => "constructors",
            MemberCategory::Field => "fields",
        }
    }
}

pub(crate) fn parameter_kinds<R: JavaRuntime>(rt: &mut R, registry: &PrimitiveRegistry<R>, reflected: &R::Object) -> BridgeResult<Vec<Kind>> {
    let parameter_types = rt.reflected_parameter_types(reflected)?;
    let mut res = Vec::with_capacity(parameter_types.len());
    for parameter_type in parameter_types.iter() {
        res.push(registry.kind_of(rt, parameter_type)?);
    }
    Ok(res)
}

fn is_static<R: JavaRuntime>(rt: &mut R, reflected: &R::Object) -> BridgeResult<bool> {
    Ok((rt.reflected_modifiers(reflected)? & ACC_STATIC) != 0)
}

/// A resolved method: entry point, receiver and dispatch mode. The declared signature is only
/// classified on request, so resolving is cheap enough to do on every call.
pub struct MethodHandle<R: JavaRuntime> {
    pub reflected: R::Object,
    pub id: R::MethodId,
    pub declaring_class: R::Class,
    pub is_static: bool,
}

impl<R: JavaRuntime> MethodHandle<R> {
    pub fn resolve(rt: &mut R, reflected: R::Object) -> BridgeResult<Self> {
        let id = rt.reflected_method_id(&reflected)?;
        let declaring_class = rt.reflected_declaring_class(&reflected)?;
        let is_static = is_static(rt, &reflected)?;
        Ok(Self { reflected, id, declaring_class, is_static })
    }

    pub fn return_kind(&self, rt: &mut R, registry: &PrimitiveRegistry<R>) -> BridgeResult<Kind> {
        let return_type = rt.reflected_type(&self.reflected, MemberCategory::Method)?;
        registry.kind_of(rt, &return_type)
    }

    pub fn parameter_kinds(&self, rt: &mut R, registry: &PrimitiveRegistry<R>) -> BridgeResult<Vec<Kind>> {
        parameter_kinds(rt, registry, &self.reflected)
    }

    pub fn parameter_count(&self, rt: &mut R) -> BridgeResult<usize> {
        rt.reflected_parameter_count(&self.reflected)
    }
}

pub struct ConstructorHandle<R: JavaRuntime> {
    pub reflected: R::Object,
    pub id: R::MethodId,
    pub declaring_class: R::Class,
}

impl<R: JavaRuntime> ConstructorHandle<R> {
    pub fn resolve(rt: &mut R, reflected: R::Object) -> BridgeResult<Self> {
        let id = rt.reflected_method_id(&reflected)?;
        let declaring_class = rt.reflected_declaring_class(&reflected)?;
        Ok(Self { reflected, id, declaring_class })
    }

    pub fn parameter_kinds(&self, rt: &mut R, registry: &PrimitiveRegistry<R>) -> BridgeResult<Vec<Kind>> {
        parameter_kinds(rt, registry, &self.reflected)
    }

    pub fn parameter_count(&self, rt: &mut R) -> BridgeResult<usize> {
        rt.reflected_parameter_count(&self.reflected)
    }
}

/// A resolved field slot. The declared type is not part of it: the typed accessors never
/// compare it against the accessor being used, and [`FieldHandle::kind`] classifies it only
/// when asked.
pub struct FieldHandle<R: JavaRuntime> {
    pub reflected: R::Object,
    pub id: R::FieldId,
    pub declaring_class: R::Class,
    pub is_static: bool,
}

impl<R: JavaRuntime> FieldHandle<R> {
    pub fn resolve(rt: &mut R, reflected: R::Object) -> BridgeResult<Self> {
        let id = rt.reflected_field_id(&reflected)?;
        let declaring_class = rt.reflected_declaring_class(&reflected)?;
        let is_static = is_static(rt, &reflected)?;
        Ok(Self { reflected, id, declaring_class, is_static })
    }

    pub fn kind(&self, rt: &mut R, registry: &PrimitiveRegistry<R>) -> BridgeResult<Kind> {
        let field_type = rt.reflected_type(&self.reflected, MemberCategory::Field)?;
        registry.kind_of(rt, &field_type)
    }
}

/// Best effort name for error messages.
pub fn member_name<R: JavaRuntime>(rt: &mut R, reflected: &R::Object) -> String {
    rt.reflected_name(reflected).unwrap_or_else(|_| "<unknown>".to_string())
}
