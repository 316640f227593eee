use narcissus_common::{BridgeError, BridgeResult, Kind};
use narcissus_common::descriptor_parser::MethodDescriptor;
use narcissus_common::kind::PRIMITIVE_KIND_COUNT;

use crate::runtime::JavaRuntime;

/// Pinned handles for one primitive kind.
pub struct PrimitiveEntry<R: JavaRuntime> {
    pub kind: Kind,
    pub wrapper: R::Class,
    pub primitive: R::Class,
    pub unwrap: R::MethodId,
}

impl<R: JavaRuntime> PrimitiveEntry<R> {
    fn lookup(rt: &mut R, kind: Kind) -> BridgeResult<Self> {
        let wrapper_name = kind.wrapper_class_name().ok_or_else(|| BridgeError::Configuration(format!("{} has no wrapper class", kind)))?;
        let unwrap_name = kind.unwrap_method_name().ok_or_else(|| BridgeError::Configuration(format!("{} has no unwrap accessor", kind)))?;
        let wrapper = rt.find_class(wrapper_name.as_bytes())?;
        let wrapper = rt.pin_class(wrapper)?;
        let primitive = rt.primitive_type_of_wrapper(&wrapper)?;
        let primitive = rt.pin_class(primitive)?;
        let signature = MethodDescriptor::no_args(kind).jvm_representation();
        let unwrap = match rt.method_id(&wrapper, unwrap_name, signature.as_str())? {
            Some(unwrap) => unwrap,
            None => {
                return Err(BridgeError::Configuration(format!("{} does not declare {}{}", wrapper_name, unwrap_name, signature)));
            }
        };
        Ok(Self { kind, wrapper, primitive, unwrap })
    }
}

/// Wrapper type, primitive type and unwrap accessor for each of the eight primitive kinds,
/// plus the `void` type handle for classifying return types.
///
/// Built once by [`PrimitiveRegistry::initialize`] and never mutated afterwards, so a single
/// instance can be shared by every thread.
pub struct PrimitiveRegistry<R: JavaRuntime> {
    entries: Vec<PrimitiveEntry<R>>,
    void_type: R::Class,
}

impl<R: JavaRuntime> PrimitiveRegistry<R> {
    /// Must be called exactly once, before any other operation. Repeated calls are the
    /// integration layer's responsibility to prevent.
    pub fn initialize(rt: &mut R) -> BridgeResult<Self> {
        let mut entries = Vec::with_capacity(PRIMITIVE_KIND_COUNT);
        for kind in Kind::primitives() {
            entries.push(PrimitiveEntry::lookup(rt, kind)?);
        }
        let void_wrapper_name = Kind::Void.wrapper_class_name().ok_or_else(|| BridgeError::Configuration("void has no holder class".to_string()))?;
        let void_wrapper = rt.find_class(void_wrapper_name.as_bytes())?;
        let void_type = rt.primitive_type_of_wrapper(&void_wrapper)?;
        let void_type = rt.pin_class(void_type)?;
        Ok(Self { entries, void_type })
    }

    pub fn entry(&self, kind: Kind) -> BridgeResult<&PrimitiveEntry<R>> {
        kind.primitive_index()
            .and_then(|index| self.entries.get(index))
            .ok_or_else(|| BridgeError::Configuration(format!("no registry entry for {}", kind)))
    }

    pub fn entries(&self) -> impl Iterator<Item=&PrimitiveEntry<R>> {
        self.entries.iter()
    }

    /// Classify a type handle by identity against the pinned primitive types. Every other
    /// type, arrays included, is a reference.
    pub fn kind_of(&self, rt: &mut R, type_: &R::Class) -> BridgeResult<Kind> {
        for entry in self.entries.iter() {
            if rt.is_same_class(type_, &entry.primitive)? {
                return Ok(entry.kind);
            }
        }
        if rt.is_same_class(type_, &self.void_type)? {
            return Ok(Kind::Void);
        }
        Ok(Kind::Reference)
    }
}
