use log::warn;

use narcissus_common::BridgeResult;

use crate::member::{ConstructorHandle, FieldHandle, MemberCategory, MethodHandle};
use crate::Narcissus;
use crate::runtime::JavaRuntime;

pub fn warn_missing_enumerator(category: MemberCategory) {
    warn!("runtime does not provide {}{}, returning no declared {}", category.internal_enumerator_name(), category.internal_enumerator_signature(), category.plural());
}

impl<R: JavaRuntime> Narcissus<R> {
    /// `internal_name` is in slash separated binary form, e.g. `java/lang/String` or
    /// `[Ljava/lang/Object;`, and is passed through byte for byte.
    pub fn find_class(&self, rt: &mut R, internal_name: impl AsRef<[u8]>) -> BridgeResult<R::Class> {
        let internal_name = internal_name.as_ref();
        self.tracing.trace_find_class(internal_name);
        rt.find_class(internal_name)
    }

    /// Reflective member objects from the unfiltered enumerator. A runtime without that
    /// enumerator yields an empty list, which callers cannot tell apart from a class with no
    /// members of this category.
    pub fn declared_member_objects(&self, rt: &mut R, class: &R::Class, category: MemberCategory) -> BridgeResult<Vec<R::Object>> {
        match rt.declared_members(class, category)? {
            Some(members) => {
                self.tracing.trace_enumeration(category.plural(), members.len());
                Ok(members)
            }
            None => {
                warn_missing_enumerator(category);
                Ok(vec![])
            }
        }
    }

    pub fn declared_methods(&self, rt: &mut R, class: &R::Class) -> BridgeResult<Vec<MethodHandle<R>>> {
        self.declared_member_objects(rt, class, MemberCategory::Method)?
            .into_iter()
            .map(|reflected| MethodHandle::resolve(rt, reflected))
            .collect()
    }

    pub fn declared_constructors(&self, rt: &mut R, class: &R::Class) -> BridgeResult<Vec<ConstructorHandle<R>>> {
        self.declared_member_objects(rt, class, MemberCategory::Constructor)?
            .into_iter()
            .map(|reflected| ConstructorHandle::resolve(rt, reflected))
            .collect()
    }

    pub fn declared_fields(&self, rt: &mut R, class: &R::Class) -> BridgeResult<Vec<FieldHandle<R>>> {
        self.declared_member_objects(rt, class, MemberCategory::Field)?
            .into_iter()
            .map(|reflected| FieldHandle::resolve(rt, reflected))
            .collect()
    }

    pub fn method_handle(&self, rt: &mut R, reflected: R::Object) -> BridgeResult<MethodHandle<R>> {
        MethodHandle::resolve(rt, reflected)
    }

    pub fn constructor_handle(&self, rt: &mut R, reflected: R::Object) -> BridgeResult<ConstructorHandle<R>> {
        ConstructorHandle::resolve(rt, reflected)
    }

    pub fn field_handle(&self, rt: &mut R, reflected: R::Object) -> BridgeResult<FieldHandle<R>> {
        FieldHandle::resolve(rt, reflected)
    }
}
