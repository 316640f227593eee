use narcissus_common::{BridgeError, BridgeResult, KindValue};

use crate::member::{FieldHandle, member_name};
use crate::Narcissus;
use crate::runtime::JavaRuntime;

// The accessor used is chosen by the caller and is never checked against `FieldHandle::kind`;
// reading or writing a field through the wrong kind is undefined.
impl<R: JavaRuntime> Narcissus<R> {
    /// `target` is ignored for static fields.
    pub fn get_field<T: KindValue<R::Object>>(&self, rt: &mut R, target: Option<&R::Object>, field: &FieldHandle<R>) -> BridgeResult<T> {
        self.tracing.trace_field_get(T::KIND, field.is_static);
        let raw = if field.is_static {
            rt.get_static_field(&field.declaring_class, field.id, T::KIND)?
        } else {
            let target = self.field_target(rt, target, field)?;
            rt.get_field(target, field.id, T::KIND)?
        };
        let raw_kind = raw.kind();
        T::from_raw(raw).ok_or_else(|| BridgeError::Configuration(format!("runtime returned a {} for a {} field read", raw_kind, T::KIND)))
    }

    pub fn set_field<T: KindValue<R::Object>>(&self, rt: &mut R, target: Option<&R::Object>, field: &FieldHandle<R>, value: T) -> BridgeResult<()> {
        self.tracing.trace_field_set(T::KIND, field.is_static);
        if field.is_static {
            rt.set_static_field(&field.declaring_class, field.id, value.into_raw())
        } else {
            let target = self.field_target(rt, target, field)?;
            rt.set_field(target, field.id, value.into_raw())
        }
    }

    fn field_target<'t>(&self, rt: &mut R, target: Option<&'t R::Object>, field: &FieldHandle<R>) -> BridgeResult<&'t R::Object> {
        match target {
            Some(target) => Ok(target),
            None => Err(BridgeError::NullTarget { member: member_name(rt, &field.reflected) }),
        }
    }
}

macro_rules! typed_field_accessors {
    ($($getter:ident, $setter:ident: $rust_type:ty;)*) => {
        impl<R: JavaRuntime> Narcissus<R> {
            $(
            pub fn $getter(&self, rt: &mut R, target: Option<&R::Object>, field: &FieldHandle<R>) -> BridgeResult<$rust_type> {
                self.get_field::<$rust_type>(rt, target, field)
            }

            pub fn $setter(&self, rt: &mut R, target: Option<&R::Object>, field: &FieldHandle<R>, value: $rust_type) -> BridgeResult<()> {
                self.set_field::<$rust_type>(rt, target, field, value)
            }
            )*
        }
    };
}

typed_field_accessors! {
    get_int_field, set_int_field: i32;
    get_long_field, set_long_field: i64;
    get_short_field, set_short_field: i16;
    get_char_field, set_char_field: u16;
    get_boolean_field, set_boolean_field: bool;
    get_byte_field, set_byte_field: i8;
    get_float_field, set_float_field: f32;
    get_double_field, set_double_field: f64;
    get_object_field, set_object_field: Option<R::Object>;
}
