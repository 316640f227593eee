use narcissus_common::{BridgeError, BridgeResult, Kind, KindValue, RawValue};

use crate::member::{ConstructorHandle, member_name, MethodHandle, parameter_kinds};
use crate::Narcissus;
use crate::runtime::JavaRuntime;

impl<R: JavaRuntime> Narcissus<R> {
    /// Call `method` and read its result as `T`. `target` is ignored for static methods.
    ///
    /// On failure nothing has been called unless the failure came from the callee itself
    /// (`BridgeError::WasException`).
    pub fn call_method<T: KindValue<R::Object>>(&self, rt: &mut R, target: Option<&R::Object>, method: &MethodHandle<R>, args: &[Option<R::Object>]) -> BridgeResult<T> {
        let res = self.call_raw(rt, target, method, T::KIND, args)?;
        match res {
            Some(raw) => {
                let raw_kind = raw.kind();
                T::from_raw(raw).ok_or_else(|| BridgeError::Configuration(format!("runtime returned a {} from a {} call", raw_kind, T::KIND)))
            }
            None => Err(BridgeError::Configuration(format!("runtime returned nothing from a {} call", T::KIND))),
        }
    }

    pub fn call_void_method(&self, rt: &mut R, target: Option<&R::Object>, method: &MethodHandle<R>, args: &[Option<R::Object>]) -> BridgeResult<()> {
        self.call_raw(rt, target, method, Kind::Void, args)?;
        Ok(())
    }

    fn call_raw(&self, rt: &mut R, target: Option<&R::Object>, method: &MethodHandle<R>, return_kind: Kind, args: &[Option<R::Object>]) -> BridgeResult<Option<RawValue<R::Object>>> {
        self.tracing.trace_call(return_kind, args.len(), method.is_static);
        let target = if method.is_static {
            None
        } else {
            match target {
                Some(target) => Some(target),
                None => return Err(BridgeError::NullTarget { member: member_name(rt, &method.reflected) }),
            }
        };
        // exactly one call below: either the no-argument fast path or the unboxed path
        let raw_args = self.arguments(rt, &method.reflected, args)?;
        match target {
            None => rt.call_static_method(&method.declaring_class, method.id, return_kind, raw_args.as_slice()),
            Some(target) => rt.call_method(target, method.id, return_kind, raw_args.as_slice()),
        }
    }

    /// Construct a fresh instance of the constructor's declaring class.
    pub fn new_instance(&self, rt: &mut R, constructor: &ConstructorHandle<R>, args: &[Option<R::Object>]) -> BridgeResult<R::Object> {
        self.tracing.trace_call(Kind::Void, args.len(), false);
        let raw_args = self.arguments(rt, &constructor.reflected, args)?;
        rt.new_object(&constructor.declaring_class, constructor.id, raw_args.as_slice())
    }

    /// No arguments only needs the declared parameter count; anything else is unboxed against
    /// the classified parameter types.
    fn arguments(&self, rt: &mut R, reflected: &R::Object, args: &[Option<R::Object>]) -> BridgeResult<Vec<RawValue<R::Object>>> {
        if args.is_empty() {
            let expected = rt.reflected_parameter_count(reflected)?;
            if expected != 0 {
                return Err(BridgeError::ArityMismatch { expected, actual: 0 });
            }
            return Ok(vec![]);
        }
        let parameter_kinds = parameter_kinds(rt, &self.registry, reflected)?;
        self.unbox(rt, parameter_kinds.as_slice(), args)
    }
}

macro_rules! typed_calls {
    ($($name:ident: $rust_type:ty;)*) => {
        impl<R: JavaRuntime> Narcissus<R> {
            $(
            pub fn $name(&self, rt: &mut R, target: Option<&R::Object>, method: &MethodHandle<R>, args: &[Option<R::Object>]) -> BridgeResult<$rust_type> {
                self.call_method::<$rust_type>(rt, target, method, args)
            }
            )*
        }
    };
}

typed_calls! {
    call_int_method: i32;
    call_long_method: i64;
    call_short_method: i16;
    call_char_method: u16;
    call_boolean_method: bool;
    call_byte_method: i8;
    call_float_method: f32;
    call_double_method: f64;
    call_object_method: Option<R::Object>;
}
