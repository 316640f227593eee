//! Native half of `narcissus.Narcissus`: every `native` method of that class is exported here and
//! forwarded to [`narcissus_core`] over a [`jni_runtime::JniRuntime`].
#![allow(non_snake_case)]

use std::os::raw::c_void;
use std::ptr::null_mut;

use jni_sys::{jclass, jint, JavaVM, JNI_VERSION_1_8, JNIEnv, jobject, jobjectArray, jstring};
use log::{error, info, warn};
use once_cell::sync::OnceCell;

use narcissus_common::{BridgeError, BridgeResult, KindValue};
use narcissus_core::lookup::warn_missing_enumerator;
use narcissus_core::member::MemberCategory;
use narcissus_core::Narcissus;
use narcissus_core::tracing::TracingSettings;

use crate::exception::throw;
use crate::jni_runtime::JniRuntime;
use crate::value_conversion::{from_object, FromJni, IntoJni};

/// Call a function from the JNI function table. Must be used in an unsafe context, inside a
/// function returning `BridgeResult`. A table without the entry returns
/// `BridgeError::Configuration` from that function.
macro_rules! jni_call {
    ($env:expr, $name:ident $(, $arg:expr)*) => {{
        let env: *mut ::jni_sys::JNIEnv = $env;
        match (**env).$name {
            Some(function) => function(env $(, $arg)*),
            None => {
                return Err(::narcissus_common::BridgeError::Configuration(concat!("JNI function table has no ", stringify!($name)).to_string()));
            }
        }
    }};
}

pub mod exception;
pub mod jni_runtime;
pub mod value_conversion;

struct Bridge(Narcissus<JniRuntime>);

// holds only global references and immutable data
unsafe impl Send for Bridge {}

unsafe impl Sync for Bridge {}

static BRIDGE: OnceCell<Bridge> = OnceCell::new();

fn bridge() -> BridgeResult<&'static Narcissus<JniRuntime>> {
    BRIDGE.get().map(|bridge| &bridge.0).ok_or(BridgeError::Uninitialized)
}

/// Run `f` against the initialized bridge. Any error is raised in the calling thread and
/// `default` is returned in its place.
unsafe fn run<T>(env: *mut JNIEnv, default: T, f: impl FnOnce(&Narcissus<JniRuntime>, &mut JniRuntime) -> BridgeResult<T>) -> T {
    let mut rt = JniRuntime::new(env);
    match bridge().and_then(|narcissus| f(narcissus, &mut rt)) {
        Ok(res) => res,
        Err(err) => {
            throw(env, &err);
            default
        }
    }
}

fn reflected(member: jobject) -> BridgeResult<jobject> {
    from_object(member).ok_or_else(|| BridgeError::Configuration("null reflective member".to_string()))
}

#[no_mangle]
pub unsafe extern "system" fn JNI_OnLoad(_vm: *mut JavaVM, _reserved: *mut c_void) -> jint {
    JNI_VERSION_1_8
}

#[no_mangle]
pub unsafe extern "system" fn Java_narcissus_Narcissus_init(env: *mut JNIEnv, _class: jclass) {
    if BRIDGE.get().is_some() {
        warn!("narcissus already initialized, ignoring repeated init");
        return;
    }
    let mut rt = JniRuntime::new(env);
    match Narcissus::initialize(&mut rt, TracingSettings::from_env()) {
        Ok(narcissus) => {
            if BRIDGE.set(Bridge(narcissus)).is_err() {
                warn!("narcissus initialized concurrently, keeping the first registry");
            } else {
                info!("narcissus initialized");
            }
        }
        Err(err) => {
            error!("narcissus initialization failed: {}", err);
            throw(env, &err);
        }
    }
}

#[no_mangle]
pub unsafe extern "system" fn Java_narcissus_Narcissus_findClassInternal(env: *mut JNIEnv, _class: jclass, class_name_internal: jstring) -> jclass {
    run(env, null_mut(), |narcissus, rt| {
        let class_name = rt.utf_chars(class_name_internal)?;
        narcissus.find_class(rt, class_name)
    })
}

macro_rules! member_enumerators {
    ($($name:ident: $category:expr;)*) => {
        $(
        #[no_mangle]
        pub unsafe extern "system" fn $name(env: *mut JNIEnv, _class: jclass, cls: jclass) -> jobjectArray {
            run(env, null_mut(), |_narcissus, rt| {
                let cls = from_object(cls).ok_or_else(|| BridgeError::Configuration("null class".to_string()))?;
                match rt.declared_member_array(&cls, $category)? {
                    Some(members) => Ok(members),
                    None => {
                        warn_missing_enumerator($category);
                        rt.new_object_array($category.reflective_class_name(), &[])
                    }
                }
            })
        }
        )*
    };
}

member_enumerators! {
    Java_narcissus_Narcissus_getDeclaredMethods: MemberCategory::Method;
    Java_narcissus_Narcissus_getDeclaredConstructors: MemberCategory::Constructor;
    Java_narcissus_Narcissus_getDeclaredFields: MemberCategory::Field;
}

macro_rules! field_accessors {
    ($($getter:ident, $setter:ident: $rust_type:ty;)*) => {
        $(
        #[no_mangle]
        pub unsafe extern "system" fn $getter(env: *mut JNIEnv, _class: jclass, obj: jobject, field: jobject) -> <$rust_type as IntoJni>::Jni {
            run(env, <$rust_type as KindValue<jobject>>::invalid_default().into_jni(), |narcissus, rt| {
                let handle = narcissus.field_handle(rt, reflected(field)?)?;
                let res = narcissus.get_field::<$rust_type>(rt, from_object(obj).as_ref(), &handle)?;
                Ok(res.into_jni())
            })
        }

        #[no_mangle]
        pub unsafe extern "system" fn $setter(env: *mut JNIEnv, _class: jclass, obj: jobject, field: jobject, val: <$rust_type as FromJni>::Jni) {
            run(env, (), |narcissus, rt| {
                let handle = narcissus.field_handle(rt, reflected(field)?)?;
                narcissus.set_field::<$rust_type>(rt, from_object(obj).as_ref(), &handle, <$rust_type as FromJni>::from_jni(val))
            })
        }
        )*
    };
}

field_accessors! {
    Java_narcissus_Narcissus_getIntFieldVal, Java_narcissus_Narcissus_setIntFieldVal: i32;
    Java_narcissus_Narcissus_getLongFieldVal, Java_narcissus_Narcissus_setLongFieldVal: i64;
    Java_narcissus_Narcissus_getShortFieldVal, Java_narcissus_Narcissus_setShortFieldVal: i16;
    Java_narcissus_Narcissus_getCharFieldVal, Java_narcissus_Narcissus_setCharFieldVal: u16;
    Java_narcissus_Narcissus_getBooleanFieldVal, Java_narcissus_Narcissus_setBooleanFieldVal: bool;
    Java_narcissus_Narcissus_getByteFieldVal, Java_narcissus_Narcissus_setByteFieldVal: i8;
    Java_narcissus_Narcissus_getFloatFieldVal, Java_narcissus_Narcissus_setFloatFieldVal: f32;
    Java_narcissus_Narcissus_getDoubleFieldVal, Java_narcissus_Narcissus_setDoubleFieldVal: f64;
    Java_narcissus_Narcissus_getObjectFieldVal, Java_narcissus_Narcissus_setObjectFieldVal: Option<jobject>;
}

#[no_mangle]
pub unsafe extern "system" fn Java_narcissus_Narcissus_callVoidMethod(env: *mut JNIEnv, _class: jclass, obj: jobject, method: jobject, args: jobjectArray) {
    run(env, (), |narcissus, rt| {
        let handle = narcissus.method_handle(rt, reflected(method)?)?;
        let args = rt.argument_array(args)?;
        narcissus.call_void_method(rt, from_object(obj).as_ref(), &handle, args.as_slice())
    })
}

macro_rules! method_calls {
    ($($name:ident: $rust_type:ty;)*) => {
        $(
        #[no_mangle]
        pub unsafe extern "system" fn $name(env: *mut JNIEnv, _class: jclass, obj: jobject, method: jobject, args: jobjectArray) -> <$rust_type as IntoJni>::Jni {
            run(env, <$rust_type as KindValue<jobject>>::invalid_default().into_jni(), |narcissus, rt| {
                let handle = narcissus.method_handle(rt, reflected(method)?)?;
                let args = rt.argument_array(args)?;
                let res = narcissus.call_method::<$rust_type>(rt, from_object(obj).as_ref(), &handle, args.as_slice())?;
                Ok(res.into_jni())
            })
        }
        )*
    };
}

method_calls! {
    Java_narcissus_Narcissus_callIntMethod: i32;
    Java_narcissus_Narcissus_callLongMethod: i64;
    Java_narcissus_Narcissus_callShortMethod: i16;
    Java_narcissus_Narcissus_callCharMethod: u16;
    Java_narcissus_Narcissus_callBooleanMethod: bool;
    Java_narcissus_Narcissus_callByteMethod: i8;
    Java_narcissus_Narcissus_callFloatMethod: f32;
    Java_narcissus_Narcissus_callDoubleMethod: f64;
    Java_narcissus_Narcissus_callObjectMethod: Option<jobject>;
}

#[no_mangle]
pub unsafe extern "system" fn Java_narcissus_Narcissus_invokeConstructor(env: *mut JNIEnv, _class: jclass, constructor: jobject, args: jobjectArray) -> jobject {
    run(env, null_mut(), |narcissus, rt| {
        let handle = narcissus.constructor_handle(rt, reflected(constructor)?)?;
        let args = rt.argument_array(args)?;
        narcissus.new_instance(rt, &handle, args.as_slice())
    })
}
