use std::ptr::null_mut;

use jni_sys::{jboolean, jbyte, jchar, jdouble, jfloat, jint, jlong, jobject, jshort, jvalue, JNI_FALSE, JNI_TRUE};

use narcissus_common::RawValue;

pub fn from_object(obj: jobject) -> Option<jobject> {
    if obj.is_null() {
        None
    } else {
        Some(obj)
    }
}

pub fn to_object(obj: Option<jobject>) -> jobject {
    obj.unwrap_or(null_mut())
}

pub fn from_jboolean(b: jboolean) -> bool {
    b != JNI_FALSE
}

pub fn to_jboolean(b: bool) -> jboolean {
    if b {
        JNI_TRUE
    } else {
        JNI_FALSE
    }
}

pub fn to_jvalue(value: &RawValue<jobject>) -> jvalue {
    match value {
        RawValue::Int(int) => jvalue { i: *int },
        RawValue::Long(long) => jvalue { j: *long },
        RawValue::Short(short) => jvalue { s: *short },
        RawValue::Char(char) => jvalue { c: *char },
        RawValue::Boolean(bool) => jvalue { z: to_jboolean(*bool) },
        RawValue::Byte(byte) => jvalue { b: *byte },
        RawValue::Float(float) => jvalue { f: *float },
        RawValue::Double(double) => jvalue { d: *double },
        RawValue::Reference(obj) => jvalue { l: to_object(*obj) },
    }
}

pub fn to_jvalues(values: &[RawValue<jobject>]) -> Vec<jvalue> {
    values.iter().map(to_jvalue).collect()
}

/// A core value as it crosses back out through a native return slot.
pub trait IntoJni {
    type Jni;

    fn into_jni(self) -> Self::Jni;
}

/// A native parameter as the core wants it.
pub trait FromJni {
    type Jni;

    fn from_jni(jni: Self::Jni) -> Self;
}

macro_rules! identity_conversion {
    ($($rust_type:ty: $jni_type:ty;)*) => {
        $(
        impl IntoJni for $rust_type {
            type Jni = $jni_type;

            fn into_jni(self) -> $jni_type {
                self
            }
        }

        impl FromJni for $rust_type {
            type Jni = $jni_type;

            fn from_jni(jni: $jni_type) -> Self {
                jni
            }
        }
        )*
    };
}

identity_conversion! {
    i32: jint;
    i64: jlong;
    i16: jshort;
    u16: jchar;
    i8: jbyte;
    f32: jfloat;
    f64: jdouble;
}

impl IntoJni for bool {
    type Jni = jboolean;

    fn into_jni(self) -> jboolean {
        to_jboolean(self)
    }
}

impl FromJni for bool {
    type Jni = jboolean;

    fn from_jni(jni: jboolean) -> Self {
        from_jboolean(jni)
    }
}

impl IntoJni for Option<jobject> {
    type Jni = jobject;

    fn into_jni(self) -> jobject {
        to_object(self)
    }
}

impl FromJni for Option<jobject> {
    type Jni = jobject;

    fn from_jni(jni: jobject) -> Self {
        from_object(jni)
    }
}
