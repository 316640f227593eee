use std::ffi::{CStr, CString};
use std::ptr::null_mut;

use jni_sys::{jclass, jfieldID, jint, jmethodID, JNIEnv, jobject, jobjectArray, jstring, jvalue, JNI_FALSE, JNI_OK};

use narcissus_common::{BridgeError, BridgeResult, Kind, RawValue};
use narcissus_core::member::MemberCategory;
use narcissus_core::runtime::JavaRuntime;

use crate::value_conversion::{from_jboolean, from_object, to_jboolean, to_jvalues, to_object};

/// Either the variadic form with no trailing arguments, or the `A` form over a `jvalue` array.
macro_rules! call_variant {
    ($env:expr, $plain:ident, $array:ident, $receiver:expr, $method:expr, $args:expr) => {
        if $args.is_empty() {
            jni_call!($env, $plain, $receiver, $method)
        } else {
            jni_call!($env, $array, $receiver, $method, $args.as_ptr())
        }
    };
}

/// [`JavaRuntime`] over the JNI function table of the calling thread. Only valid for the
/// duration of the native call that produced `env`; object handles are local references.
pub struct JniRuntime {
    env: *mut JNIEnv,
}

impl JniRuntime {
    pub unsafe fn new(env: *mut JNIEnv) -> Self {
        Self { env }
    }

    fn check_exception(&self) -> BridgeResult<()> {
        if from_jboolean(unsafe { jni_call!(self.env, ExceptionCheck) }) {
            Err(BridgeError::WasException)
        } else {
            Ok(())
        }
    }

    fn clear_exception(&self) -> BridgeResult<()> {
        unsafe { jni_call!(self.env, ExceptionClear) };
        Ok(())
    }

    fn non_null(&self, obj: jobject, what: &str) -> BridgeResult<jobject> {
        self.check_exception()?;
        from_object(obj).ok_or_else(|| BridgeError::Configuration(format!("runtime returned null for {}", what)))
    }

    fn lookup_instance_method(&self, obj: jobject, name: &str, signature: &str) -> BridgeResult<jmethodID> {
        let name_c = c_string(name)?;
        let signature_c = c_string(signature)?;
        let class = unsafe { jni_call!(self.env, GetObjectClass, obj) };
        let method = unsafe { jni_call!(self.env, GetMethodID, class, name_c.as_ptr(), signature_c.as_ptr()) };
        self.check_exception()?;
        if method.is_null() {
            return Err(BridgeError::Configuration(format!("no method {}{}", name, signature)));
        }
        Ok(method)
    }

    /// Invoke a public no-argument accessor of a reflective object.
    fn reflective_object(&self, member: jobject, name: &str, signature: &str) -> BridgeResult<jobject> {
        let method = self.lookup_instance_method(member, name, signature)?;
        let no_args: [jvalue; 0] = [];
        let res = unsafe { jni_call!(self.env, CallObjectMethodA, member, method, no_args.as_ptr()) };
        self.non_null(res, name)
    }

    fn object_array_elements(&self, array: jobjectArray) -> BridgeResult<Vec<jobject>> {
        let len = unsafe { jni_call!(self.env, GetArrayLength, array) };
        if len == 0 {
            return Ok(vec![]);
        }
        if unsafe { jni_call!(self.env, EnsureLocalCapacity, len) } != JNI_OK {
            self.check_exception()?;
            return Err(BridgeError::Configuration(format!("unable to reserve {} local references", len)));
        }
        let mut res = Vec::with_capacity(len as usize);
        for i in 0..len {
            let element = unsafe { jni_call!(self.env, GetObjectArrayElement, array, i) };
            self.check_exception()?;
            res.push(element);
        }
        Ok(res)
    }

    /// New `element_class[]` holding `elements` in order.
    pub fn new_object_array(&self, element_class: &str, elements: &[jobject]) -> BridgeResult<jobjectArray> {
        let element_class_c = c_string(element_class)?;
        let class = unsafe { jni_call!(self.env, FindClass, element_class_c.as_ptr()) };
        if class.is_null() {
            return Err(BridgeError::ClassNotFound(element_class.to_string()));
        }
        let array = unsafe { jni_call!(self.env, NewObjectArray, elements.len() as jint, class, null_mut()) };
        let array = self.non_null(array, "new object array")?;
        for (i, element) in elements.iter().enumerate() {
            unsafe { jni_call!(self.env, SetObjectArrayElement, array, i as jint, *element) };
            self.check_exception()?;
        }
        Ok(array)
    }

    /// The array produced by the unfiltered enumerator for `category`, as the runtime returned
    /// it. `Ok(None)` when `java.lang.Class` has no such enumerator.
    pub fn declared_member_array(&mut self, class: &jclass, category: MemberCategory) -> BridgeResult<Option<jobjectArray>> {
        // the enumerators are private instance methods of java.lang.Class itself
        let class_class = self.class_of(class)?;
        let enumerator = match self.method_id(&class_class, category.internal_enumerator_name(), category.internal_enumerator_signature())? {
            Some(enumerator) => enumerator,
            None => return Ok(None),
        };
        let public_only = [jvalue { z: JNI_FALSE }];
        let members = unsafe { jni_call!(self.env, CallObjectMethodA, *class, enumerator, public_only.as_ptr()) };
        Ok(Some(self.non_null(members, category.internal_enumerator_name())?))
    }

    /// Arguments array handed in from managed code. A null or empty array never has its
    /// elements read.
    pub fn argument_array(&self, args: jobjectArray) -> BridgeResult<Vec<Option<jobject>>> {
        if args.is_null() {
            return Ok(vec![]);
        }
        Ok(self.object_array_elements(args)?.into_iter().map(from_object).collect())
    }

    /// The modified UTF-8 bytes of `string`, copied out unchanged and without the terminator.
    pub fn utf_chars(&self, string: jstring) -> BridgeResult<Vec<u8>> {
        if string.is_null() {
            return Err(BridgeError::Configuration("null string".to_string()));
        }
        let chars = unsafe { jni_call!(self.env, GetStringUTFChars, string, null_mut()) };
        self.check_exception()?;
        if chars.is_null() {
            return Err(BridgeError::Configuration("unable to read string".to_string()));
        }
        let res = unsafe { CStr::from_ptr(chars) }.to_bytes().to_vec();
        unsafe { jni_call!(self.env, ReleaseStringUTFChars, string, chars) };
        Ok(res)
    }
}

fn c_string(str_: &str) -> BridgeResult<CString> {
    CString::new(str_).map_err(|_| BridgeError::Configuration(format!("embedded nul in {:?}", str_)))
}

impl JavaRuntime for JniRuntime {
    type Object = jobject;
    type Class = jclass;
    type FieldId = jfieldID;
    type MethodId = jmethodID;

    fn find_class(&mut self, internal_name: &[u8]) -> BridgeResult<jclass> {
        let display_name = String::from_utf8_lossy(internal_name);
        let name_c = CString::new(internal_name).map_err(|_| BridgeError::Configuration(format!("embedded nul in class name {:?}", display_name)))?;
        let class = unsafe { jni_call!(self.env, FindClass, name_c.as_ptr()) };
        if class.is_null() {
            // resolution error stays pending for the caller
            return Err(BridgeError::ClassNotFound(display_name.into_owned()));
        }
        Ok(class)
    }

    fn pin_class(&mut self, class: jclass) -> BridgeResult<jclass> {
        let global = unsafe { jni_call!(self.env, NewGlobalRef, class) };
        self.non_null(global, "global reference")
    }

    fn primitive_type_of_wrapper(&mut self, wrapper: &jclass) -> BridgeResult<jclass> {
        let name_c = c_string("TYPE")?;
        let signature_c = c_string("Ljava/lang/Class;")?;
        let field = unsafe { jni_call!(self.env, GetStaticFieldID, *wrapper, name_c.as_ptr(), signature_c.as_ptr()) };
        self.check_exception()?;
        if field.is_null() {
            return Err(BridgeError::Configuration("wrapper class has no TYPE field".to_string()));
        }
        let primitive = unsafe { jni_call!(self.env, GetStaticObjectField, *wrapper, field) };
        self.non_null(primitive, "TYPE")
    }

    fn method_id(&mut self, class: &jclass, name: &str, signature: &str) -> BridgeResult<Option<jmethodID>> {
        let name_c = c_string(name)?;
        let signature_c = c_string(signature)?;
        let method = unsafe { jni_call!(self.env, GetMethodID, *class, name_c.as_ptr(), signature_c.as_ptr()) };
        if method.is_null() {
            // NoSuchMethodError
            self.clear_exception()?;
            return Ok(None);
        }
        Ok(Some(method))
    }

    fn class_of(&mut self, obj: &jobject) -> BridgeResult<jclass> {
        let class = unsafe { jni_call!(self.env, GetObjectClass, *obj) };
        self.non_null(class, "object class")
    }

    fn is_same_class(&mut self, one: &jclass, two: &jclass) -> BridgeResult<bool> {
        Ok(from_jboolean(unsafe { jni_call!(self.env, IsSameObject, *one, *two) }))
    }

    fn declared_members(&mut self, class: &jclass, category: MemberCategory) -> BridgeResult<Option<Vec<jobject>>> {
        match self.declared_member_array(class, category)? {
            Some(members) => Ok(Some(self.object_array_elements(members)?)),
            None => Ok(None),
        }
    }

    fn reflected_method_id(&mut self, member: &jobject) -> BridgeResult<jmethodID> {
        let method = unsafe { jni_call!(self.env, FromReflectedMethod, *member) };
        self.check_exception()?;
        if method.is_null() {
            return Err(BridgeError::Configuration("not a reflected method or constructor".to_string()));
        }
        Ok(method)
    }

    fn reflected_field_id(&mut self, member: &jobject) -> BridgeResult<jfieldID> {
        let field = unsafe { jni_call!(self.env, FromReflectedField, *member) };
        self.check_exception()?;
        if field.is_null() {
            return Err(BridgeError::Configuration("not a reflected field".to_string()));
        }
        Ok(field)
    }

    fn reflected_parameter_types(&mut self, member: &jobject) -> BridgeResult<Vec<jclass>> {
        let types = self.reflective_object(*member, "getParameterTypes", "()[Ljava/lang/Class;")?;
        self.object_array_elements(types)
    }

    fn reflected_parameter_count(&mut self, member: &jobject) -> BridgeResult<usize> {
        let types = self.reflective_object(*member, "getParameterTypes", "()[Ljava/lang/Class;")?;
        let len = unsafe { jni_call!(self.env, GetArrayLength, types) };
        self.check_exception()?;
        Ok(len as usize)
    }

    fn reflected_type(&mut self, member: &jobject, category: MemberCategory) -> BridgeResult<jclass> {
        match category {
            MemberCategory::Method => self.reflective_object(*member, "getReturnType", "()Ljava/lang/Class;"),
            MemberCategory::Field => self.reflective_object(*member, "getType", "()Ljava/lang/Class;"),
            MemberCategory::Constructor => Err(BridgeError::Configuration("constructors have no declared type".to_string())),
        }
    }

    fn reflected_modifiers(&mut self, member: &jobject) -> BridgeResult<u16> {
        let method = self.lookup_instance_method(*member, "getModifiers", "()I")?;
        let no_args: [jvalue; 0] = [];
        let modifiers = unsafe { jni_call!(self.env, CallIntMethodA, *member, method, no_args.as_ptr()) };
        self.check_exception()?;
        Ok(modifiers as u16)
    }

    fn reflected_declaring_class(&mut self, member: &jobject) -> BridgeResult<jclass> {
        self.reflective_object(*member, "getDeclaringClass", "()Ljava/lang/Class;")
    }

    fn reflected_name(&mut self, member: &jobject) -> BridgeResult<String> {
        let name = self.reflective_object(*member, "getName", "()Ljava/lang/String;")?;
        Ok(String::from_utf8_lossy(self.utf_chars(name)?.as_slice()).into_owned())
    }

    fn get_field(&mut self, target: &jobject, field: jfieldID, kind: Kind) -> BridgeResult<RawValue<jobject>> {
        let target = *target;
        let res = unsafe {
            match kind {
                Kind::Int => RawValue::Int(jni_call!(self.env, GetIntField, target, field)),
                Kind::Long => RawValue::Long(jni_call!(self.env, GetLongField, target, field)),
                Kind::Short => RawValue::Short(jni_call!(self.env, GetShortField, target, field)),
                Kind::Char => RawValue::Char(jni_call!(self.env, GetCharField, target, field)),
                Kind::Boolean => RawValue::Boolean(from_jboolean(jni_call!(self.env, GetBooleanField, target, field))),
                Kind::Byte => RawValue::Byte(jni_call!(self.env, GetByteField, target, field)),
                Kind::Float => RawValue::Float(jni_call!(self.env, GetFloatField, target, field)),
                Kind::Double => RawValue::Double(jni_call!(self.env, GetDoubleField, target, field)),
                Kind::Reference => RawValue::Reference(from_object(jni_call!(self.env, GetObjectField, target, field))),
                Kind::Void => return Err(BridgeError::Configuration("void field read".to_string())),
            }
        };
        self.check_exception()?;
        Ok(res)
    }

    fn get_static_field(&mut self, class: &jclass, field: jfieldID, kind: Kind) -> BridgeResult<RawValue<jobject>> {
        let class = *class;
        let res = unsafe {
            match kind {
                Kind::Int => RawValue::Int(jni_call!(self.env, GetStaticIntField, class, field)),
                Kind::Long => RawValue::Long(jni_call!(self.env, GetStaticLongField, class, field)),
                Kind::Short => RawValue::Short(jni_call!(self.env, GetStaticShortField, class, field)),
                Kind::Char => RawValue::Char(jni_call!(self.env, GetStaticCharField, class, field)),
                Kind::Boolean => RawValue::Boolean(from_jboolean(jni_call!(self.env, GetStaticBooleanField, class, field))),
                Kind::Byte => RawValue::Byte(jni_call!(self.env, GetStaticByteField, class, field)),
                Kind::Float => RawValue::Float(jni_call!(self.env, GetStaticFloatField, class, field)),
                Kind::Double => RawValue::Double(jni_call!(self.env, GetStaticDoubleField, class, field)),
                Kind::Reference => RawValue::Reference(from_object(jni_call!(self.env, GetStaticObjectField, class, field))),
                Kind::Void => return Err(BridgeError::Configuration("void field read".to_string())),
            }
        };
        self.check_exception()?;
        Ok(res)
    }

    fn set_field(&mut self, target: &jobject, field: jfieldID, value: RawValue<jobject>) -> BridgeResult<()> {
        let target = *target;
        unsafe {
            match value {
                RawValue::Int(int) => jni_call!(self.env, SetIntField, target, field, int),
                RawValue::Long(long) => jni_call!(self.env, SetLongField, target, field, long),
                RawValue::Short(short) => jni_call!(self.env, SetShortField, target, field, short),
                RawValue::Char(char) => jni_call!(self.env, SetCharField, target, field, char),
                RawValue::Boolean(bool) => jni_call!(self.env, SetBooleanField, target, field, to_jboolean(bool)),
                RawValue::Byte(byte) => jni_call!(self.env, SetByteField, target, field, byte),
                RawValue::Float(float) => jni_call!(self.env, SetFloatField, target, field, float),
                RawValue::Double(double) => jni_call!(self.env, SetDoubleField, target, field, double),
                RawValue::Reference(obj) => jni_call!(self.env, SetObjectField, target, field, to_object(obj)),
            }
        }
        self.check_exception()
    }

    fn set_static_field(&mut self, class: &jclass, field: jfieldID, value: RawValue<jobject>) -> BridgeResult<()> {
        let class = *class;
        unsafe {
            match value {
                RawValue::Int(int) => jni_call!(self.env, SetStaticIntField, class, field, int),
                RawValue::Long(long) => jni_call!(self.env, SetStaticLongField, class, field, long),
                RawValue::Short(short) => jni_call!(self.env, SetStaticShortField, class, field, short),
                RawValue::Char(char) => jni_call!(self.env, SetStaticCharField, class, field, char),
                RawValue::Boolean(bool) => jni_call!(self.env, SetStaticBooleanField, class, field, to_jboolean(bool)),
                RawValue::Byte(byte) => jni_call!(self.env, SetStaticByteField, class, field, byte),
                RawValue::Float(float) => jni_call!(self.env, SetStaticFloatField, class, field, float),
                RawValue::Double(double) => jni_call!(self.env, SetStaticDoubleField, class, field, double),
                RawValue::Reference(obj) => jni_call!(self.env, SetStaticObjectField, class, field, to_object(obj)),
            }
        }
        self.check_exception()
    }

    fn call_method(&mut self, target: &jobject, method: jmethodID, return_kind: Kind, args: &[RawValue<jobject>]) -> BridgeResult<Option<RawValue<jobject>>> {
        let target = *target;
        let args = to_jvalues(args);
        let env = self.env;
        let res = unsafe {
            match return_kind {
                Kind::Int => Some(RawValue::Int(call_variant!(env, CallIntMethod, CallIntMethodA, target, method, args))),
                Kind::Long => Some(RawValue::Long(call_variant!(env, CallLongMethod, CallLongMethodA, target, method, args))),
                Kind::Short => Some(RawValue::Short(call_variant!(env, CallShortMethod, CallShortMethodA, target, method, args))),
                Kind::Char => Some(RawValue::Char(call_variant!(env, CallCharMethod, CallCharMethodA, target, method, args))),
                Kind::Boolean => Some(RawValue::Boolean(from_jboolean(call_variant!(env, CallBooleanMethod, CallBooleanMethodA, target, method, args)))),
                Kind::Byte => Some(RawValue::Byte(call_variant!(env, CallByteMethod, CallByteMethodA, target, method, args))),
                Kind::Float => Some(RawValue::Float(call_variant!(env, CallFloatMethod, CallFloatMethodA, target, method, args))),
                Kind::Double => Some(RawValue::Double(call_variant!(env, CallDoubleMethod, CallDoubleMethodA, target, method, args))),
                Kind::Reference => Some(RawValue::Reference(from_object(call_variant!(env, CallObjectMethod, CallObjectMethodA, target, method, args)))),
                Kind::Void => {
                    call_variant!(env, CallVoidMethod, CallVoidMethodA, target, method, args);
                    None
                }
            }
        };
        self.check_exception()?;
        Ok(res)
    }

    fn call_static_method(&mut self, class: &jclass, method: jmethodID, return_kind: Kind, args: &[RawValue<jobject>]) -> BridgeResult<Option<RawValue<jobject>>> {
        let class = *class;
        let args = to_jvalues(args);
        let env = self.env;
        let res = unsafe {
            match return_kind {
                Kind::Int => Some(RawValue::Int(call_variant!(env, CallStaticIntMethod, CallStaticIntMethodA, class, method, args))),
                Kind::Long => Some(RawValue::Long(call_variant!(env, CallStaticLongMethod, CallStaticLongMethodA, class, method, args))),
                Kind::Short => Some(RawValue::Short(call_variant!(env, CallStaticShortMethod, CallStaticShortMethodA, class, method, args))),
                Kind::Char => Some(RawValue::Char(call_variant!(env, CallStaticCharMethod, CallStaticCharMethodA, class, method, args))),
                Kind::Boolean => Some(RawValue::Boolean(from_jboolean(call_variant!(env, CallStaticBooleanMethod, CallStaticBooleanMethodA, class, method, args)))),
                Kind::Byte => Some(RawValue::Byte(call_variant!(env, CallStaticByteMethod, CallStaticByteMethodA, class, method, args))),
                Kind::Float => Some(RawValue::Float(call_variant!(env, CallStaticFloatMethod, CallStaticFloatMethodA, class, method, args))),
                Kind::Double => Some(RawValue::Double(call_variant!(env, CallStaticDoubleMethod, CallStaticDoubleMethodA, class, method, args))),
                Kind::Reference => Some(RawValue::Reference(from_object(call_variant!(env, CallStaticObjectMethod, CallStaticObjectMethodA, class, method, args)))),
                Kind::Void => {
                    call_variant!(env, CallStaticVoidMethod, CallStaticVoidMethodA, class, method, args);
                    None
                }
            }
        };
        self.check_exception()?;
        Ok(res)
    }

    fn new_object(&mut self, class: &jclass, constructor: jmethodID, args: &[RawValue<jobject>]) -> BridgeResult<jobject> {
        let args = to_jvalues(args);
        let obj = unsafe { call_variant!(self.env, NewObject, NewObjectA, *class, constructor, args) };
        self.non_null(obj, "new instance")
    }
}
