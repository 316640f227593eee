use std::ffi::CString;

use jni_sys::JNIEnv;
use log::error;

use narcissus_common::{BridgeError, BridgeResult};

/// Throwable class raised for `err`, or `None` when the runtime already has one pending.
pub fn exception_class_name(err: &BridgeError) -> Option<&'static str> {
    if err.is_pending_in_host() {
        return None;
    }
    Some(match err {
        BridgeError::NullTarget { .. } => "java/lang/NullPointerException",
        BridgeError::Uninitialized => "java/lang/IllegalStateException",
        _ => "java/lang/IllegalArgumentException",
    })
}

/// Raise `err` in the calling thread. Nothing is thrown if an exception is already pending.
pub unsafe fn throw(env: *mut JNIEnv, err: &BridgeError) {
    if let Err(throw_err) = raise(env, err) {
        error!("unable to throw for {}: {}", err, throw_err);
    }
}

unsafe fn raise(env: *mut JNIEnv, err: &BridgeError) -> BridgeResult<()> {
    let class_name = match exception_class_name(err) {
        Some(class_name) => class_name,
        None => return Ok(()),
    };
    let class_name_c = CString::new(class_name).map_err(|_| BridgeError::Configuration(format!("embedded nul in {}", class_name)))?;
    let message = CString::new(err.to_string()).map_err(|_| BridgeError::Configuration("embedded nul in exception message".to_string()))?;
    let class = jni_call!(env, FindClass, class_name_c.as_ptr());
    if class.is_null() {
        // FindClass left its own error pending
        return Ok(());
    }
    jni_call!(env, ThrowNew, class, message.as_ptr());
    Ok(())
}
