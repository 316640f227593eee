use narcissus_common::{BridgeError, BridgeResult, Kind, RawValue};

use crate::Narcissus;
use crate::runtime::JavaRuntime;

impl<R: JavaRuntime> Narcissus<R> {
    /// Convert boxed invocation arguments into raw call slots.
    ///
    /// A primitive parameter only accepts an instance of exactly its wrapper class: no
    /// widening, no subclassing, no null. Reference parameters take the argument unchanged and
    /// unchecked. Nothing is unwrapped unless the arity matches, and the first bad argument
    /// aborts the whole conversion.
    pub fn unbox(&self, rt: &mut R, parameter_kinds: &[Kind], args: &[Option<R::Object>]) -> BridgeResult<Vec<RawValue<R::Object>>> {
        if parameter_kinds.len() != args.len() {
            return Err(BridgeError::ArityMismatch { expected: parameter_kinds.len(), actual: args.len() });
        }
        self.tracing.trace_parameters(parameter_kinds, args.len());
        let mut res = Vec::with_capacity(args.len());
        for (index, (kind, arg)) in parameter_kinds.iter().zip(args.iter()).enumerate() {
            self.tracing.trace_unbox(index, *kind);
            let raw = match kind {
                Kind::Int |
                Kind::Long |
                Kind::Short |
                Kind::Char |
                Kind::Boolean |
                Kind::Byte |
                Kind::Float |
                Kind::Double => self.unbox_primitive(rt, *kind, index, arg.as_ref())?,
                Kind::Reference => RawValue::Reference(arg.clone()),
                Kind::Void => {
                    return Err(BridgeError::Configuration(format!("argument {} is declared void", index)));
                }
            };
            res.push(raw);
        }
        Ok(res)
    }

    fn unbox_primitive(&self, rt: &mut R, kind: Kind, index: usize, arg: Option<&R::Object>) -> BridgeResult<RawValue<R::Object>> {
        let entry = self.registry.entry(kind)?;
        let arg = match arg {
            None => return Err(BridgeError::NullArgumentForPrimitive { kind, index }),
            Some(arg) => arg,
        };
        let arg_class = rt.class_of(arg)?;
        if !rt.is_same_class(&arg_class, &entry.wrapper)? {
            return Err(BridgeError::TypeMismatch { expected: kind, index });
        }
        match rt.call_method(arg, entry.unwrap, kind, &[])? {
            Some(raw) if raw.kind() == kind => Ok(raw),
            _ => Err(BridgeError::Configuration(format!("{} unwrap accessor did not produce a {}", kind.wrapper_simple_name(), kind))),
        }
    }
}
