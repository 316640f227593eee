use narcissus_common::{BridgeResult, Kind, RawValue};

use crate::member::MemberCategory;

/// The primitives this crate needs from the managed runtime it is embedded in.
///
/// Every operation is a thin, unchecked passthrough: accessibility is never consulted, and
/// kind agreement between a slot and the requested value is the caller's business. A host
/// operation that leaves an exception pending in the runtime reports
/// `BridgeError::WasException`.
pub trait JavaRuntime {
    /// A non-null object reference. Nullable positions use `Option<Self::Object>`.
    type Object: Clone;
    type Class: Clone;
    type FieldId: Copy;
    type MethodId: Copy;

    /// Resolve a class by internal binary name, given as the runtime's own string bytes
    /// (modified UTF-8 for a JVM) without a terminator. The bytes are handed to the runtime
    /// untouched. Failure is the runtime's own resolution failure, surfaced as `ClassNotFound`.
    fn find_class(&mut self, internal_name: &[u8]) -> BridgeResult<Self::Class>;

    /// Keep a class handle valid for the lifetime of the process.
    fn pin_class(&mut self, class: Self::Class) -> BridgeResult<Self::Class>;

    /// Value of the static `TYPE` field of a wrapper class, i.e. the primitive type it boxes.
    fn primitive_type_of_wrapper(&mut self, wrapper: &Self::Class) -> BridgeResult<Self::Class>;

    /// `Ok(None)` when the class declares no such method.
    fn method_id(&mut self, class: &Self::Class, name: &str, signature: &str) -> BridgeResult<Option<Self::MethodId>>;

    fn class_of(&mut self, obj: &Self::Object) -> BridgeResult<Self::Class>;

    fn is_same_class(&mut self, one: &Self::Class, two: &Self::Class) -> BridgeResult<bool>;

    /// Enumerate declared members through the runtime's internal, unfiltered enumerator
    /// named by `category`. `Ok(None)` when this runtime does not have that enumerator.
    fn declared_members(&mut self, class: &Self::Class, category: MemberCategory) -> BridgeResult<Option<Vec<Self::Object>>>;

    fn reflected_method_id(&mut self, member: &Self::Object) -> BridgeResult<Self::MethodId>;

    fn reflected_field_id(&mut self, member: &Self::Object) -> BridgeResult<Self::FieldId>;

    fn reflected_parameter_types(&mut self, member: &Self::Object) -> BridgeResult<Vec<Self::Class>>;

    /// Number of declared parameters, without materializing their types.
    fn reflected_parameter_count(&mut self, member: &Self::Object) -> BridgeResult<usize>;

    /// Return type of a method, or type of a field. Never called for constructors.
    fn reflected_type(&mut self, member: &Self::Object, category: MemberCategory) -> BridgeResult<Self::Class>;

    fn reflected_modifiers(&mut self, member: &Self::Object) -> BridgeResult<u16>;

    fn reflected_declaring_class(&mut self, member: &Self::Object) -> BridgeResult<Self::Class>;

    fn reflected_name(&mut self, member: &Self::Object) -> BridgeResult<String>;

    fn get_field(&mut self, target: &Self::Object, field: Self::FieldId, kind: Kind) -> BridgeResult<RawValue<Self::Object>>;

    fn get_static_field(&mut self, class: &Self::Class, field: Self::FieldId, kind: Kind) -> BridgeResult<RawValue<Self::Object>>;

    fn set_field(&mut self, target: &Self::Object, field: Self::FieldId, value: RawValue<Self::Object>) -> BridgeResult<()>;

    fn set_static_field(&mut self, class: &Self::Class, field: Self::FieldId, value: RawValue<Self::Object>) -> BridgeResult<()>;

    /// Virtual call. Returns `None` exactly when `return_kind` is `Void`. An empty `args` slice
    /// must be dispatched without building an argument array.
    fn call_method(&mut self, target: &Self::Object, method: Self::MethodId, return_kind: Kind, args: &[RawValue<Self::Object>]) -> BridgeResult<Option<RawValue<Self::Object>>>;

    fn call_static_method(&mut self, class: &Self::Class, method: Self::MethodId, return_kind: Kind, args: &[RawValue<Self::Object>]) -> BridgeResult<Option<RawValue<Self::Object>>>;

    fn new_object(&mut self, class: &Self::Class, constructor: Self::MethodId, args: &[RawValue<Self::Object>]) -> BridgeResult<Self::Object>;
}
