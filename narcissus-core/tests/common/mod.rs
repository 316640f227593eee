#![allow(dead_code)]

use std::collections::HashMap;
use std::rc::Rc;

use narcissus_common::{BridgeError, BridgeResult, Kind, RawValue};
use narcissus_common::descriptor_parser::{parse_field_descriptor, parse_method_descriptor};
use narcissus_core::member::{ACC_STATIC, MemberCategory};
use narcissus_core::Narcissus;
use narcissus_core::runtime::JavaRuntime;
use narcissus_core::tracing::TracingSettings;

pub const ACC_PUBLIC: u16 = 0x0001;
pub const ACC_PRIVATE: u16 = 0x0002;

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct ObjRef(usize);

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct ClassRef(usize);

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct FieldRef {
    class: ClassRef,
    index: usize,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct MethodRef(usize);

pub type Body = Rc<dyn Fn(&[RawValue<ObjRef>]) -> Option<RawValue<ObjRef>>>;

enum MethodBody {
    Unwrap,
    Native(Body),
}

struct FakeField {
    name: String,
    type_class: ClassRef,
    modifiers: u16,
}

struct FakeMethod {
    name: String,
    declaring_class: ClassRef,
    parameter_classes: Vec<ClassRef>,
    return_class: Option<ClassRef>,
    modifiers: u16,
    body: MethodBody,
}

struct FakeClass {
    name: String,
    primitive_type: Option<ClassRef>,
    fields: Vec<FakeField>,
    methods: Vec<MethodRef>,
    constructors: Vec<MethodRef>,
    static_values: HashMap<usize, RawValue<ObjRef>>,
}

enum FakeObject {
    Instance { class: ClassRef, fields: HashMap<usize, RawValue<ObjRef>> },
    Boxed { class: ClassRef, value: RawValue<ObjRef> },
    ReflectedMethod { class: ClassRef, method: MethodRef },
    ReflectedField { class: ClassRef, field: FieldRef },
}

#[derive(Clone, Debug)]
pub struct Invocation {
    pub name: String,
    pub target: Option<ObjRef>,
    pub args: Vec<RawValue<ObjRef>>,
}

/// In-memory stand-in for a managed runtime: enough classes, wrapper objects and reflective
/// members to drive every typed path without a real VM.
pub struct FakeRuntime {
    classes: Vec<FakeClass>,
    methods: Vec<FakeMethod>,
    objects: Vec<FakeObject>,
    pub invocations: Vec<Invocation>,
    /// Signature queries made against reflective members, in order.
    pub signature_queries: Vec<&'static str>,
    pub pinned: usize,
    pub supports_internal_enumeration: bool,
    object_class: ClassRef,
    method_class: ClassRef,
    constructor_class: ClassRef,
    field_class: ClassRef,
}

impl FakeRuntime {
    pub fn new() -> Self {
        let mut res = FakeRuntime {
            classes: vec![],
            methods: vec![],
            objects: vec![],
            invocations: vec![],
            signature_queries: vec![],
            pinned: 0,
            supports_internal_enumeration: true,
            object_class: ClassRef(0),
            method_class: ClassRef(0),
            constructor_class: ClassRef(0),
            field_class: ClassRef(0),
        };
        res.object_class = res.define_class("java/lang/Object");
        res.method_class = res.define_class("java/lang/reflect/Method");
        res.constructor_class = res.define_class("java/lang/reflect/Constructor");
        res.field_class = res.define_class("java/lang/reflect/Field");
        for kind in Kind::primitives() {
            let primitive = res.define_class(kind.java_name());
            let wrapper = res.define_class(kind.wrapper_class_name().unwrap());
            res.classes[wrapper.0].primitive_type = Some(primitive);
            let signature = format!("(){}", kind.descriptor_char());
            res.add_method_impl(wrapper, kind.unwrap_method_name().unwrap(), signature.as_str(), ACC_PUBLIC, MethodBody::Unwrap);
        }
        let void = res.define_class("void");
        let void_wrapper = res.define_class("java/lang/Void");
        res.classes[void_wrapper.0].primitive_type = Some(void);
        res
    }

    pub fn define_class(&mut self, name: &str) -> ClassRef {
        self.classes.push(FakeClass {
            name: name.to_string(),
            primitive_type: None,
            fields: vec![],
            methods: vec![],
            constructors: vec![],
            static_values: HashMap::new(),
        });
        ClassRef(self.classes.len() - 1)
    }

    /// Make a class unresolvable by name.
    pub fn hide_class(&mut self, name: &str) {
        let class = self.lookup_class(name).unwrap();
        self.classes[class.0].name = format!("<hidden {}>", name);
    }

    fn class_for_kind(&self, kind: Kind) -> ClassRef {
        let name = match kind {
            Kind::Reference => "java/lang/Object",
            other => other.java_name(),
        };
        self.lookup_class(name).unwrap()
    }

    fn lookup_class(&self, name: &str) -> Option<ClassRef> {
        self.classes.iter().position(|class| class.name == name).map(ClassRef)
    }

    pub fn add_field(&mut self, class: ClassRef, name: &str, descriptor: &str, modifiers: u16) -> FieldRef {
        let kind = parse_field_descriptor(descriptor).unwrap();
        let type_class = self.class_for_kind(kind);
        let fields = &mut self.classes[class.0].fields;
        fields.push(FakeField { name: name.to_string(), type_class, modifiers });
        FieldRef { class, index: fields.len() - 1 }
    }

    /// Parameters declared with a specific reference type instead of `java/lang/Object`.
    pub fn add_method_with_parameter_types(&mut self, class: ClassRef, name: &str, parameter_classes: Vec<ClassRef>, return_descriptor: &str, modifiers: u16, body: impl Fn(&[RawValue<ObjRef>]) -> Option<RawValue<ObjRef>> + 'static) -> MethodRef {
        let method = self.add_method(class, name, format!("(){}", return_descriptor).as_str(), modifiers, body);
        self.methods[method.0].parameter_classes = parameter_classes;
        method
    }

    pub fn add_method(&mut self, class: ClassRef, name: &str, descriptor: &str, modifiers: u16, body: impl Fn(&[RawValue<ObjRef>]) -> Option<RawValue<ObjRef>> + 'static) -> MethodRef {
        self.add_method_impl(class, name, descriptor, modifiers, MethodBody::Native(Rc::new(body)))
    }

    fn add_method_impl(&mut self, class: ClassRef, name: &str, descriptor: &str, modifiers: u16, body: MethodBody) -> MethodRef {
        let parsed = parse_method_descriptor(descriptor).unwrap();
        let parameter_classes = parsed.parameter_types.iter().map(|kind| self.class_for_kind(*kind)).collect();
        let return_class = Some(self.class_for_kind(parsed.return_type));
        self.methods.push(FakeMethod {
            name: name.to_string(),
            declaring_class: class,
            parameter_classes,
            return_class,
            modifiers,
            body,
        });
        let method = MethodRef(self.methods.len() - 1);
        self.classes[class.0].methods.push(method);
        method
    }

    pub fn add_constructor(&mut self, class: ClassRef, descriptor: &str, modifiers: u16, body: impl Fn(&[RawValue<ObjRef>]) -> Option<RawValue<ObjRef>> + 'static) -> MethodRef {
        let parsed = parse_method_descriptor(descriptor).unwrap();
        assert_eq!(parsed.return_type, Kind::Void);
        let parameter_classes = parsed.parameter_types.iter().map(|kind| self.class_for_kind(*kind)).collect();
        self.methods.push(FakeMethod {
            name: "<init>".to_string(),
            declaring_class: class,
            parameter_classes,
            return_class: None,
            modifiers,
            body: MethodBody::Native(Rc::new(body)),
        });
        let method = MethodRef(self.methods.len() - 1);
        self.classes[class.0].constructors.push(method);
        method
    }

    fn alloc(&mut self, object: FakeObject) -> ObjRef {
        self.objects.push(object);
        ObjRef(self.objects.len() - 1)
    }

    pub fn new_plain_object(&mut self, class: ClassRef) -> ObjRef {
        self.alloc(FakeObject::Instance { class, fields: HashMap::new() })
    }

    /// Box a primitive into an instance of its wrapper class.
    pub fn boxed(&mut self, value: RawValue<ObjRef>) -> ObjRef {
        let class = self.lookup_class(value.kind().wrapper_class_name().unwrap()).unwrap();
        self.alloc(FakeObject::Boxed { class, value })
    }

    pub fn reflect_method(&mut self, method: MethodRef) -> ObjRef {
        let class = if self.methods[method.0].return_class.is_some() { self.method_class } else { self.constructor_class };
        self.alloc(FakeObject::ReflectedMethod { class, method })
    }

    pub fn reflect_field(&mut self, field: FieldRef) -> ObjRef {
        let class = self.field_class;
        self.alloc(FakeObject::ReflectedField { class, field })
    }

    pub fn invocation_count(&self, name: &str) -> usize {
        self.invocations.iter().filter(|invocation| invocation.name == name).count()
    }

    pub fn class_of_object(&self, obj: ObjRef) -> ClassRef {
        match &self.objects[obj.0] {
            FakeObject::Instance { class, .. } |
            FakeObject::Boxed { class, .. } |
            FakeObject::ReflectedMethod { class, .. } |
            FakeObject::ReflectedField { class, .. } => *class,
        }
    }

    fn reflected_method(&self, member: &ObjRef) -> BridgeResult<&FakeMethod> {
        match &self.objects[member.0] {
            FakeObject::ReflectedMethod { method, .. } => Ok(&self.methods[method.0]),
            _ => Err(BridgeError::Configuration("not a reflected method".to_string())),
        }
    }

    fn reflected_field(&self, member: &ObjRef) -> BridgeResult<(FieldRef, &FakeField)> {
        match &self.objects[member.0] {
            FakeObject::ReflectedField { field, .. } => Ok((*field, &self.classes[field.class.0].fields[field.index])),
            _ => Err(BridgeError::Configuration("not a reflected field".to_string())),
        }
    }

    fn run(&mut self, method: MethodRef, target: Option<ObjRef>, args: &[RawValue<ObjRef>]) -> Option<RawValue<ObjRef>> {
        let fake_method = &self.methods[method.0];
        self.invocations.push(Invocation { name: fake_method.name.clone(), target, args: args.to_vec() });
        match &fake_method.body {
            MethodBody::Unwrap => match target.map(|target| &self.objects[target.0]) {
                Some(FakeObject::Boxed { value, .. }) => Some(value.clone()),
                _ => panic!("unwrap accessor called on a non-boxed object"),
            },
            MethodBody::Native(body) => body(args),
        }
    }
}

impl JavaRuntime for FakeRuntime {
    type Object = ObjRef;
    type Class = ClassRef;
    type FieldId = FieldRef;
    type MethodId = MethodRef;

    fn find_class(&mut self, internal_name: &[u8]) -> BridgeResult<ClassRef> {
        let internal_name = String::from_utf8_lossy(internal_name);
        self.lookup_class(&internal_name).ok_or_else(|| BridgeError::ClassNotFound(internal_name.into_owned()))
    }

    fn pin_class(&mut self, class: ClassRef) -> BridgeResult<ClassRef> {
        self.pinned += 1;
        Ok(class)
    }

    fn primitive_type_of_wrapper(&mut self, wrapper: &ClassRef) -> BridgeResult<ClassRef> {
        self.classes[wrapper.0].primitive_type.ok_or_else(|| BridgeError::Configuration("no TYPE field".to_string()))
    }

    fn method_id(&mut self, class: &ClassRef, name: &str, signature: &str) -> BridgeResult<Option<MethodRef>> {
        let parsed = match parse_method_descriptor(signature) {
            Some(parsed) => parsed,
            None => return Ok(None),
        };
        let return_class = self.class_for_kind(parsed.return_type);
        Ok(self.classes[class.0].methods.iter().copied().find(|method| {
            let fake_method = &self.methods[method.0];
            fake_method.name == name && fake_method.parameter_classes.is_empty() == parsed.parameter_types.is_empty() && fake_method.return_class == Some(return_class)
        }))
    }

    fn class_of(&mut self, obj: &ObjRef) -> BridgeResult<ClassRef> {
        Ok(self.class_of_object(*obj))
    }

    fn is_same_class(&mut self, one: &ClassRef, two: &ClassRef) -> BridgeResult<bool> {
        Ok(one == two)
    }

    fn declared_members(&mut self, class: &ClassRef, category: MemberCategory) -> BridgeResult<Option<Vec<ObjRef>>> {
        if !self.supports_internal_enumeration {
            return Ok(None);
        }
        let class = *class;
        Ok(Some(match category {
            MemberCategory::Method => {
                let methods = self.classes[class.0].methods.clone();
                methods.into_iter().map(|method| self.reflect_method(method)).collect()
            }
            MemberCategory::Constructor => {
                let constructors = self.classes[class.0].constructors.clone();
                constructors.into_iter().map(|constructor| self.reflect_method(constructor)).collect()
            }
            MemberCategory::Field => {
                let num_fields = self.classes[class.0].fields.len();
                (0..num_fields).map(|index| self.reflect_field(FieldRef { class, index })).collect()
            }
        }))
    }

    fn reflected_method_id(&mut self, member: &ObjRef) -> BridgeResult<MethodRef> {
        match &self.objects[member.0] {
            FakeObject::ReflectedMethod { method, .. } => Ok(*method),
            _ => Err(BridgeError::Configuration("not a reflected method".to_string())),
        }
    }

    fn reflected_field_id(&mut self, member: &ObjRef) -> BridgeResult<FieldRef> {
        Ok(self.reflected_field(member)?.0)
    }

    fn reflected_parameter_types(&mut self, member: &ObjRef) -> BridgeResult<Vec<ClassRef>> {
        self.signature_queries.push("parameter types");
        Ok(self.reflected_method(member)?.parameter_classes.clone())
    }

    fn reflected_parameter_count(&mut self, member: &ObjRef) -> BridgeResult<usize> {
        self.signature_queries.push("parameter count");
        Ok(self.reflected_method(member)?.parameter_classes.len())
    }

    fn reflected_type(&mut self, member: &ObjRef, category: MemberCategory) -> BridgeResult<ClassRef> {
        self.signature_queries.push("type");
        match category {
            MemberCategory::Method => self.reflected_method(member)?.return_class.ok_or_else(|| BridgeError::Configuration("constructor has no return type".to_string())),
            MemberCategory::Field => Ok(self.reflected_field(member)?.1.type_class),
            MemberCategory::Constructor => Err(BridgeError::Configuration("constructor has no return type".to_string())),
        }
    }

    fn reflected_modifiers(&mut self, member: &ObjRef) -> BridgeResult<u16> {
        match &self.objects[member.0] {
            FakeObject::ReflectedMethod { method, .. } => Ok(self.methods[method.0].modifiers),
            FakeObject::ReflectedField { field, .. } => Ok(self.classes[field.class.0].fields[field.index].modifiers),
            _ => Err(BridgeError::Configuration("not a reflected member".to_string())),
        }
    }

    fn reflected_declaring_class(&mut self, member: &ObjRef) -> BridgeResult<ClassRef> {
        match &self.objects[member.0] {
            FakeObject::ReflectedMethod { method, .. } => Ok(self.methods[method.0].declaring_class),
            FakeObject::ReflectedField { field, .. } => Ok(field.class),
            _ => Err(BridgeError::Configuration("not a reflected member".to_string())),
        }
    }

    fn reflected_name(&mut self, member: &ObjRef) -> BridgeResult<String> {
        match &self.objects[member.0] {
            FakeObject::ReflectedMethod { method, .. } => Ok(self.methods[method.0].name.clone()),
            FakeObject::ReflectedField { field, .. } => Ok(self.classes[field.class.0].fields[field.index].name.clone()),
            _ => Err(BridgeError::Configuration("not a reflected member".to_string())),
        }
    }

    fn get_field(&mut self, target: &ObjRef, field: FieldRef, kind: Kind) -> BridgeResult<RawValue<ObjRef>> {
        match &self.objects[target.0] {
            FakeObject::Instance { fields, .. } => Ok(fields.get(&field.index).cloned().unwrap_or_else(|| zero(kind))),
            _ => Err(BridgeError::Configuration("field read on a non-instance".to_string())),
        }
    }

    fn get_static_field(&mut self, class: &ClassRef, field: FieldRef, kind: Kind) -> BridgeResult<RawValue<ObjRef>> {
        Ok(self.classes[class.0].static_values.get(&field.index).cloned().unwrap_or_else(|| zero(kind)))
    }

    fn set_field(&mut self, target: &ObjRef, field: FieldRef, value: RawValue<ObjRef>) -> BridgeResult<()> {
        match &mut self.objects[target.0] {
            FakeObject::Instance { fields, .. } => {
                fields.insert(field.index, value);
                Ok(())
            }
            _ => Err(BridgeError::Configuration("field write on a non-instance".to_string())),
        }
    }

    fn set_static_field(&mut self, class: &ClassRef, field: FieldRef, value: RawValue<ObjRef>) -> BridgeResult<()> {
        self.classes[class.0].static_values.insert(field.index, value);
        Ok(())
    }

    fn call_method(&mut self, target: &ObjRef, method: MethodRef, return_kind: Kind, args: &[RawValue<ObjRef>]) -> BridgeResult<Option<RawValue<ObjRef>>> {
        let res = self.run(method, Some(*target), args);
        Ok(if return_kind == Kind::Void { None } else { res })
    }

    fn call_static_method(&mut self, _class: &ClassRef, method: MethodRef, return_kind: Kind, args: &[RawValue<ObjRef>]) -> BridgeResult<Option<RawValue<ObjRef>>> {
        let res = self.run(method, None, args);
        Ok(if return_kind == Kind::Void { None } else { res })
    }

    fn new_object(&mut self, class: &ClassRef, constructor: MethodRef, args: &[RawValue<ObjRef>]) -> BridgeResult<ObjRef> {
        let obj = self.new_plain_object(*class);
        self.run(constructor, Some(obj), args);
        Ok(obj)
    }
}

fn zero(kind: Kind) -> RawValue<ObjRef> {
    match kind {
        Kind::Int => RawValue::Int(0),
        Kind::Long => RawValue::Long(0),
        Kind::Short => RawValue::Short(0),
        Kind::Char => RawValue::Char(0),
        Kind::Boolean => RawValue::Boolean(false),
        Kind::Byte => RawValue::Byte(0),
        Kind::Float => RawValue::Float(0.0),
        Kind::Double => RawValue::Double(0.0),
        Kind::Reference | Kind::Void => RawValue::Reference(None),
    }
}

/// A sample boxed value of each primitive kind.
pub fn sample(kind: Kind) -> RawValue<ObjRef> {
    match kind {
        Kind::Int => RawValue::Int(42),
        Kind::Long => RawValue::Long(-7),
        Kind::Short => RawValue::Short(12),
        Kind::Char => RawValue::Char('x' as u16),
        Kind::Boolean => RawValue::Boolean(true),
        Kind::Byte => RawValue::Byte(-3),
        Kind::Float => RawValue::Float(1.5),
        Kind::Double => RawValue::Double(2.25),
        Kind::Reference | Kind::Void => panic!("no sample for {}", kind),
    }
}

pub fn static_flag(is_static: bool) -> u16 {
    if is_static { ACC_PRIVATE | ACC_STATIC } else { ACC_PRIVATE }
}

pub fn setup() -> (FakeRuntime, Narcissus<FakeRuntime>) {
    let mut rt = FakeRuntime::new();
    let narcissus = Narcissus::initialize(&mut rt, TracingSettings::all()).unwrap();
    (rt, narcissus)
}
