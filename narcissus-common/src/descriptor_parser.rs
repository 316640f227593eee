use itertools::Itertools;

use crate::kind::Kind;

/// A method descriptor flattened to kinds. Class and array types all become `Kind::Reference`,
/// which is all the typed dispatch needs to know about them.
#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub struct MethodDescriptor {
    pub parameter_types: Vec<Kind>,
    pub return_type: Kind,
}

impl MethodDescriptor {
    pub fn no_args(return_type: Kind) -> Self {
        Self { parameter_types: vec![], return_type }
    }

    /// Class and array parameters are written as `Ljava/lang/Object;`, which is the erasure the
    /// kind retains.
    pub fn jvm_representation(&self) -> String {
        format!("({}){}", self.parameter_types.iter().map(kind_jvm_representation).join(""), kind_jvm_representation(&self.return_type))
    }
}

fn kind_jvm_representation(kind: &Kind) -> String {
    match kind {
        Kind::Reference => "Ljava/lang/Object;".to_string(),
        other => other.descriptor_char().to_string(),
    }
}

fn eat_one(str_: &str) -> &str {
    &str_[1..]
}

pub fn parse_base_type(str_: &str) -> Option<(&str, Kind)> {
    match Kind::from_base_type_char(str_.chars().next()?)? {
        Kind::Void => None,
        kind => Some((eat_one(str_), kind)),
    }
}

pub fn parse_object_type(str_: &str) -> Option<(&str, Kind)> {
    match str_.chars().next()? {
        'L' => {
            let str_without_l = eat_one(str_);
            let end_index = str_without_l.find(';')?;
            if end_index == 0 {
                return None;
            }
            Some((&str_without_l[end_index + 1..], Kind::Reference))
        }
        _ => None,
    }
}

pub fn parse_array_type(str_: &str) -> Option<(&str, Kind)> {
    match str_.chars().next()? {
        '[' => {
            let (remaining_to_parse, _component) = parse_field_type(eat_one(str_))?;
            Some((remaining_to_parse, Kind::Reference))
        }
        _ => None,
    }
}

pub fn parse_field_type(str_: &str) -> Option<(&str, Kind)> {
    parse_array_type(str_)
        .or_else(|| parse_base_type(str_))
        .or_else(|| parse_object_type(str_))
}

pub fn parse_field_descriptor(str_: &str) -> Option<Kind> {
    match parse_field_type(str_)? {
        ("", kind) => Some(kind),
        _ => None,
    }
}

fn parse_return_descriptor(str_: &str) -> Option<(&str, Kind)> {
    match str_.chars().next()? {
        'V' => Some((eat_one(str_), Kind::Void)),
        _ => parse_field_type(str_),
    }
}

pub fn parse_method_descriptor(str_: &str) -> Option<MethodDescriptor> {
    if str_.chars().next()? != '(' {
        return None;
    }
    let mut remaining_to_parse = eat_one(str_);
    let mut parameter_types = Vec::new();
    while remaining_to_parse.chars().next()? != ')' {
        let (rem, kind) = parse_field_type(remaining_to_parse)?;
        remaining_to_parse = rem;
        parameter_types.push(kind);
    }
    remaining_to_parse = eat_one(remaining_to_parse);
    match parse_return_descriptor(remaining_to_parse)? {
        ("", return_type) => Some(MethodDescriptor { parameter_types, return_type }),
        _ => None,
    }
}
