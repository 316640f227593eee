use itertools::Itertools;
use log::{trace, warn};
use narcissus_common::Kind;

pub const TRACE_ENV_VAR: &str = "NARCISSUS_TRACE";

#[derive(Debug, Clone, Eq, PartialEq)]
pub struct TracingSettings {
    pub trace_lookup: bool,
    pub trace_unbox: bool,
    pub trace_field_access: bool,
    pub trace_invoke: bool,
}

impl Default for TracingSettings {
    fn default() -> Self {
        Self::new()
    }
}

impl TracingSettings {
    pub fn new() -> Self {
        TracingSettings {
            trace_lookup: true,
            trace_unbox: false,
            trace_field_access: false,
            trace_invoke: false,
        }
    }

    pub fn disabled() -> Self {
        Self {
            trace_lookup: false,
            trace_unbox: false,
            trace_field_access: false,
            trace_invoke: false,
        }
    }

    pub fn all() -> Self {
        Self {
            trace_lookup: true,
            trace_unbox: true,
            trace_field_access: true,
            trace_invoke: true,
        }
    }

    pub fn from_env() -> Self {
        match std::env::var(TRACE_ENV_VAR) {
            Ok(value) => Self::parse(value.as_str()),
            Err(_) => Self::new(),
        }
    }

    /// Comma separated areas, applied left to right on top of [`TracingSettings::disabled`].
    pub fn parse(areas: &str) -> Self {
        let mut res = Self::disabled();
        for area in areas.split(',').map(|area| area.trim()).filter(|area| !area.is_empty()) {
            match area {
                "lookup" => res.trace_lookup = true,
                "unbox" => res.trace_unbox = true,
                "field" => res.trace_field_access = true,
                "invoke" => res.trace_invoke = true,
                "all" => res = Self::all(),
                "none" => res = Self::disabled(),
                unknown => warn!("ignoring unknown {} entry: {}", TRACE_ENV_VAR, unknown),
            }
        }
        res
    }

    pub fn trace_find_class(&self, internal_name: &[u8]) {
        if self.trace_lookup {
            trace!("find class {}", String::from_utf8_lossy(internal_name));
        }
    }

    pub fn trace_enumeration(&self, category: &str, count: usize) {
        if self.trace_lookup {
            trace!("enumerated {} declared {}", count, category);
        }
    }

    pub fn trace_parameters(&self, parameter_kinds: &[Kind], num_args: usize) {
        if self.trace_unbox {
            trace!("unbox {} args for ({})", num_args, parameter_kinds.iter().join(", "));
        }
    }

    pub fn trace_unbox(&self, index: usize, kind: Kind) {
        if self.trace_unbox {
            trace!("unbox argument {} as {}", index, kind);
        }
    }

    pub fn trace_field_get(&self, kind: Kind, is_static: bool) {
        if self.trace_field_access {
            trace!("get {} field (static: {})", kind, is_static);
        }
    }

    pub fn trace_field_set(&self, kind: Kind, is_static: bool) {
        if self.trace_field_access {
            trace!("set {} field (static: {})", kind, is_static);
        }
    }

    pub fn trace_call(&self, return_kind: Kind, num_args: usize, is_static: bool) {
        if self.trace_invoke {
            trace!("call returning {} with {} args (static: {})", return_kind, num_args, is_static);
        }
    }
}
