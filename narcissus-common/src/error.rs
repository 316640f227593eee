use thiserror::Error;

use crate::kind::Kind;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BridgeError {
    #[error("Tried to invoke method with wrong number of arguments: expected {expected}, got {actual}")]
    ArityMismatch { expected: usize, actual: usize },
    #[error("Tried to unbox arg of wrong type; expected {} (argument {index})", expected.wrapper_simple_name())]
    TypeMismatch { expected: Kind, index: usize },
    #[error("Tried to unbox a null argument; expected {} (argument {index})", kind.wrapper_simple_name())]
    NullArgumentForPrimitive { kind: Kind, index: usize },
    #[error("class not found: {0}")]
    ClassNotFound(String),
    #[error("{0}")]
    Configuration(String),
    #[error("null target for instance member {member}")]
    NullTarget { member: String },
    #[error("native bridge used before initialization")]
    Uninitialized,
    #[error("exception pending in host runtime")]
    WasException,
}

impl BridgeError {
    /// The host has already raised its own exception for these, so the outer adapter must not
    /// raise a second one.
    pub fn is_pending_in_host(&self) -> bool {
        matches!(self, BridgeError::ClassNotFound(_) | BridgeError::WasException)
    }

    /// Errors reported to the managed side as an illegal argument.
    pub fn is_illegal_argument(&self) -> bool {
        matches!(self,
            BridgeError::ArityMismatch { .. } |
            BridgeError::TypeMismatch { .. } |
            BridgeError::NullArgumentForPrimitive { .. } |
            BridgeError::Configuration(_))
    }
}
