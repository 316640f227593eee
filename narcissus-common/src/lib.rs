pub mod kind;
pub mod raw_value;
pub mod descriptor_parser;
pub mod error;

pub use error::BridgeError;
pub use kind::Kind;
pub use raw_value::{KindValue, RawValue};

pub type BridgeResult<T> = Result<T, BridgeError>;
