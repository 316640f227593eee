//! Typed marshaling and dispatch for reaching members of managed objects without going through
//! the runtime's accessibility checks.
//!
//! Everything is generic over [`runtime::JavaRuntime`], the seam to the host. [`Narcissus`]
//! bundles the immutable state produced once at startup; all of its operations are otherwise
//! stateless and may be called from any number of threads.

use narcissus_common::BridgeResult;

use crate::registry::PrimitiveRegistry;
use crate::runtime::JavaRuntime;
use crate::tracing::TracingSettings;

pub mod runtime;
pub mod registry;
pub mod member;
pub mod lookup;
pub mod unbox;
pub mod field;
pub mod invoke;
pub mod tracing;

pub struct Narcissus<R: JavaRuntime> {
    pub registry: PrimitiveRegistry<R>,
    pub tracing: TracingSettings,
}

impl<R: JavaRuntime> Narcissus<R> {
    pub fn initialize(rt: &mut R, tracing: TracingSettings) -> BridgeResult<Self> {
        let registry = PrimitiveRegistry::initialize(rt)?;
        Ok(Self { registry, tracing })
    }
}
