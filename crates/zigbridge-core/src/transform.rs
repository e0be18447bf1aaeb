//! Per-property value transforms between host and bus representations.
//!
//! Most zigbee2mqtt properties carry the same representation on both
//! sides, so the default transform is identity in both directions. A
//! device description can attach converter functions for the cases
//! where the bridge speaks a different dialect than the host model
//! (e.g. `"ON"`/`"OFF"` strings vs booleans, or brightness scaling).
//!
//! Transforms must be total and side-effect-free over the declared
//! value domain. A panicking converter is a configuration defect; it is
//! deliberately not caught here, and a failure never touches any other
//! property.

use std::fmt;
use std::sync::Arc;

use serde_json::Value;

/// A converter between host-side and bus-side property values.
pub type TransformFn = Arc<dyn Fn(&Value) -> Value + Send + Sync>;

/// Bidirectional value converter for a single property.
///
/// Either direction may be absent, in which case the value passes
/// through unchanged.
#[derive(Clone, Default)]
pub struct Transform {
    to_bus: Option<TransformFn>,
    from_bus: Option<TransformFn>,
}

impl Transform {
    /// The identity transform in both directions.
    pub fn identity() -> Self {
        Self::default()
    }

    /// Set the host-to-bus converter.
    pub fn with_to_bus<F>(mut self, f: F) -> Self
    where
        F: Fn(&Value) -> Value + Send + Sync + 'static,
    {
        self.to_bus = Some(Arc::new(f));
        self
    }

    /// Set the bus-to-host converter.
    pub fn with_from_bus<F>(mut self, f: F) -> Self
    where
        F: Fn(&Value) -> Value + Send + Sync + 'static,
    {
        self.from_bus = Some(Arc::new(f));
        self
    }

    /// Convert a host-side value to its bus representation.
    pub fn to_bus(&self, value: &Value) -> Value {
        match &self.to_bus {
            Some(f) => f(value),
            None => value.clone(),
        }
    }

    /// Convert a bus-side value to its host representation.
    pub fn from_bus(&self, value: &Value) -> Value {
        match &self.from_bus {
            Some(f) => f(value),
            None => value.clone(),
        }
    }

    /// Whether both directions are identity.
    pub fn is_identity(&self) -> bool {
        self.to_bus.is_none() && self.from_bus.is_none()
    }
}

impl fmt::Debug for Transform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Transform")
            .field("to_bus", &self.to_bus.as_ref().map(|_| "fn"))
            .field("from_bus", &self.from_bus.as_ref().map(|_| "fn"))
            .finish()
    }
}
