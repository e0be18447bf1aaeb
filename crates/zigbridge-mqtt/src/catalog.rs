//! Description-producing collaborators.
//!
//! Device descriptions come from two external sources, consulted in
//! order: a static catalog keyed by model identifier, then a
//! capability-inference engine that synthesizes a description from the
//! raw topology record. Both are pure lookups; this module defines the
//! traits plus minimal implementations for wiring and tests.

use std::collections::HashMap;

use zigbridge_core::DeviceDescription;

use crate::router::BridgeDeviceInfo;

/// Static catalog of device descriptions keyed by model identifier.
pub trait DeviceCatalog: Send + Sync {
    /// Look up a description for the given model, if the catalog knows
    /// it.
    fn lookup(&self, model_id: &str) -> Option<DeviceDescription>;
}

/// Synthesizes a device description from a raw topology record's
/// declared capabilities when the catalog has no entry.
pub trait CapabilityInference: Send + Sync {
    /// Returns `None` when the record describes no usable
    /// capabilities; no device is created in that case.
    fn infer(&self, info: &BridgeDeviceInfo) -> Option<DeviceDescription>;
}

/// In-memory [`DeviceCatalog`] backed by a hash map.
#[derive(Default)]
pub struct StaticCatalog {
    models: HashMap<String, DeviceDescription>,
}

impl StaticCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a model entry.
    pub fn with_model(
        mut self,
        model_id: impl Into<String>,
        description: DeviceDescription,
    ) -> Self {
        self.models.insert(model_id.into(), description);
        self
    }

    pub fn insert(&mut self, model_id: impl Into<String>, description: DeviceDescription) {
        self.models.insert(model_id.into(), description);
    }

    pub fn len(&self) -> usize {
        self.models.len()
    }

    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }
}

impl DeviceCatalog for StaticCatalog {
    fn lookup(&self, model_id: &str) -> Option<DeviceDescription> {
        self.models.get(model_id).cloned()
    }
}

/// Inference engine that never produces a description.
pub struct NoInference;

impl CapabilityInference for NoInference {
    fn infer(&self, _info: &BridgeDeviceInfo) -> Option<DeviceDescription> {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_static_catalog_lookup() {
        let catalog = StaticCatalog::new().with_model("LED1545G12", DeviceDescription::new("Bulb"));
        assert_eq!(catalog.lookup("LED1545G12").unwrap().name, "Bulb");
        assert!(catalog.lookup("unknown").is_none());
    }

    #[test]
    fn test_static_catalog_insert() {
        let mut catalog = StaticCatalog::new();
        assert!(catalog.is_empty());

        catalog.insert("E1743", DeviceDescription::new("Dimmer"));
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.lookup("E1743").unwrap().name, "Dimmer");
    }

    #[test]
    fn test_no_inference() {
        let info = BridgeDeviceInfo::new("bulb1", "X");
        assert!(NoInference.infer(&info).is_none());
    }
}
