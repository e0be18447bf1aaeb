//! Device registry: friendly name to device adapter.
//!
//! Owned by the lifecycle manager and shared with the message router by
//! handle. Entries are never proactively removed; the host framework
//! keeps stale devices until told otherwise.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;

use crate::device::DeviceAdapter;

/// Map of bus-assigned friendly names to their device adapters.
pub struct DeviceRegistry {
    devices: RwLock<HashMap<String, Arc<DeviceAdapter>>>,
}

impl DeviceRegistry {
    pub fn new() -> Self {
        Self {
            devices: RwLock::new(HashMap::new()),
        }
    }

    /// Look up a device by friendly name.
    pub async fn get(&self, friendly_name: &str) -> Option<Arc<DeviceAdapter>> {
        self.devices.read().await.get(friendly_name).cloned()
    }

    /// Insert or replace a device entry.
    pub async fn insert(&self, friendly_name: String, device: Arc<DeviceAdapter>) {
        self.devices.write().await.insert(friendly_name, device);
    }

    pub async fn contains(&self, friendly_name: &str) -> bool {
        self.devices.read().await.contains_key(friendly_name)
    }

    pub async fn len(&self) -> usize {
        self.devices.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.devices.read().await.is_empty()
    }

    /// Friendly names of all registered devices.
    pub async fn device_names(&self) -> Vec<String> {
        self.devices.read().await.keys().cloned().collect()
    }
}

impl Default for DeviceRegistry {
    fn default() -> Self {
        Self::new()
    }
}
