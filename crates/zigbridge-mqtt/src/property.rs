//! Property adapter: bidirectional sync for one device attribute.
//!
//! Each adapter owns the cached last-known value of its property.
//! Exactly two paths mutate the cache: an inbound bus message
//! ([`PropertyAdapter::apply_inbound`]) and an accepted host-side set
//! ([`PropertyAdapter::request_set`]). Both run to completion on the
//! event loop without suspension points between read and write, so no
//! additional locking is layered on top of the cache's own.

use serde_json::{Map, Value};
use tokio::sync::RwLock;
use tracing::debug;

use std::sync::Arc;

use zigbridge_core::{HostBus, HostEvent, PropertyDescriptor};

use crate::bus::BusPublisher;
use crate::error::AdapterResult;

/// Wraps a single device attribute and keeps it in sync with the bus.
pub struct PropertyAdapter {
    device_id: String,
    name: String,
    descriptor: PropertyDescriptor,
    cached: RwLock<Value>,
    publisher: Arc<BusPublisher>,
    host: HostBus,
}

impl PropertyAdapter {
    /// Build a property adapter seeded with the descriptor's initial
    /// value.
    ///
    /// Seeding emits an immediate change notification so the host has a
    /// known state before any bus traffic arrives.
    pub(crate) fn new(
        device_id: impl Into<String>,
        name: impl Into<String>,
        descriptor: PropertyDescriptor,
        publisher: Arc<BusPublisher>,
        host: HostBus,
    ) -> Self {
        let adapter = Self {
            device_id: device_id.into(),
            name: name.into(),
            cached: RwLock::new(descriptor.value.clone()),
            descriptor,
            publisher,
            host,
        };
        adapter.notify_changed(adapter.descriptor.value.clone());
        adapter
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn descriptor(&self) -> &PropertyDescriptor {
        &self.descriptor
    }

    /// The cached last-known value.
    pub async fn cached_value(&self) -> Value {
        self.cached.read().await.clone()
    }

    /// Apply a value reported by the bus.
    ///
    /// Converts through `from_bus`, stores the result and notifies the
    /// host. Deliberately not deduplicated: the bus semantics are
    /// latest-state-wins, and every report is forwarded.
    pub async fn apply_inbound(&self, bus_value: &Value) {
        let host_value = self.descriptor.transform.from_bus(bus_value);
        debug!(
            device = %self.device_id,
            property = %self.name,
            "applying inbound value"
        );
        *self.cached.write().await = host_value.clone();
        self.notify_changed(host_value);
    }

    /// Handle a host-initiated set request.
    ///
    /// Runs the host property base's accept step first; a rejected
    /// value produces no bus traffic and no notification. On accept the
    /// cache is updated, `{name: to_bus(accepted)}` is published to the
    /// device's `/set` topic, and the host is notified once the publish
    /// has been issued. The bus gives no synchronous ack, so
    /// notification does not wait for one.
    pub async fn request_set(&self, value: Value) -> AdapterResult<Value> {
        let accepted = self.descriptor.accept(value)?;

        *self.cached.write().await = accepted.clone();

        let mut body = Map::new();
        body.insert(self.name.clone(), self.descriptor.transform.to_bus(&accepted));
        self.publisher
            .publish(&format!("{}/set", self.device_id), &Value::Object(body))
            .await?;

        self.notify_changed(accepted.clone());
        Ok(accepted)
    }

    fn notify_changed(&self, value: Value) {
        self.host.notify(HostEvent::PropertyChanged {
            device_id: self.device_id.clone(),
            property: self.name.clone(),
            value,
        });
    }
}
