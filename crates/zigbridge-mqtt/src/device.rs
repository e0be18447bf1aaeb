//! Device adapter: one bus device exposed to the host framework.
//!
//! Built from a [`DeviceDescription`], a device adapter owns one
//! [`PropertyAdapter`] per declared property, the declared action and
//! event tables, and dispatches action invocations to the device's
//! `/set` topic.

use std::collections::HashMap;
use std::sync::Arc;

use serde_json::{Map, Value};
use tracing::{debug, trace};

use zigbridge_core::{
    ActionDescriptor, ActionStatus, DeviceDescription, EventDescriptor, HostBus, HostEvent,
};

use crate::bus::BusPublisher;
use crate::error::{AdapterError, AdapterResult};
use crate::property::PropertyAdapter;

/// A single bus device and its host-facing state.
pub struct DeviceAdapter {
    friendly_name: String,
    model_id: Option<String>,
    title: String,
    at_type: Vec<String>,
    actions: HashMap<String, ActionDescriptor>,
    events: HashMap<String, EventDescriptor>,
    properties: HashMap<String, Arc<PropertyAdapter>>,
    publisher: Arc<BusPublisher>,
    host: HostBus,
}

impl DeviceAdapter {
    /// Construct a device adapter from its description.
    ///
    /// Actions and events are recorded as pass-through metadata; no bus
    /// interaction happens at registration time. Every declared
    /// property gets a seeded [`PropertyAdapter`], each of which emits
    /// an immediate change notification.
    pub fn new(
        friendly_name: impl Into<String>,
        model_id: Option<String>,
        description: DeviceDescription,
        publisher: Arc<BusPublisher>,
        host: HostBus,
    ) -> Self {
        let friendly_name = friendly_name.into();

        let properties = description
            .properties
            .into_iter()
            .map(|(name, descriptor)| {
                let adapter = PropertyAdapter::new(
                    friendly_name.clone(),
                    name.clone(),
                    descriptor,
                    publisher.clone(),
                    host.clone(),
                );
                (name, Arc::new(adapter))
            })
            .collect();

        Self {
            friendly_name,
            model_id,
            title: description.name,
            at_type: description.at_type,
            actions: description.actions,
            events: description.events,
            properties,
            publisher,
            host,
        }
    }

    pub fn friendly_name(&self) -> &str {
        &self.friendly_name
    }

    /// Model identifier recorded at creation; drives the registry's
    /// dedup policy.
    pub fn model_id(&self) -> Option<&str> {
        self.model_id.as_deref()
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn at_type(&self) -> &[String] {
        &self.at_type
    }

    /// Look up a declared property adapter.
    pub fn property(&self, name: &str) -> Option<&Arc<PropertyAdapter>> {
        self.properties.get(name)
    }

    pub fn properties(&self) -> &HashMap<String, Arc<PropertyAdapter>> {
        &self.properties
    }

    pub fn action(&self, name: &str) -> Option<&ActionDescriptor> {
        self.actions.get(name)
    }

    pub fn event(&self, name: &str) -> Option<&EventDescriptor> {
        self.events.get(name)
    }

    /// Dispatch an action invocation to the bus.
    ///
    /// Sequencing: mark started, publish `{name: input}` to the `/set`
    /// topic, mark completed. Completion signals local dispatch only;
    /// there is no bus-side confirmation to wait for. A failed publish
    /// marks the action failed and surfaces the error.
    pub async fn invoke_action(&self, name: &str, input: Value) -> AdapterResult<()> {
        if !self.actions.contains_key(name) {
            return Err(AdapterError::UnknownAction {
                device: self.friendly_name.clone(),
                action: name.to_string(),
            });
        }

        self.notify_action(name, ActionStatus::Started);

        let mut body = Map::new();
        body.insert(name.to_string(), input);
        let result = self
            .publisher
            .publish(&format!("{}/set", self.friendly_name), &Value::Object(body))
            .await;

        match result {
            Ok(()) => {
                self.notify_action(name, ActionStatus::Completed);
                Ok(())
            }
            Err(e) => {
                self.notify_action(name, ActionStatus::Failed);
                Err(e)
            }
        }
    }

    /// Apply an inbound bus payload to this device.
    ///
    /// An `action` field naming a declared event emits that event with
    /// the value of the event's configured source field. Every other
    /// key is fanned out to a matching property adapter; unmatched keys
    /// are ignored without error, since bus payloads routinely carry
    /// more fields than a device declares.
    pub async fn apply_bus_payload(&self, payload: &Map<String, Value>) {
        if let Some(Value::String(action)) = payload.get("action") {
            if let Some(descriptor) = self.events.get(action) {
                let data = payload
                    .get(&descriptor.payload_field)
                    .cloned()
                    .unwrap_or(Value::Null);
                debug!(device = %self.friendly_name, event = %action, "emitting device event");
                self.host.notify(HostEvent::DeviceEvent {
                    device_id: self.friendly_name.clone(),
                    event: action.clone(),
                    data,
                });
            }
        }

        for (key, value) in payload {
            match self.properties.get(key) {
                Some(property) => property.apply_inbound(value).await,
                None => {
                    trace!(device = %self.friendly_name, key = %key, "ignoring undeclared payload key")
                }
            }
        }
    }

    fn notify_action(&self, action: &str, status: ActionStatus) {
        self.host.notify(HostEvent::ActionStatus {
            device_id: self.friendly_name.clone(),
            action: action.to_string(),
            status,
        });
    }
}
