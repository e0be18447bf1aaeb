//! Message router: per-message classification of incoming bus traffic.
//!
//! Every message is classified independently by its topic string; no
//! routing state persists between messages. Three shapes exist:
//!
//! 1. the bridge topology topic, carrying the array of device-info
//!    records that drive registry upserts;
//! 2. device state topics (anything outside the `{prefix}/bridge`
//!    namespace), whose trailing segment is the friendly name;
//! 3. other bridge-internal topics (logging, state), which this layer
//!    leaves alone.
//!
//! Unknown friendly names are dropped silently: the bus can race ahead
//! of topology announcements, and that skew is expected, not an error.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::debug;

use crate::error::{AdapterError, AdapterResult};
use crate::registry::DeviceRegistry;

/// One record of the bridge's topology message.
///
/// Capability data beyond the two identifying fields is kept verbatim
/// for the capability-inference collaborator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BridgeDeviceInfo {
    /// Bus-assigned unique device name, the registry key.
    pub friendly_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model_id: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl BridgeDeviceInfo {
    pub fn new(friendly_name: impl Into<String>, model_id: impl Into<String>) -> Self {
        Self {
            friendly_name: friendly_name.into(),
            model_id: Some(model_id.into()),
            extra: Map::new(),
        }
    }
}

/// Classification of an incoming topic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TopicClass<'a> {
    /// The bridge devices (topology) topic.
    Topology,
    /// Some other bridge-internal topic; not ours to handle.
    Bridge,
    /// Candidate device state topic with the extracted friendly name.
    Device(&'a str),
}

/// Outcome of routing one message.
#[derive(Debug)]
pub enum Routed {
    /// Topology records for the lifecycle manager to upsert.
    Topology(Vec<BridgeDeviceInfo>),
    /// Payload applied to a registered device.
    Applied,
    /// No side effects: unknown device, bridge-internal topic, or a
    /// payload shape with nothing to apply.
    Ignored,
}

/// Stateless topic classifier and payload dispatcher.
pub struct MessageRouter {
    registry: Arc<DeviceRegistry>,
    devices_topic: String,
    bridge_prefix: String,
    device_prefix: String,
}

impl MessageRouter {
    pub fn new(prefix: &str, registry: Arc<DeviceRegistry>) -> Self {
        Self {
            registry,
            devices_topic: format!("{prefix}/bridge/devices"),
            bridge_prefix: format!("{prefix}/bridge"),
            device_prefix: format!("{prefix}/"),
        }
    }

    /// Classify a topic without touching the payload.
    pub fn classify<'a>(&self, topic: &'a str) -> TopicClass<'a> {
        if topic.starts_with(&self.devices_topic) {
            TopicClass::Topology
        } else if topic.starts_with(&self.bridge_prefix) {
            TopicClass::Bridge
        } else {
            TopicClass::Device(topic.strip_prefix(&self.device_prefix).unwrap_or(topic))
        }
    }

    /// Route one message.
    ///
    /// Malformed payloads (non-JSON, or a topology payload that is not
    /// an array of records) surface as [`AdapterError::MalformedPayload`]
    /// so the caller can log and drop them; they are never fatal.
    pub async fn route(&self, topic: &str, payload: &[u8]) -> AdapterResult<Routed> {
        match self.classify(topic) {
            TopicClass::Topology => {
                let records: Vec<BridgeDeviceInfo> =
                    serde_json::from_slice(payload).map_err(|e| {
                        AdapterError::MalformedPayload {
                            topic: topic.to_string(),
                            reason: e.to_string(),
                        }
                    })?;
                Ok(Routed::Topology(records))
            }
            TopicClass::Bridge => Ok(Routed::Ignored),
            TopicClass::Device(friendly_name) => {
                let Some(device) = self.registry.get(friendly_name).await else {
                    debug!(device = %friendly_name, "message for unknown device, dropping");
                    return Ok(Routed::Ignored);
                };

                let value: Value =
                    serde_json::from_slice(payload).map_err(|e| {
                        AdapterError::MalformedPayload {
                            topic: topic.to_string(),
                            reason: e.to_string(),
                        }
                    })?;
                let Some(map) = value.as_object() else {
                    debug!(device = %friendly_name, "non-object device payload, nothing to apply");
                    return Ok(Routed::Ignored);
                };

                device.apply_bus_payload(map).await;
                Ok(Routed::Applied)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn router() -> MessageRouter {
        MessageRouter::new("zigbee2mqtt", Arc::new(DeviceRegistry::new()))
    }

    #[test]
    fn test_classify_topology() {
        assert_eq!(
            router().classify("zigbee2mqtt/bridge/devices"),
            TopicClass::Topology
        );
    }

    #[test]
    fn test_classify_bridge_internal() {
        let r = router();
        assert_eq!(r.classify("zigbee2mqtt/bridge/logging"), TopicClass::Bridge);
        assert_eq!(r.classify("zigbee2mqtt/bridge/state"), TopicClass::Bridge);
    }

    #[test]
    fn test_classify_device_strips_prefix() {
        assert_eq!(
            router().classify("zigbee2mqtt/bulb1"),
            TopicClass::Device("bulb1")
        );
    }

    #[test]
    fn test_classify_foreign_topic_passes_through() {
        // No registry entry will ever match a foreign topic, so it is
        // dropped downstream without side effects.
        assert_eq!(
            router().classify("other/ns/thing"),
            TopicClass::Device("other/ns/thing")
        );
    }

    #[tokio::test]
    async fn test_route_unknown_device_is_ignored() {
        let outcome = router()
            .route("zigbee2mqtt/ghost", br#"{"state":"ON"}"#)
            .await
            .unwrap();
        assert!(matches!(outcome, Routed::Ignored));
    }

    #[tokio::test]
    async fn test_route_malformed_topology_is_an_error() {
        let err = router()
            .route("zigbee2mqtt/bridge/devices", b"not json")
            .await
            .unwrap_err();
        assert!(matches!(err, AdapterError::MalformedPayload { .. }));
    }

    #[tokio::test]
    async fn test_route_topology_records() {
        let payload = br#"[
            {"friendly_name": "bulb1", "model_id": "LED1545G12", "type": "Router"},
            {"friendly_name": "door1"}
        ]"#;
        let outcome = router()
            .route("zigbee2mqtt/bridge/devices", payload)
            .await
            .unwrap();
        match outcome {
            Routed::Topology(records) => {
                assert_eq!(records.len(), 2);
                assert_eq!(records[0].friendly_name, "bulb1");
                assert_eq!(records[0].model_id.as_deref(), Some("LED1545G12"));
                assert_eq!(records[0].extra["type"], "Router");
                assert!(records[1].model_id.is_none());
            }
            other => panic!("unexpected outcome: {other:?}"),
        }
    }
}
