//! zigbee2mqtt bridge adapter.
//!
//! Bidirectional translation between a zigbee2mqtt bridge's MQTT topic
//! hierarchy and the host device model defined in `zigbridge-core`.
//!
//! ## Architecture
//!
//! - **[`PropertyAdapter`]**: owns one attribute's cached value and its
//!   sync with the bus.
//! - **[`DeviceAdapter`]**: owns a device's property adapters, declared
//!   actions and events; dispatches action invocations.
//! - **[`MessageRouter`]**: classifies incoming topics and applies
//!   payloads to registered devices.
//! - **[`BridgeAdapter`]**: lifecycle manager that owns the bus link,
//!   the [`DeviceRegistry`] and the device creation policy.
//!
//! Inbound flow: bus message → router → registry upsert (topology) or
//! property/event application. Outbound flow: host property set or
//! action invocation → `{friendly_name}/set` publication through the
//! single [`BusPublisher`] egress point.

pub mod adapter;
pub mod bus;
pub mod catalog;
pub mod config;
pub mod device;
pub mod error;
pub mod property;
pub mod registry;
pub mod router;

pub use adapter::BridgeAdapter;
pub use bus::{BusLink, BusPublisher, MqttBus};
pub use catalog::{CapabilityInference, DeviceCatalog, NoInference, StaticCatalog};
pub use config::{BridgeConfig, MqttConfig, DEFAULT_PREFIX};
pub use device::DeviceAdapter;
pub use error::{AdapterError, AdapterResult};
pub use property::PropertyAdapter;
pub use registry::DeviceRegistry;
pub use router::{BridgeDeviceInfo, MessageRouter, Routed, TopicClass};
