//! Host-framework contract for the zigbee2mqtt bridge adapter.
//!
//! The bridge adapter translates between an MQTT topic hierarchy and a
//! host device model. This crate holds the host-facing half of that
//! contract:
//!
//! - **Descriptions**: the declarative shape of a device, its
//!   properties, actions and events ([`DeviceDescription`] and friends).
//! - **Transforms**: per-property value converters between host and bus
//!   representations, identity by default ([`Transform`]).
//! - **Validation**: the host property base's accept step
//!   ([`PropertyDescriptor::accept`]), which gates every host-initiated
//!   property write.
//! - **Notifications**: the [`HostBus`] over which the adapter reports
//!   device additions, property changes, device events and action
//!   status to the host framework.
//!
//! The adapter itself lives in the `zigbridge-mqtt` crate and depends
//! only on these contracts.

pub mod description;
pub mod error;
pub mod host;
pub mod transform;

pub use description::{
    ActionDescriptor, DeviceDescription, EventDescriptor, PropertyDescriptor, PropertyType,
};
pub use error::ValidationError;
pub use host::{ActionStatus, HostBus, HostEvent};
pub use transform::{Transform, TransformFn};

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
