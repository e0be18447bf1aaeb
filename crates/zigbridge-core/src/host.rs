//! Notification channel from the adapter to the host framework.
//!
//! The adapter reports device additions, property changes, device
//! events and action status to the host as [`HostEvent`]s over a
//! broadcast channel. Sends are synchronous and
//! non-blocking; a host that has not subscribed simply misses events,
//! which mirrors the bus's own latest-state-wins semantics.

use serde_json::Value;
use tokio::sync::broadcast;

/// Default buffer for slow host-side consumers.
pub const DEFAULT_CHANNEL_CAPACITY: usize = 1024;

/// Local dispatch status of an action invocation.
///
/// `Completed` means the command publication was issued, not that the
/// device executed anything; the bus gives no synchronous ack.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionStatus {
    Started,
    Completed,
    Failed,
}

/// Notification delivered to the host framework.
#[derive(Debug, Clone)]
pub enum HostEvent {
    /// A device adapter was created and registered.
    DeviceAdded {
        device_id: String,
        name: String,
        model_id: Option<String>,
    },
    /// A property's cached value changed (seed, inbound update, or
    /// accepted host-side set).
    PropertyChanged {
        device_id: String,
        property: String,
        value: Value,
    },
    /// A declared event fired, carrying its configured payload field.
    DeviceEvent {
        device_id: String,
        event: String,
        data: Value,
    },
    /// Action invocation bracketing.
    ActionStatus {
        device_id: String,
        action: String,
        status: ActionStatus,
    },
}

/// Broadcast channel carrying [`HostEvent`]s to the host framework.
#[derive(Clone)]
pub struct HostBus {
    tx: broadcast::Sender<HostEvent>,
}

impl HostBus {
    /// Create a bus with the default capacity.
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CHANNEL_CAPACITY)
    }

    /// Create a bus buffering up to `capacity` events per subscriber.
    pub fn with_capacity(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx }
    }

    /// Subscribe to all host notifications.
    pub fn subscribe(&self) -> broadcast::Receiver<HostEvent> {
        self.tx.subscribe()
    }

    /// Number of live subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }

    /// Deliver an event. Returns `true` if at least one subscriber
    /// received it.
    pub fn notify(&self, event: HostEvent) -> bool {
        self.tx.send(event).is_ok()
    }
}

impl Default for HostBus {
    fn default() -> Self {
        Self::new()
    }
}
