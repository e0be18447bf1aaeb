//! Adapter lifecycle manager.
//!
//! Owns the bus connection, the device registry and the device
//! creation policy, and drives the message router over the incoming
//! stream. Bus errors are logged and survived; nothing here is fatal
//! to the process.

use std::sync::Arc;
use std::time::Duration;

use rumqttc::{Event, EventLoop, Packet};
use tracing::{debug, info, warn};

use zigbridge_core::{HostBus, HostEvent};

use crate::bus::{BusLink, BusPublisher};
use crate::catalog::{CapabilityInference, DeviceCatalog};
use crate::config::BridgeConfig;
use crate::device::DeviceAdapter;
use crate::error::AdapterResult;
use crate::registry::DeviceRegistry;
use crate::router::{BridgeDeviceInfo, MessageRouter, Routed};

/// Relative topic that asks the bridge to re-announce its topology.
const DEVICES_REFRESH_TOPIC: &str = "bridge/config/devices/get";

/// Bridges the bus to the host framework for one zigbee2mqtt instance.
pub struct BridgeAdapter {
    config: BridgeConfig,
    link: Arc<dyn BusLink>,
    publisher: Arc<BusPublisher>,
    registry: Arc<DeviceRegistry>,
    router: MessageRouter,
    catalog: Arc<dyn DeviceCatalog>,
    inference: Arc<dyn CapabilityInference>,
    host: HostBus,
}

impl BridgeAdapter {
    /// Construct the adapter over an established bus link and
    /// subscribe to the bridge topology topic.
    pub async fn new(
        config: BridgeConfig,
        link: Arc<dyn BusLink>,
        catalog: Arc<dyn DeviceCatalog>,
        inference: Arc<dyn CapabilityInference>,
        host: HostBus,
    ) -> AdapterResult<Self> {
        let publisher = Arc::new(BusPublisher::new(link.clone(), config.prefix.clone()));
        let registry = Arc::new(DeviceRegistry::new());
        let router = MessageRouter::new(&config.prefix, registry.clone());

        let devices_topic = config.bridge_devices_topic();
        link.subscribe(&devices_topic).await?;
        info!(topic = %devices_topic, "subscribed to bridge topology");

        Ok(Self {
            config,
            link,
            publisher,
            registry,
            router,
            catalog,
            inference,
            host,
        })
    }

    pub fn config(&self) -> &BridgeConfig {
        &self.config
    }

    pub fn registry(&self) -> &Arc<DeviceRegistry> {
        &self.registry
    }

    pub fn host(&self) -> &HostBus {
        &self.host
    }

    /// Look up a registered device by friendly name.
    pub async fn get_device(&self, friendly_name: &str) -> Option<Arc<DeviceAdapter>> {
        self.registry.get(friendly_name).await
    }

    /// Handle one raw bus message.
    ///
    /// Malformed messages are logged and dropped; the stream keeps
    /// flowing no matter how many arrive.
    pub async fn handle_message(&self, topic: &str, payload: &[u8]) {
        match self.router.route(topic, payload).await {
            Ok(Routed::Topology(records)) => {
                for info in &records {
                    self.upsert_device(info).await;
                }
            }
            Ok(Routed::Applied) | Ok(Routed::Ignored) => {}
            Err(e) => warn!(%topic, error = %e, "dropping malformed bus message"),
        }
    }

    /// Create or replace the registry entry for one topology record.
    ///
    /// A record whose friendly name and model identifier both match an
    /// existing entry is a logged no-op; the adapter does not
    /// re-synchronize an existing device's property set from a repeated
    /// announcement. A changed model identifier replaces the entry with
    /// a freshly built adapter.
    pub async fn upsert_device(&self, info: &BridgeDeviceInfo) {
        if let Some(existing) = self.registry.get(&info.friendly_name).await {
            if existing.model_id() == info.model_id.as_deref() {
                info!(device = %info.friendly_name, "device already exists");
                return;
            }
        }

        let from_catalog = info
            .model_id
            .as_deref()
            .and_then(|model_id| self.catalog.lookup(model_id));

        let description = match from_catalog {
            Some(description) => {
                info!(device = %info.friendly_name, "device description found in catalog");
                description
            }
            None => match self.inference.infer(info) {
                Some(description) => {
                    info!(device = %info.friendly_name, "device description inferred from capabilities");
                    description
                }
                None => {
                    info!(device = %info.friendly_name, "no usable description, device not created");
                    return;
                }
            },
        };

        let device = Arc::new(DeviceAdapter::new(
            info.friendly_name.clone(),
            info.model_id.clone(),
            description,
            self.publisher.clone(),
            self.host.clone(),
        ));

        let state_topic = self.config.device_topic(&info.friendly_name);
        if let Err(e) = self.link.subscribe(&state_topic).await {
            warn!(topic = %state_topic, error = %e, "device state subscription failed");
        }

        self.registry
            .insert(info.friendly_name.clone(), device.clone())
            .await;

        self.host.notify(HostEvent::DeviceAdded {
            device_id: info.friendly_name.clone(),
            name: device.title().to_string(),
            model_id: info.model_id.clone(),
        });
    }

    /// Ask the bridge to enumerate its devices. Fire-and-forget; the
    /// answer arrives as a regular topology message.
    pub async fn start_pairing(&self) -> AdapterResult<()> {
        self.publisher
            .publish_raw(DEVICES_REFRESH_TOPIC, Vec::new())
            .await
    }

    /// The bridge exposes no pairing cancellation; nothing to publish.
    pub fn cancel_pairing(&self) {
        debug!("pairing cancellation requested; bridge has no such operation");
    }

    /// Drive the MQTT event loop forever.
    ///
    /// Transport errors are logged and retried after a short pause; the
    /// connection layer handles reconnection on the next poll.
    pub async fn run(&self, mut eventloop: EventLoop) {
        loop {
            match eventloop.poll().await {
                Ok(Event::Incoming(Packet::Publish(publish))) => {
                    self.handle_message(&publish.topic, &publish.payload).await;
                }
                Ok(Event::Incoming(Packet::ConnAck(_))) => {
                    info!("broker connection acknowledged");
                }
                Ok(_) => {}
                Err(e) => {
                    warn!(error = %e, "bus transport error");
                    tokio::time::sleep(Duration::from_secs(1)).await;
                }
            }
        }
    }
}
