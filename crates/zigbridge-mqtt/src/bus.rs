//! Bus connection layer.
//!
//! [`BusLink`] is the seam between the adapter and the transport: the
//! production implementation wraps a rumqttc client, tests substitute a
//! recording fake. All outbound traffic funnels through
//! [`BusPublisher`], the single point that prepends the configured
//! namespace prefix and serializes payloads.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use rumqttc::{AsyncClient, EventLoop, MqttOptions, QoS};
use serde_json::Value;
use tracing::debug;
use uuid::Uuid;

use crate::config::MqttConfig;
use crate::error::{AdapterError, AdapterResult};

/// Transport operations the adapter needs from the bus.
#[async_trait]
pub trait BusLink: Send + Sync {
    /// Publish a raw payload to an absolute topic.
    async fn publish(&self, topic: &str, payload: Vec<u8>) -> AdapterResult<()>;

    /// Subscribe to an absolute topic.
    async fn subscribe(&self, topic: &str) -> AdapterResult<()>;
}

/// rumqttc-backed bus link.
pub struct MqttBus {
    client: AsyncClient,
}

impl MqttBus {
    /// Build a client for the given broker.
    ///
    /// The returned [`EventLoop`] must be driven (see
    /// `BridgeAdapter::run`) for the connection to make progress.
    pub fn connect(config: &MqttConfig) -> (Self, EventLoop) {
        let client_id = config
            .client_id
            .clone()
            .unwrap_or_else(|| format!("zigbridge-{}", Uuid::new_v4()));

        let mut options = MqttOptions::new(client_id, &config.host, config.port);
        options.set_keep_alive(Duration::from_secs(config.keep_alive_secs));
        if let (Some(username), Some(password)) = (&config.username, &config.password) {
            options.set_credentials(username, password);
        }

        let (client, eventloop) = AsyncClient::new(options, 64);
        (Self { client }, eventloop)
    }
}

#[async_trait]
impl BusLink for MqttBus {
    async fn publish(&self, topic: &str, payload: Vec<u8>) -> AdapterResult<()> {
        self.client
            .publish(topic, QoS::AtLeastOnce, false, payload)
            .await
            .map_err(|e| AdapterError::Publish {
                topic: topic.to_string(),
                reason: e.to_string(),
            })
    }

    async fn subscribe(&self, topic: &str) -> AdapterResult<()> {
        self.client
            .subscribe(topic, QoS::AtLeastOnce)
            .await
            .map_err(|e| AdapterError::Subscribe {
                topic: topic.to_string(),
                reason: e.to_string(),
            })
    }
}

/// The single egress point for outbound bus writes.
///
/// Property sets and action invocations both publish through here;
/// nothing else in the adapter touches the link for writes.
pub struct BusPublisher {
    link: Arc<dyn BusLink>,
    prefix: String,
}

impl BusPublisher {
    pub fn new(link: Arc<dyn BusLink>, prefix: impl Into<String>) -> Self {
        Self {
            link,
            prefix: prefix.into(),
        }
    }

    /// Serialize `payload` and publish it under
    /// `{prefix}/{relative_topic}`.
    pub async fn publish(&self, relative_topic: &str, payload: &Value) -> AdapterResult<()> {
        let bytes = serde_json::to_vec(payload)?;
        self.publish_raw(relative_topic, bytes).await
    }

    /// Publish raw bytes under `{prefix}/{relative_topic}`. Used for
    /// the empty-payload bridge requests.
    pub async fn publish_raw(&self, relative_topic: &str, payload: Vec<u8>) -> AdapterResult<()> {
        let topic = format!("{}/{}", self.prefix, relative_topic);
        debug!(%topic, bytes = payload.len(), "publishing bus message");
        self.link.publish(&topic, payload).await
    }
}
