//! Adapter configuration.
//!
//! Connection parameters and the topic namespace prefix are supplied
//! externally; how they are loaded (file, environment, manifest) is out
//! of scope here, so the types only carry serde derives and builders.

use serde::{Deserialize, Serialize};

/// Default zigbee2mqtt topic namespace.
pub const DEFAULT_PREFIX: &str = "zigbee2mqtt";

fn default_port() -> u16 {
    1883
}

fn default_keep_alive() -> u64 {
    60
}

fn default_prefix() -> String {
    DEFAULT_PREFIX.to_string()
}

/// MQTT broker connection parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MqttConfig {
    /// Broker hostname or address.
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    /// Client identifier; a random one is generated when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_id: Option<String>,
    #[serde(default = "default_keep_alive")]
    pub keep_alive_secs: u64,
}

impl MqttConfig {
    /// Create a config for the given broker host with defaults.
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            port: default_port(),
            username: None,
            password: None,
            client_id: None,
            keep_alive_secs: default_keep_alive(),
        }
    }

    /// Set the broker port.
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Set broker credentials.
    pub fn with_auth(mut self, username: impl Into<String>, password: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self.password = Some(password.into());
        self
    }

    /// Set a fixed client identifier.
    pub fn with_client_id(mut self, client_id: impl Into<String>) -> Self {
        self.client_id = Some(client_id.into());
        self
    }
}

/// Full adapter configuration: broker parameters plus the topic
/// namespace the bridge publishes under.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BridgeConfig {
    pub mqtt: MqttConfig,
    #[serde(default = "default_prefix")]
    pub prefix: String,
}

impl BridgeConfig {
    /// Create a config with the default `zigbee2mqtt` prefix.
    pub fn new(mqtt: MqttConfig) -> Self {
        Self {
            mqtt,
            prefix: default_prefix(),
        }
    }

    /// Override the topic namespace prefix.
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    /// Topology topic carrying the array of device-info records.
    pub fn bridge_devices_topic(&self) -> String {
        format!("{}/bridge/devices", self.prefix)
    }

    /// State topic of a single device.
    pub fn device_topic(&self, friendly_name: &str) -> String {
        format!("{}/{}", self.prefix, friendly_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_topic_helpers() {
        let config = BridgeConfig::new(MqttConfig::new("localhost"));
        assert_eq!(config.bridge_devices_topic(), "zigbee2mqtt/bridge/devices");
        assert_eq!(config.device_topic("bulb1"), "zigbee2mqtt/bulb1");

        let config = config.with_prefix("z2m");
        assert_eq!(config.bridge_devices_topic(), "z2m/bridge/devices");
    }

    #[test]
    fn test_deserialization_defaults() {
        let raw = r#"{ "mqtt": { "host": "broker.local" } }"#;
        let config: BridgeConfig = serde_json::from_str(raw).unwrap();
        assert_eq!(config.mqtt.port, 1883);
        assert_eq!(config.mqtt.keep_alive_secs, 60);
        assert_eq!(config.prefix, DEFAULT_PREFIX);
        assert!(config.mqtt.username.is_none());
    }
}
