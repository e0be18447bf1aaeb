//! Minimal bridge wiring against a local broker.
//!
//! Run a zigbee2mqtt instance plus an MQTT broker on localhost, then:
//!
//! ```sh
//! cargo run --example run_bridge
//! ```
//!
//! Host notifications are printed as they arrive.

use std::sync::Arc;

use serde_json::json;
use tracing::info;
use tracing_subscriber::EnvFilter;

use zigbridge_core::{DeviceDescription, HostBus, PropertyDescriptor, PropertyType};
use zigbridge_mqtt::{AdapterResult, BridgeAdapter, BridgeConfig, MqttBus, MqttConfig, NoInference, StaticCatalog};

#[tokio::main]
async fn main() -> AdapterResult<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = BridgeConfig::new(MqttConfig::new("localhost"));

    let catalog = StaticCatalog::new().with_model(
        "LED1545G12",
        DeviceDescription::new("Tradfri bulb")
            .with_at_type("Light")
            .with_property(
                "state",
                PropertyDescriptor::new(PropertyType::String)
                    .with_enum(vec![json!("ON"), json!("OFF")])
                    .with_value(json!("OFF")),
            )
            .with_property(
                "brightness",
                PropertyDescriptor::new(PropertyType::Integer)
                    .with_range(0.0, 254.0)
                    .with_value(json!(0)),
            ),
    );

    let host = HostBus::new();
    let mut notifications = host.subscribe();
    tokio::spawn(async move {
        while let Ok(event) = notifications.recv().await {
            info!(?event, "host notification");
        }
    });

    let (bus, eventloop) = MqttBus::connect(&config.mqtt);
    let adapter = BridgeAdapter::new(
        config,
        Arc::new(bus),
        Arc::new(catalog),
        Arc::new(NoInference),
        host,
    )
    .await?;

    adapter.start_pairing().await?;
    adapter.run(eventloop).await;
    Ok(())
}
