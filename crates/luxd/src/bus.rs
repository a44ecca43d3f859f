//! Message-bus command intake
//!
//! Subscribes to `<topic_prefix>/#` on the MQTT broker and maps messages
//! onto controller operations: the `control` key switches the whole show
//! on or off, any other key is a fixture id whose payload is a color or
//! program spec. Bad commands are logged and dropped; the running
//! animation is never disturbed by them.

use std::time::Duration;

use anyhow::{Context, Result};
use rumqttc::{AsyncClient, Event, MqttOptions, Packet, QoS};
use tracing::{info, warn};

use luxd_control::LightController;

use crate::config::MqttConfig;

/// Connect to the broker and dispatch commands until shutdown
pub async fn run(config: &MqttConfig, controller: LightController) -> Result<()> {
    let mut options = MqttOptions::new(&config.client_id, &config.host, config.port);
    options.set_keep_alive(Duration::from_secs(30));
    let (client, mut eventloop) = AsyncClient::new(options, 16);

    let filter = format!("{}/#", config.topic_prefix);
    client
        .subscribe(filter.as_str(), QoS::AtMostOnce)
        .await
        .with_context(|| format!("failed to subscribe to {filter}"))?;
    info!(%filter, "subscribed to command topics");

    loop {
        match eventloop.poll().await {
            Ok(Event::Incoming(Packet::Publish(publish))) => {
                let payload = String::from_utf8_lossy(&publish.payload);
                handle_command(
                    &controller,
                    &config.topic_prefix,
                    &publish.topic,
                    payload.trim(),
                );
            }
            Ok(_) => {}
            Err(err) => {
                warn!(%err, "MQTT connection error, retrying");
                tokio::time::sleep(Duration::from_secs(2)).await;
            }
        }
        if controller.is_shutdown() {
            return Ok(());
        }
    }
}

fn handle_command(controller: &LightController, prefix: &str, topic: &str, payload: &str) {
    let Some(key) = topic
        .strip_prefix(prefix)
        .map(|rest| rest.trim_start_matches('/'))
    else {
        return;
    };
    info!(key, payload, "bus command");

    if key == "control" {
        match payload {
            "on" => controller.turn_on(),
            "off" => controller.turn_off(),
            other => warn!(other, "unknown control payload"),
        }
        return;
    }

    let Ok(id) = key.parse::<u32>() else {
        warn!(key, "fixture key is not an id");
        return;
    };
    if let Err(err) = controller.set_program(id, payload) {
        warn!(id, %err, "rejected program change");
    }
}
