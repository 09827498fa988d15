//! MQTT broker adapter (ESP-IDF only).
//!
//! Implements [`PublishPort`] over `EspMqttClient`. The client's event
//! pump runs on its own thread and never touches the room service: received
//! messages and session changes are copied into the bounded channels in
//! [`inbox`](crate::inbox) and drained by the main loop.
//!
//! The availability topic doubles as the last will: the broker publishes a
//! retained `"0"` on `/online` when the session drops without a clean
//! disconnect.

use core::time::Duration;

use esp_idf_svc::mqtt::client::{
    Details, EspMqttClient, EspMqttConnection, EventPayload, LwtConfiguration,
    MqttClientConfiguration, QoS,
};
use esp_idf_svc::sys::EspError;
use log::{info, warn};

use crate::app::ports::PublishPort;
use crate::error::{CommsError, Error};
use crate::inbox::{self, LinkEvent};
use crate::topics::{self, Topic};

const KEEP_ALIVE: Duration = Duration::from_secs(60);
const PUMP_STACK_BYTES: usize = 8 * 1024;

/// Broker endpoint and credentials.
pub struct BrokerSettings<'a> {
    pub url: &'a str,
    pub client_id: &'a str,
    pub username: Option<&'a str>,
    pub password: Option<&'a str>,
}

pub struct MqttAdapter {
    client: EspMqttClient<'static>,
}

impl MqttAdapter {
    /// Create the client and start its event pump. The connection itself
    /// completes asynchronously and is reported as [`LinkEvent::Connected`].
    pub fn connect(settings: &BrokerSettings<'_>) -> Result<Self, Error> {
        let conf = MqttClientConfiguration {
            client_id: Some(settings.client_id),
            username: settings.username,
            password: settings.password,
            keep_alive_interval: Some(KEEP_ALIVE),
            lwt: Some(LwtConfiguration {
                topic: topics::ONLINE,
                payload: b"0",
                qos: QoS::AtLeastOnce,
                retain: true,
            }),
            ..Default::default()
        };

        let (client, connection) = EspMqttClient::new(settings.url, &conf).map_err(|e| {
            warn!("MQTT: client init failed: {}", e);
            Error::Init("mqtt client")
        })?;
        spawn_event_pump(connection).map_err(|_| Error::Init("mqtt event pump"))?;
        info!("MQTT: client '{}' -> {}", settings.client_id, settings.url);
        Ok(Self { client })
    }

    pub fn subscribe_all(&mut self, list: &[Topic]) -> Result<(), CommsError> {
        for topic in list {
            self.client
                .subscribe(topic, QoS::AtLeastOnce)
                .map_err(|e| log_err("subscribe", topic, e, CommsError::SubscribeFailed))?;
        }
        info!("MQTT: subscribed to {} topics", list.len());
        Ok(())
    }

    /// Unsubscribe everything; failures are logged and the rest still go.
    pub fn unsubscribe_all(&mut self, list: &[Topic]) {
        for topic in list {
            if let Err(e) = self.client.unsubscribe(topic) {
                warn!("MQTT: unsubscribe {} failed: {}", topic, e);
            }
        }
    }
}

impl PublishPort for MqttAdapter {
    fn publish(&mut self, topic: &str, payload: &str, retain: bool) -> Result<(), CommsError> {
        self.client
            .enqueue(topic, QoS::AtLeastOnce, retain, payload.as_bytes())
            .map(|_| ())
            .map_err(|e| log_err("publish", topic, e, CommsError::PublishFailed))
    }
}

fn log_err(op: &str, topic: &str, e: EspError, mapped: CommsError) -> CommsError {
    warn!("MQTT: {} {} failed: {}", op, topic, e);
    mapped
}

// ── Event pump ────────────────────────────────────────────────

fn spawn_event_pump(mut connection: EspMqttConnection) -> std::io::Result<()> {
    std::thread::Builder::new()
        .name("mqtt-rx".into())
        .stack_size(PUMP_STACK_BYTES)
        .spawn(move || {
            while let Ok(event) = connection.next() {
                match event.payload() {
                    EventPayload::Connected(_) => inbox::notify_link(LinkEvent::Connected),
                    EventPayload::Disconnected => inbox::notify_link(LinkEvent::Disconnected),
                    EventPayload::Received {
                        topic: Some(topic),
                        data,
                        details: Details::Complete,
                        ..
                    } => {
                        inbox::deliver(topic, data);
                    }
                    EventPayload::Received { .. } => {
                        warn!("MQTT: dropping fragmented or topic-less message");
                    }
                    EventPayload::Error(e) => warn!("MQTT: client error: {:?}", e),
                    _ => {}
                }
            }
            info!("MQTT: event pump stopped");
        })
        .map(|_| ())
}
