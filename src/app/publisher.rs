//! Outbound status messages.
//!
//! [`StatePublisher`] renders [`RoomState`] onto the message bus. Every
//! emission is independent: a failed publish is logged and the remaining
//! ones still go out. Numbers always carry exactly two decimals.

use core::fmt::Write;

use log::{debug, warn};

use crate::error::CommsError;
use crate::room::RoomState;
use crate::topics::{self, RoomTopics};

use super::ports::PublishPort;

/// Fixed-capacity payload buffer.
pub type Payload = heapless::String<128>;

fn on_off(on: bool) -> &'static str {
    if on { "on" } else { "off" }
}

/// Two-decimal rendering used by every numeric topic.
pub fn format_percent(value: f32) -> Payload {
    let mut out = Payload::new();
    let _ = write!(out, "{value:.2}");
    out
}

/// Composite status document for `/casa/{room}/estado`.
pub fn status_payload(state: &RoomState, illumination: f32) -> Result<Payload, CommsError> {
    let mut out = Payload::new();
    write!(
        out,
        "{{\"luz\":{:.2},\"janela\":{:.2},\"luz_ligada\":{},\"modo\":\"{}\",\"modo_dormir\":{},\"iluminacao_alvo\":{:.2}}}",
        illumination,
        state.window_position(),
        u8::from(state.light_on()),
        state.mode().label(),
        u8::from(state.sleep_override()),
        state.target_illumination(),
    )
    .map_err(|_| CommsError::Overflow)?;
    Ok(out)
}

/// `HH:MM` since boot, hours wrapping at 24.
pub fn clock_payload(uptime_secs: u64) -> Payload {
    let hours = (uptime_secs / 3600) % 24;
    let minutes = (uptime_secs / 60) % 60;
    let mut out = Payload::new();
    let _ = write!(out, "{hours:02}:{minutes:02}");
    out
}

// ───────────────────────────────────────────────────────────────
// StatePublisher
// ───────────────────────────────────────────────────────────────

pub struct StatePublisher {
    topics: RoomTopics,
    illumination_delta: f32,
    last_illumination: Option<f32>,
    last_temperature: Option<f32>,
}

impl StatePublisher {
    pub fn new(topics: RoomTopics, illumination_delta: f32) -> Self {
        Self {
            topics,
            illumination_delta,
            last_illumination: None,
            last_temperature: None,
        }
    }

    pub fn topics(&self) -> &RoomTopics {
        &self.topics
    }

    /// Composite status, window binary, window position, light binary.
    ///
    /// `illumination` is sampled by the caller so that two calls without a
    /// mutation in between emit identical payloads.
    pub fn publish_all(&self, state: &RoomState, illumination: f32, bus: &mut impl PublishPort) {
        self.publish_status(state, illumination, bus);
        send(
            bus,
            &self.topics.window_state,
            on_off(state.window_open()),
            true,
        );
        send(
            bus,
            &self.topics.window_position,
            &format_percent(state.window_position()),
            true,
        );
        self.publish_light_state(state, bus);
    }

    pub fn publish_status(&self, state: &RoomState, illumination: f32, bus: &mut impl PublishPort) {
        match status_payload(state, illumination) {
            Ok(payload) => send(bus, &self.topics.status, &payload, false),
            Err(e) => warn!("publish {}: {}", self.topics.status, e),
        }
    }

    pub fn publish_light_state(&self, state: &RoomState, bus: &mut impl PublishPort) {
        send(bus, &self.topics.light_state, on_off(state.light_on()), true);
    }

    /// Publish `/casa/{room}/luz` when the level moved by more than the
    /// configured delta. The first reading always goes out.
    pub fn publish_illumination_if_changed(&mut self, level: f32, bus: &mut impl PublishPort) -> bool {
        let moved = self
            .last_illumination
            .is_none_or(|last| (level - last).abs() > self.illumination_delta);
        if moved {
            self.last_illumination = Some(level);
            send(bus, &self.topics.illumination, &format_percent(level), false);
        }
        moved
    }

    /// Publish `/temperature` whenever the reading differs from the last one.
    pub fn publish_temperature_if_changed(&mut self, temperature: f32, bus: &mut impl PublishPort) -> bool {
        let changed = self.last_temperature != Some(temperature);
        if changed {
            self.last_temperature = Some(temperature);
            send(bus, topics::TEMPERATURE, &format_percent(temperature), false);
        }
        changed
    }

    pub fn publish_clock(&self, uptime_secs: u64, bus: &mut impl PublishPort) {
        send(bus, topics::CLOCK, &clock_payload(uptime_secs), false);
    }

    /// Availability marker; the broker replaces it with the last will on loss.
    pub fn publish_online(&self, bus: &mut impl PublishPort) {
        send(bus, topics::ONLINE, "1", true);
    }

    pub fn publish_uptime(&self, uptime_secs: u64, bus: &mut impl PublishPort) {
        let mut payload = Payload::new();
        let _ = write!(payload, "{uptime_secs}");
        send(bus, topics::UPTIME, &payload, false);
    }

    pub fn publish_led_state(&self, on: bool, bus: &mut impl PublishPort) {
        send(bus, topics::LED_STATE, if on { "On" } else { "Off" }, false);
    }
}

fn send(bus: &mut impl PublishPort, topic: &str, payload: &str, retain: bool) {
    match bus.publish(topic, payload, retain) {
        Ok(()) => debug!("publish {topic} = {payload}"),
        Err(e) => warn!("publish {topic}: {e}"),
    }
}
