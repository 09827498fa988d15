//! Transport → control loop message passing.
//!
//! The broker client runs its event pump on its own thread. It never calls
//! into the room service; it copies each message into a fixed-capacity
//! [`InboundMessage`] and pushes it onto a bounded `embassy-sync` channel.
//! The control loop drains the channel between worker ticks, so messages
//! are handled one at a time and never re-entrantly.
//!
//! ```text
//! ┌───────────────┐ InboundMessage ┌──────────────┐
//! │ MQTT event    │───────────────▶│ Control loop │
//! │ thread        │   LinkEvent    │ (sync)       │
//! │               │───────────────▶│              │
//! └───────────────┘                └──────────────┘
//! ```

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;
use heapless::{String, Vec};
use log::warn;

use crate::topics::TOPIC_CAP;

/// Largest payload accepted from the broker.
pub const PAYLOAD_CAP: usize = 128;

/// Channel depth for inbound messages.
const INBOX_DEPTH: usize = 8;

/// One broker message, copied out of the client's buffers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InboundMessage {
    pub topic: String<TOPIC_CAP>,
    pub payload: Vec<u8, PAYLOAD_CAP>,
}

impl InboundMessage {
    /// `None` when the topic or payload exceeds its buffer.
    pub fn new(topic: &str, payload: &[u8]) -> Option<Self> {
        let mut t = String::new();
        t.push_str(topic).ok()?;
        let p = Vec::from_slice(payload).ok()?;
        Some(Self { topic: t, payload: p })
    }
}

/// Broker session changes reported by the transport.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkEvent {
    Connected,
    Disconnected,
}

/// Inbound message channel: transport thread → control loop.
pub static INBOX: Channel<CriticalSectionRawMutex, InboundMessage, INBOX_DEPTH> = Channel::new();

/// Session notifications: transport thread → control loop.
pub static LINK_EVENTS: Channel<CriticalSectionRawMutex, LinkEvent, 4> = Channel::new();

/// Copy a received message into the inbox. Oversized or overflowing
/// messages are dropped with a warning; the broker redelivers QoS 1
/// traffic that was never acknowledged.
pub fn deliver(topic: &str, payload: &[u8]) -> bool {
    let Some(msg) = InboundMessage::new(topic, payload) else {
        warn!(
            "inbox: dropping oversized message on '{}' ({} bytes)",
            topic,
            payload.len()
        );
        return false;
    };
    if INBOX.try_send(msg).is_err() {
        warn!("inbox: channel full, dropping message on '{}'", topic);
        return false;
    }
    true
}

/// Try to receive the next inbound message.
pub fn try_recv() -> Option<InboundMessage> {
    INBOX.try_receive().ok()
}

pub fn notify_link(event: LinkEvent) {
    if LINK_EVENTS.try_send(event).is_err() {
        warn!("inbox: link event channel full, dropping {:?}", event);
    }
}

pub fn try_recv_link() -> Option<LinkEvent> {
    LINK_EVENTS.try_receive().ok()
}
