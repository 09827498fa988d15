//! Topic namespace.
//!
//! Room topics live under `/casa/{room}`; device maintenance topics are
//! absolute. Topic strings are fixed-capacity so nothing on the message
//! path allocates.

use core::fmt::Write;

use crate::error::CommsError;

/// Longest topic the firmware builds or accepts.
pub const TOPIC_CAP: usize = 100;

pub type Topic = heapless::String<TOPIC_CAP>;

/// Prefix shared by every room.
pub const NAMESPACE: &str = "/casa";

// ── Inbound room suffixes ─────────────────────────────────────

pub const SELECT: &str = "/select";
pub const TARGET_SET: &str = "/luz/set";
pub const WINDOW_SET: &str = "/janela/set";
pub const WINDOW_OPEN: &str = "/janela/abrir";
pub const LIGHT_SWITCH: &str = "/luz/ligar";
pub const MODE: &str = "/modo";
pub const SLEEP: &str = "/modo_dormir";

/// Every room suffix the controller subscribes to.
pub const ROOM_INBOUND: [&str; 7] = [
    SELECT,
    TARGET_SET,
    WINDOW_SET,
    WINDOW_OPEN,
    LIGHT_SWITCH,
    MODE,
    SLEEP,
];

// ── Outbound room suffixes ────────────────────────────────────

pub const STATUS: &str = "/estado";
pub const WINDOW_STATE: &str = "/janela/estado";
pub const WINDOW_POSITION: &str = "/janela/pos";
pub const LIGHT_STATE: &str = "/luz/estado";
pub const ILLUMINATION: &str = "/luz";

// ── Absolute device topics ────────────────────────────────────

pub const LED: &str = "/led";
pub const LED_STATE: &str = "/led/state";
pub const PRINT: &str = "/print";
pub const PING: &str = "/ping";
pub const UPTIME: &str = "/uptime";
pub const EXIT: &str = "/exit";
pub const TEMPERATURE: &str = "/temperature";
/// Availability topic; the transport registers `"0"` here as its last will.
pub const ONLINE: &str = "/online";
pub const CLOCK: &str = "/casa/horario";

pub const DEVICE_INBOUND: [&str; 4] = [LED, PRINT, PING, EXIT];

/// `/casa/{room}{suffix}`
pub fn room_topic(room: &str, suffix: &str) -> Result<Topic, CommsError> {
    let mut topic = Topic::new();
    write!(topic, "{NAMESPACE}/{room}{suffix}").map_err(|_| CommsError::Overflow)?;
    Ok(topic)
}

/// Strip `/casa/{room}` from `topic`, returning the suffix (with its leading
/// `/`). `None` for topics outside this room.
pub fn room_suffix<'a>(topic: &'a str, room: &str) -> Option<&'a str> {
    let rest = topic.strip_prefix(NAMESPACE)?.strip_prefix('/')?;
    let suffix = rest.strip_prefix(room)?;
    suffix.starts_with('/').then_some(suffix)
}

/// Everything the controller subscribes to on connect.
pub fn subscriptions(room: &str) -> Result<heapless::Vec<Topic, 11>, CommsError> {
    let mut out = heapless::Vec::new();
    for suffix in ROOM_INBOUND {
        out.push(room_topic(room, suffix)?)
            .map_err(|_| CommsError::Overflow)?;
    }
    for topic in DEVICE_INBOUND {
        let mut t = Topic::new();
        t.push_str(topic).map_err(|_| CommsError::Overflow)?;
        out.push(t).map_err(|_| CommsError::Overflow)?;
    }
    Ok(out)
}

// ───────────────────────────────────────────────────────────────
// Precomputed outbound topics
// ───────────────────────────────────────────────────────────────

/// Outbound topics for one room, built once at start-up.
#[derive(Debug, Clone)]
pub struct RoomTopics {
    pub status: Topic,
    pub window_state: Topic,
    pub window_position: Topic,
    pub light_state: Topic,
    pub illumination: Topic,
}

impl RoomTopics {
    pub fn new(room: &str) -> Result<Self, CommsError> {
        Ok(Self {
            status: room_topic(room, STATUS)?,
            window_state: room_topic(room, WINDOW_STATE)?,
            window_position: room_topic(room, WINDOW_POSITION)?,
            light_state: room_topic(room, LIGHT_STATE)?,
            illumination: room_topic(room, ILLUMINATION)?,
        })
    }
}
