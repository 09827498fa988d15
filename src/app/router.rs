//! Topic dispatch.
//!
//! A static table maps each room topic suffix to a command kind and the
//! guard it must pass. Routing is pure: it reads the room state, checks the
//! guard *before* looking at the payload, parses the payload and returns a
//! validated command. Applying the command is the service's job.

use log::debug;

use crate::room::{Mode, PERCENT_MAX, PERCENT_MIN, RoomState};
use crate::topics;

use super::commands::{DeviceCommand, Rejection, RoomCommand};

// ───────────────────────────────────────────────────────────────
// Route table
// ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandKind {
    Select,
    TargetSet,
    WindowSet,
    WindowOpen,
    LightSwitch,
    Mode,
    Sleep,
}

/// Permission required before a command's payload is even parsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Guard {
    /// Always allowed (sleep toggle).
    Open,
    /// Refused while sleep override is active.
    Awake,
    /// Refused while asleep or in automatic mode.
    AwakeManual,
}

impl Guard {
    pub fn check(self, state: &RoomState) -> Result<(), Rejection> {
        match self {
            Self::Open => Ok(()),
            Self::Awake | Self::AwakeManual if state.sleep_override() => {
                Err(Rejection::SleepLockout)
            }
            Self::AwakeManual if state.mode() == Mode::Auto => Err(Rejection::AutoMode),
            Self::Awake | Self::AwakeManual => Ok(()),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Route {
    pub suffix: &'static str,
    pub kind: CommandKind,
    pub guard: Guard,
}

pub const ROUTES: [Route; 7] = [
    Route { suffix: topics::SELECT, kind: CommandKind::Select, guard: Guard::Awake },
    Route { suffix: topics::TARGET_SET, kind: CommandKind::TargetSet, guard: Guard::AwakeManual },
    Route { suffix: topics::WINDOW_SET, kind: CommandKind::WindowSet, guard: Guard::AwakeManual },
    Route { suffix: topics::WINDOW_OPEN, kind: CommandKind::WindowOpen, guard: Guard::AwakeManual },
    Route { suffix: topics::LIGHT_SWITCH, kind: CommandKind::LightSwitch, guard: Guard::AwakeManual },
    Route { suffix: topics::MODE, kind: CommandKind::Mode, guard: Guard::Awake },
    Route { suffix: topics::SLEEP, kind: CommandKind::Sleep, guard: Guard::Open },
];

// ───────────────────────────────────────────────────────────────
// Routing
// ───────────────────────────────────────────────────────────────

/// Where an inbound message ended up.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Dispatch<'a> {
    Room(RoomCommand),
    Device(DeviceCommand<'a>),
    Rejected(Rejection),
    Ignored,
}

/// Resolve `topic`/`payload` against the route table for `state`'s room.
pub fn route<'a>(topic: &str, payload: &'a [u8], state: &RoomState) -> Dispatch<'a> {
    if let Some(suffix) = topics::room_suffix(topic, state.name()) {
        let Some(route) = ROUTES.iter().find(|r| r.suffix == suffix) else {
            return Dispatch::Ignored;
        };
        if let Err(reason) = route.guard.check(state) {
            return Dispatch::Rejected(reason);
        }
        return match parse_room(route.kind, payload) {
            Ok(cmd) => Dispatch::Room(cmd),
            Err(reason) => Dispatch::Rejected(reason),
        };
    }

    match parse_device(topic, payload) {
        Some(Ok(cmd)) => Dispatch::Device(cmd),
        Some(Err(reason)) => Dispatch::Rejected(reason),
        None => Dispatch::Ignored,
    }
}

fn parse_room(kind: CommandKind, payload: &[u8]) -> Result<RoomCommand, Rejection> {
    let text = payload_text(payload)?;
    match kind {
        CommandKind::Select => exact_switch(text)?
            .then_some(RoomCommand::Select)
            .ok_or(Rejection::InvalidPayload),
        CommandKind::TargetSet => parse_percent(text).map(RoomCommand::SetTarget),
        CommandKind::WindowSet => parse_percent(text).map(RoomCommand::SetWindow),
        CommandKind::WindowOpen => {
            Ok(word_switch(text).map_or_else(|_| republish(text), RoomCommand::OpenWindow))
        }
        CommandKind::LightSwitch => {
            Ok(word_switch(text).map_or_else(|_| republish(text), RoomCommand::SwitchLight))
        }
        CommandKind::Mode => {
            Ok(Mode::from_payload(text).map_or_else(|| republish(text), RoomCommand::SetMode))
        }
        CommandKind::Sleep => exact_switch(text).map(RoomCommand::Sleep),
    }
}

fn parse_device<'a>(topic: &str, payload: &'a [u8]) -> Option<Result<DeviceCommand<'a>, Rejection>> {
    let cmd = match topic {
        topics::LED => payload_text(payload).and_then(|text| {
            if text.eq_ignore_ascii_case("on") || text == "1" {
                Ok(DeviceCommand::Led(true))
            } else if text.eq_ignore_ascii_case("off") || text == "0" {
                Ok(DeviceCommand::Led(false))
            } else {
                Err(Rejection::InvalidPayload)
            }
        }),
        topics::PRINT => payload_text(payload).map(DeviceCommand::Print),
        topics::PING => Ok(DeviceCommand::Ping),
        topics::EXIT => Ok(DeviceCommand::Exit),
        _ => return None,
    };
    Some(cmd)
}

// ── Payload parsing ───────────────────────────────────────────

fn payload_text(payload: &[u8]) -> Result<&str, Rejection> {
    core::str::from_utf8(payload).map_err(|_| {
        debug!("router: payload is not UTF-8 ({} bytes)", payload.len());
        Rejection::InvalidPayload
    })
}

/// Decimal percent. Surrounding whitespace is allowed; anything that is not
/// a finite number in `[0, 100]` is refused, never clamped.
pub fn parse_percent(text: &str) -> Result<f32, Rejection> {
    let value: f32 = text.trim().parse().map_err(|_| Rejection::InvalidPayload)?;
    if (PERCENT_MIN..=PERCENT_MAX).contains(&value) {
        Ok(value)
    } else {
        Err(Rejection::OutOfRange)
    }
}

/// "on"/"off" in any letter case.
fn word_switch(text: &str) -> Result<bool, Rejection> {
    if text.eq_ignore_ascii_case("on") {
        Ok(true)
    } else if text.eq_ignore_ascii_case("off") {
        Ok(false)
    } else {
        Err(Rejection::InvalidPayload)
    }
}

/// Switch topics answer a word they do not know with the current state.
fn republish(text: &str) -> RoomCommand {
    debug!("router: unrecognised word {:?}, republishing state", text);
    RoomCommand::Republish
}

/// Exactly "on" or "off".
fn exact_switch(text: &str) -> Result<bool, Rejection> {
    match text {
        "on" => Ok(true),
        "off" => Ok(false),
        _ => Err(Rejection::InvalidPayload),
    }
}
