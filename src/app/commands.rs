//! Inbound commands and their outcomes.
//!
//! The [`router`](super::router) turns a raw topic/payload pair into one of
//! these validated commands (or a rejection); the
//! [`RoomService`](super::service::RoomService) then applies it.

use crate::room::Mode;

/// A guarded, parsed command for the room.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RoomCommand {
    /// `/select` = "on": republish the full state.
    Select,
    /// `/luz/set`: new target illumination in percent.
    SetTarget(f32),
    /// `/janela/set`: new window position in percent.
    SetWindow(f32),
    /// `/janela/abrir`: fully open (`true`) or closed (`false`).
    OpenWindow(bool),
    /// `/luz/ligar`: switch the light.
    SwitchLight(bool),
    /// `/modo`: hand the actuators to automation or to commands.
    SetMode(Mode),
    /// `/modo_dormir`: enter (`true`) or leave (`false`) sleep.
    Sleep(bool),
    /// Unrecognised word on `/janela/abrir`, `/luz/ligar` or `/modo`:
    /// nothing changes, the full state is republished.
    Republish,
}

impl RoomCommand {
    /// Short name for logs.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Select => "select",
            Self::SetTarget(_) => "set_target",
            Self::SetWindow(_) => "set_window",
            Self::OpenWindow(_) => "open_window",
            Self::SwitchLight(_) => "switch_light",
            Self::SetMode(_) => "set_mode",
            Self::Sleep(_) => "sleep",
            Self::Republish => "republish",
        }
    }
}

/// Maintenance commands on absolute device topics. Never guarded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceCommand<'a> {
    /// `/led`: switch the onboard LED.
    Led(bool),
    /// `/print`: log the payload text.
    Print(&'a str),
    /// `/ping`: publish seconds since boot.
    Ping,
    /// `/exit`: unsubscribe and disconnect.
    Exit,
}

// ───────────────────────────────────────────────────────────────
// Outcomes
// ───────────────────────────────────────────────────────────────

/// Why a command was refused. Rejections never mutate state, never call
/// an actuator and never publish.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    /// Sleep override is active.
    SleepLockout,
    /// Manual command while automation owns the actuators.
    AutoMode,
    /// Payload is not a number / not a recognised word / not UTF-8.
    InvalidPayload,
    /// Number parsed but lies outside `[0, 100]`.
    OutOfRange,
}

impl Rejection {
    /// Refused because of the room's mode or sleep state.
    pub fn is_guard(self) -> bool {
        matches!(self, Self::SleepLockout | Self::AutoMode)
    }

    /// Refused because the payload could not be used.
    pub fn is_parse(self) -> bool {
        matches!(self, Self::InvalidPayload | Self::OutOfRange)
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::SleepLockout => "sleep_lockout",
            Self::AutoMode => "auto_mode",
            Self::InvalidPayload => "invalid_payload",
            Self::OutOfRange => "out_of_range",
        }
    }
}

/// Result of handing one inbound message to the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandOutcome {
    Accepted,
    Rejected(Rejection),
    /// Topic is not one the controller handles.
    Ignored,
}

impl CommandOutcome {
    pub fn is_accepted(self) -> bool {
        self == Self::Accepted
    }
}
