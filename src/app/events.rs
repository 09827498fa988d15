//! Outbound application events.
//!
//! The [`RoomService`](super::service::RoomService) emits these through the
//! [`EventSink`](super::ports::EventSink) port. Adapters on the other side
//! decide what to do with them (serial log, test recorder).

use crate::control::automation::AutomationAction;
use crate::error::ActuatorError;
use crate::room::Mode;

use super::commands::{RoomCommand, Rejection};

/// Structured events emitted by the application core.
#[derive(Debug, Clone, PartialEq)]
pub enum AppEvent {
    /// The service has started (carries room name and initial target).
    Started { room: heapless::String<16>, target: f32 },

    /// Broker session established; subscriptions and state were published.
    Connected,

    /// A room command passed its guard and was applied.
    CommandAccepted(RoomCommand),

    /// A room or device command was refused.
    CommandRejected { topic: heapless::String<100>, reason: Rejection },

    /// The automation loop changed the room.
    Automation(AutomationAction),

    /// Sleep override toggled (`true` = entered).
    SleepChanged(bool),

    /// Mode switched by command.
    ModeChanged(Mode),

    /// An actuator call failed; state was still recorded.
    ActuatorFault(ActuatorError),

    /// Text received on `/print`.
    Printed(heapless::String<128>),

    /// `/exit` received; the loop should unsubscribe and disconnect.
    ShutdownRequested,
}
