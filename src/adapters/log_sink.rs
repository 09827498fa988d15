//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing structured application events to
//! the ESP-IDF logger (UART / USB-CDC in production).

use log::{info, warn};

use crate::app::events::AppEvent;
use crate::app::ports::EventSink;
use crate::control::automation::AutomationAction;

/// Adapter that logs every [`AppEvent`] to the serial console.
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

impl Default for LogEventSink {
    fn default() -> Self {
        Self::new()
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &AppEvent) {
        match event {
            AppEvent::Started { room, target } => {
                info!("START | room={} target={:.2}%", room, target);
            }
            AppEvent::Connected => {
                info!("LINK  | broker connected, state published");
            }
            AppEvent::CommandAccepted(cmd) => {
                info!("CMD   | accepted {} {:?}", cmd.label(), cmd);
            }
            AppEvent::CommandRejected { topic, reason } => {
                warn!("CMD   | rejected topic={} reason={}", topic, reason.label());
            }
            AppEvent::Automation(action) => match action {
                AutomationAction::Hold => {}
                AutomationAction::OpenWindow { to } => {
                    info!("AUTO  | too dark, window -> {:.2}%", to);
                }
                AutomationAction::LightOn => {
                    info!("AUTO  | too dark, window fully open, light on");
                }
                AutomationAction::CloseWindow { to, light_off } => {
                    info!("AUTO  | too bright, window -> {:.2}% light_off={}", to, light_off);
                }
            },
            AppEvent::SleepChanged(on) => {
                info!("SLEEP | {}", if *on { "entered" } else { "left, mode=auto" });
            }
            AppEvent::ModeChanged(mode) => {
                info!("MODE  | {}", mode.label());
            }
            AppEvent::ActuatorFault(e) => {
                warn!("FAULT | actuator: {}", e);
            }
            AppEvent::Printed(text) => {
                info!("PRINT | {}", text);
            }
            AppEvent::ShutdownRequested => {
                info!("EXIT  | shutdown requested");
            }
        }
    }
}
