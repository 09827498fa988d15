//! Automation loop driven through the full service: decision, state
//! update, actuation and publication.

use roomlight::app::events::AppEvent;
use roomlight::control::automation::AutomationAction;
use roomlight::room::Mode;

use crate::mock_hw::{ActuatorCall, Rig};

const FULL_PUBLISH: [&str; 4] = [
    "/casa/sala/estado",
    "/casa/sala/janela/estado",
    "/casa/sala/janela/pos",
    "/casa/sala/luz/estado",
];

#[test]
fn dark_room_opens_window_one_step() {
    let mut rig = Rig::new();
    rig.hw.script(&[50.0]);

    let action = rig.automation_tick();

    assert_eq!(action, Some(AutomationAction::OpenWindow { to: 5.0 }));
    assert_eq!(rig.room.room().window_position(), 5.0);
    assert!(!rig.room.room().light_on());
    assert_eq!(rig.hw.calls, vec![ActuatorCall::Window(5.0)]);
    assert_eq!(rig.bus.topics(), FULL_PUBLISH);
    assert_eq!(rig.bus.last("/casa/sala/janela/pos").unwrap().payload, "5.00");
    assert_eq!(rig.bus.last("/casa/sala/janela/estado").unwrap().payload, "on");
}

#[test]
fn fully_open_dark_room_turns_light_on() {
    let mut rig = Rig::new();
    rig.arrange(100.0, false);
    rig.hw.script(&[50.0]);

    assert_eq!(rig.automation_tick(), Some(AutomationAction::LightOn));
    assert!(rig.room.room().light_on());
    assert_eq!(rig.room.room().window_position(), 100.0);
    assert_eq!(rig.hw.calls, vec![ActuatorCall::Light(true)]);
    assert_eq!(rig.bus.last("/casa/sala/luz/estado").unwrap().payload, "on");
}

#[test]
fn bright_room_closes_window_and_keeps_light() {
    let mut rig = Rig::new();
    rig.arrange(100.0, true);
    rig.hw.script(&[80.0]);

    assert_eq!(
        rig.automation_tick(),
        Some(AutomationAction::CloseWindow {
            to: 95.0,
            light_off: false
        })
    );
    assert_eq!(rig.room.room().window_position(), 95.0);
    assert!(rig.room.room().light_on());
    assert_eq!(rig.hw.calls, vec![ActuatorCall::Window(95.0)]);
}

#[test]
fn closing_to_floor_switches_light_off() {
    let mut rig = Rig::new();
    rig.arrange(5.0, true);
    rig.hw.script(&[90.0]);

    assert_eq!(
        rig.automation_tick(),
        Some(AutomationAction::CloseWindow {
            to: 0.0,
            light_off: true
        })
    );
    assert!(!rig.room.room().light_on());
    assert_eq!(
        rig.hw.calls,
        vec![ActuatorCall::Window(0.0), ActuatorCall::Light(false)]
    );
    assert_eq!(rig.bus.last("/casa/sala/janela/estado").unwrap().payload, "off");
}

#[test]
fn dead_band_holds_without_side_effects() {
    let mut rig = Rig::new();
    rig.arrange(40.0, false);
    let before = rig.room.room().clone();

    for level in [64.0, 63.0, 67.0] {
        rig.hw.script(&[level]);
        assert_eq!(rig.automation_tick(), Some(AutomationAction::Hold), "level {level}");
    }

    assert_eq!(rig.room.room(), &before);
    assert!(rig.hw.calls.is_empty());
    assert!(rig.bus.sent.is_empty());
    assert!(rig.sink.events.is_empty());
}

#[test]
fn repeated_ticks_walk_the_window_open() {
    let mut rig = Rig::new();
    rig.hw.script(&[10.0; 25]);

    for _ in 0..20 {
        rig.automation_tick();
    }
    assert_eq!(rig.room.room().window_position(), 100.0);
    assert!(!rig.room.room().light_on());

    rig.automation_tick();
    assert!(rig.room.room().light_on());

    // Nothing left to do in the dark: window open, light on.
    rig.reset_records();
    assert_eq!(rig.automation_tick(), Some(AutomationAction::Hold));
    assert!(rig.bus.sent.is_empty());
}

#[test]
fn manual_mode_disables_automation() {
    let mut rig = Rig::new();
    assert!(rig.send("/casa/sala/modo", "manual").is_accepted());
    rig.reset_records();
    rig.hw.script(&[5.0]);

    assert_eq!(rig.automation_tick(), None);
    assert_eq!(rig.room.room().mode(), Mode::Manual);
    assert!(rig.hw.calls.is_empty());
    assert!(rig.bus.sent.is_empty());
}

#[test]
fn sleep_disables_automation() {
    let mut rig = Rig::new();
    assert!(rig.send("/casa/sala/modo_dormir", "on").is_accepted());
    rig.reset_records();
    rig.hw.script(&[5.0]);

    assert_eq!(rig.automation_tick(), None);
    assert_eq!(rig.worker_tick(), None);
    assert_eq!(rig.room.room().window_position(), 0.0);
}

#[test]
fn automation_emits_event() {
    let mut rig = Rig::new();
    rig.hw.script(&[50.0]);
    rig.automation_tick();
    assert_eq!(
        rig.sink.events,
        vec![AppEvent::Automation(AutomationAction::OpenWindow { to: 5.0 })]
    );
}

#[test]
fn actuator_fault_is_reported_and_state_kept() {
    let mut rig = Rig::new();
    rig.hw.fail_window = true;
    rig.hw.script(&[50.0]);

    rig.automation_tick();

    assert_eq!(rig.room.room().window_position(), 5.0);
    assert!(rig
        .sink
        .events
        .iter()
        .any(|e| matches!(e, AppEvent::ActuatorFault(_))));
    assert_eq!(rig.bus.topics(), FULL_PUBLISH);
}

// ── Periodic worker ───────────────────────────────────────────

#[test]
fn worker_publishes_housekeeping_before_automation() {
    let mut rig = Rig::new();
    rig.clock.0 = 3 * 3600 + 7 * 60 + 59;
    rig.hw.script(&[50.0]);

    let action = rig.worker_tick();

    assert_eq!(action, Some(AutomationAction::OpenWindow { to: 5.0 }));
    let topics = rig.bus.topics();
    assert_eq!(
        &topics[..3],
        ["/temperature", "/casa/sala/luz", "/casa/horario"]
    );
    assert_eq!(&topics[3..], FULL_PUBLISH);
    assert_eq!(rig.bus.last("/temperature").unwrap().payload, "24.50");
    assert_eq!(rig.bus.last("/casa/sala/luz").unwrap().payload, "50.00");
    assert_eq!(rig.bus.last("/casa/horario").unwrap().payload, "03:07");
    // The automation step uses the same sample the worker published.
    assert!(rig.bus.last("/casa/sala/estado").unwrap().payload.contains("\"luz\":50.00"));
}

#[test]
fn worker_suppresses_unchanged_readings() {
    let mut rig = Rig::new();
    rig.arrange(40.0, false);
    rig.hw.script(&[65.0, 65.3, 66.0]);

    rig.worker_tick();
    assert_eq!(rig.bus.count("/temperature"), 1);
    assert_eq!(rig.bus.count("/casa/sala/luz"), 1);

    // 0.3 is inside the publish delta; temperature did not move.
    rig.worker_tick();
    assert_eq!(rig.bus.count("/temperature"), 1);
    assert_eq!(rig.bus.count("/casa/sala/luz"), 1);
    assert_eq!(rig.bus.count("/casa/horario"), 2);

    rig.hw.temperature = 25.0;
    rig.worker_tick();
    assert_eq!(rig.bus.count("/temperature"), 2);
    assert_eq!(rig.bus.count("/casa/sala/luz"), 2);
    assert_eq!(rig.bus.last("/casa/sala/luz").unwrap().payload, "66.00");
}

#[test]
fn worker_skips_temperature_when_sensor_fails() {
    let mut rig = Rig::new();
    rig.hw.fail_temperature = true;
    rig.hw.script(&[50.0]);

    let action = rig.worker_tick();

    assert_eq!(action, Some(AutomationAction::OpenWindow { to: 5.0 }));
    assert_eq!(rig.bus.count("/temperature"), 0);
    let topics = rig.bus.topics();
    assert_eq!(&topics[..2], ["/casa/sala/luz", "/casa/horario"]);
    assert_eq!(&topics[2..], FULL_PUBLISH);

    // The channel comes back with the sensor.
    rig.hw.fail_temperature = false;
    rig.worker_tick();
    assert_eq!(rig.bus.last("/temperature").unwrap().payload, "24.50");
}
