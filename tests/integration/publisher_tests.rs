//! Outbound state publication as seen by a broker subscriber.

use roomlight::app::ports::PublishPort;
use roomlight::app::publisher::StatePublisher;
use roomlight::app::service::RoomService;
use roomlight::config::SystemConfig;
use roomlight::room::RoomState;
use roomlight::topics::RoomTopics;

use crate::mock_hw::{LogSink, MockHardware, RecordingBus, Rig};

fn publisher() -> (StatePublisher, RoomState) {
    let config = SystemConfig::default();
    let topics = RoomTopics::new(&config.room_name).unwrap();
    (
        StatePublisher::new(topics, config.illumination_publish_delta),
        RoomState::new(&config),
    )
}

#[test]
fn connect_announces_availability_then_full_state() {
    let config = SystemConfig::default();
    let mut room = RoomService::new(&config).unwrap();
    let mut hw = MockHardware::with_level(48.25);
    let mut bus = RecordingBus::new();
    let mut sink = LogSink::new();

    room.start(&mut hw, &mut sink);
    room.on_connected(&mut hw, &mut bus, &mut sink);

    assert_eq!(
        bus.topics(),
        [
            "/online",
            "/casa/sala/estado",
            "/casa/sala/janela/estado",
            "/casa/sala/janela/pos",
            "/casa/sala/luz/estado",
        ]
    );
    assert_eq!(bus.sent[0].payload, "1");
    assert!(bus.sent[0].retain);

    let status: serde_json::Value = serde_json::from_str(&bus.sent[1].payload).unwrap();
    assert_eq!(status["luz"], 48.25);
    assert_eq!(status["janela"], 0.0);
    assert_eq!(status["luz_ligada"], 0);
    assert_eq!(status["modo"], "auto");
    assert_eq!(status["modo_dormir"], 0);
    assert_eq!(status["iluminacao_alvo"], 65.0);
}

#[test]
fn retain_flags_per_channel() {
    let (publisher, state) = publisher();
    let mut bus = RecordingBus::new();
    publisher.publish_all(&state, 10.0, &mut bus);

    let retained: Vec<_> = bus.sent.iter().map(|p| (p.topic.as_str(), p.retain)).collect();
    assert_eq!(
        retained,
        [
            ("/casa/sala/estado", false),
            ("/casa/sala/janela/estado", true),
            ("/casa/sala/janela/pos", true),
            ("/casa/sala/luz/estado", true),
        ]
    );
}

#[test]
fn publish_all_is_idempotent() {
    let (publisher, state) = publisher();
    let mut first = RecordingBus::new();
    let mut second = RecordingBus::new();

    publisher.publish_all(&state, 33.3, &mut first);
    publisher.publish_all(&state, 33.3, &mut second);

    assert_eq!(first.sent, second.sent);
}

#[test]
fn status_payload_always_two_decimals() {
    let mut rig = Rig::new();
    assert!(rig.send("/casa/sala/modo", "manual").is_accepted());
    assert!(rig.send("/casa/sala/janela/set", "7").is_accepted());

    let payload = &rig.bus.last("/casa/sala/estado").unwrap().payload;
    assert!(payload.contains("\"janela\":7.00"), "{payload}");
    assert!(payload.contains("\"luz\":65.00"), "{payload}");
    assert!(payload.contains("\"modo\":\"manual\""), "{payload}");
}

#[test]
fn illumination_threshold_uses_last_published_value() {
    let (mut publisher, _) = publisher();
    let mut bus = RecordingBus::new();

    assert!(publisher.publish_illumination_if_changed(50.0, &mut bus));
    // Small drifts accumulate against the last published value.
    assert!(!publisher.publish_illumination_if_changed(50.4, &mut bus));
    assert!(!publisher.publish_illumination_if_changed(50.5, &mut bus));
    assert!(publisher.publish_illumination_if_changed(50.6, &mut bus));
    assert!(publisher.publish_illumination_if_changed(49.0, &mut bus));

    let values: Vec<_> = bus.sent.iter().map(|p| p.payload.as_str()).collect();
    assert_eq!(values, ["50.00", "50.60", "49.00"]);
}

#[test]
fn failed_publish_does_not_block_the_rest() {
    struct FlakyBus {
        inner: RecordingBus,
        calls: usize,
    }

    impl PublishPort for FlakyBus {
        fn publish(
            &mut self,
            topic: &str,
            payload: &str,
            retain: bool,
        ) -> Result<(), roomlight::error::CommsError> {
            self.calls += 1;
            if self.calls == 1 {
                return Err(roomlight::error::CommsError::PublishFailed);
            }
            self.inner.publish(topic, payload, retain)
        }
    }

    let (publisher, state) = publisher();
    let mut bus = FlakyBus {
        inner: RecordingBus::new(),
        calls: 0,
    };
    publisher.publish_all(&state, 1.0, &mut bus);

    assert_eq!(bus.calls, 4);
    assert_eq!(bus.inner.sent.len(), 3);
    assert_eq!(bus.inner.sent[0].topic, "/casa/sala/janela/estado");
}

#[test]
fn offline_bus_leaves_state_intact() {
    let mut rig = Rig::new();
    rig.bus.offline = true;
    assert!(rig.send("/casa/sala/modo", "manual").is_accepted());
    assert!(rig.send("/casa/sala/janela/set", "60").is_accepted());
    assert_eq!(rig.room.room().window_position(), 60.0);
    assert!(rig.bus.sent.is_empty());
}
