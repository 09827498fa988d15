//! Fuzz target: `router::route`
//!
//! Splits the input into a topic and a payload at the first NUL byte and
//! routes it against a fresh room. Routing must never panic, and a
//! refused command must be refused for a reason the router can name.
//!
//! cargo fuzz run fuzz_router

#![no_main]

use libfuzzer_sys::fuzz_target;
use roomlight::app::router::{self, Dispatch};
use roomlight::config::SystemConfig;
use roomlight::room::RoomState;

fuzz_target!(|data: &[u8]| {
    let (topic, payload) = match data.iter().position(|&b| b == 0) {
        Some(i) => (&data[..i], &data[i + 1..]),
        None => (data, &[][..]),
    };
    let Ok(topic) = core::str::from_utf8(topic) else {
        return;
    };

    let state = RoomState::new(&SystemConfig::default());
    match router::route(topic, payload, &state) {
        Dispatch::Rejected(reason) => {
            assert!(reason.is_guard() || reason.is_parse());
        }
        Dispatch::Room(_) | Dispatch::Device(_) | Dispatch::Ignored => {}
    }
});
