//! Authoritative data model for one room.
//!
//! [`RoomState`] has a single owner (the room service). Fields are private;
//! writes go through clamping mutators and the atomic sleep transition so
//! that the range and sleep invariants hold in every reachable state.

use crate::config::{ROOM_NAME_CAP, SystemConfig};

/// Lower bound for any percent value.
pub const PERCENT_MIN: f32 = 0.0;
/// Upper bound for any percent value.
pub const PERCENT_MAX: f32 = 100.0;

/// Clamp to `[0, 100]`. NaN collapses to 0.
pub fn clamp_percent(value: f32) -> f32 {
    if value.is_nan() {
        return PERCENT_MIN;
    }
    value.clamp(PERCENT_MIN, PERCENT_MAX)
}

// ───────────────────────────────────────────────────────────────
// Mode
// ───────────────────────────────────────────────────────────────

/// Who is allowed to move the window and switch the light.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// The automation controller owns the actuators.
    Auto,
    /// Only external commands move the actuators.
    Manual,
}

impl Mode {
    /// Wire label used in the composite status payload.
    pub fn label(self) -> &'static str {
        match self {
            Self::Auto => "auto",
            Self::Manual => "manual",
        }
    }

    /// Parse a `/modo` payload word, case-insensitively.
    pub fn from_payload(word: &str) -> Option<Self> {
        if word.eq_ignore_ascii_case("auto") {
            Some(Self::Auto)
        } else if word.eq_ignore_ascii_case("manual") {
            Some(Self::Manual)
        } else {
            None
        }
    }
}

// ───────────────────────────────────────────────────────────────
// RoomState
// ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub struct RoomState {
    name: heapless::String<ROOM_NAME_CAP>,
    target_illumination: f32,
    window_position: f32,
    light_on: bool,
    mode: Mode,
    sleep_override: bool,
}

impl RoomState {
    /// Fresh state: window closed, light off, automatic mode, no sleep.
    pub fn new(config: &SystemConfig) -> Self {
        Self {
            name: config.room_name.clone(),
            target_illumination: clamp_percent(config.default_target_percent),
            window_position: PERCENT_MIN,
            light_on: false,
            mode: Mode::Auto,
            sleep_override: false,
        }
    }

    // ── Reads ─────────────────────────────────────────────────

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn target_illumination(&self) -> f32 {
        self.target_illumination
    }

    /// Current window opening in percent (0 = closed).
    pub fn window_position(&self) -> f32 {
        self.window_position
    }

    pub fn light_on(&self) -> bool {
        self.light_on
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn sleep_override(&self) -> bool {
        self.sleep_override
    }

    /// `true` when the window is open at all.
    pub fn window_open(&self) -> bool {
        self.window_position > PERCENT_MIN
    }

    /// The automation loop only runs in automatic mode outside sleep.
    pub fn automation_enabled(&self) -> bool {
        self.mode == Mode::Auto && !self.sleep_override
    }

    /// Range and sleep invariants. Used by tests and debug assertions.
    pub fn is_consistent(&self) -> bool {
        let in_range = |v: f32| (PERCENT_MIN..=PERCENT_MAX).contains(&v);
        let ranges = in_range(self.target_illumination) && in_range(self.window_position);
        let sleep = !self.sleep_override
            || (self.mode == Mode::Manual
                && !self.light_on
                && self.window_position == PERCENT_MIN);
        ranges && sleep
    }

    // ── Guarded mutators ──────────────────────────────────────
    //
    // Callers (router, automation) check permissions first; these only
    // enforce ranges.

    pub(crate) fn set_target(&mut self, percent: f32) {
        self.target_illumination = clamp_percent(percent);
    }

    pub(crate) fn set_window(&mut self, percent: f32) {
        self.window_position = clamp_percent(percent);
    }

    pub(crate) fn set_light(&mut self, on: bool) {
        self.light_on = on;
    }

    pub(crate) fn set_mode(&mut self, mode: Mode) {
        self.mode = mode;
    }

    /// Enter sleep: light off, window closed, manual mode, all at once.
    ///
    /// The caller must actuate the hardware to match before handling the
    /// next message.
    pub(crate) fn enter_sleep(&mut self) {
        self.light_on = false;
        self.window_position = PERCENT_MIN;
        self.mode = Mode::Manual;
        self.sleep_override = true;
        debug_assert!(self.is_consistent());
    }

    /// Leave sleep and hand the room back to the automation loop.
    pub(crate) fn exit_sleep(&mut self) {
        self.sleep_override = false;
        self.mode = Mode::Auto;
    }
}
