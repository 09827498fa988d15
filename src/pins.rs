//! GPIO / peripheral pin assignments for the room controller board.
//!
//! Single source of truth: every driver references this module rather than
//! hard-coding pin numbers.

// ---------------------------------------------------------------------------
// Window covering (hobby servo)
// ---------------------------------------------------------------------------

/// LEDC PWM output driving the window servo signal line.
pub const SERVO_PWM_GPIO: i32 = 15;

// ---------------------------------------------------------------------------
// Light fixture
// ---------------------------------------------------------------------------

/// Digital output: relay coil for the room light (active HIGH).
pub const LIGHT_RELAY_GPIO: i32 = 14;

/// Discrete indicator LEDs, lit together (white) while the light is on.
pub const LED_R_GPIO: i32 = 13;
pub const LED_G_GPIO: i32 = 11;
pub const LED_B_GPIO: i32 = 12;

// ---------------------------------------------------------------------------
// Onboard status LED
// ---------------------------------------------------------------------------

/// Driven by the `/led` maintenance topic.
pub const ONBOARD_LED_GPIO: i32 = 48;

// ---------------------------------------------------------------------------
// Sensors (ADC1)
// ---------------------------------------------------------------------------

/// LDR voltage divider, ADC1 channel 2 (GPIO 3 on ESP32-S3).
pub const LDR_ADC_GPIO: i32 = 3;
pub const LDR_ADC_CHANNEL: u32 = 2;

/// Die temperature uses the internal sensor peripheral, not an ADC pin.
pub const DIE_TEMP_RANGE_C: (i32, i32) = (-10, 80);

// ---------------------------------------------------------------------------
// PWM configuration
// ---------------------------------------------------------------------------

/// Hobby-servo frame rate (20 ms period).
pub const SERVO_PWM_FREQ_HZ: u32 = 50;
/// LEDC resolution for the servo timer. 14 bits gives ~1.2 µs per step at 50 Hz.
pub const SERVO_PWM_RESOLUTION_BITS: u32 = 14;
