//! GPIO / peripheral pin assignments for the Trilamp main board.
//!
//! Single source of truth: every driver references this module rather than
//! hard-coding pin numbers.  Change a pin here and it propagates everywhere.

// ---------------------------------------------------------------------------
// Lamp outputs (MOSFET low-side switches, LEDC PWM)
// ---------------------------------------------------------------------------

/// Lamp A PWM output.
pub const LAMP_A_GPIO: i32 = 25;
/// Lamp B PWM output.
pub const LAMP_B_GPIO: i32 = 26;
/// Lamp C PWM output.
pub const LAMP_C_GPIO: i32 = 27;

/// Output pins in channel order (index 0..2 = A..C).
pub const LAMP_GPIOS: [i32; 3] = [LAMP_A_GPIO, LAMP_B_GPIO, LAMP_C_GPIO];

// ---------------------------------------------------------------------------
// Rotary encoder with integrated push switch
// ---------------------------------------------------------------------------

/// Encoder track A (CLK). Internal pull-up.
pub const ENCODER_A_GPIO: i32 = 32;
/// Encoder track B (DT). Internal pull-up.
pub const ENCODER_B_GPIO: i32 = 33;
/// Encoder push switch, active-low with pull-up.
pub const BUTTON_GPIO: i32 = 34;

// ---------------------------------------------------------------------------
// PWM configuration
// ---------------------------------------------------------------------------

/// LEDC timer resolution (bits).  8-bit gives 0 – 255 duty levels.
pub const PWM_RESOLUTION_BITS: u32 = 8;
/// LEDC frequency for the lamp channels (5 kHz, flicker-free on camera).
pub const LAMP_PWM_FREQ_HZ: u32 = 5_000;
