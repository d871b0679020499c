//! Debounced push-switch driver with click, double-click and long-press detection.
//!
//! ## Hardware
//!
//! The encoder's integrated switch, active-low with pull-up.  The main
//! loop samples the level every control tick and feeds it to
//! [`ButtonDriver::tick`], which runs debounce + the gesture state machine.
//!
//! ## Gesture detection
//!
//! | Gesture          | Condition                                     | Event            |
//! |------------------|-----------------------------------------------|------------------|
//! | Click            | Release, no second press within the window    | `Click`          |
//! | Double click     | Second press within the window, on release    | `DoubleClick`    |
//! | Long press start | Held past the long-press time (fires while held) | `LongPressStart` |

use crate::config::LampConfig;

const DEBOUNCE_MS: u32 = 50;

/// Button events emitted after gesture classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ButtonEvent {
    Click,
    DoubleClick,
    LongPressStart,
}

/// Internal state machine for gesture detection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum GestureState {
    Idle,
    Down { since_ms: u32, second: bool },
    WaitSecondPress { released_ms: u32 },
    LongHeld,
}

pub struct ButtonDriver {
    gpio: i32,
    long_press_ms: u32,
    double_click_ms: u32,
    state: GestureState,
    raw: bool,
    raw_since_ms: u32,
    stable: bool,
}

impl ButtonDriver {
    pub fn new(gpio: i32, config: &LampConfig) -> Self {
        Self {
            gpio,
            long_press_ms: config.button_long_press_ms,
            double_click_ms: config.button_double_click_ms,
            state: GestureState::Idle,
            raw: false,
            raw_since_ms: 0,
            stable: false,
        }
    }

    /// Sample the pin and classify.  Call from the main loop each tick.
    pub fn poll(&mut self, now_ms: u32) -> Option<ButtonEvent> {
        // Active-low.
        let pressed = !crate::drivers::hw_init::gpio_read(self.gpio);
        self.tick(now_ms, pressed)
    }

    /// Feed one raw level sample (`pressed` = switch closed).
    /// Returns a classified gesture event, if any.
    pub fn tick(&mut self, now_ms: u32, pressed: bool) -> Option<ButtonEvent> {
        let pressed = self.debounce(now_ms, pressed);

        match self.state {
            GestureState::Idle => {
                if pressed {
                    self.state = GestureState::Down {
                        since_ms: now_ms,
                        second: false,
                    };
                }
                None
            }

            GestureState::Down { since_ms, second } => {
                if !pressed {
                    if second {
                        self.state = GestureState::Idle;
                        return Some(ButtonEvent::DoubleClick);
                    }
                    self.state = GestureState::WaitSecondPress {
                        released_ms: now_ms,
                    };
                    return None;
                }

                if !second && now_ms.wrapping_sub(since_ms) >= self.long_press_ms {
                    self.state = GestureState::LongHeld;
                    return Some(ButtonEvent::LongPressStart);
                }

                None
            }

            GestureState::WaitSecondPress { released_ms } => {
                if pressed {
                    self.state = GestureState::Down {
                        since_ms: now_ms,
                        second: true,
                    };
                    return None;
                }

                if now_ms.wrapping_sub(released_ms) > self.double_click_ms {
                    self.state = GestureState::Idle;
                    return Some(ButtonEvent::Click);
                }

                None
            }

            GestureState::LongHeld => {
                if !pressed {
                    self.state = GestureState::Idle;
                }
                None
            }
        }
    }

    /// A level change is accepted once it has held for `DEBOUNCE_MS`.
    fn debounce(&mut self, now_ms: u32, raw: bool) -> bool {
        if raw != self.raw {
            self.raw = raw;
            self.raw_since_ms = now_ms;
        } else if raw != self.stable && now_ms.wrapping_sub(self.raw_since_ms) >= DEBOUNCE_MS {
            self.stable = raw;
        }
        self.stable
    }
}
