//! Fade engine: linear, monotonic brightness ramps.
//!
//! A fade is an explicit state machine advanced one unit step per tick:
//!
//! ```text
//!   Idle ──start(from, to)──▶ Ramping { current, target } ──step()…──▶ Idle
//! ```
//!
//! [`FadeEngine::run`] drives that machine to completion, writing each
//! level to the output and holding the configured step delay after it.
//! The call **blocks** for `steps × step_delay`; nothing else on the
//! control loop runs until the lamp has settled.  Callers rely on that:
//! when `run` returns, the physical output equals the target.

use embedded_hal::delay::DelayNs;
use log::debug;

use super::LampId;
use crate::app::ports::LampOutputPort;

/// Ramp state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FadeState {
    Idle,
    Ramping { lamp: LampId, current: u8, target: u8 },
}

/// Unit-step ramp between two levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FadeRamp {
    state: FadeState,
}

impl FadeRamp {
    /// Begin a ramp from `from` to `to`.  Equal levels start (and stay) idle.
    pub fn start(lamp: LampId, from: u8, to: u8) -> Self {
        let state = if from == to {
            FadeState::Idle
        } else {
            FadeState::Ramping {
                lamp,
                current: from,
                target: to,
            }
        };
        Self { state }
    }

    /// Advance one unit step toward the target and return the level to drive.
    /// Returns `None` once idle.
    pub fn step(&mut self) -> Option<u8> {
        let FadeState::Ramping {
            lamp,
            current,
            target,
        } = self.state
        else {
            return None;
        };

        let next = if target > current {
            current + 1
        } else {
            current - 1
        };

        self.state = if next == target {
            FadeState::Idle
        } else {
            FadeState::Ramping {
                lamp,
                current: next,
                target,
            }
        };
        Some(next)
    }
}

/// Blocking fade driver with a fixed step rate.
#[derive(Debug, Clone, Copy)]
pub struct FadeEngine {
    step_delay_us: u32,
}

impl FadeEngine {
    pub fn new(step_delay_us: u32) -> Self {
        Self { step_delay_us }
    }

    /// Ramp `lamp` from its current physical level to `target`.
    ///
    /// Blocks until the output reads `target`.  Returns the number of
    /// unit steps taken.
    pub fn run<H>(&self, hw: &mut H, lamp: LampId, target: u8) -> u32
    where
        H: LampOutputPort + DelayNs,
    {
        let from = hw.level(lamp);
        let mut ramp = FadeRamp::start(lamp, from, target);
        let mut steps = 0;

        while let Some(level) = ramp.step() {
            hw.set_level(lamp, level);
            hw.delay_us(self.step_delay_us);
            steps += 1;
        }

        debug!("fade {}: {} -> {} in {} steps", lamp, from, target, steps);
        steps
    }
}
