//! Lamp output driver: three LEDC PWM channels behind low-side MOSFETs.
//!
//! ## Dual-target design
//!
//! On ESP-IDF: writes the LEDC duty register via hw_init.
//! On host/test: tracks duty in-memory only.

use crate::drivers::hw_init;
use crate::lamp::{LAMP_COUNT, LampId};

pub struct LampPwm {
    duty: [u8; LAMP_COUNT],
}

impl Default for LampPwm {
    fn default() -> Self {
        Self::new()
    }
}

impl LampPwm {
    /// All channels start dark.
    pub fn new() -> Self {
        Self { duty: [0; LAMP_COUNT] }
    }

    pub fn set(&mut self, lamp: LampId, duty: u8) {
        if self.duty[lamp.index()] == duty {
            return;
        }
        hw_init::ledc_set(hw_init::LEDC_CH_LAMP[lamp.index()], duty);
        self.duty[lamp.index()] = duty;
    }

    pub fn duty(&self, lamp: LampId) -> u8 {
        self.duty[lamp.index()]
    }

    /// Force every channel dark, regardless of the tracked duty.
    pub fn all_off(&mut self) {
        for lamp in LampId::ALL {
            hw_init::ledc_set(hw_init::LEDC_CH_LAMP[lamp.index()], 0);
        }
        self.duty = [0; LAMP_COUNT];
    }
}
