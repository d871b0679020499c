//! Hardware adapter: bridges real peripherals to domain port traits.
//!
//! Owns the lamp PWM driver and the PCNT knob encoder, exposing them
//! through [`LampOutputPort`] and [`EncoderPort`], plus the blocking
//! delay the fade engine and reconnect loop sleep on.  This is the only
//! module in the system that touches actual hardware.  On non-espidf
//! targets, the underlying drivers use cfg-gated simulation stubs.

use embedded_hal::delay::DelayNs;

use crate::app::ports::{EncoderPort, LampOutputPort};
use crate::drivers::encoder::KnobEncoder;
use crate::drivers::lamp_pwm::LampPwm;
use crate::lamp::LampId;

/// Concrete adapter that combines all hardware behind port traits.
pub struct HardwareAdapter {
    pwm: LampPwm,
    encoder: KnobEncoder,
}

impl HardwareAdapter {
    pub fn new(pwm: LampPwm, encoder: KnobEncoder) -> Self {
        Self { pwm, encoder }
    }

    pub fn all_off(&mut self) {
        self.pwm.all_off();
    }
}

// ── LampOutputPort implementation ─────────────────────────────

impl LampOutputPort for HardwareAdapter {
    fn set_level(&mut self, lamp: LampId, level: u8) {
        self.pwm.set(lamp, level);
    }

    fn level(&self, lamp: LampId) -> u8 {
        self.pwm.duty(lamp)
    }
}

// ── EncoderPort implementation ────────────────────────────────

impl EncoderPort for HardwareAdapter {
    fn position(&mut self) -> i32 {
        self.encoder.position()
    }

    fn set_position(&mut self, position: i32) {
        self.encoder.write(position);
    }
}

// ── DelayNs implementation ────────────────────────────────────

impl DelayNs for HardwareAdapter {
    #[cfg(feature = "espidf")]
    fn delay_ns(&mut self, ns: u32) {
        esp_idf_hal::delay::Ets::delay_us(ns.div_ceil(1_000));
    }

    #[cfg(not(feature = "espidf"))]
    fn delay_ns(&mut self, ns: u32) {
        std::thread::sleep(std::time::Duration::from_nanos(u64::from(ns)));
    }

    /// Long waits (reconnect back-off) yield to the RTOS instead of spinning.
    #[cfg(feature = "espidf")]
    fn delay_ms(&mut self, ms: u32) {
        esp_idf_hal::delay::FreeRtos::delay_ms(ms);
    }
}
