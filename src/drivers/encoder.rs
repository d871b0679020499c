//! Rotary encoder driver on the ESP32 PCNT (pulse counter) peripheral.
//!
//! The PCNT unit decodes the quadrature signal in hardware, with a glitch
//! filter for contact bounce, so edges keep counting while the control
//! loop is busy (a blocking fade, a reconnect wait).  The control loop
//! only reads the 16-bit hardware count and folds the difference since the
//! previous read into an absolute `i32` position.
//!
//! ## Dual-target design
//!
//! On ESP-IDF: `PcntDriver` on unit 0, A as pulse input, B as direction.
//! On host/test: an in-memory counter advanced by [`KnobEncoder::turn`].

#[cfg(feature = "espidf")]
use esp_idf_hal::gpio::InputPin;
#[cfg(feature = "espidf")]
use esp_idf_hal::pcnt::{
    Pcnt, PcntChannel, PcntChannelConfig, PcntControlMode, PcntCountMode, PcntDriver, PinIndex,
};
#[cfg(feature = "espidf")]
use esp_idf_hal::peripheral::Peripheral;
#[cfg(feature = "espidf")]
use esp_idf_hal::sys::EspError;
#[cfg(feature = "espidf")]
use log::{error, info, warn};

#[cfg(feature = "espidf")]
use crate::error::{Error, Result};

/// Glitch filter length in APB cycles (80 MHz): 1000 cycles = 12.5 µs.
#[cfg(feature = "espidf")]
const GLITCH_FILTER_CYCLES: u16 = 1_000;

/// Folds successive readings of a wrapping 16-bit hardware counter into
/// an absolute position.  Reseeding moves the position without touching
/// the counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CountTracker {
    last_count: i16,
    position: i32,
}

impl CountTracker {
    pub fn new(count: i16) -> Self {
        Self {
            last_count: count,
            position: 0,
        }
    }

    /// Account for every edge counted since the previous reading.
    pub fn fold(&mut self, count: i16) -> i32 {
        let delta = count.wrapping_sub(self.last_count);
        self.last_count = count;
        self.position = self.position.saturating_add(i32::from(delta));
        self.position
    }

    pub fn reseed(&mut self, position: i32) {
        self.position = position;
    }

    pub fn position(&self) -> i32 {
        self.position
    }
}

pub struct KnobEncoder {
    #[cfg(feature = "espidf")]
    driver: PcntDriver<'static>,
    #[cfg(not(feature = "espidf"))]
    sim_count: i16,
    tracker: CountTracker,
}

impl KnobEncoder {
    /// Claim a PCNT unit for the encoder: count on both edges of A,
    /// B low reverses the direction.
    #[cfg(feature = "espidf")]
    pub fn new<PCNT: Pcnt>(
        pcnt: impl Peripheral<P = PCNT> + 'static,
        pin_a: impl Peripheral<P = impl InputPin> + 'static,
        pin_b: impl Peripheral<P = impl InputPin> + 'static,
    ) -> Result<Self> {
        let mut driver = PcntDriver::new(
            pcnt,
            Some(pin_a),
            Some(pin_b),
            None::<esp_idf_hal::gpio::AnyInputPin>,
            None::<esp_idf_hal::gpio::AnyInputPin>,
        )
        .map_err(|e| {
            error!("encoder: PCNT driver init failed: {:?}", e);
            Error::Init("pcnt driver")
        })?;

        configure_quadrature(&mut driver).map_err(|e| {
            error!("encoder: PCNT channel config failed: {:?}", e);
            Error::Init("pcnt channel config")
        })?;

        info!("encoder: PCNT counting (glitch filter {} cycles)", GLITCH_FILTER_CYCLES);
        Ok(Self {
            driver,
            tracker: CountTracker::new(0),
        })
    }

    /// Simulated encoder (host/test).
    #[cfg(not(feature = "espidf"))]
    pub fn new() -> Self {
        Self {
            sim_count: 0,
            tracker: CountTracker::new(0),
        }
    }

    /// Simulate `counts` edges arriving between two reads.
    #[cfg(not(feature = "espidf"))]
    pub fn turn(&mut self, counts: i16) {
        self.sim_count = self.sim_count.wrapping_add(counts);
    }

    #[cfg(feature = "espidf")]
    fn read_count(&mut self) -> Option<i16> {
        self.driver
            .get_counter_value()
            .map_err(|e| warn!("encoder: counter read failed: {:?}", e))
            .ok()
    }

    #[cfg(not(feature = "espidf"))]
    fn read_count(&mut self) -> Option<i16> {
        Some(self.sim_count)
    }

    /// Absolute position, including every edge counted since the last call.
    pub fn position(&mut self) -> i32 {
        match self.read_count() {
            Some(count) => self.tracker.fold(count),
            None => self.tracker.position(),
        }
    }

    pub fn write(&mut self, position: i32) {
        // Fold pending edges first so they are not replayed on top of the seed.
        let _ = self.position();
        self.tracker.reseed(position);
    }
}

#[cfg(feature = "espidf")]
fn configure_quadrature(driver: &mut PcntDriver<'static>) -> core::result::Result<(), EspError> {
    let channel_config = PcntChannelConfig {
        lctrl_mode: PcntControlMode::Reverse,
        hctrl_mode: PcntControlMode::Keep,
        pos_mode: PcntCountMode::Decrement,
        neg_mode: PcntCountMode::Increment,
        counter_h_lim: i16::MAX,
        counter_l_lim: i16::MIN,
    };
    driver.channel_config(PcntChannel::Channel0, PinIndex::Pin0, PinIndex::Pin1, &channel_config)?;
    driver.set_filter_value(GLITCH_FILTER_CYCLES)?;
    driver.filter_enable()?;
    driver.counter_clear()?;
    driver.counter_resume()
}

#[cfg(not(feature = "espidf"))]
impl Default for KnobEncoder {
    fn default() -> Self {
        Self::new()
    }
}
