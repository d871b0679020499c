//! One-shot hardware peripheral initialization.
//!
//! Configures the button input and the LEDC timer that drives the three
//! lamp channels, using raw ESP-IDF sys calls.  The encoder pins belong to
//! the PCNT driver in `drivers::encoder`.  Called
//! once from `main()` before the control loop starts.

#[cfg(feature = "espidf")]
use esp_idf_svc::sys::*;
#[cfg(feature = "espidf")]
use log::{error, info};

#[cfg(feature = "espidf")]
use crate::error::Error;
use crate::error::Result;
#[cfg(feature = "espidf")]
use crate::pins;

/// LEDC channel numbers for lamps A, B, C (indexed by `LampId::index()`).
pub const LEDC_CH_LAMP: [u32; 3] = [0, 1, 2];

#[cfg(feature = "espidf")]
pub fn init_peripherals() -> Result<()> {
    // SAFETY: Called once from main() before the control loop; single-threaded.
    unsafe {
        init_gpio_inputs()?;
        init_ledc()?;
    }
    info!("hw_init: all peripherals configured");
    Ok(())
}

#[cfg(not(feature = "espidf"))]
pub fn init_peripherals() -> Result<()> {
    log::info!("hw_init(sim): peripheral init skipped");
    Ok(())
}

// ── GPIO Inputs ───────────────────────────────────────────────

#[cfg(feature = "espidf")]
unsafe fn init_gpio_inputs() -> Result<()> {
    let pin = pins::BUTTON_GPIO;
    let cfg = gpio_config_t {
        pin_bit_mask: 1u64 << pin,
        mode: gpio_mode_t_GPIO_MODE_INPUT,
        pull_up_en: gpio_pullup_t_GPIO_PULLUP_ENABLE,
        pull_down_en: gpio_pulldown_t_GPIO_PULLDOWN_DISABLE,
        intr_type: gpio_int_type_t_GPIO_INTR_DISABLE,
    };
    let ret = unsafe { gpio_config(&cfg) };
    if ret != ESP_OK as i32 {
        error!("hw_init: gpio_config({}) failed (rc={})", pin, ret);
        return Err(Error::Init("gpio input config"));
    }

    info!("hw_init: button input configured");
    Ok(())
}

#[cfg(feature = "espidf")]
pub fn gpio_read(pin: i32) -> bool {
    // SAFETY: gpio_get_level is a read-only register access on an
    // already-configured input pin.
    (unsafe { gpio_get_level(pin) }) != 0
}

/// Host stub: inputs idle high (pull-ups, nothing pressed).
#[cfg(not(feature = "espidf"))]
pub fn gpio_read(_pin: i32) -> bool {
    true
}

// ── LEDC PWM ─────────────────────────────────────────────────

#[cfg(feature = "espidf")]
unsafe fn init_ledc() -> Result<()> {
    let timer = ledc_timer_config_t {
        speed_mode: ledc_mode_t_LEDC_LOW_SPEED_MODE,
        timer_num: ledc_timer_t_LEDC_TIMER_0,
        duty_resolution: ledc_timer_bit_t_LEDC_TIMER_8_BIT,
        freq_hz: pins::LAMP_PWM_FREQ_HZ,
        clk_cfg: soc_periph_ledc_clk_src_legacy_t_LEDC_AUTO_CLK,
        ..Default::default()
    };
    // SAFETY: Called from single main-task context via init_peripherals().
    if unsafe { ledc_timer_config(&timer) } != ESP_OK as i32 {
        return Err(Error::Init("ledc timer config"));
    }

    for (&channel, &gpio) in LEDC_CH_LAMP.iter().zip(pins::LAMP_GPIOS.iter()) {
        let ret = unsafe {
            ledc_channel_config(&ledc_channel_config_t {
                speed_mode: ledc_mode_t_LEDC_LOW_SPEED_MODE,
                channel,
                timer_sel: ledc_timer_t_LEDC_TIMER_0,
                gpio_num: gpio,
                duty: 0,
                hpoint: 0,
                ..Default::default()
            })
        };
        if ret != ESP_OK as i32 {
            error!("hw_init: ledc channel {} (gpio {}) failed (rc={})", channel, gpio, ret);
            return Err(Error::Init("ledc channel config"));
        }
    }

    info!("hw_init: LEDC configured (lamps on CH0-2, {} Hz)", pins::LAMP_PWM_FREQ_HZ);
    Ok(())
}

#[cfg(feature = "espidf")]
pub fn ledc_set(channel: u32, duty: u8) {
    // SAFETY: LEDC channels were configured in init_ledc(); duty register
    // writes only happen from the main loop.
    unsafe {
        ledc_set_duty(ledc_mode_t_LEDC_LOW_SPEED_MODE, channel, u32::from(duty));
        ledc_update_duty(ledc_mode_t_LEDC_LOW_SPEED_MODE, channel);
    }
}

#[cfg(not(feature = "espidf"))]
pub fn ledc_set(_channel: u32, _duty: u8) {}
