//! Trilamp firmware entry point.
//!
//! Hexagonal architecture with a single cooperative control loop.
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────┐
//! │                      Adapters (outer ring)                     │
//! │                                                                │
//! │  HardwareAdapter      LogEventSink   LogDisplay   Esp32Time    │
//! │  (Lamp+Encoder+Delay) (EventSink)    (Display)    (Clock)      │
//! │  MqttTransport / NullTransport (TransportPort)                 │
//! │                                                                │
//! │  ──────────────── Port Trait Boundary ───────────────────      │
//! │                                                                │
//! │  ┌────────────────────────────────────────────────────────┐    │
//! │  │              LampService (pure logic)                  │    │
//! │  │  Channels · Fade · RemoteLink · Afterglow              │    │
//! │  └────────────────────────────────────────────────────────┘    │
//! └────────────────────────────────────────────────────────────────┘
//! ```
#![deny(unused_must_use)]

use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use esp_idf_svc::eventloop::EspSystemEventLoop;
use esp_idf_svc::hal::modem::Modem;
use esp_idf_svc::hal::peripherals::Peripherals;
use esp_idf_svc::nvs::EspDefaultNvsPartition;
use esp_idf_svc::wifi::{AuthMethod, BlockingWifi, ClientConfiguration, Configuration, EspWifi};
use log::{error, info, warn};

use trilamp::adapters::display::LogDisplay;
use trilamp::adapters::hardware::HardwareAdapter;
use trilamp::adapters::log_sink::LogEventSink;
use trilamp::adapters::mqtt::MqttTransport;
use trilamp::adapters::time::Esp32TimeAdapter;
use trilamp::app::commands::AppCommand;
use trilamp::app::ports::ClockPort;
use trilamp::app::service::{LampService, Ports};
use trilamp::config::LampConfig;
use trilamp::drivers::button::ButtonDriver;
use trilamp::drivers::encoder::KnobEncoder;
use trilamp::drivers::lamp_pwm::LampPwm;
use trilamp::drivers::hw_init;
use trilamp::pins;
use trilamp::remote::{NullTransport, TransportPort};

/// JSON overrides baked in at build time, e.g.
/// `TRILAMP_CONFIG='{"broker_url":"mqtt://10.0.0.2:1883",...}'`.
const CONFIG_OVERRIDE: Option<&str> = option_env!("TRILAMP_CONFIG");

const MQTT_CLIENT_ID: &str = "trilamp";
const WIFI_CONNECT_ATTEMPTS: u32 = 5;

// ── Main ──────────────────────────────────────────────────────

fn main() -> Result<()> {
    // ── 1. ESP-IDF bootstrap ──────────────────────────────────
    esp_idf_svc::sys::link_patches();
    esp_idf_logger::init()?;

    info!("╔══════════════════════════════════════╗");
    info!("║  Trilamp v{}                         ║", env!("CARGO_PKG_VERSION"));
    info!("╚══════════════════════════════════════╝");

    // ── 2. Configuration ──────────────────────────────────────
    let config = match CONFIG_OVERRIDE.map(LampConfig::from_json) {
        Some(Ok(cfg)) => {
            info!("Config: build-time overrides applied");
            cfg
        }
        Some(Err(e)) => {
            warn!("Config: overrides rejected ({}), using defaults", e);
            LampConfig::default()
        }
        None => LampConfig::default(),
    };

    // ── 3. Peripherals ────────────────────────────────────────
    hw_init::init_peripherals().context("peripheral init")?;
    let peripherals = Peripherals::take()?;
    // Encoder tracks: pins::ENCODER_A_GPIO / pins::ENCODER_B_GPIO.
    let encoder = KnobEncoder::new(
        peripherals.pcnt0,
        peripherals.pins.gpio32,
        peripherals.pins.gpio33,
    )
    .context("encoder init")?;
    info!(
        "Encoder: PCNT0 on GPIO{}/GPIO{}",
        pins::ENCODER_A_GPIO,
        pins::ENCODER_B_GPIO
    );

    // ── 4. Network (only when a broker is configured) ─────────
    // The WiFi driver must outlive the control loop.
    let wifi = if config.has_broker() {
        connect_wifi(peripherals.modem, &config)
            .map_err(|e| warn!("WiFi: {:#}; remote control unavailable until reboot", e))
            .ok()
    } else {
        None
    };

    match wifi.as_ref().map(|_| MqttTransport::start(&config.broker_url, MQTT_CLIENT_ID)) {
        Some(Ok(net)) => run(config, encoder, net),
        Some(Err(e)) => {
            warn!("MQTT: {}; running local-only", e);
            run(config, encoder, NullTransport)
        }
        None => {
            info!("No broker configured; running local-only");
            run(config, encoder, NullTransport)
        }
    }
}

// ── Control loop ──────────────────────────────────────────────

/// Poll, in order, the knob, the button, the afterglow slot and the
/// inbound queue; then sleep one control interval.  Never returns.
fn run(config: LampConfig, encoder: KnobEncoder, mut net: impl TransportPort) -> ! {
    let mut hw = HardwareAdapter::new(LampPwm::new(), encoder);
    hw.all_off();

    let mut display = LogDisplay::new(true);
    let mut log_sink = LogEventSink::new();
    let clock = Esp32TimeAdapter::new();
    let mut button = ButtonDriver::new(pins::BUTTON_GPIO, &config);
    let interval = Duration::from_millis(u64::from(config.control_loop_interval_ms));

    let mut app = LampService::new(config, pins::LAMP_GPIOS);
    app.start(&mut Ports::new(&mut hw, &mut net, &mut display, &mut log_sink));

    info!("System ready. Entering control loop.");

    loop {
        let now_ms = clock.now_ms();
        let gesture = button.poll(now_ms).map(AppCommand::from);

        app.tick(
            now_ms,
            gesture,
            &mut Ports::new(&mut hw, &mut net, &mut display, &mut log_sink),
        );

        std::thread::sleep(interval);
    }
}

// ── WiFi station bring-up ─────────────────────────────────────

fn connect_wifi(modem: Modem, config: &LampConfig) -> Result<EspWifi<'static>> {
    let sys_loop = EspSystemEventLoop::take()?;
    let nvs = EspDefaultNvsPartition::take()?;

    let mut esp_wifi = EspWifi::new(modem, sys_loop.clone(), Some(nvs))?;
    let mut wifi = BlockingWifi::wrap(&mut esp_wifi, sys_loop)?;

    let auth_method = if config.wifi_password.is_empty() {
        AuthMethod::None
    } else {
        AuthMethod::WPAWPA2Personal
    };
    wifi.set_configuration(&Configuration::Client(ClientConfiguration {
        ssid: config
            .wifi_ssid
            .as_str()
            .try_into()
            .map_err(|_| anyhow!("wifi ssid too long"))?,
        password: config
            .wifi_password
            .as_str()
            .try_into()
            .map_err(|_| anyhow!("wifi password too long"))?,
        auth_method,
        ..Default::default()
    }))?;

    wifi.start()?;
    info!("WiFi: started, connecting to '{}'", config.wifi_ssid);

    for attempt in 1..=WIFI_CONNECT_ATTEMPTS {
        match wifi.connect().and_then(|()| wifi.wait_netif_up()) {
            Ok(()) => {
                info!("WiFi: connected on attempt {}", attempt);
                drop(wifi);
                return Ok(esp_wifi);
            }
            Err(e) => {
                warn!("WiFi: attempt {}/{} failed: {:?}", attempt, WIFI_CONNECT_ATTEMPTS, e);
                let _ = wifi.disconnect();
                std::thread::sleep(Duration::from_millis(u64::from(config.reconnect_delay_ms)));
            }
        }
    }

    error!("WiFi: giving up after {} attempts", WIFI_CONNECT_ATTEMPTS);
    Err(anyhow!("wifi connect failed"))
}
