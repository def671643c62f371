//! `plantguard-monitor` -- plant monitoring daemon.
//!
//! Samples the Sense HAT once per cycle, writes the reading to Supabase,
//! shows the status on the LED matrix and sends WhatsApp/SMS alerts through
//! Twilio when a plant gets too cold or its sensor is covered.
//!
//! Configuration comes from the environment and an optional `.env` file;
//! see [`plantguard_monitor::config`] for the variables.

use plantguard_connectors::{RestStore, TwilioTransport};
use plantguard_core::{time::SystemTime, Monitor, Recipient};
use plantguard_monitor::{Display, FramebufferDisplay, HeadlessDisplay, IioSensor, Settings, StdDelay};

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "plantguard=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let settings = Settings::from_env().unwrap_or_else(|e| {
        tracing::error!("{}", e);
        std::process::exit(1);
    });

    let store = RestStore::new(&settings.database_url, &settings.database_key).unwrap_or_else(|e| {
        tracing::error!("Cannot set up record store: {}", e);
        std::process::exit(1);
    });

    let twilio = &settings.twilio;
    let transport = TwilioTransport::new(&twilio.account_sid, &twilio.auth_token, &twilio.from)
        .unwrap_or_else(|e| {
            tracing::error!("Cannot set up Twilio transport: {}", e);
            std::process::exit(1);
        });

    let display = match &settings.framebuffer {
        Some(path) => Display::Framebuffer(FramebufferDisplay::new(path)),
        None => Display::Headless(HeadlessDisplay),
    };

    if settings.monitor.recipient == Recipient::None {
        tracing::warn!("No ALERT_RECIPIENT configured, alerts will only be logged");
    }

    tracing::info!(
        sensor_id = settings.monitor.sensor_id,
        env_device = %settings.env_device.display(),
        light_device = %settings.light_device.display(),
        headless = settings.framebuffer.is_none(),
        "Starting plantguard-monitor {}",
        plantguard_core::VERSION,
    );

    let sensor = IioSensor::new(&settings.env_device, &settings.light_device);

    let mut monitor = Monitor::new(
        settings.monitor,
        store,
        sensor,
        display,
        transport,
        SystemTime,
        StdDelay,
    );
    monitor.run()
}
