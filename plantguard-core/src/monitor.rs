//! The Monitor Loop
//!
//! ## Cycle
//!
//! One perpetual, strictly sequential cycle:
//!
//! ```text
//!  1. clear display
//!  2. fetch sensor record, then the plant's reference profile   ─┐ store errors
//!  3. derive tolerance bands                                      │ abort the
//!  4. sample temperature, humidity, light                        │ cycle
//!  5. persist the raw reading (always)                          ─┘
//!  6. obstruction? moon icon + Obstruction alert : sun icon; short pause
//!  7. classify; LowTemperature alert when temp < band min
//!  8. apply display rotation
//!  9. scroll the status text
//! 10. long pause (in `run`), repeat
//! ```
//!
//! ## Failure handling
//!
//! - Store and sensor failures abort the cycle with a [`CycleError`]; `run`
//!   logs it and tries again after the normal interval.
//! - An invalid profile only disables the band-dependent steps (7 and 9);
//!   the reading is still persisted and obstruction still handled.
//! - A non-finite reading disables the steps for that metric only.
//! - Display and transport failures are logged and the cycle carries on.

use heapless::Vec;

use crate::{
    alert::{AlertDecider, AlertKind},
    classify::{classify, Metric, Tier},
    config::{MonitorConfig, Recipient},
    errors::{CycleError, DeviceError, InvalidProfileError, TransportError},
    profile::{Band, ReferenceProfile, Reading, ToleranceBands, UserId},
    render::{render_status, Icon, StatusLine, StatusPayload},
    traits::{
        DelayNs, DisplayDevice, MessageId, NotificationTransport, PhoneNumber, PlantStore,
        SensorDevice, SensorStore, SensorUpdate, TimeSource, UserStore,
    },
};

/// Result of one alert the decider let through
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlertDispatch {
    /// What fired
    pub kind: AlertKind,
    /// Provider id when the send succeeded
    pub message_id: Option<MessageId>,
}

/// What happened during one cycle
#[derive(Debug, Clone, PartialEq)]
pub struct CycleReport {
    /// Raw sample
    pub reading: Reading,
    /// Bands, unless the profile was invalid
    pub bands: Option<ToleranceBands>,
    /// Why there are no bands
    pub profile_error: Option<InvalidProfileError>,
    /// Light path covered
    pub obstructed: bool,
    /// Temperature tier, if classified
    pub temperature_tier: Option<Tier>,
    /// Humidity tier, if classified
    pub humidity_tier: Option<Tier>,
    /// Alerts dispatched this cycle
    pub alerts: Vec<AlertDispatch, 2>,
    /// Full status, when both metrics were classified
    pub payload: Option<StatusPayload>,
}

impl CycleReport {
    /// Whether an alert of `kind` was dispatched
    pub fn alerted(&self, kind: AlertKind) -> bool {
        self.alerts.iter().any(|a| a.kind == kind)
    }
}

/// Drives the sample → classify → render → alert cycle
pub struct Monitor<S, D, L, N, C, Y> {
    config: MonitorConfig,
    store: S,
    sensor: D,
    display: L,
    transport: N,
    clock: C,
    delay: Y,
    decider: AlertDecider,
}

impl<S, D, L, N, C, Y> Monitor<S, D, L, N, C, Y>
where
    S: SensorStore + PlantStore + UserStore,
    D: SensorDevice,
    L: DisplayDevice,
    N: NotificationTransport,
    C: TimeSource,
    Y: DelayNs,
{
    /// Assemble a monitor from its collaborators
    pub fn new(
        config: MonitorConfig,
        store: S,
        sensor: D,
        display: L,
        transport: N,
        clock: C,
        delay: Y,
    ) -> Self {
        Self {
            config,
            store,
            sensor,
            display,
            transport,
            clock,
            delay,
            decider: AlertDecider::new(),
        }
    }

    /// Run forever
    pub fn run(&mut self) -> ! {
        log_info!(
            "Monitoring sensor {} every {} ms",
            self.config.sensor_id,
            self.config.cycle_interval_ms
        );

        loop {
            match self.run_cycle() {
                Ok(report) => log_debug!("Cycle complete: {:?}", report),
                Err(e) => log_error!("Cycle aborted: {}", e),
            }
            self.delay.delay_ms(self.config.cycle_interval_ms);
        }
    }

    /// Run steps 1 to 9 of one cycle
    pub fn run_cycle(&mut self) -> Result<CycleReport, CycleError> {
        let sensor_id = self.config.sensor_id;

        report_display(self.display.clear(), "clear");

        let record = self.store.sensor_record(sensor_id)?;
        let profile = self.store.reference_profile(record.plant_id)?;

        let (bands, profile_error) = match ToleranceBands::from_profile(&profile) {
            Ok(bands) => (Some(bands), None),
            Err(e) => {
                log_warn!("Plant {} has an unusable profile: {}", profile.plant_id, e);
                (None, Some(e))
            }
        };

        let reading = self.sample()?;
        log_info!(
            "Sensor {} read {:.1}C {:.1}% light {:.0}",
            sensor_id,
            reading.temperature,
            reading.humidity,
            reading.light
        );

        let owner = record.user_id.unwrap_or(self.config.user_id);
        self.store.upsert_sensor_reading(&SensorUpdate {
            id: sensor_id,
            temperature: reading.temperature,
            humidity: reading.humidity,
            light: reading.light,
            plant_id: record.plant_id,
            user_id: owner,
        })?;

        let now = self.clock.now();
        let mut alerts = Vec::new();

        let obstructed = reading.is_obstructed(self.config.obstruction_threshold);
        if obstructed {
            log_info!("Something is blocking sensor {}", sensor_id);
        }
        report_display(self.display.set_pixels(&Icon::for_obstruction(obstructed).frame()), "icon");
        if self.decider.should_alert(sensor_id, AlertKind::Obstruction, obstructed, now) {
            let dispatch = self.dispatch(AlertKind::Obstruction, &profile, owner);
            let _ = alerts.push(dispatch);
        }
        self.delay.delay_ms(self.config.obstruction_pause_ms);

        let temperature_tier =
            bands.and_then(|b| checked_tier(Metric::Temperature, reading.temperature, &b.temperature));
        let humidity_tier =
            bands.and_then(|b| checked_tier(Metric::Humidity, reading.humidity, &b.humidity));

        if let (Some(bands), Some(_)) = (bands, temperature_tier) {
            let too_cold = reading.temperature < bands.temperature.min;
            if self.decider.should_alert(sensor_id, AlertKind::LowTemperature, too_cold, now) {
                let dispatch = self.dispatch(AlertKind::LowTemperature, &profile, owner);
                let _ = alerts.push(dispatch);
            }
        }

        report_display(self.display.set_rotation(self.config.rotation), "rotation");

        let payload = match (temperature_tier, humidity_tier) {
            (Some(t), Some(h)) => {
                let payload =
                    render_status(reading.temperature, t, reading.humidity, h, obstructed);
                self.show_line(&payload.temperature);
                self.show_line(&payload.humidity);
                Some(payload)
            }
            (Some(t), None) => {
                self.show_line(&StatusLine::new(Metric::Temperature, reading.temperature, t));
                None
            }
            (None, Some(h)) => {
                self.show_line(&StatusLine::new(Metric::Humidity, reading.humidity, h));
                None
            }
            (None, None) => None,
        };

        Ok(CycleReport {
            reading,
            bands,
            profile_error,
            obstructed,
            temperature_tier,
            humidity_tier,
            alerts,
            payload,
        })
    }

    fn sample(&mut self) -> Result<Reading, DeviceError> {
        Ok(Reading {
            temperature: self.sensor.read_temperature()?,
            humidity: self.sensor.read_humidity()?,
            light: self.sensor.read_ambient_light()?,
        })
    }

    fn show_line(&mut self, line: &StatusLine) {
        let result = self.display.show_message(&line.text, self.config.scroll_speed, line.color);
        report_display(result, "status text");
    }

    fn dispatch(&mut self, kind: AlertKind, profile: &ReferenceProfile, owner: UserId) -> AlertDispatch {
        let body = kind.body(&profile.name);

        let message_id = match self.resolve_recipient(owner) {
            Ok(to) => match self.transport.send(&to, &body) {
                Ok(id) => {
                    log_info!("Sent {} alert to {} ({})", kind.name(), to, id);
                    Some(id)
                }
                Err(e) => {
                    log_warn!("Failed to send {} alert: {}", kind.name(), e);
                    None
                }
            },
            Err(e) => {
                log_warn!("Not sending {} alert: {}", kind.name(), e);
                None
            }
        };

        AlertDispatch { kind, message_id }
    }

    fn resolve_recipient(&mut self, owner: UserId) -> Result<PhoneNumber, TransportError> {
        match &self.config.recipient {
            Recipient::None => Err(TransportError::NoRecipient),
            Recipient::Fixed(number) => Ok(number.clone()),
            Recipient::SensorOwner => self.store.user_phone(owner).map_err(|e| {
                log_warn!("Phone lookup for user {} failed: {}", owner, e);
                TransportError::NoRecipient
            }),
        }
    }
}

impl<S, D, L, N, C, Y> Monitor<S, D, L, N, C, Y> {
    /// Active configuration
    pub fn config(&self) -> &MonitorConfig {
        &self.config
    }

    /// Alert history
    pub fn decider(&self) -> &AlertDecider {
        &self.decider
    }

    /// Record store
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Record store, mutably
    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    /// Sensor, mutably
    pub fn sensor_mut(&mut self) -> &mut D {
        &mut self.sensor
    }

    /// Display
    pub fn display(&self) -> &L {
        &self.display
    }

    /// Display, mutably
    pub fn display_mut(&mut self) -> &mut L {
        &mut self.display
    }

    /// Notification transport
    pub fn transport(&self) -> &N {
        &self.transport
    }

    /// Notification transport, mutably
    pub fn transport_mut(&mut self) -> &mut N {
        &mut self.transport
    }

    /// Delay provider
    pub fn delay(&self) -> &Y {
        &self.delay
    }

    /// Clock, mutably
    pub fn clock_mut(&mut self) -> &mut C {
        &mut self.clock
    }
}

fn checked_tier(metric: Metric, value: f32, band: &Band) -> Option<Tier> {
    match classify(value, band) {
        Ok(tier) => Some(tier),
        Err(e) => {
            log_warn!("Skipping {:?} this cycle: {}", metric, e);
            None
        }
    }
}

fn report_display(result: Result<(), DeviceError>, step: &str) {
    if let Err(e) = result {
        log_warn!("Display {} failed: {}", step, e);
    }
}
