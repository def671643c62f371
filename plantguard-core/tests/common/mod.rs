//! Fakes for driving the monitor loop in integration tests
//!
//! Every collaborator records what it was asked to do so tests can assert
//! on the exact sequence of side effects.

#![allow(dead_code)]

use std::collections::VecDeque;

use plantguard_core::{
    errors::{DeviceError, StoreError, TransportError},
    profile::{PlantId, ReferenceProfile, Reading, SensorId, UserId},
    render::{Frame, Icon, Rgb},
    time::FixedTime,
    traits::{
        DelayNs, DisplayDevice, MessageId, NotificationTransport, PhoneNumber, PlantStore,
        Rotation, SensorDevice, SensorRecord, SensorStore, SensorUpdate, UserStore,
    },
    Monitor, MonitorConfig,
};

pub const SENSOR: SensorId = 1;
pub const PLANT: PlantId = 7;
pub const OWNER: UserId = 12;
pub const OWNER_PHONE: &str = "+447700900123";

/// In-memory store with one sensor, one plant and one user
#[derive(Debug)]
pub struct FakeStore {
    pub record: SensorRecord,
    pub profile: ReferenceProfile,
    pub phone: Option<PhoneNumber>,
    pub upserts: Vec<SensorUpdate>,
    pub fail_lookup: Option<StoreError>,
    pub fail_upsert: Option<StoreError>,
}

impl FakeStore {
    pub fn new(target_temperature: Option<f32>, target_humidity: Option<f32>) -> Self {
        Self {
            record: SensorRecord {
                id: SENSOR,
                plant_id: PLANT,
                user_id: Some(OWNER),
            },
            profile: ReferenceProfile::new(PLANT, "cabbage", target_temperature, target_humidity),
            phone: PhoneNumber::try_from(OWNER_PHONE).ok(),
            upserts: Vec::new(),
            fail_lookup: None,
            fail_upsert: None,
        }
    }
}

impl SensorStore for FakeStore {
    fn sensor_record(&mut self, id: SensorId) -> Result<SensorRecord, StoreError> {
        if let Some(e) = self.fail_lookup {
            return Err(e);
        }
        if id != self.record.id {
            return Err(StoreError::NotFound { table: "sensors", id });
        }
        Ok(self.record)
    }

    fn upsert_sensor_reading(&mut self, update: &SensorUpdate) -> Result<(), StoreError> {
        if let Some(e) = self.fail_upsert {
            return Err(e);
        }
        self.upserts.push(*update);
        Ok(())
    }
}

impl PlantStore for FakeStore {
    fn reference_profile(&mut self, plant_id: PlantId) -> Result<ReferenceProfile, StoreError> {
        if plant_id != self.profile.plant_id {
            return Err(StoreError::NotFound { table: "plant_data", id: plant_id });
        }
        Ok(self.profile.clone())
    }
}

impl UserStore for FakeStore {
    fn user_phone(&mut self, user_id: UserId) -> Result<PhoneNumber, StoreError> {
        match &self.phone {
            Some(phone) if user_id == OWNER => Ok(phone.clone()),
            _ => Err(StoreError::NotFound { table: "users", id: user_id }),
        }
    }
}

/// Sensor that replays a script, repeating the last reading when it runs out
#[derive(Debug)]
pub struct ScriptedSensor {
    script: VecDeque<Reading>,
    current: Reading,
    pub fail: Option<DeviceError>,
}

impl ScriptedSensor {
    pub fn new(readings: &[Reading]) -> Self {
        Self {
            script: readings.iter().copied().collect(),
            current: Reading {
                temperature: 0.0,
                humidity: 0.0,
                light: 0.0,
            },
            fail: None,
        }
    }

    pub fn push(&mut self, reading: Reading) {
        self.script.push_back(reading);
    }
}

impl SensorDevice for ScriptedSensor {
    fn read_temperature(&mut self) -> Result<f32, DeviceError> {
        if let Some(e) = self.fail {
            return Err(e);
        }
        if let Some(next) = self.script.pop_front() {
            self.current = next;
        }
        Ok(self.current.temperature)
    }

    fn read_humidity(&mut self) -> Result<f32, DeviceError> {
        Ok(self.current.humidity)
    }

    fn read_ambient_light(&mut self) -> Result<f32, DeviceError> {
        Ok(self.current.light)
    }
}

/// One display call
#[derive(Debug, Clone, PartialEq)]
pub enum DisplayOp {
    Clear,
    Rotate(Rotation),
    Pixels(Frame),
    Message { text: String, color: Rgb },
}

#[derive(Debug, Default)]
pub struct RecordingDisplay {
    pub ops: Vec<DisplayOp>,
    pub broken: bool,
}

impl RecordingDisplay {
    pub fn messages(&self) -> Vec<(String, Rgb)> {
        self.ops
            .iter()
            .filter_map(|op| match op {
                DisplayOp::Message { text, color } => Some((text.clone(), *color)),
                _ => None,
            })
            .collect()
    }

    pub fn icons(&self) -> Vec<Icon> {
        self.ops
            .iter()
            .filter_map(|op| match op {
                DisplayOp::Pixels(frame) if *frame == Icon::Moon.frame() => Some(Icon::Moon),
                DisplayOp::Pixels(frame) if *frame == Icon::Sun.frame() => Some(Icon::Sun),
                _ => None,
            })
            .collect()
    }

    fn record(&mut self, op: DisplayOp) -> Result<(), DeviceError> {
        if self.broken {
            return Err(DeviceError::Write);
        }
        self.ops.push(op);
        Ok(())
    }
}

impl DisplayDevice for RecordingDisplay {
    fn clear(&mut self) -> Result<(), DeviceError> {
        self.record(DisplayOp::Clear)
    }

    fn set_rotation(&mut self, rotation: Rotation) -> Result<(), DeviceError> {
        self.record(DisplayOp::Rotate(rotation))
    }

    fn set_pixels(&mut self, frame: &Frame) -> Result<(), DeviceError> {
        self.record(DisplayOp::Pixels(*frame))
    }

    fn show_message(&mut self, text: &str, _scroll_speed: f32, color: Rgb) -> Result<(), DeviceError> {
        self.record(DisplayOp::Message {
            text: text.to_string(),
            color,
        })
    }
}

/// Transport that keeps every attempted message
#[derive(Debug, Default)]
pub struct RecordingTransport {
    pub attempts: Vec<(String, String)>,
    pub fail: Option<TransportError>,
}

impl NotificationTransport for RecordingTransport {
    fn send(&mut self, to: &str, body: &str) -> Result<MessageId, TransportError> {
        self.attempts.push((to.to_string(), body.to_string()));
        if let Some(e) = self.fail {
            return Err(e);
        }
        let mut id = MessageId::new();
        let _ = core::fmt::Write::write_fmt(&mut id, format_args!("SM{:04}", self.attempts.len()));
        Ok(id)
    }
}

/// Delay that returns at once and remembers each requested pause
#[derive(Debug, Default)]
pub struct NoopDelay {
    pub pauses_ms: Vec<u32>,
}

impl DelayNs for NoopDelay {
    fn delay_ns(&mut self, _ns: u32) {}

    fn delay_ms(&mut self, ms: u32) {
        self.pauses_ms.push(ms);
    }
}

pub type TestMonitor =
    Monitor<FakeStore, ScriptedSensor, RecordingDisplay, RecordingTransport, FixedTime, NoopDelay>;

pub fn reading(temperature: f32, humidity: f32, light: f32) -> Reading {
    Reading {
        temperature,
        humidity,
        light,
    }
}

pub fn monitor(config: MonitorConfig, store: FakeStore, readings: &[Reading]) -> TestMonitor {
    Monitor::new(
        config,
        store,
        ScriptedSensor::new(readings),
        RecordingDisplay::default(),
        RecordingTransport::default(),
        FixedTime::new(1_000),
        NoopDelay::default(),
    )
}

/// Config that sends every alert to the sensor owner
pub fn owner_config() -> MonitorConfig {
    MonitorConfig::new(SENSOR).recipient(plantguard_core::Recipient::SensorOwner)
}
