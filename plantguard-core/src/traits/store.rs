//! Record store interfaces
//!
//! Three record kinds, one trait each. A single backend usually implements
//! all three.

use crate::{
    errors::StoreError,
    profile::{PlantId, ReferenceProfile, SensorId, UserId},
    traits::notify::PhoneNumber,
};

/// Store row describing a deployed sensor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SensorRecord {
    /// Sensor id
    pub id: SensorId,
    /// Plant the sensor watches
    pub plant_id: PlantId,
    /// Owner, if the row has one
    pub user_id: Option<UserId>,
}

/// Latest reading written back to the sensor row
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct SensorUpdate {
    /// Sensor id (upsert key)
    pub id: SensorId,
    /// Raw temperature
    pub temperature: f32,
    /// Raw relative humidity
    pub humidity: f32,
    /// Raw light level
    pub light: f32,
    /// Plant the sensor watches
    pub plant_id: PlantId,
    /// Owner
    pub user_id: UserId,
}

/// Sensor rows
pub trait SensorStore {
    /// Fetch the sensor row
    fn sensor_record(&mut self, id: SensorId) -> Result<SensorRecord, StoreError>;

    /// Insert or replace the sensor row with a fresh reading
    fn upsert_sensor_reading(&mut self, update: &SensorUpdate) -> Result<(), StoreError>;
}

/// Plant reference data
pub trait PlantStore {
    /// Fetch the reference profile for a plant
    fn reference_profile(&mut self, plant_id: PlantId) -> Result<ReferenceProfile, StoreError>;
}

/// User contact data
pub trait UserStore {
    /// Phone number alerts for this user go to
    fn user_phone(&mut self, user_id: UserId) -> Result<PhoneNumber, StoreError>;
}
