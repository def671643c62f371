//! PostgREST record store (Supabase)
//!
//! ## Tables
//!
//! ```text
//! sensors     id, temperature, humidity, light, plant_id, user_id
//! plant_data  id, name, Temperature, Humidity
//! users       id, phone_number
//! ```
//!
//! Rows are fetched with `?select=...&id=eq.N` and the first row of the
//! returned array is used. Readings are written with a POST that asks
//! PostgREST to merge on the primary key, so the sensor row is replaced
//! in place.
//!
//! Plant targets are free-form in the dashboard and may come back as
//! numbers, numeric strings or null; anything that is not a number becomes
//! a missing target and is rejected later by the band builder.

use log::{debug, warn};
use serde::{de::DeserializeOwned, Deserialize};
use serde_json::Value;

use plantguard_core::{
    errors::StoreError,
    profile::{PlantId, ReferenceProfile, SensorId, UserId},
    traits::{PhoneNumber, PlantStore, SensorRecord, SensorStore, SensorUpdate, UserStore},
};

use crate::{
    http::{HttpClient, HttpConfig},
    ConnectionStats, ConnectorError,
};

const SENSORS: &str = "sensors";
const PLANTS: &str = "plant_data";
const USERS: &str = "users";

#[derive(Debug, Deserialize)]
struct SensorRow {
    id: u32,
    plant_id: u32,
    #[serde(default)]
    user_id: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct PlantRow {
    id: u32,
    #[serde(default)]
    name: String,
    #[serde(rename = "Temperature", default)]
    temperature: Value,
    #[serde(rename = "Humidity", default)]
    humidity: Value,
}

#[derive(Debug, Deserialize)]
struct UserRow {
    #[serde(default)]
    phone_number: Option<String>,
}

/// Store backed by a PostgREST endpoint
pub struct RestStore {
    client: HttpClient,
}

impl RestStore {
    /// Connect to a Supabase project with its API key
    pub fn new(project_url: &str, api_key: &str) -> Result<Self, ConnectorError> {
        let config = HttpConfig::new(format!("{}/rest/v1", project_url.trim_end_matches('/')))
            .header("apikey", api_key)
            .bearer_token(api_key);
        Self::with_config(config)
    }

    /// Use a prepared HTTP configuration; `base_url` must point at the REST root
    pub fn with_config(config: HttpConfig) -> Result<Self, ConnectorError> {
        Ok(Self {
            client: HttpClient::new(config)?,
        })
    }

    /// Request counters
    pub fn stats(&self) -> &ConnectionStats {
        self.client.stats()
    }

    fn fetch_row<T: DeserializeOwned>(
        &mut self,
        table: &'static str,
        columns: &str,
        id: u32,
    ) -> Result<T, ConnectorError> {
        let path = format!("/{}?select={}&id=eq.{}", table, columns, id);
        let rows = self.client.get_json(&path)?;
        first_row(rows, table, id)
    }

    fn fetch_sensor(&mut self, id: SensorId) -> Result<SensorRecord, ConnectorError> {
        let row: SensorRow = self.fetch_row(SENSORS, "*", id)?;
        Ok(SensorRecord {
            id: row.id,
            plant_id: row.plant_id,
            user_id: row.user_id,
        })
    }

    fn fetch_profile(&mut self, plant_id: PlantId) -> Result<ReferenceProfile, ConnectorError> {
        let row: PlantRow = self.fetch_row(PLANTS, "*", plant_id)?;
        Ok(ReferenceProfile::new(
            row.id,
            &row.name,
            numeric_target(&row.temperature),
            numeric_target(&row.humidity),
        ))
    }

    fn fetch_phone(&mut self, user_id: UserId) -> Result<PhoneNumber, ConnectorError> {
        let row: UserRow = self.fetch_row(USERS, "phone_number", user_id)?;
        let number = row
            .phone_number
            .ok_or(ConnectorError::NotFound { table: USERS, id: user_id })?;
        PhoneNumber::try_from(number.as_str())
            .map_err(|_| ConnectorError::Decode(format!("phone number too long: {}", number)))
    }

    fn upsert(&mut self, update: &SensorUpdate) -> Result<(), ConnectorError> {
        self.client.post_json(
            &format!("/{}", SENSORS),
            update,
            &[("Prefer", "resolution=merge-duplicates,return=minimal")],
        )?;
        debug!("Upserted reading for sensor {}", update.id);
        Ok(())
    }
}

impl SensorStore for RestStore {
    fn sensor_record(&mut self, id: SensorId) -> Result<SensorRecord, StoreError> {
        self.fetch_sensor(id).map_err(store_error)
    }

    fn upsert_sensor_reading(&mut self, update: &SensorUpdate) -> Result<(), StoreError> {
        self.upsert(update).map_err(store_error)
    }
}

impl PlantStore for RestStore {
    fn reference_profile(&mut self, plant_id: PlantId) -> Result<ReferenceProfile, StoreError> {
        self.fetch_profile(plant_id).map_err(store_error)
    }
}

impl UserStore for RestStore {
    fn user_phone(&mut self, user_id: UserId) -> Result<PhoneNumber, StoreError> {
        self.fetch_phone(user_id).map_err(store_error)
    }
}

fn store_error(err: ConnectorError) -> StoreError {
    warn!("Store request failed: {}", err);
    err.into()
}

fn first_row<T: DeserializeOwned>(rows: Value, table: &'static str, id: u32) -> Result<T, ConnectorError> {
    let row = match rows {
        Value::Array(rows) => rows.into_iter().next(),
        other => return Err(ConnectorError::Decode(format!("expected array of {} rows, got {}", table, other))),
    };
    let row = row.ok_or(ConnectorError::NotFound { table, id })?;
    serde_json::from_value(row).map_err(|e| ConnectorError::Decode(format!("{} row {}: {}", table, id, e)))
}

/// Number or numeric string; anything else is no target
fn numeric_target(value: &Value) -> Option<f32> {
    match value {
        Value::Number(n) => n.as_f64().map(|v| v as f32),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}
