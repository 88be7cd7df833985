//! Normalized per-station state owned by the coordinator.

use crate::error::HolfuyError;
use crate::types::payload::{LivePayload, RawMeasurement};
use serde::Serialize;
use std::collections::{BTreeSet, HashMap};

/// Ids of the stations present in the latest successful snapshot.
pub type KnownStationIds = BTreeSet<String>;

/// Latest reading of one station.
///
/// Units follow the fixed query: °C, hPa, m/s, % and degrees. A missing
/// upstream value is `None`, never zero.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StationMeasurement {
    pub station_id: String,
    /// Display name; falls back to the id when the API sends none.
    pub name: String,
    pub humidity: Option<f64>,
    pub pressure: Option<f64>,
    pub temperature: Option<f64>,
    pub wind_speed: Option<f64>,
    pub wind_gust: Option<f64>,
    pub wind_bearing: Option<f64>,
}

impl StationMeasurement {
    /// Maps an upstream entry field by field. Returns `None` when the entry
    /// carries no station id.
    pub fn from_raw(raw: RawMeasurement) -> Option<Self> {
        let station_id = raw.station_id?;
        let wind = raw.wind.unwrap_or_default();

        Some(Self {
            name: raw.station_name.unwrap_or_else(|| station_id.clone()),
            station_id,
            humidity: raw.humidity,
            pressure: raw.pressure,
            temperature: raw.temperature,
            wind_speed: wind.speed,
            wind_gust: wind.gust,
            wind_bearing: wind.direction,
        })
    }
}

/// Complete per-station state produced by one successful refresh cycle.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Snapshot {
    stations: HashMap<String, StationMeasurement>,
}

impl Snapshot {
    /// Reshapes a payload into a snapshot keyed by station id.
    ///
    /// # Errors
    ///
    /// Returns [`HolfuyError::MissingStationId`] for the first entry without a
    /// `stationId`; nothing is kept from a payload that fails.
    pub fn from_payload(payload: LivePayload) -> Result<Self, HolfuyError> {
        let mut stations = HashMap::with_capacity(payload.measurements.len());
        for (index, raw) in payload.measurements.into_iter().enumerate() {
            let measurement = StationMeasurement::from_raw(raw)
                .ok_or(HolfuyError::MissingStationId { index })?;
            stations.insert(measurement.station_id.clone(), measurement);
        }
        Ok(Self { stations })
    }

    pub fn get(&self, station_id: &str) -> Option<&StationMeasurement> {
        self.stations.get(station_id)
    }

    pub fn contains(&self, station_id: &str) -> bool {
        self.stations.contains_key(station_id)
    }

    pub fn station_ids(&self) -> KnownStationIds {
        self.stations.keys().cloned().collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &StationMeasurement)> {
        self.stations.iter()
    }

    pub fn len(&self) -> usize {
        self.stations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stations.is_empty()
    }
}

impl FromIterator<StationMeasurement> for Snapshot {
    fn from_iter<T: IntoIterator<Item = StationMeasurement>>(iter: T) -> Self {
        Self {
            stations: iter
                .into_iter()
                .map(|m| (m.station_id.clone(), m))
                .collect(),
        }
    }
}
