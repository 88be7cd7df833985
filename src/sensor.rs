//! Per-station sensors built on top of the coordinator's published state.
//!
//! Sensors only ever read from the coordinator. They are materialized once
//! from the known station ids and re-rendered on every [`CycleEvent`].

use crate::clients::live_client::LiveSource;
use crate::config::DOMAIN;
use crate::coordinator::{CycleEvent, HolfuyCoordinator};
use crate::types::measurement::Snapshot;
use crate::types::sensor_kind::SensorKind;

pub const MANUFACTURER: &str = "dagenborg.net";
pub const ATTRIBUTION: &str = "Weather observations from Holfuy.com by Dagenborg.net";
const MODEL: &str = "Holfuy API";

/// Device registry entry shared by all sensors of one station.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceInfo {
    pub identifiers: (&'static str, String),
    pub manufacturer: &'static str,
    pub model: &'static str,
    pub name: String,
    pub configuration_url: String,
}

/// One (station, measurement kind) pair.
#[derive(Debug, Clone, PartialEq)]
pub struct StationSensor {
    station_id: String,
    station_name: String,
    kind: SensorKind,
    unique_id: String,
    native_value: Option<f64>,
    available: bool,
}

impl StationSensor {
    pub fn new<S: LiveSource>(
        station_id: &str,
        coordinator: &HolfuyCoordinator<S>,
        kind: SensorKind,
    ) -> Self {
        let station_name = coordinator.station_name(station_id);
        let mut sensor = Self {
            unique_id: format!("{}-{}", station_name, kind.key()).to_lowercase(),
            station_id: station_id.to_string(),
            station_name,
            kind,
            native_value: None,
            available: false,
        };
        if let Some(snapshot) = coordinator.snapshot() {
            sensor.render(&snapshot);
        }
        sensor
    }

    pub fn station_id(&self) -> &str {
        &self.station_id
    }

    pub fn kind(&self) -> SensorKind {
        self.kind
    }

    pub fn unique_id(&self) -> &str {
        &self.unique_id
    }

    pub fn native_value(&self) -> Option<f64> {
        self.native_value
    }

    pub fn unit(&self) -> &'static str {
        self.kind.unit()
    }

    /// `false` after a failed cycle or when the station left the snapshot.
    pub fn available(&self) -> bool {
        self.available
    }

    pub fn attribution(&self) -> &'static str {
        ATTRIBUTION
    }

    pub fn device_info(&self) -> DeviceInfo {
        DeviceInfo {
            identifiers: (DOMAIN, self.station_id.clone()),
            manufacturer: MANUFACTURER,
            model: MODEL,
            name: self.station_name.clone(),
            configuration_url: format!("https://holfuy.com/en/weather/{}", self.station_id),
        }
    }

    /// Applies the outcome of one cycle. A failure keeps the last value.
    pub fn handle_event(&mut self, event: &CycleEvent) {
        match event {
            CycleEvent::Updated(snapshot) => self.render(snapshot),
            CycleEvent::Failed(_) => self.available = false,
        }
    }

    fn render(&mut self, snapshot: &Snapshot) {
        match snapshot.get(&self.station_id) {
            Some(station) => {
                self.native_value = self.kind.value(station);
                self.available = true;
            }
            None => {
                self.native_value = None;
                self.available = false;
            }
        }
    }
}

/// One sensor per known station and measurement kind, ordered by station id.
pub fn sensors_for<S: LiveSource>(coordinator: &HolfuyCoordinator<S>) -> Vec<StationSensor> {
    coordinator
        .known_station_ids()
        .iter()
        .flat_map(|station_id| {
            SensorKind::ALL
                .iter()
                .map(move |kind| StationSensor::new(station_id, coordinator, *kind))
        })
        .collect()
}
