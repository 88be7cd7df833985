//! Live weather-station measurements from the [Holfuy](https://holfuy.com) API.
//!
//! [`HolfuyClient`] performs the single batched request against the live
//! endpoint, [`HolfuyCoordinator`] polls it on a fixed interval and publishes
//! per-station [`Snapshot`]s, and [`Holfuy`] wires both together with the
//! per-station [`StationSensor`]s.

mod clients;
mod config;
mod coordinator;
mod error;
mod holfuy;
mod sensor;
mod types;

pub use config::*;
pub use error::{HolfuyError, UpdateFailed};
pub use holfuy::Holfuy;

pub use clients::live_client::{HolfuyClient, LiveSource};
pub use coordinator::{coordinator_name, CoordinatorState, CycleEvent, HolfuyCoordinator, RefreshHandle};
pub use sensor::{sensors_for, DeviceInfo, StationSensor, ATTRIBUTION, MANUFACTURER};

pub use types::measurement::{KnownStationIds, Snapshot, StationMeasurement};
pub use types::payload::{normalize_response, LivePayload, RawMeasurement, RawWind};
pub use types::query::{station_selector, LiveQuery, ALL_STATIONS};
pub use types::sensor_kind::{DeviceClass, SensorKind, StateClass};
