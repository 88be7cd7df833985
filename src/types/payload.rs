//! Wire types for the Holfuy live endpoint.
//!
//! Every field except the station id may be missing or `null` upstream; all of
//! them deserialize into `Option`s so absence survives into the snapshot.

use crate::error::HolfuyError;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{json, Value};

/// Uniform response shape: a list of per-station objects.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LivePayload {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub measurements: Vec<RawMeasurement>,
}

/// One station entry as sent by the API.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawMeasurement {
    /// Sent as a number by the live API, as a string by some mirrors.
    #[serde(default, deserialize_with = "station_id_text")]
    pub station_id: Option<String>,
    pub station_name: Option<String>,
    pub humidity: Option<f64>,
    pub pressure: Option<f64>,
    pub temperature: Option<f64>,
    pub wind: Option<RawWind>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawWind {
    pub speed: Option<f64>,
    pub gust: Option<f64>,
    pub direction: Option<f64>,
}

impl LivePayload {
    /// Decodes an already normalized JSON document. A `null` document is
    /// treated as a payload without measurements.
    pub fn from_value(value: Value) -> Result<Self, HolfuyError> {
        if value.is_null() {
            return Ok(Self::default());
        }
        serde_json::from_value(value).map_err(HolfuyError::Decode)
    }
}

/// Wraps the bare object the API returns for a single-station query into
/// `{"measurements": [object]}`. Any other response passes through untouched.
pub fn normalize_response(value: Value, stations: Option<&[String]>) -> Value {
    let single_station = matches!(stations, Some(ids) if ids.len() == 1);
    let already_wrapped = value.get("measurements").is_some();

    if single_station && value.is_object() && !already_wrapped {
        json!({ "measurements": [value] })
    } else {
        value
    }
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<RawMeasurement>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<RawMeasurement>>::deserialize(deserializer)?.unwrap_or_default())
}

fn station_id_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum StationIdRepr {
        Text(String),
        Number(serde_json::Number),
    }

    Ok(
        Option::<StationIdRepr>::deserialize(deserializer)?.map(|id| match id {
            StationIdRepr::Text(text) => text,
            StationIdRepr::Number(number) => number.to_string(),
        }),
    )
}
