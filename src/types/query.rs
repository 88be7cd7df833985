//! Query parameters for the live endpoint.
//!
//! Reference for the parameters used here:
//! * `m` response mode, `tu` temperature unit, `su` wind speed unit
//! * `daily` adds daily min/max since local midnight, `batt` adds battery voltage
//! * `avg=1` selects the newest quarter-hour average
//! * `s` comma separated station ids or `all`, `pw` API key

/// Station selector token for every station visible to the key.
pub const ALL_STATIONS: &str = "all";

/// Fixed parameter set plus the credential; the station selector is added per request.
#[derive(Clone, PartialEq, Eq)]
pub struct LiveQuery {
    api_key: String,
}

impl LiveQuery {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
        }
    }

    /// Builds the full, ordered parameter list for one request.
    pub fn params(&self, stations: Option<&[String]>) -> Vec<(&'static str, String)> {
        vec![
            ("m", "JSON".to_string()),
            ("tu", "C".to_string()),
            ("su", "m/s".to_string()),
            ("daily", String::new()),
            ("batt", String::new()),
            ("avg", "1".to_string()),
            ("s", station_selector(stations)),
            ("pw", self.api_key.clone()),
        ]
    }
}

// Keeps the key out of logs.
impl std::fmt::Debug for LiveQuery {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LiveQuery")
            .field("api_key", &"<redacted>")
            .finish()
    }
}

/// `101,102` for an explicit list, `all` for `None` or an empty list.
pub fn station_selector(stations: Option<&[String]>) -> String {
    match stations {
        Some(ids) if !ids.is_empty() => ids.join(","),
        _ => ALL_STATIONS.to_string(),
    }
}
