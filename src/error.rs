use crate::config::DOMAIN;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum HolfuyError {
    #[error("Network request failed for {0}")]
    NetworkRequest(String, #[source] reqwest::Error),

    #[error("HTTP request failed for {url} with status {status}")]
    HttpStatus {
        url: String,
        status: reqwest::StatusCode,
    },

    #[error("Failed to parse JSON response from {0}")]
    JsonParse(String, #[source] serde_json::Error),

    #[error("Response did not match the expected measurement layout")]
    Decode(#[source] serde_json::Error),

    #[error("Measurement entry {index} has no stationId")]
    MissingStationId { index: usize },

    #[error("Refresh cycle timed out after {0:?}")]
    Timeout(Duration),

    #[error("No API key configured (set HOLFUY_API_KEY)")]
    MissingApiKey,

    #[error("Failed to build HTTP client")]
    ClientBuild(#[source] reqwest::Error),

    #[error("First refresh failed, integration is not ready")]
    NotReady(#[source] UpdateFailed),
}

impl HolfuyError {
    /// Short name of the failure kind, used when logging transport errors.
    pub fn kind(&self) -> &'static str {
        match self {
            HolfuyError::NetworkRequest(_, e) => reqwest_kind(e),
            HolfuyError::HttpStatus { .. } => "HttpStatus",
            HolfuyError::JsonParse(..) => "JsonParse",
            HolfuyError::Decode(_) => "Decode",
            HolfuyError::MissingStationId { .. } => "MissingStationId",
            HolfuyError::Timeout(_) => "Timeout",
            HolfuyError::MissingApiKey => "MissingApiKey",
            HolfuyError::ClientBuild(_) => "ClientBuild",
            HolfuyError::NotReady(_) => "NotReady",
        }
    }
}

fn reqwest_kind(e: &reqwest::Error) -> &'static str {
    if e.is_timeout() {
        "Timeout"
    } else if e.is_connect() {
        "Connect"
    } else if e.is_body() {
        "Body"
    } else if e.is_decode() {
        "Decode"
    } else if e.is_request() {
        "Request"
    } else {
        "Other"
    }
}

/// Structured failure reported for a refresh cycle that did not complete.
///
/// The previous snapshot stays published whenever one of these is produced.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Error requesting {domain} data: {error}")]
pub struct UpdateFailed {
    pub domain: &'static str,
    pub translation_key: &'static str,
    pub error: String,
}

impl UpdateFailed {
    pub(crate) fn from_error(error: &HolfuyError) -> Self {
        Self {
            domain: DOMAIN,
            translation_key: "update_data_error",
            error: format!("{error:?}"),
        }
    }
}
