//! Runtime configuration for the Holfuy integration.
//!
//! The only value a user has to provide is the API key. Everything else has a
//! default that matches the live API's expectations.

use crate::error::HolfuyError;
use bon::Builder;
use std::env;
use std::time::Duration;

/// Domain tag used for device identifiers and reported failures.
pub const DOMAIN: &str = "holfuy";

/// Dedicated live-data endpoint.
pub const DEFAULT_API_URL: &str = "http://api.holfuy.com/live/";

/// How often the coordinator polls the live endpoint.
pub const UPDATE_INTERVAL: Duration = Duration::from_secs(60);

/// Upper bound for a whole refresh cycle.
pub const CYCLE_TIMEOUT: Duration = Duration::from_secs(10);

/// Upper bound for a single HTTP request made by the client.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

const API_KEY_VAR: &str = "HOLFUY_API_KEY";
const API_URL_VAR: &str = "HOLFUY_API_URL";

/// Settings consumed by [`crate::HolfuyClient`] and [`crate::HolfuyCoordinator`].
///
/// # Examples
///
/// ```
/// use holfuy::HolfuyConfig;
/// use std::time::Duration;
///
/// let config = HolfuyConfig::builder()
///     .api_key("my-secret")
///     .update_interval(Duration::from_secs(120))
///     .build();
///
/// assert_eq!(config.api_url, "http://api.holfuy.com/live/");
/// assert_eq!(config.cycle_timeout, Duration::from_secs(10));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Builder)]
pub struct HolfuyConfig {
    /// Opaque credential sent as the `pw` query parameter. Not validated.
    #[builder(into)]
    pub api_key: String,

    #[builder(into, default = DEFAULT_API_URL.to_string())]
    pub api_url: String,

    #[builder(default = UPDATE_INTERVAL)]
    pub update_interval: Duration,

    #[builder(default = CYCLE_TIMEOUT)]
    pub cycle_timeout: Duration,

    #[builder(default = REQUEST_TIMEOUT)]
    pub request_timeout: Duration,
}

impl HolfuyConfig {
    /// Reads the API key from `HOLFUY_API_KEY` and an optional endpoint
    /// override from `HOLFUY_API_URL`.
    ///
    /// # Errors
    ///
    /// Returns [`HolfuyError::MissingApiKey`] if the key is unset or empty.
    pub fn from_env() -> Result<Self, HolfuyError> {
        let api_key = env::var(API_KEY_VAR)
            .ok()
            .filter(|key| !key.is_empty())
            .ok_or(HolfuyError::MissingApiKey)?;
        let api_url = env::var(API_URL_VAR).ok().filter(|url| !url.is_empty());

        Ok(Self::builder()
            .api_key(api_key)
            .maybe_api_url(api_url)
            .build())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_defaults() {
        let config = HolfuyConfig::builder().api_key("secret").build();

        assert_eq!(config.api_key, "secret");
        assert_eq!(config.api_url, DEFAULT_API_URL);
        assert_eq!(config.update_interval, Duration::from_secs(60));
        assert_eq!(config.cycle_timeout, Duration::from_secs(10));
        assert_eq!(config.request_timeout, Duration::from_secs(30));
    }

    #[test]
    fn test_builder_overrides() {
        let config = HolfuyConfig::builder()
            .api_key("secret")
            .api_url("http://127.0.0.1:9999/live/")
            .cycle_timeout(Duration::from_millis(500))
            .build();

        assert_eq!(config.api_url, "http://127.0.0.1:9999/live/");
        assert_eq!(config.cycle_timeout, Duration::from_millis(500));
    }

    // Single test touching the process environment so parallel tests don't race on it.
    #[test]
    fn test_from_env() {
        env::remove_var(API_KEY_VAR);
        env::remove_var(API_URL_VAR);
        assert!(matches!(
            HolfuyConfig::from_env(),
            Err(HolfuyError::MissingApiKey)
        ));

        env::set_var(API_KEY_VAR, "");
        assert!(matches!(
            HolfuyConfig::from_env(),
            Err(HolfuyError::MissingApiKey)
        ));

        env::set_var(API_KEY_VAR, "from-env");
        env::set_var(API_URL_VAR, "http://localhost:8080/live/");
        let config = HolfuyConfig::from_env().unwrap();
        assert_eq!(config.api_key, "from-env");
        assert_eq!(config.api_url, "http://localhost:8080/live/");

        env::remove_var(API_KEY_VAR);
        env::remove_var(API_URL_VAR);
    }
}
