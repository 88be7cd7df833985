//! This module provides the main entry point of the integration.
//!
//! [`Holfuy::setup`] owns the whole lifecycle: it builds the shared HTTP
//! session, runs the first refresh, materializes the sensors and starts the
//! poll schedule. [`Holfuy::unload`] tears all of it down again.

use crate::clients::live_client::HolfuyClient;
use crate::config::HolfuyConfig;
use crate::coordinator::{CycleEvent, HolfuyCoordinator, RefreshHandle};
use crate::error::HolfuyError;
use crate::sensor::{sensors_for, StationSensor};
use log::{info, warn};
use reqwest::Client;
use std::sync::Arc;
use tokio::sync::broadcast::{self, error::RecvError};

const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// A running integration for one API key.
///
/// # Examples
///
/// ```no_run
/// # use holfuy::{Holfuy, HolfuyConfig, HolfuyError};
/// # #[tokio::main]
/// # async fn main() -> Result<(), HolfuyError> {
/// let config = HolfuyConfig::builder().api_key("my-secret").build();
/// let mut holfuy = Holfuy::setup(config).await?;
///
/// for sensor in holfuy.sensors() {
///     println!("{} = {:?} {}", sensor.unique_id(), sensor.native_value(), sensor.unit());
/// }
///
/// // Wait for the next scheduled cycle and print the refreshed values.
/// if let Some(sensors) = holfuy.next_cycle().await {
///     println!("{} sensors refreshed", sensors.len());
/// }
///
/// holfuy.unload().await;
/// # Ok(())
/// # }
/// ```
pub struct Holfuy {
    coordinator: Arc<HolfuyCoordinator<HolfuyClient>>,
    schedule: RefreshHandle,
    sensors: Vec<StationSensor>,
    events: broadcast::Receiver<CycleEvent>,
}

impl Holfuy {
    /// Sets up the integration.
    ///
    /// # Errors
    ///
    /// Returns [`HolfuyError::ClientBuild`] if the HTTP session cannot be
    /// created and [`HolfuyError::NotReady`] if the first refresh fails.
    pub async fn setup(config: HolfuyConfig) -> Result<Self, HolfuyError> {
        let http = Client::builder()
            .gzip(true)
            .user_agent(USER_AGENT)
            .build()
            .map_err(HolfuyError::ClientBuild)?;

        let client = HolfuyClient::new(http, &config);
        let coordinator = Arc::new(HolfuyCoordinator::from_config(client, &config));
        coordinator.first_refresh().await?;

        let sensors = sensors_for(&coordinator);
        let events = coordinator.subscribe();
        let schedule = coordinator.start();
        info!(
            "{}: set up {} sensors for {} stations",
            coordinator.name(),
            sensors.len(),
            coordinator.known_station_ids().len()
        );

        Ok(Self {
            coordinator,
            schedule,
            sensors,
            events,
        })
    }

    pub fn coordinator(&self) -> &Arc<HolfuyCoordinator<HolfuyClient>> {
        &self.coordinator
    }

    /// Sensors materialized at setup time, with their latest rendered values.
    pub fn sensors(&self) -> &[StationSensor] {
        &self.sensors
    }

    /// Waits for the next completed cycle and re-renders every sensor.
    ///
    /// Returns `None` once the schedule has stopped.
    pub async fn next_cycle(&mut self) -> Option<&[StationSensor]> {
        loop {
            match self.events.recv().await {
                Ok(event) => {
                    for sensor in &mut self.sensors {
                        sensor.handle_event(&event);
                    }
                    return Some(&self.sensors);
                }
                Err(RecvError::Lagged(skipped)) => {
                    warn!("{}: skipped {} cycle events", self.coordinator.name(), skipped);
                }
                Err(RecvError::Closed) => return None,
            }
        }
    }

    /// Stops polling and releases the HTTP session.
    pub async fn unload(self) {
        let name = self.coordinator.name().to_string();
        self.schedule.stop().await;
        info!("{name}: unloaded");
    }
}
