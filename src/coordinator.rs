//! The update coordinator: owns the poll schedule and the published snapshot.
//!
//! One refresh cycle fetches every station visible to the key, reshapes the
//! payload into a [`Snapshot`] and publishes it. A failed cycle publishes
//! nothing new; readers keep seeing the last successful state.

use crate::clients::live_client::LiveSource;
use crate::config::HolfuyConfig;
use crate::error::{HolfuyError, UpdateFailed};
use crate::types::measurement::{KnownStationIds, Snapshot};
use chrono::{DateTime, Utc};
use log::{debug, error, info};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{broadcast, watch, Mutex};
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};

const EVENT_CAPACITY: usize = 16;

/// What a completed refresh cycle produced.
#[derive(Debug, Clone, PartialEq)]
pub enum CycleEvent {
    Updated(Arc<Snapshot>),
    Failed(UpdateFailed),
}

/// Everything readers can observe about the coordinator.
///
/// Published as a whole after each cycle, never mutated in place.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CoordinatorState {
    /// `None` until the first successful cycle.
    pub snapshot: Option<Arc<Snapshot>>,
    pub known_station_ids: Arc<KnownStationIds>,
    pub last_update_success: bool,
    pub last_error: Option<UpdateFailed>,
    /// Completion time of the last successful cycle.
    pub last_update_time: Option<DateTime<Utc>>,
}

pub struct HolfuyCoordinator<S> {
    source: S,
    name: String,
    update_interval: Duration,
    cycle_timeout: Duration,
    cycle_lock: Mutex<()>,
    state: watch::Sender<CoordinatorState>,
    events: broadcast::Sender<CycleEvent>,
}

impl<S: LiveSource> HolfuyCoordinator<S> {
    pub fn new(
        source: S,
        name: impl Into<String>,
        update_interval: Duration,
        cycle_timeout: Duration,
    ) -> Self {
        let (state, _) = watch::channel(CoordinatorState::default());
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            source,
            name: name.into(),
            update_interval,
            cycle_timeout,
            cycle_lock: Mutex::new(()),
            state,
            events,
        }
    }

    /// Coordinator named after the configured key, using the configured timings.
    pub fn from_config(source: S, config: &HolfuyConfig) -> Self {
        Self::new(
            source,
            coordinator_name(&config.api_key),
            config.update_interval,
            config.cycle_timeout,
        )
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn update_interval(&self) -> Duration {
        self.update_interval
    }

    /// Runs one refresh cycle.
    ///
    /// Cycles never overlap: a call made while another cycle is in flight
    /// waits for it to finish first. Subscribers receive exactly one
    /// [`CycleEvent`] per call.
    ///
    /// # Errors
    ///
    /// Returns the structured [`UpdateFailed`] if anything in the cycle failed,
    /// including the cycle timeout. The published state keeps its previous
    /// snapshot and station ids in that case.
    pub async fn refresh(&self) -> Result<(), UpdateFailed> {
        let _cycle = self.cycle_lock.lock().await;

        match self.update_data().await {
            Ok(snapshot) => {
                let snapshot = Arc::new(snapshot);
                debug!("{}: fetched {} stations", self.name, snapshot.len());

                let mut next = self.state();
                next.known_station_ids = Arc::new(snapshot.station_ids());
                next.snapshot = Some(Arc::clone(&snapshot));
                next.last_update_success = true;
                next.last_error = None;
                next.last_update_time = Some(Utc::now());
                self.state.send_replace(next);

                let _ = self.events.send(CycleEvent::Updated(snapshot));
                Ok(())
            }
            Err(e) => {
                error!("{}: {}", self.name, e);
                let failed = UpdateFailed::from_error(&e);

                let mut next = self.state();
                next.last_update_success = false;
                next.last_error = Some(failed.clone());
                self.state.send_replace(next);

                let _ = self.events.send(CycleEvent::Failed(failed.clone()));
                Err(failed)
            }
        }
    }

    /// Runs the initial cycle at setup time.
    ///
    /// # Errors
    ///
    /// Returns [`HolfuyError::NotReady`] if the cycle failed.
    pub async fn first_refresh(&self) -> Result<(), HolfuyError> {
        self.refresh().await.map_err(HolfuyError::NotReady)
    }

    async fn update_data(&self) -> Result<Snapshot, HolfuyError> {
        let payload = tokio::time::timeout(self.cycle_timeout, self.source.try_fetch(None))
            .await
            .map_err(|_| HolfuyError::Timeout(self.cycle_timeout))??;
        Snapshot::from_payload(payload)
    }

    /// Display name for a station, falling back to its id whenever the
    /// current snapshot has nothing better.
    pub fn station_name(&self, station_id: &str) -> String {
        self.state
            .borrow()
            .snapshot
            .as_ref()
            .and_then(|snapshot| snapshot.get(station_id))
            .map(|station| station.name.clone())
            .unwrap_or_else(|| station_id.to_string())
    }

    /// Latest successful snapshot, if any cycle has succeeded yet.
    pub fn snapshot(&self) -> Option<Arc<Snapshot>> {
        self.state.borrow().snapshot.clone()
    }

    pub fn known_station_ids(&self) -> Arc<KnownStationIds> {
        Arc::clone(&self.state.borrow().known_station_ids)
    }

    pub fn last_update_success(&self) -> bool {
        self.state.borrow().last_update_success
    }

    pub fn last_error(&self) -> Option<UpdateFailed> {
        self.state.borrow().last_error.clone()
    }

    pub fn last_update_time(&self) -> Option<DateTime<Utc>> {
        self.state.borrow().last_update_time
    }

    /// Copy of the whole published state.
    pub fn state(&self) -> CoordinatorState {
        self.state.borrow().clone()
    }

    /// Receives one event per completed cycle, starting with the next one.
    pub fn subscribe(&self) -> broadcast::Receiver<CycleEvent> {
        self.events.subscribe()
    }

    /// Latest-value view of the state, for readers that only care about "now".
    pub fn watch(&self) -> watch::Receiver<CoordinatorState> {
        self.state.subscribe()
    }
}

impl<S: LiveSource + 'static> HolfuyCoordinator<S> {
    /// Starts polling every `update_interval`, first tick one interval from now.
    ///
    /// Dropping the returned handle, or calling [`RefreshHandle::stop`], ends the schedule.
    pub fn start(self: &Arc<Self>) -> RefreshHandle {
        let (stop_tx, mut stop_rx) = watch::channel(false);
        let coordinator = Arc::clone(self);
        let interval = self.update_interval;

        info!("{}: polling every {:?}", self.name, interval);
        let task = tokio::spawn(async move {
            let mut ticker = tokio::time::interval_at(Instant::now() + interval, interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        // Failures are logged and published by refresh itself.
                        let _ = coordinator.refresh().await;
                    }
                    changed = stop_rx.changed() => {
                        if changed.is_err() || *stop_rx.borrow() {
                            break;
                        }
                    }
                }
            }
            info!("{}: polling stopped", coordinator.name);
        });

        RefreshHandle { stop_tx, task }
    }
}

/// Handle for the background refresh schedule.
pub struct RefreshHandle {
    stop_tx: watch::Sender<bool>,
    task: JoinHandle<()>,
}

impl RefreshHandle {
    /// Stops the schedule and waits for an in-flight cycle to finish.
    pub async fn stop(self) {
        let _ = self.stop_tx.send(true);
        let _ = self.task.await;
    }

    pub fn is_running(&self) -> bool {
        !self.task.is_finished()
    }
}

/// `Holfuy <hash>`, stable for a given key without exposing it.
pub fn coordinator_name(api_key: &str) -> String {
    use std::collections::hash_map::DefaultHasher;
    use std::hash::{Hash, Hasher};

    let mut hasher = DefaultHasher::new();
    api_key.hash(&mut hasher);
    format!("Holfuy {:x}", hasher.finish())
}

#[cfg(test)]
pub(crate) mod test_source {
    use super::*;
    use crate::types::payload::LivePayload;
    use async_trait::async_trait;
    use std::collections::VecDeque;
    use std::sync::Mutex as StdMutex;

    /// In-memory source replaying scripted results; an empty script yields
    /// the last successful payload again.
    #[derive(Default)]
    pub struct ScriptedSource {
        script: StdMutex<VecDeque<Step>>,
        last_ok: StdMutex<Option<LivePayload>>,
    }

    pub enum Step {
        Ok(serde_json::Value),
        Err(HolfuyError),
        Hang(Duration),
    }

    impl ScriptedSource {
        pub fn new(steps: impl IntoIterator<Item = Step>) -> Self {
            Self {
                script: StdMutex::new(steps.into_iter().collect()),
                last_ok: StdMutex::new(None),
            }
        }
    }

    #[async_trait]
    impl LiveSource for ScriptedSource {
        async fn try_fetch(
            &self,
            _stations: Option<&[String]>,
        ) -> Result<LivePayload, HolfuyError> {
            let step = self.script.lock().unwrap().pop_front();
            match step {
                Some(Step::Ok(value)) => {
                    let payload = LivePayload::from_value(value)?;
                    *self.last_ok.lock().unwrap() = Some(payload.clone());
                    Ok(payload)
                }
                Some(Step::Err(e)) => Err(e),
                Some(Step::Hang(duration)) => {
                    tokio::time::sleep(duration).await;
                    Ok(LivePayload::default())
                }
                None => Ok(self.last_ok.lock().unwrap().clone().unwrap_or_default()),
            }
        }
    }
}
