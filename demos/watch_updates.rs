// demos/watch_updates.rs
use holfuy::{CycleEvent, HolfuyClient, HolfuyConfig, HolfuyCoordinator, HolfuyError};
use std::sync::Arc;
use std::time::Duration;

#[tokio::main]
async fn main() -> Result<(), HolfuyError> {
    env_logger::init();

    let config = HolfuyConfig::builder()
        .api_key(std::env::var("HOLFUY_API_KEY").map_err(|_| HolfuyError::MissingApiKey)?)
        .update_interval(Duration::from_secs(30))
        .build();

    let client = HolfuyClient::new(reqwest::Client::new(), &config);
    let coordinator = Arc::new(HolfuyCoordinator::from_config(client, &config));
    let mut events = coordinator.subscribe();

    coordinator.first_refresh().await?;
    let schedule = coordinator.start();

    // Print the first few cycles, then stop
    for _ in 0..3 {
        match events.recv().await {
            Ok(CycleEvent::Updated(snapshot)) => {
                let mut stations: Vec<_> = snapshot.iter().collect();
                stations.sort_by(|a, b| a.0.cmp(b.0));
                for (id, station) in stations {
                    println!(
                        "{id:>6} {:<24} wind {:?} m/s, gust {:?} m/s, from {:?}°",
                        station.name, station.wind_speed, station.wind_gust, station.wind_bearing
                    );
                }
            }
            Ok(CycleEvent::Failed(failed)) => eprintln!("Cycle failed: {failed}"),
            Err(e) => {
                eprintln!("Event stream ended: {e}");
                break;
            }
        }
    }

    schedule.stop().await;
    Ok(())
}
