// demos/live_stations.rs
use holfuy::{Holfuy, HolfuyConfig, HolfuyError};

#[tokio::main]
async fn main() -> Result<(), HolfuyError> {
    // Set RUST_LOG=info (or debug) to see request and cycle logs
    env_logger::init();

    // Needs HOLFUY_API_KEY, optionally HOLFUY_API_URL
    let config = HolfuyConfig::from_env()?;
    let holfuy = Holfuy::setup(config).await?;

    let coordinator = holfuy.coordinator();
    println!(
        "{}: {} stations",
        coordinator.name(),
        coordinator.known_station_ids().len()
    );

    for station_id in coordinator.known_station_ids().iter() {
        println!("\n{} ({})", coordinator.station_name(station_id), station_id);
        for sensor in holfuy.sensors().iter().filter(|s| s.station_id() == station_id.as_str()) {
            match sensor.native_value() {
                Some(value) => println!("  {:<12} {:>8.1} {}", sensor.kind().key(), value, sensor.unit()),
                None => println!("  {:<12} {:>8}", sensor.kind().key(), "-"),
            }
        }
    }

    holfuy.unload().await;
    Ok(())
}
