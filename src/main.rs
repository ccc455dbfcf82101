use rideflow::api::{DriverRepository, RideRepository};
use rideflow::config::Config;
use rideflow::db::FileStore;
use rideflow::engine::Engine;
use rideflow::error::Error;

fn main() -> Result<(), Error> {
    tracing_subscriber::fmt::init();

    let config = Config::from_env()?;
    let file_store = FileStore::open(&config.data_path)?;

    let mut engine = Engine::from_config(file_store, &config);

    if config.seed_drivers {
        engine.seed_default_drivers()?;
    }

    let stats = engine.ride_stats();
    tracing::info!(
        path = %engine.store().kv().path().display(),
        total = stats.total,
        active = stats.active,
        completed = stats.completed,
        drivers = engine.list_drivers().len(),
        "rideflow store ready"
    );

    Ok(())
}
