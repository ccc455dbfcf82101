mod driver_api;
mod helpers;
mod ride_api;

use chrono::Utc;

use crate::{
    api::API,
    config::{Config, FareSchedule},
    db::KvHandle,
    entities::{Driver, DriverDraft, DriverStatus},
    error::{storage_error, Error},
    store::RecordStore,
};

use helpers::{allocate_driver_id, DRIVERS, RIDES, RIDE_COUNTER};

pub struct Engine<K: KvHandle> {
    store: RecordStore<K>,
    fares: FareSchedule,
}

impl<K: KvHandle> Engine<K> {
    pub fn new(store: RecordStore<K>, fares: FareSchedule) -> Self {
        Self { store, fares }
    }

    #[tracing::instrument(name = "Engine::from_config", skip_all)]
    pub fn from_config(kv: K, config: &Config) -> Self {
        Self::new(RecordStore::new(kv, config.namespace.clone()), config.fares)
    }

    pub fn fares(&self) -> &FareSchedule {
        &self.fares
    }

    pub fn store(&self) -> &RecordStore<K> {
        &self.store
    }

    pub fn into_store(self) -> RecordStore<K> {
        self.store
    }

    /// Writes the demo roster when no driver collection exists yet.
    /// Returns how many drivers were written.
    #[tracing::instrument(skip(self))]
    pub fn seed_default_drivers(&mut self) -> Result<usize, Error> {
        if self.store.exists(DRIVERS) {
            return Ok(0);
        }

        let now = Utc::now();
        let mut drivers: Vec<Driver> = Vec::new();
        for draft in default_drivers() {
            let id = allocate_driver_id(&drivers, now.timestamp_millis());
            drivers.push(Driver::new(id, draft, now));
        }

        if !self.store.save(DRIVERS, &drivers) {
            return Err(storage_error());
        }

        tracing::info!(count = drivers.len(), "seeded default drivers");
        Ok(drivers.len())
    }

    /// Drops both collections and the ride counter.
    #[tracing::instrument(skip(self))]
    pub fn clear_all(&mut self) -> bool {
        [RIDES, DRIVERS, RIDE_COUNTER]
            .into_iter()
            .map(|name| self.store.clear(name))
            .fold(true, |ok, cleared| ok && cleared)
    }
}

impl<K: KvHandle> API for Engine<K> {}

fn default_drivers() -> Vec<DriverDraft> {
    let roster = [
        (
            "Alex Rivera",
            "+1 (555) 123-4567",
            "Tesla Model 3",
            "NRD-2024",
            4.9,
            DriverStatus::Available,
        ),
        (
            "Jordan Chen",
            "+1 (555) 234-5678",
            "BMW X5",
            "LUX-8901",
            4.8,
            DriverStatus::Busy,
        ),
        (
            "Sam Rodriguez",
            "+1 (555) 345-6789",
            "Mercedes S-Class",
            "PRE-5432",
            5.0,
            DriverStatus::Available,
        ),
    ];

    roster
        .into_iter()
        .map(|(name, phone, vehicle, plate, rating, status)| DriverDraft {
            name: name.into(),
            phone: phone.into(),
            vehicle: vehicle.into(),
            plate: plate.into(),
            rating,
            status,
        })
        .collect()
}
