use super::helpers::{allocate_driver_id, DRIVERS};
use super::Engine;

use chrono::Utc;

use crate::{
    api::DriverRepository,
    db::KvHandle,
    entities::{Driver, DriverDraft, DriverPatch},
    error::{storage_error, Error},
};

impl<K: KvHandle> DriverRepository for Engine<K> {
    #[tracing::instrument(skip(self))]
    fn create_driver(&mut self, draft: DriverDraft) -> Result<Driver, Error> {
        draft.validate()?;

        let mut drivers: Vec<Driver> = self.store.load(DRIVERS);

        let now = Utc::now();
        let id = allocate_driver_id(&drivers, now.timestamp_millis());
        let driver = Driver::new(id, draft, now);
        drivers.push(driver.clone());

        if !self.store.save(DRIVERS, &drivers) {
            return Err(storage_error());
        }

        tracing::info!(id = %driver.id, "driver added");
        Ok(driver)
    }

    #[tracing::instrument(skip(self))]
    fn update_driver(&mut self, id: &str, patch: DriverPatch) -> Result<Option<Driver>, Error> {
        patch.validate()?;

        let mut drivers: Vec<Driver> = self.store.load(DRIVERS);

        let driver = match drivers.iter_mut().find(|d| d.id == id) {
            Some(driver) => driver,
            None => {
                tracing::info!("driver not found");
                return Ok(None);
            }
        };

        driver.apply(patch);
        let updated = driver.clone();

        if !self.store.save(DRIVERS, &drivers) {
            return Err(storage_error());
        }

        Ok(Some(updated))
    }

    #[tracing::instrument(skip(self))]
    fn delete_driver(&mut self, id: &str) -> bool {
        let mut drivers: Vec<Driver> = self.store.load(DRIVERS);
        let before = drivers.len();
        drivers.retain(|d| d.id != id);

        if drivers.len() == before {
            tracing::debug!("nothing to delete");
            return true;
        }

        self.store.save(DRIVERS, &drivers)
    }

    #[tracing::instrument(skip(self))]
    fn find_driver(&self, id: &str) -> Option<Driver> {
        self.store
            .load::<Driver>(DRIVERS)
            .into_iter()
            .find(|d| d.id == id)
    }

    #[tracing::instrument(skip(self))]
    fn list_drivers(&self) -> Vec<Driver> {
        self.store.load(DRIVERS)
    }
}
