use crate::entities::{
    Driver, DriverDraft, DriverPatch, Ride, RideDraft, RideFilter, RidePatch, RideStats,
};
use crate::error::Error;

/// Ride bookkeeping. Not-found is `None`, never an error; `Err` is either a
/// validation failure (nothing written) or a storage failure.
pub trait RideRepository {
    fn create_ride(&mut self, draft: RideDraft) -> Result<Ride, Error>;
    fn update_ride(&mut self, id: &str, patch: RidePatch) -> Result<Option<Ride>, Error>;
    fn delete_ride(&mut self, id: &str) -> bool;
    fn find_ride(&self, id: &str) -> Option<Ride>;
    fn list_rides(&self, filter: RideFilter) -> Vec<Ride>;
    fn ride_stats(&self) -> RideStats;
}

pub trait DriverRepository {
    fn create_driver(&mut self, draft: DriverDraft) -> Result<Driver, Error>;
    fn update_driver(&mut self, id: &str, patch: DriverPatch) -> Result<Option<Driver>, Error>;
    fn delete_driver(&mut self, id: &str) -> bool;
    fn find_driver(&self, id: &str) -> Option<Driver>;
    fn list_drivers(&self) -> Vec<Driver>;
}

pub trait API: RideRepository + DriverRepository {}
