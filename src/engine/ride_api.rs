use super::helpers::{reserve_ride_sequence, ride_id, RIDES};
use super::Engine;

use crate::{
    api::RideRepository,
    db::KvHandle,
    entities::{Ride, RideDraft, RideFilter, RidePatch, RideStats},
    error::{storage_error, Error},
};

impl<K: KvHandle> RideRepository for Engine<K> {
    #[tracing::instrument(skip(self))]
    fn create_ride(&mut self, draft: RideDraft) -> Result<Ride, Error> {
        let ride_type = draft.validate()?;

        let mut rides: Vec<Ride> = self.store.load(RIDES);

        // the counter is advanced before the ride is written, so a failed
        // write leaves a gap rather than a reusable id
        let sequence = reserve_ride_sequence(&mut self.store, &rides).ok_or_else(storage_error)?;

        let price = self.fares.fare(ride_type);
        let ride = Ride::new(ride_id(sequence), draft, ride_type, price);
        rides.push(ride.clone());

        if !self.store.save(RIDES, &rides) {
            return Err(storage_error());
        }

        tracing::info!(id = %ride.id, "ride booked");
        Ok(ride)
    }

    #[tracing::instrument(skip(self))]
    fn update_ride(&mut self, id: &str, patch: RidePatch) -> Result<Option<Ride>, Error> {
        patch.validate()?;

        let mut rides: Vec<Ride> = self.store.load(RIDES);

        let ride = match rides.iter_mut().find(|r| r.id == id) {
            Some(ride) => ride,
            None => {
                tracing::info!("ride not found");
                return Ok(None);
            }
        };

        let mut patch = patch;
        if patch.price.is_none() {
            patch.price = patch
                .ride_type
                .filter(|ride_type| *ride_type != ride.ride_type)
                .map(|ride_type| self.fares.fare(ride_type));
        }

        ride.apply(patch);
        let updated = ride.clone();

        if !self.store.save(RIDES, &rides) {
            return Err(storage_error());
        }

        tracing::info!(status = updated.status.name(), "ride updated");
        Ok(Some(updated))
    }

    #[tracing::instrument(skip(self))]
    fn delete_ride(&mut self, id: &str) -> bool {
        let mut rides: Vec<Ride> = self.store.load(RIDES);
        let before = rides.len();
        rides.retain(|r| r.id != id);

        if rides.len() == before {
            tracing::debug!("nothing to delete");
            return true;
        }

        self.store.save(RIDES, &rides)
    }

    #[tracing::instrument(skip(self))]
    fn find_ride(&self, id: &str) -> Option<Ride> {
        self.store
            .load::<Ride>(RIDES)
            .into_iter()
            .find(|r| r.id == id)
    }

    #[tracing::instrument(skip(self))]
    fn list_rides(&self, filter: RideFilter) -> Vec<Ride> {
        let mut rides: Vec<Ride> = self.store.load(RIDES);
        rides.retain(|r| filter.matches(r));
        rides
    }

    #[tracing::instrument(skip(self))]
    fn ride_stats(&self) -> RideStats {
        RideStats::from_rides(&self.store.load::<Ride>(RIDES))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Config, FareSchedule};
    use crate::db::MemoryStore;
    use crate::entities::{RideStatus, RideType};

    fn engine() -> Engine<MemoryStore> {
        Engine::from_config(MemoryStore::new(), &Config::default())
    }

    #[test]
    fn price_comes_from_the_fare_table() {
        let fares = FareSchedule {
            premium: 42.5,
            ..FareSchedule::default()
        };
        let mut engine = Engine::from_config(
            MemoryStore::new(),
            &Config {
                fares,
                ..Config::default()
            },
        );

        let ride = engine
            .create_ride(RideDraft::new("A", "B", RideType::Premium))
            .unwrap();

        assert_eq!(ride.price, 42.5);
        assert_eq!(engine.fares().premium, 42.5);
    }

    #[test]
    fn changing_ride_type_reprices_unless_price_given() {
        let mut engine = engine();
        let ride = engine
            .create_ride(RideDraft::new("A", "B", RideType::Economy))
            .unwrap();

        let repriced = engine
            .update_ride(
                &ride.id,
                RidePatch {
                    ride_type: Some(RideType::Xl),
                    ..RidePatch::default()
                },
            )
            .unwrap()
            .unwrap();
        assert_eq!(repriced.price, engine.fares().xl);

        let explicit = engine
            .update_ride(
                &ride.id,
                RidePatch {
                    ride_type: Some(RideType::Comfort),
                    price: Some(9.0),
                    ..RidePatch::default()
                },
            )
            .unwrap()
            .unwrap();
        assert_eq!(explicit.price, 9.0);

        let same_type = engine
            .update_ride(
                &ride.id,
                RidePatch {
                    ride_type: Some(RideType::Comfort),
                    ..RidePatch::default()
                },
            )
            .unwrap()
            .unwrap();
        assert_eq!(same_type.price, 9.0);
    }

    #[test]
    fn invalid_patch_is_rejected_before_lookup() {
        let mut engine = engine();
        let ride = engine
            .create_ride(RideDraft::new("A", "B", RideType::Economy))
            .unwrap();

        let err = engine
            .update_ride(
                &ride.id,
                RidePatch {
                    pickup: Some("".into()),
                    status: Some(RideStatus::Confirmed),
                    ..RidePatch::default()
                },
            )
            .unwrap_err();

        assert!(err.is_validation_error());
        assert_eq!(engine.find_ride(&ride.id), Some(ride));
    }

    #[test]
    fn failed_save_surfaces_as_storage_error() {
        let mut engine = Engine::from_config(MemoryStore::with_quota(40), &Config::default());

        let err = engine
            .create_ride(RideDraft::new("A", "B", RideType::Economy))
            .unwrap_err();

        assert!(err.is_storage_error());
        assert!(engine.list_rides(RideFilter::All).is_empty());
    }
}
