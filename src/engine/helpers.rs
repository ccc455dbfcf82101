use crate::{
    db::KvHandle,
    entities::{driver, ride, Driver, Ride},
    store::RecordStore,
};

pub const RIDES: &str = "rides";
pub const DRIVERS: &str = "drivers";
pub const RIDE_COUNTER: &str = "ride_counter";

pub const FIRST_RIDE_SEQUENCE: u64 = 1001;

/// Reserves the next ride sequence number and advances the stored counter
/// past it. The result is never below the highest sequence already in
/// `rides`, so a lost counter cannot hand out a live id again. Returns
/// `None` if the counter could not be advanced, including when either the
/// counter or the highest stored sequence is already at `u64::MAX`.
#[tracing::instrument(skip(store, rides))]
pub fn reserve_ride_sequence<K: KvHandle>(
    store: &mut RecordStore<K>,
    rides: &[Ride],
) -> Option<u64> {
    let counter = store.next_counter(RIDE_COUNTER, FIRST_RIDE_SEQUENCE);
    let floor = match rides.iter().filter_map(Ride::sequence).max() {
        Some(highest) => highest.checked_add(1),
        None => Some(0),
    };
    let floor = match floor {
        Some(floor) => floor,
        None => {
            tracing::warn!("stored ride sequence is exhausted");
            return None;
        }
    };

    let reserved = if counter >= floor {
        store.bump_counter(RIDE_COUNTER)
    } else {
        tracing::warn!(counter, floor, "ride counter behind stored rides");
        match floor.checked_add(1) {
            Some(next) => store.set_counter(RIDE_COUNTER, next),
            None => false,
        }
    };

    reserved.then(|| counter.max(floor))
}

pub fn ride_id(sequence: u64) -> String {
    format!("{}{}", ride::ID_PREFIX, sequence)
}

/// `DRV-<millis>`, stepping forward a millisecond at a time past ids that
/// are already taken.
pub fn allocate_driver_id(drivers: &[Driver], millis: i64) -> String {
    let mut millis = millis;
    loop {
        let id = format!("{}{}", driver::ID_PREFIX, millis);
        if !drivers.iter().any(|d| d.id == id) {
            return id;
        }
        millis += 1;
    }
}
