pub mod driver;
pub mod ride;

pub use driver::{Driver, DriverDraft, DriverPatch, Status as DriverStatus};
pub use ride::{
    Filter as RideFilter, Ride, RideDraft, RidePatch, RideType, Stats as RideStats,
    Status as RideStatus,
};
