use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{validation_error, Error};

pub const ID_PREFIX: &str = "DRV-";

pub const MIN_RATING: f64 = 1.0;
pub const MAX_RATING: f64 = 5.0;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Driver {
    pub id: String,
    pub name: String,
    pub phone: String,
    pub vehicle: String,
    pub plate: String,
    pub rating: f64,
    pub status: Status,
    pub created_at: DateTime<Utc>,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    #[default]
    Available,
    Busy,
    Offline,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DriverDraft {
    pub name: String,
    pub phone: String,
    pub vehicle: String,
    pub plate: String,
    pub rating: f64,
    #[serde(default)]
    pub status: Status,
}

/// Partial update for a driver. `None` leaves the field untouched.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DriverPatch {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub vehicle: Option<String>,
    pub plate: Option<String>,
    pub rating: Option<f64>,
    pub status: Option<Status>,
}

impl Status {
    pub const ALL: [Status; 3] = [Self::Available, Self::Busy, Self::Offline];

    pub fn name(&self) -> &'static str {
        match self {
            Self::Available => "available",
            Self::Busy => "busy",
            Self::Offline => "offline",
        }
    }
}

impl FromStr for Status {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.name() == s)
            .ok_or_else(|| validation_error(format!("unknown driver status '{}'", s)))
    }
}

impl DriverDraft {
    pub fn validate(&self) -> Result<(), Error> {
        require_text("name", &self.name)?;
        require_text("phone", &self.phone)?;
        require_text("vehicle", &self.vehicle)?;
        require_text("plate", &self.plate)?;
        require_rating(self.rating)
    }
}

impl DriverPatch {
    pub fn status(status: Status) -> Self {
        Self {
            status: Some(status),
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<(), Error> {
        let fields = [
            ("name", &self.name),
            ("phone", &self.phone),
            ("vehicle", &self.vehicle),
            ("plate", &self.plate),
        ];
        for (field, value) in fields {
            if let Some(value) = value {
                require_text(field, value)?;
            }
        }
        if let Some(rating) = self.rating {
            require_rating(rating)?;
        }

        Ok(())
    }
}

impl Driver {
    /// Builds a driver record from an already validated draft.
    pub fn new(id: String, draft: DriverDraft, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            name: draft.name.trim().into(),
            phone: draft.phone.trim().into(),
            vehicle: draft.vehicle.trim().into(),
            plate: draft.plate.trim().into(),
            rating: draft.rating,
            status: draft.status,
            created_at,
        }
    }

    pub fn is_available(&self) -> bool {
        matches!(self.status, Status::Available)
    }

    /// Merges a validated patch. Drivers carry no update timestamp.
    pub fn apply(&mut self, patch: DriverPatch) {
        if let Some(name) = patch.name {
            self.name = name.trim().into();
        }
        if let Some(phone) = patch.phone {
            self.phone = phone.trim().into();
        }
        if let Some(vehicle) = patch.vehicle {
            self.vehicle = vehicle.trim().into();
        }
        if let Some(plate) = patch.plate {
            self.plate = plate.trim().into();
        }
        if let Some(rating) = patch.rating {
            self.rating = rating;
        }
        if let Some(status) = patch.status {
            self.status = status;
        }
    }
}

fn require_text(field: &str, value: &str) -> Result<(), Error> {
    if value.trim().is_empty() {
        return Err(validation_error(format!("{} is required", field)));
    }

    Ok(())
}

fn require_rating(rating: f64) -> Result<(), Error> {
    if !(MIN_RATING..=MAX_RATING).contains(&rating) {
        return Err(validation_error(format!(
            "rating must be between {} and {}",
            MIN_RATING, MAX_RATING
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft() -> DriverDraft {
        DriverDraft {
            name: "Sam".into(),
            phone: "555".into(),
            vehicle: "Car".into(),
            plate: "ABC".into(),
            rating: 4.5,
            status: Status::Available,
        }
    }

    #[test]
    fn rating_bounds_are_inclusive() {
        for rating in [1.0, 3.3, 5.0] {
            let d = DriverDraft { rating, ..draft() };
            assert!(d.validate().is_ok(), "rating {} should pass", rating);
        }

        for rating in [0.99, 5.01, 6.0, f64::NAN, f64::INFINITY] {
            let d = DriverDraft { rating, ..draft() };
            assert!(d.validate().unwrap_err().is_validation_error());
        }
    }

    #[test]
    fn blank_fields_name_the_culprit() {
        let d = DriverDraft {
            plate: " ".into(),
            ..draft()
        };

        assert_eq!(d.validate().unwrap_err().message, "plate is required");
    }

    #[test]
    fn patch_validation_ignores_absent_fields() {
        assert!(DriverPatch::default().validate().is_ok());
        assert!(DriverPatch::status(Status::Offline).validate().is_ok());

        let bad = DriverPatch {
            rating: Some(0.0),
            ..DriverPatch::default()
        };
        assert!(bad.validate().is_err());
    }

    #[test]
    fn apply_merges_patch() {
        let mut driver = Driver::new("DRV-1".into(), draft(), Utc::now());
        driver.apply(DriverPatch {
            vehicle: Some(" Van ".into()),
            status: Some(Status::Busy),
            ..DriverPatch::default()
        });

        assert_eq!(driver.vehicle, "Van");
        assert_eq!(driver.status, Status::Busy);
        assert_eq!(driver.name, "Sam");
        assert!(!driver.is_available());
    }
}
