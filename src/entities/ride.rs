use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{validation_error, Error};

pub const ID_PREFIX: &str = "RIDE-";

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ride {
    pub id: String,
    pub pickup: String,
    pub dropoff: String,
    pub ride_type: RideType,
    pub passengers: u32,
    pub price: f64,
    #[serde(default, alias = "notes", skip_serializing_if = "Option::is_none")]
    pub special_requests: Option<String>,
    pub status: Status,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RideType {
    Economy,
    Comfort,
    Premium,
    Xl,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Status {
    #[default]
    Pending,
    Confirmed,
    InProgress,
    Completed,
}

/// Caller input for booking a ride. Everything the repository assigns
/// (id, price, status, timestamps) is absent here.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RideDraft {
    pub pickup: String,
    pub dropoff: String,
    pub ride_type: Option<RideType>,
    pub passengers: u32,
    #[serde(default, alias = "notes")]
    pub special_requests: Option<String>,
}

/// Partial update for a ride. `None` leaves the field untouched.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RidePatch {
    pub pickup: Option<String>,
    pub dropoff: Option<String>,
    pub ride_type: Option<RideType>,
    pub passengers: Option<u32>,
    pub price: Option<f64>,
    #[serde(alias = "notes")]
    pub special_requests: Option<String>,
    pub status: Option<Status>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Filter {
    All,
    Status(Status),
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stats {
    pub total: usize,
    pub active: usize,
    pub completed: usize,
}

impl RideType {
    pub const ALL: [RideType; 4] = [Self::Economy, Self::Comfort, Self::Premium, Self::Xl];

    pub fn name(&self) -> &'static str {
        match self {
            Self::Economy => "economy",
            Self::Comfort => "comfort",
            Self::Premium => "premium",
            Self::Xl => "xl",
        }
    }
}

impl FromStr for RideType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|ride_type| ride_type.name() == s)
            .ok_or_else(|| validation_error(format!("unknown ride type '{}'", s)))
    }
}

impl Status {
    pub const ALL: [Status; 4] = [
        Self::Pending,
        Self::Confirmed,
        Self::InProgress,
        Self::Completed,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Confirmed => "confirmed",
            Self::InProgress => "in-progress",
            Self::Completed => "completed",
        }
    }

    /// Pending, confirmed and in-progress rides all count as active.
    pub fn is_active(&self) -> bool {
        !matches!(self, Self::Completed)
    }
}

impl FromStr for Status {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.name() == s)
            .ok_or_else(|| validation_error(format!("unknown ride status '{}'", s)))
    }
}

impl Filter {
    pub fn matches(&self, ride: &Ride) -> bool {
        match self {
            Self::All => true,
            Self::Status(status) => ride.status == *status,
        }
    }
}

impl FromStr for Filter {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "all" => Ok(Self::All),
            other => other.parse().map(Self::Status),
        }
    }
}

impl From<Status> for Filter {
    fn from(status: Status) -> Self {
        Self::Status(status)
    }
}

impl Stats {
    pub fn from_rides(rides: &[Ride]) -> Self {
        let active = rides.iter().filter(|r| r.is_active()).count();

        Self {
            total: rides.len(),
            active,
            completed: rides.len() - active,
        }
    }
}

impl RideDraft {
    pub fn new(pickup: impl Into<String>, dropoff: impl Into<String>, ride_type: RideType) -> Self {
        Self {
            pickup: pickup.into(),
            dropoff: dropoff.into(),
            ride_type: Some(ride_type),
            passengers: 1,
            special_requests: None,
        }
    }

    pub fn passengers(mut self, passengers: u32) -> Self {
        self.passengers = passengers;
        self
    }

    pub fn special_requests(mut self, requests: impl Into<String>) -> Self {
        self.special_requests = Some(requests.into());
        self
    }

    pub fn validate(&self) -> Result<RideType, Error> {
        require_text("pickup", &self.pickup)?;
        require_text("dropoff", &self.dropoff)?;
        let ride_type = self
            .ride_type
            .ok_or_else(|| validation_error("rideType is required"))?;
        require_passengers(self.passengers)?;

        Ok(ride_type)
    }
}

impl RidePatch {
    pub fn status(status: Status) -> Self {
        Self {
            status: Some(status),
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<(), Error> {
        if let Some(pickup) = &self.pickup {
            require_text("pickup", pickup)?;
        }
        if let Some(dropoff) = &self.dropoff {
            require_text("dropoff", dropoff)?;
        }
        if let Some(passengers) = self.passengers {
            require_passengers(passengers)?;
        }
        if let Some(price) = self.price {
            if !price.is_finite() || price < 0.0 {
                return Err(validation_error("price must be a non-negative amount"));
            }
        }

        Ok(())
    }
}

impl Ride {
    /// Builds a freshly booked ride. The draft must already be validated.
    pub fn new(id: String, draft: RideDraft, ride_type: RideType, price: f64) -> Self {
        Self {
            id,
            pickup: draft.pickup.trim().into(),
            dropoff: draft.dropoff.trim().into(),
            ride_type,
            passengers: draft.passengers,
            price,
            special_requests: normalize_optional(draft.special_requests),
            status: Status::Pending,
            created_at: Utc::now(),
            updated_at: None,
        }
    }

    /// Numeric suffix of a `RIDE-<n>` id, if the id has that shape.
    pub fn sequence(&self) -> Option<u64> {
        self.id.strip_prefix(ID_PREFIX)?.parse().ok()
    }

    pub fn is_active(&self) -> bool {
        self.status.is_active()
    }

    /// Merges a validated patch onto the ride. `id` and `created_at` are
    /// never touched; `updated_at` is stamped on every call.
    #[tracing::instrument(skip_all, fields(id = %self.id))]
    pub fn apply(&mut self, patch: RidePatch) {
        if let Some(pickup) = patch.pickup {
            self.pickup = pickup.trim().into();
        }
        if let Some(dropoff) = patch.dropoff {
            self.dropoff = dropoff.trim().into();
        }
        if let Some(ride_type) = patch.ride_type {
            self.ride_type = ride_type;
        }
        if let Some(passengers) = patch.passengers {
            self.passengers = passengers;
        }
        if let Some(price) = patch.price {
            self.price = price;
        }
        if let Some(requests) = patch.special_requests {
            self.special_requests = normalize_optional(Some(requests));
        }
        if let Some(status) = patch.status {
            self.status = status;
        }

        self.updated_at = Some(Utc::now());
    }
}

fn require_text(field: &str, value: &str) -> Result<(), Error> {
    if value.trim().is_empty() {
        return Err(validation_error(format!("{} is required", field)));
    }

    Ok(())
}

fn require_passengers(passengers: u32) -> Result<(), Error> {
    if passengers == 0 {
        return Err(validation_error("passengers must be at least 1"));
    }

    Ok(())
}

fn normalize_optional(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
