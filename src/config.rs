//! Runtime configuration, read from the environment (a `.env` file is
//! honoured when present).

use std::env;
use std::path::PathBuf;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::entities::RideType;
use crate::error::{invalid_config_error, Error};

pub const DEFAULT_DATA_PATH: &str = "rideflow.json";
pub const DEFAULT_NAMESPACE: &str = "rideflow";

#[derive(Clone, Debug, PartialEq)]
pub struct Config {
    /// File backing the `FileStore`.
    pub data_path: PathBuf,
    /// Prefix for every key written to the backing store.
    pub namespace: String,
    pub fares: FareSchedule,
    /// Seed demo drivers when no driver collection exists yet.
    pub seed_drivers: bool,
}

/// Flat fare per ride type, charged at booking.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct FareSchedule {
    pub economy: f64,
    pub comfort: f64,
    pub premium: f64,
    pub xl: f64,
}

impl Default for FareSchedule {
    fn default() -> Self {
        Self {
            economy: 15.0,
            comfort: 25.0,
            premium: 40.0,
            xl: 35.0,
        }
    }
}

impl FareSchedule {
    pub fn fare(&self, ride_type: RideType) -> f64 {
        match ride_type {
            RideType::Economy => self.economy,
            RideType::Comfort => self.comfort,
            RideType::Premium => self.premium,
            RideType::Xl => self.xl,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_path: DEFAULT_DATA_PATH.into(),
            namespace: DEFAULT_NAMESPACE.into(),
            fares: FareSchedule::default(),
            seed_drivers: false,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, Error> {
        dotenv::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds a config from an arbitrary variable source. Unset variables
    /// keep their defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let data_path = lookup("RIDEFLOW_DATA_PATH")
            .map(PathBuf::from)
            .unwrap_or(defaults.data_path);
        let namespace = lookup("RIDEFLOW_NAMESPACE").unwrap_or(defaults.namespace);
        if namespace.trim().is_empty() {
            return Err(invalid_config_error("RIDEFLOW_NAMESPACE must not be empty"));
        }

        let fares = FareSchedule {
            economy: fare(&lookup, "RIDEFLOW_FARE_ECONOMY", defaults.fares.economy)?,
            comfort: fare(&lookup, "RIDEFLOW_FARE_COMFORT", defaults.fares.comfort)?,
            premium: fare(&lookup, "RIDEFLOW_FARE_PREMIUM", defaults.fares.premium)?,
            xl: fare(&lookup, "RIDEFLOW_FARE_XL", defaults.fares.xl)?,
        };

        let seed_drivers = parse(&lookup, "RIDEFLOW_SEED_DRIVERS", defaults.seed_drivers)?;

        Ok(Self {
            data_path,
            namespace,
            fares,
            seed_drivers,
        })
    }
}

fn parse<F, T>(lookup: &F, key: &str, default: T) -> Result<T, Error>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| invalid_config_error(format!("{} has an invalid value '{}'", key, raw))),
        None => Ok(default),
    }
}

fn fare<F>(lookup: &F, key: &str, default: f64) -> Result<f64, Error>
where
    F: Fn(&str) -> Option<String>,
{
    let value: f64 = parse(lookup, key, default)?;
    if !value.is_finite() || value < 0.0 {
        return Err(invalid_config_error(format!("{} must be a non-negative amount", key)));
    }

    Ok(value)
}
