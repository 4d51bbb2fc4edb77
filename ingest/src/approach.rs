//! Airport approach classification
//!
//! For a single state vector, find which airports of the registry the plane is approaching:
//!
//! 1. position is mandatory and must be a valid latitude/longitude
//! 2. altitude is the barometric one, or the geometric one if the former is missing
//! 3. planes on the ground are not approaching anything
//! 4. planes above the ceiling are cruising, not approaching
//! 5. every airport closer than the threshold matches, in registry order
//!
//! Each record is evaluated on its own, there is no state kept between calls.  Bad data
//! never fails the caller: it gives an empty result, and is logged when it is not one of the
//! expected cases.
//!

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{trace, warn};

use airwatch_common::{distance, AirportRegistry};
use airwatch_formats::{Field, StateVector};

/// Default distance to an airport, in km
pub const DEF_THRESHOLD_KM: f64 = 100.;
/// Default altitude above which we consider the plane is not approaching, in m
pub const DEF_CEILING_M: f64 = 4000.;

fn def_threshold() -> f64 {
    DEF_THRESHOLD_KM
}

fn def_ceiling() -> f64 {
    DEF_CEILING_M
}

/// Tuning for the classifier, `approach` block in the configuration file.
///
#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Serialize)]
pub struct ApproachParams {
    /// Strict upper bound on the distance, in km
    #[serde(default = "def_threshold")]
    pub threshold_km: f64,
    /// Inclusive upper bound on the altitude, in m
    #[serde(default = "def_ceiling")]
    pub ceiling_m: f64,
}

impl Default for ApproachParams {
    fn default() -> Self {
        ApproachParams {
            threshold_km: DEF_THRESHOLD_KM,
            ceiling_m: DEF_CEILING_M,
        }
    }
}

/// What the classifier needs to see from a record.
///
pub trait ApproachView {
    /// Used for logging only
    fn ident(&self) -> &str;
    fn latitude(&self) -> &Field;
    fn longitude(&self) -> &Field;
    fn baro_altitude(&self) -> &Field;
    fn geo_altitude(&self) -> &Field;
    fn on_ground(&self) -> &Field;
}

impl ApproachView for StateVector {
    fn ident(&self) -> &str {
        &self.icao24
    }

    fn latitude(&self) -> &Field {
        &self.latitude
    }

    fn longitude(&self) -> &Field {
        &self.longitude
    }

    fn baro_altitude(&self) -> &Field {
        &self.baro_altitude
    }

    fn geo_altitude(&self) -> &Field {
        &self.geo_altitude
    }

    fn on_ground(&self) -> &Field {
        &self.on_ground
    }
}

/// Every reason for a record not to be classified.
///
#[derive(Debug, Error, PartialEq)]
pub enum Skip {
    #[error("no {0}")]
    MissingData(&'static str),
    #[error("on ground")]
    Grounded,
    #[error("altitude {0}m above ceiling")]
    AltitudeOutOfRange(f64),
    #[error("malformed {0}: {1}")]
    Malformed(&'static str, String),
}

/// Numeric value of a field, `name` is for error reporting.
///
#[inline]
fn number(field: &Field, name: &'static str) -> Result<Option<f64>, Skip> {
    field
        .as_f64()
        .map_err(|e| Skip::Malformed(name, e.to_string()))
}

/// Run all the checks and return the matching airports, or why there are none.
///
pub fn evaluate<V: ApproachView + ?Sized>(
    record: &V,
    registry: &AirportRegistry,
    params: &ApproachParams,
) -> Result<Vec<String>, Skip> {
    let lat = number(record.latitude(), "latitude")?.ok_or(Skip::MissingData("latitude"))?;
    let lon = number(record.longitude(), "longitude")?.ok_or(Skip::MissingData("longitude"))?;
    if lat.abs() > 90. {
        return Err(Skip::Malformed("latitude", lat.to_string()));
    }
    if lon.abs() > 180. {
        return Err(Skip::Malformed("longitude", lon.to_string()));
    }

    // Barometric first, then geometric
    //
    let altitude = match number(record.baro_altitude(), "baro_altitude")? {
        Some(alt) => alt,
        None => number(record.geo_altitude(), "geo_altitude")?
            .ok_or(Skip::MissingData("altitude"))?,
    };

    // Missing ground status means airborne
    //
    let grounded = record
        .on_ground()
        .truthy()
        .map_err(|e| Skip::Malformed("on_ground", e.to_string()))?
        .unwrap_or(false);
    if grounded {
        return Err(Skip::Grounded);
    }

    if altitude > params.ceiling_m {
        return Err(Skip::AltitudeOutOfRange(altitude));
    }

    Ok(registry
        .iter()
        .filter(|ap| distance(lat, lon, ap.lat, ap.lon) < params.threshold_km)
        .map(|ap| ap.code.clone())
        .collect())
}

/// List the airports `record` is approaching, possibly none.
///
/// This never fails, anything unexpected in the record is logged and gives an empty list.
///
pub fn classify<V: ApproachView + ?Sized>(
    record: &V,
    registry: &AirportRegistry,
    params: &ApproachParams,
) -> Vec<String> {
    match evaluate(record, registry, params) {
        Ok(list) => list,
        Err(e @ Skip::Malformed(..)) => {
            warn!("{}: {e}", record.ident());
            vec![]
        }
        Err(e) => {
            trace!("{}: {e}", record.ident());
            vec![]
        }
    }
}
