//! Module to load and process the data coming from the Opensky site.
//!
//! XXX they send out an array of arrays, each representing a specific state vector, with
//!     17 or 18 columns depending on whether the category was requested.
//!
//! Rows are decoded by position into a `StateVector`.  A row without a usable `icao24` is
//! dropped, every other column is optional.  Position, altitudes and ground status are kept
//! as `Field` because we do not trust their types.
//!
//! Documentation is taken from [The Opensky site](https://openskynetwork.github.io/opensky-api/rest.html)
//!

use serde::{Deserialize, Serialize};
use serde_json::Value;
use serde_repr::{Deserialize_repr, Serialize_repr};
use tracing::{trace, warn};

use crate::{Field, FormatError};

/// Stand-in for missing trailing columns
static NULL: Value = Value::Null;

/// Origin of state's position
///
#[derive(Clone, Copy, Debug, Deserialize_repr, PartialEq, Serialize_repr, strum::Display)]
#[repr(u8)]
pub enum Source {
    AdsB = 0,
    Asterix,
    MLAT,
    FLARM,
}

/// Aircraft category
///
/// By default, Opensky actually returns 17 fields, excluding this one.
///
#[derive(Clone, Copy, Debug, Deserialize_repr, PartialEq, Serialize_repr, strum::Display)]
#[repr(u8)]
pub enum Category {
    NoInfo = 0,
    NoAdsBEmitterCategoryInfo,
    Light,
    Small,
    Large,
    HighVortexLarge,
    Heavy,
    HighPerformance,
    RotorCraft,
    Glider,
    Lighter,
    Skydiver,
    UltraLight,
    Reserved,
    Uav,
    Space,
    SurfaceEmergencyVehicule,
    SurfaceServiceVehicule,
    PointObstacle,
    ClusterObstacle,
    LineObstacle,
}

/// This is the main container for packets sent by the API.
/// It includes a UNIX timestamp and a set of `StateVector`.
///
#[derive(Debug, Default, PartialEq)]
pub struct StateList {
    /// UNIX timestamp
    pub time: i64,
    /// The state vectors
    pub states: Vec<StateVector>,
    /// Rows we could not decode
    pub dropped: usize,
}

impl StateList {
    /// Deserialize from json
    ///
    #[tracing::instrument(skip(input))]
    pub fn from_json(input: &str) -> Result<Self, FormatError> {
        trace!("statelist::from_json");

        let data: Payload =
            serde_json::from_str(input).map_err(|e| FormatError::BadPayload(e.to_string()))?;

        let mut dropped = 0;
        let states: Vec<StateVector> = data
            .states
            .unwrap_or_default()
            .iter()
            .enumerate()
            .filter_map(|(n, row)| match StateVector::from_row(n, row) {
                Ok(sv) => Some(sv),
                Err(e) => {
                    warn!("{e}, dropped");
                    dropped += 1;
                    None
                }
            })
            .collect();

        trace!("{} points, {} dropped", states.len(), dropped);

        Ok(StateList {
            time: data.time,
            states,
            dropped,
        })
    }
}

/// Definition of a state vector as generated
///
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
pub struct StateVector {
    /// ICAO ID
    pub icao24: String,
    /// Call-sign of the vehicule
    pub callsign: Option<String>,
    /// Origin Country
    pub origin_country: String,
    pub time_position: Option<i64>,
    pub last_contact: Option<i64>,
    /// Position
    pub longitude: Field,
    pub latitude: Field,
    /// Barometric altitude in meters
    pub baro_altitude: Field,
    pub on_ground: Field,
    /// Ground speed in m/s
    pub velocity: Option<f64>,
    pub true_track: Option<f64>,
    pub vertical_rate: Option<f64>,
    pub sensors: Option<Vec<i32>>,
    /// Geometric altitude in meters
    pub geo_altitude: Field,
    pub squawk: Option<String>,
    pub spi: Option<bool>,
    /// Position source
    pub position_source: Option<Source>,
    /// Aircraft category, only if asked for
    pub category: Option<Category>,
}

impl StateVector {
    /// Decode one positional row, `n` is only there for error reporting.
    ///
    pub fn from_row(n: usize, row: &[Value]) -> Result<Self, FormatError> {
        let icao24 = match row.first().and_then(Value::as_str) {
            Some(s) if !s.trim().is_empty() => s.trim().to_string(),
            _ => return Err(FormatError::BadRow(n, "no icao24".into())),
        };

        let col = |i: usize| row.get(i).unwrap_or(&NULL);
        let text = |i: usize| col(i).as_str().map(String::from);
        let num = |i: usize| col(i).as_f64();

        Ok(StateVector {
            icao24,
            callsign: text(1),
            origin_country: text(2).unwrap_or_default(),
            time_position: col(3).as_i64(),
            last_contact: col(4).as_i64(),
            longitude: Field::from(col(5)),
            latitude: Field::from(col(6)),
            baro_altitude: Field::from(col(7)),
            on_ground: Field::from(col(8)),
            velocity: num(9),
            true_track: num(10),
            vertical_rate: num(11),
            sensors: col(12).as_array().map(|a| {
                a.iter()
                    .filter_map(Value::as_i64)
                    .filter_map(|v| i32::try_from(v).ok())
                    .collect()
            }),
            geo_altitude: Field::from(col(13)),
            squawk: text(14),
            spi: col(15).as_bool(),
            position_source: serde_json::from_value(col(16).clone()).ok(),
            category: serde_json::from_value(col(17).clone()).ok(),
        })
    }
}

/// Struct returned by the Opensky API
///
/// XXX `states` is `null` when there is nothing in the box.
///
#[derive(Debug, Deserialize)]
struct Payload {
    /// UNIX timestamp
    pub time: i64,
    /// State vectors, one array per aircraft
    pub states: Option<Vec<Vec<Value>>>,
}
