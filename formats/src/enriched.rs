//! Output rows
//!
//! One `EnrichedState` per aircraft in a snapshot: the state vector columns with loose values
//! normalised (or nulled when they make no sense), plus derived fields.
//!

use chrono::{DateTime, Duration, NaiveDateTime, Utc};
use serde::Serialize;

use crate::{to_kmh, StateVector};

/// Turkey is UTC+3 all year round
pub const TR_UTC_OFFSET_HOURS: i64 = 3;

/// When a given snapshot was retrieved, shared by all its rows.
///
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Snapshot {
    /// UTC
    pub retrieved_at: DateTime<Utc>,
    /// Turkish wall-clock time
    pub retrieved_at_tr: NaiveDateTime,
}

impl Snapshot {
    pub fn new(retrieved_at: DateTime<Utc>) -> Self {
        let retrieved_at_tr = (retrieved_at + Duration::hours(TR_UTC_OFFSET_HOURS)).naive_utc();
        Snapshot {
            retrieved_at,
            retrieved_at_tr,
        }
    }

    pub fn now() -> Self {
        Self::new(Utc::now())
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct EnrichedState {
    pub icao24: String,
    /// Trimmed, empty if unknown
    pub callsign: String,
    pub origin_country: String,
    pub time_position: Option<i64>,
    pub last_contact: Option<i64>,
    pub longitude: Option<f64>,
    pub latitude: Option<f64>,
    pub baro_altitude: Option<f64>,
    pub on_ground: Option<bool>,
    pub velocity: Option<f64>,
    pub true_track: Option<f64>,
    pub vertical_rate: Option<f64>,
    pub sensors: Option<Vec<i32>>,
    pub geo_altitude: Option<f64>,
    pub squawk: Option<String>,
    pub spi: Option<bool>,
    pub position_source: Option<i16>,
    pub category: Option<i16>,
    pub retrieved_at: DateTime<Utc>,
    pub retrieved_at_tr: NaiveDateTime,
    pub velocity_kmh: Option<f64>,
    /// Comma-separated list of airport codes
    pub approaching_airports: String,
}

impl EnrichedState {
    /// Build the output row, `approaching` is already computed by the caller.
    ///
    pub fn new(sv: &StateVector, snapshot: &Snapshot, approaching: &[String]) -> Self {
        EnrichedState {
            icao24: sv.icao24.clone(),
            callsign: sv.callsign.as_deref().unwrap_or_default().trim().to_string(),
            origin_country: sv.origin_country.clone(),
            time_position: sv.time_position,
            last_contact: sv.last_contact,
            longitude: sv.longitude.as_f64().ok().flatten(),
            latitude: sv.latitude.as_f64().ok().flatten(),
            baro_altitude: sv.baro_altitude.as_f64().ok().flatten(),
            on_ground: sv.on_ground.truthy().ok().flatten(),
            velocity: sv.velocity,
            true_track: sv.true_track,
            vertical_rate: sv.vertical_rate,
            sensors: sv.sensors.clone(),
            geo_altitude: sv.geo_altitude.as_f64().ok().flatten(),
            squawk: sv.squawk.clone(),
            spi: sv.spi,
            position_source: sv.position_source.map(|s| s as i16),
            category: sv.category.map(|c| c as i16),
            retrieved_at: snapshot.retrieved_at,
            retrieved_at_tr: snapshot.retrieved_at_tr,
            velocity_kmh: sv.velocity.map(to_kmh),
            approaching_airports: approaching.join(","),
        }
    }
}
