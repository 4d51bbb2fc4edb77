//! Enrichment pass
//!
//! Every state vector of a snapshot is classified and turned into an `EnrichedState`.  Records
//! are independent, so this is a plain `rayon` parallel map.
//!

use rayon::prelude::*;
use tabled::builder::Builder;
use tabled::settings::Style;
use tracing::{debug, trace};

use airwatch_common::{AirportRegistry, BB};
use airwatch_formats::{EnrichedState, Snapshot, StateVector};

use crate::approach::{classify, ApproachParams};

/// Classify and convert all records, output order is input order.
///
#[tracing::instrument(skip(states, registry))]
pub fn enrich(
    states: &[StateVector],
    snapshot: &Snapshot,
    registry: &AirportRegistry,
    params: &ApproachParams,
) -> Vec<EnrichedState> {
    trace!("enrich {} states", states.len());

    let rows: Vec<EnrichedState> = states
        .par_iter()
        .map(|sv| {
            let approaching = classify(sv, registry, params);
            EnrichedState::new(sv, snapshot, &approaching)
        })
        .collect();

    debug!("{} approaching", approaching_count(&rows));
    rows
}

/// How many planes are approaching at least one airport
///
pub fn approaching_count(rows: &[EnrichedState]) -> usize {
    rows.iter()
        .filter(|r| !r.approaching_airports.is_empty())
        .count()
}

/// How many states with a usable position are not inside `area`.
///
/// The API is supposed to filter on the bounding box, this is a sanity check.
///
pub fn outside_area(states: &[StateVector], area: &BB) -> usize {
    states
        .iter()
        .filter(|sv| match (sv.latitude.as_f64(), sv.longitude.as_f64()) {
            (Ok(Some(lat)), Ok(Some(lon))) => !area.contains(lat, lon),
            _ => false,
        })
        .count()
}

/// Summary of what would be written, for `--dry-run`.
///
/// Only planes approaching an airport are listed.
///
pub fn summary(rows: &[EnrichedState]) -> String {
    let header = vec!["ICAO24", "Callsign", "Lat/Lon", "Altitude", "Speed", "Airports"];

    let mut builder = Builder::default();
    builder.push_record(header);

    rows.iter()
        .filter(|r| !r.approaching_airports.is_empty())
        .for_each(|r| {
            let point = match (r.latitude, r.longitude) {
                (Some(lat), Some(lon)) => format!("{lat:.4}, {lon:.4}"),
                _ => String::new(),
            };
            let alt = r
                .baro_altitude
                .or(r.geo_altitude)
                .map(|a| format!("{a:.0} m"))
                .unwrap_or_default();
            let speed = r
                .velocity_kmh
                .map(|v| format!("{v:.0} km/h"))
                .unwrap_or_default();
            builder.push_record(vec![
                r.icao24.clone(),
                r.callsign.clone(),
                point,
                alt,
                speed,
                r.approaching_airports.clone(),
            ]);
        });

    let allf = builder.build().with(Style::modern()).to_string();
    format!(
        "{} states, {} approaching:\n{allf}",
        rows.len(),
        approaching_count(rows)
    )
}
