//! `classify` sub-command: run the classifier on a synthetic record.
//!

use tracing::debug;

use airwatch_formats::{Field, StateVector};

use crate::approach::{classify, ApproachParams};
use crate::cli::ClassifyOpts;
use crate::config::Context;

/// Returns the comma-separated list of airports, empty if none.
///
#[tracing::instrument(skip(ctx))]
pub fn classify_point(ctx: &Context, copts: &ClassifyOpts) -> String {
    let defaults = ctx.config.approach;
    let params = ApproachParams {
        threshold_km: copts.threshold.unwrap_or(defaults.threshold_km),
        ceiling_m: copts.ceiling.unwrap_or(defaults.ceiling_m),
    };
    debug!("{params:?}");

    let sv = StateVector {
        icao24: "cli".into(),
        latitude: Field::from(copts.lat),
        longitude: Field::from(copts.lon),
        baro_altitude: Field::from(copts.altitude),
        on_ground: Field::from(copts.on_ground),
        ..Default::default()
    };
    classify(&sv, &ctx.registry, &params).join(",")
}
