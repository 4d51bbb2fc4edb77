//! Location related module
//!
//! Everything here works on a spherical Earth, which is precise enough for "is this plane
//! within 100 km of that airport" questions.
//!

use serde::{Deserialize, Serialize};

/// Mean Earth radius in km
pub const EARTH_RADIUS_KM: f64 = 6371.;

/// Great-circle distance between two points, using the haversine formula.
///
/// All angles are in degrees, result is in km.  NaN in gives NaN out, callers are
/// expected to check their inputs.
///
#[inline]
pub fn distance(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let d_lat = (lat2 - lat1).to_radians();
    let d_lon = (lon2 - lon1).to_radians();
    let lat1 = lat1.to_radians();
    let lat2 = lat2.to_radians();

    let a = (d_lat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (d_lon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().asin();
    EARTH_RADIUS_KM * c
}

/// Bounding box, named after the OpenSky query parameters.
///
#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Serialize)]
pub struct BB {
    /// Latitude - Y0
    pub lamin: f64,
    /// Latitude - Y1
    pub lamax: f64,
    /// Longitude - X0
    pub lomin: f64,
    /// Longitude - X1
    pub lomax: f64,
}

/// Turkish airspace, roughly.
///
impl Default for BB {
    fn default() -> Self {
        BB {
            lamin: 35.0,
            lamax: 43.0,
            lomin: 25.0,
            lomax: 45.0,
        }
    }
}

impl BB {
    /// Check whether the point is inside (borders included)
    ///
    pub fn contains(&self, lat: f64, lon: f64) -> bool {
        (self.lamin..=self.lamax).contains(&lat) && (self.lomin..=self.lomax).contains(&lon)
    }

    /// Both corners must be valid coordinates and in the right order
    ///
    pub fn is_valid(&self) -> bool {
        self.lamin.abs() <= 90.
            && self.lamax.abs() <= 90.
            && self.lomin.abs() <= 180.
            && self.lomax.abs() <= 180.
            && self.lamin < self.lamax
            && self.lomin < self.lomax
    }

    /// Query parameters in the order the API documents them
    ///
    pub fn to_query(&self) -> [(&'static str, f64); 4] {
        [
            ("lamin", self.lamin),
            ("lomin", self.lomin),
            ("lamax", self.lamax),
            ("lomax", self.lomax),
        ]
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;
    use rstest::rstest;
    use tracing::info;

    use super::*;

    #[inline]
    fn shorten(v: f64) -> String {
        format!("{:.1}", v)
    }

    #[rstest]
    #[case((40.98, 28.82), (40.9769, 28.8146), "0.6")]
    #[case((40.9769, 28.8146), (41.2753, 28.7519), "33.6")]
    #[case((38.2924, 27.1560), (36.8987, 30.8005), "356.5")]
    #[case((0., 0.), (0., 180.), "20015.1")]
    fn test_distance_known(#[case] p1: (f64, f64), #[case] p2: (f64, f64), #[case] d: &str) {
        assert_eq!(d, shorten(distance(p1.0, p1.1, p2.0, p2.1)));
    }

    #[test_pretty_log::test]
    fn test_distance_nan() {
        info!("nan");
        assert!(distance(f64::NAN, 28.8, 40.9, 28.8).is_nan());
    }

    #[test_pretty_log::test]
    fn test_bb_default_contains() {
        let bb = BB::default();
        assert!(bb.is_valid());
        assert!(bb.contains(40.98, 28.82));
        assert!(bb.contains(35.0, 45.0));
        assert!(!bb.contains(48.5, 2.3));
    }

    #[test]
    fn test_bb_invalid() {
        let bb = BB {
            lamin: 43.0,
            lamax: 35.0,
            lomin: 25.0,
            lomax: 45.0,
        };
        assert!(!bb.is_valid());
    }

    #[test]
    fn test_bb_to_query() {
        let q = BB::default().to_query();
        assert_eq!(("lamin", 35.0), q[0]);
        assert_eq!(("lomax", 45.0), q[3]);
    }

    proptest! {
        #[test]
        fn test_distance_symmetry(
            a in -90.0..=90.0f64,
            b in -180.0..=180.0f64,
            c in -90.0..=90.0f64,
            d in -180.0..=180.0f64,
        ) {
            let d1 = distance(a, b, c, d);
            let d2 = distance(c, d, a, b);
            prop_assert!((d1 - d2).abs() < 1e-9 || (d1.is_nan() && d2.is_nan()));
        }

        #[test]
        fn test_distance_zero(a in -90.0..=90.0f64, b in -180.0..=180.0f64) {
            prop_assert_eq!(0., distance(a, b, a, b));
        }
    }
}
