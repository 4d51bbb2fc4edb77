//! Airport registry
//!
//! This is the (small) list of airports we check every plane against.  Order matters: results
//! are always reported in registry order.
//!
//! The default list is embedded from `airports.hcl` and can be replaced by any file using the
//! same format.
//!

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use eyre::Result;
use serde::{Deserialize, Serialize};
use tabled::builder::Builder;
use tabled::settings::Style;
use thiserror::Error;
use tracing::trace;

/// Current airports file version
const AIRPORTS_FILE_VER: usize = 1;

#[derive(Debug, Error, PartialEq)]
pub enum AirportError {
    #[error("Bad airports file version {0}, aborting")]
    BadFileVersion(usize),
    #[error("Empty airport registry")]
    Empty,
    #[error("Duplicate airport {0}")]
    Duplicate(String),
    #[error("Invalid coordinates for {code}: ({lat}, {lon})")]
    BadCoordinates { code: String, lat: f64, lon: f64 },
}

/// One airport
///
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct Airport {
    /// ICAO code
    pub code: String,
    /// Full name, informative only
    #[serde(default)]
    pub name: Option<String>,
    /// Latitude
    pub lat: f64,
    /// Longitude
    pub lon: f64,
}

impl Airport {
    pub fn new(code: &str, lat: f64, lon: f64) -> Self {
        Airport {
            code: code.to_string(),
            name: None,
            lat,
            lon,
        }
    }
}

/// Validated, ordered and read-only list of airports.
///
#[derive(Clone, Debug, PartialEq)]
pub struct AirportRegistry {
    airports: Vec<Airport>,
}

impl AirportRegistry {
    /// Check every entry and build the registry, keeping the given order.
    ///
    pub fn new(airports: Vec<Airport>) -> Result<Self, AirportError> {
        if airports.is_empty() {
            return Err(AirportError::Empty);
        }

        let mut seen = HashSet::new();
        for ap in &airports {
            if !(ap.lat.abs() <= 90. && ap.lon.abs() <= 180.) {
                return Err(AirportError::BadCoordinates {
                    code: ap.code.clone(),
                    lat: ap.lat,
                    lon: ap.lon,
                });
            }
            if !seen.insert(ap.code.as_str()) {
                return Err(AirportError::Duplicate(ap.code.clone()));
            }
        }
        Ok(AirportRegistry { airports })
    }

    /// Parse a registry from its HCL representation
    ///
    pub fn from_hcl(data: &str) -> Result<Self> {
        let file: AirportsFile = hcl::from_str(data)?;
        if file.version != AIRPORTS_FILE_VER {
            return Err(AirportError::BadFileVersion(file.version).into());
        }
        Ok(AirportRegistry::new(file.airport)?)
    }

    /// Registry compiled in the binary
    ///
    pub fn embedded() -> Result<Self> {
        Self::from_hcl(include_str!("airports.hcl"))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Airport> {
        self.airports.iter()
    }

    pub fn len(&self) -> usize {
        self.airports.len()
    }

    /// Always false, an empty registry is refused by `new()`.
    ///
    pub fn is_empty(&self) -> bool {
        self.airports.is_empty()
    }
}

/// On-disk structure for the airports file
///
#[derive(Debug, Deserialize)]
struct AirportsFile {
    /// Version number for safety
    pub version: usize,
    /// List of airports
    pub airport: Vec<Airport>,
}

/// Load all airports, either from the given file or the embedded list
///
#[tracing::instrument]
pub fn load_airports(fname: Option<&Path>) -> Result<AirportRegistry> {
    trace!("enter");

    match fname {
        Some(fname) => {
            let data = fs::read_to_string(fname)?;
            AirportRegistry::from_hcl(&data)
        }
        None => AirportRegistry::embedded(),
    }
}

/// List loaded airports
///
#[tracing::instrument(skip(data))]
pub fn list_airports(data: &AirportRegistry) -> String {
    trace!("enter");
    let header = vec!["Airport", "Name", "Lat/Lon"];

    let mut builder = Builder::default();
    builder.push_record(header);

    data.iter().for_each(|ap| {
        let name = ap.name.clone().unwrap_or_default();
        let point = format!("{:.4}, {:.4}", ap.lat, ap.lon);
        builder.push_record(vec![ap.code.clone(), name, point]);
    });

    let allf = builder.build().with(Style::modern()).to_string();
    format!("List all airports ({}):\n{allf}", data.len())
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[test_pretty_log::test]
    fn test_embedded_registry_order() -> Result<()> {
        let reg = AirportRegistry::embedded()?;
        let codes: Vec<_> = reg.iter().map(|ap| ap.code.as_str()).collect();
        assert_eq!(vec!["LTBA", "LTFM", "LTBJ", "LTAI"], codes);
        assert_eq!(Some(40.9769), reg.iter().next().map(|ap| ap.lat));
        Ok(())
    }

    #[test]
    fn test_load_default() -> Result<()> {
        let reg = load_airports(None)?;
        assert_eq!(4, reg.len());
        assert!(!reg.is_empty());
        Ok(())
    }

    #[test]
    fn test_from_hcl_keeps_file_order() -> Result<()> {
        let data = r##"
version = 1
airport = [
  { code = "ZZZZ", lat = 1.0, lon = 1.0 },
  { code = "AAAA", lat = 2.0, lon = 2.0 },
]
"##;
        let reg = AirportRegistry::from_hcl(data)?;
        let codes: Vec<_> = reg.iter().map(|ap| ap.code.as_str()).collect();
        assert_eq!(vec!["ZZZZ", "AAAA"], codes);
        Ok(())
    }

    #[test]
    fn test_from_hcl_bad_version() {
        let data = r##"
version = 7
airport = [ { code = "LTBA", lat = 40.9769, lon = 28.8146 } ]
"##;
        let err = AirportRegistry::from_hcl(data).unwrap_err();
        assert_eq!(
            Some(&AirportError::BadFileVersion(7)),
            err.downcast_ref::<AirportError>()
        );
    }

    #[rstest]
    #[case(91., 28.)]
    #[case(-90.5, 28.)]
    #[case(40., 180.1)]
    #[case(f64::NAN, 28.)]
    fn test_registry_bad_coordinates(#[case] lat: f64, #[case] lon: f64) {
        let reg = AirportRegistry::new(vec![Airport::new("LTBA", lat, lon)]);
        assert!(matches!(reg, Err(AirportError::BadCoordinates { .. })));
    }

    #[test]
    fn test_registry_duplicate() {
        let reg = AirportRegistry::new(vec![
            Airport::new("LTBA", 40.9769, 28.8146),
            Airport::new("LTBA", 41.2753, 28.7519),
        ]);
        assert_eq!(Err(AirportError::Duplicate("LTBA".to_string())), reg);
    }

    #[test]
    fn test_registry_empty() {
        assert_eq!(Err(AirportError::Empty), AirportRegistry::new(vec![]));
    }

    #[test]
    fn test_list_airports() -> Result<()> {
        let reg = AirportRegistry::embedded()?;
        let str = list_airports(&reg);
        assert!(str.starts_with("List all airports (4):"));
        assert!(str.contains("LTFM"));
        assert!(str.contains("40.9769, 28.8146"));
        Ok(())
    }
}
