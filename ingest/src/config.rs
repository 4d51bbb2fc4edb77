//! Configuration module
//!
//! This is where most of the initialisation code lies.  We start the logging process, load the
//! configuration file and the airport registry, then apply environment overrides.
//!
//! Version History:
//!
//! - v1 is the first one, with `opensky`, `area`, `database` and `approach` blocks.
//!

use std::path::{Path, PathBuf};

use eyre::Result;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, trace, warn};

use airwatch_common::{
    init_logging, load_airports, AirportRegistry, ConfigError, ConfigFile, IntoConfig, Versioned,
    BB,
};
use airwatch_sources::{Auth, Site};

use crate::approach::ApproachParams;
use crate::cli::Opts;
use crate::error::Status;
use crate::store::{check_table_name, Mode, DEF_TABLE};
use crate::NAME;

/// Config filename
const CONFIG: &str = "airwatch.hcl";

/// Current version
const CVERSION: usize = 1;

/// Environment variables, they win over the configuration file.
pub const ENV_CLIENT_ID: &str = "OPEN_SKY_CLIENT_ID";
pub const ENV_CLIENT_SECRET: &str = "OPEN_SKY_CLIENT_SECRET";
pub const ENV_DB_URL: &str = "NEON_DB_URL";

fn def_table() -> String {
    DEF_TABLE.to_string()
}

/// `database` block
///
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct Database {
    /// Connection URL, includes credentials
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default = "def_table")]
    pub table: String,
    #[serde(default)]
    pub mode: Mode,
}

impl Default for Database {
    fn default() -> Self {
        Database {
            url: None,
            table: def_table(),
            mode: Mode::default(),
        }
    }
}

/// Configuration for the CLI tool
///
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct IngestConfig {
    /// Version number for safety
    pub version: usize,
    #[serde(default)]
    pub opensky: Site,
    #[serde(default)]
    pub area: BB,
    #[serde(default)]
    pub database: Database,
    #[serde(default)]
    pub approach: ApproachParams,
    /// Alternate airport registry, relative to the config file
    #[serde(default)]
    pub airports: Option<String>,
}

impl Default for IngestConfig {
    fn default() -> Self {
        IngestConfig {
            version: CVERSION,
            opensky: Site::default(),
            area: BB::default(),
            database: Database::default(),
            approach: ApproachParams::default(),
            airports: None,
        }
    }
}

impl Versioned for IngestConfig {
    fn version(&self) -> usize {
        self.version
    }
}

impl IntoConfig for IngestConfig {
    const FILENAME: &'static str = CONFIG;
    const VERSION: usize = CVERSION;
}

impl IngestConfig {
    /// Apply environment overrides, `lookup` is `std::env::var` outside of tests.
    ///
    pub fn with_env<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(v) = lookup(ENV_CLIENT_ID) {
            trace!("client_id from {ENV_CLIENT_ID}");
            self.opensky.client_id = Some(v);
        }
        if let Some(v) = lookup(ENV_CLIENT_SECRET) {
            trace!("client_secret from {ENV_CLIENT_SECRET}");
            self.opensky.client_secret = Some(v);
        }
        if let Some(v) = lookup(ENV_DB_URL) {
            trace!("database url from {ENV_DB_URL}");
            self.database.url = Some(v);
        }
        self
    }

    /// Credentials, anonymous when none are given.
    ///
    pub fn auth(&self) -> Result<Auth, Status> {
        let id = self.opensky.client_id.clone().filter(|s| !s.is_empty());
        let secret = self.opensky.client_secret.clone().filter(|s| !s.is_empty());
        if id.is_some() != secret.is_some() {
            return Err(Status::MissingCredentials);
        }
        Ok(Auth::from_parts(id, secret))
    }

    /// Check everything that would fail later anyway.
    ///
    pub fn check(&self) -> Result<(), Status> {
        if !self.area.is_valid() {
            return Err(Status::BadArea(format!("{:?}", self.area)));
        }
        check_table_name(&self.database.table)?;
        Ok(())
    }
}

/// This holds our context, meaning common stuff
///
#[derive(Debug)]
pub struct Context {
    /// Where the configuration came from, if anywhere
    pub path: Option<PathBuf>,
    /// All configuration parameters, with environment applied
    pub config: IngestConfig,
    /// Airports to check against
    pub registry: AirportRegistry,
}

/// Load the configuration file.
///
/// When no file is given and the default one does not exist, defaults are used.
///
#[tracing::instrument]
pub fn load_config(fname: Option<&Path>) -> Result<(IngestConfig, Option<PathBuf>)> {
    match ConfigFile::<IngestConfig>::load(fname) {
        Ok(cfile) => {
            info!("Using {}", cfile.path().display());
            Ok((cfile.inner().clone(), Some(cfile.path().to_path_buf())))
        }
        Err(e) => match e.downcast_ref::<ConfigError>() {
            Some(ConfigError::MissingConfig(..)) if fname.is_none() => {
                warn!("No configuration file, using defaults");
                Ok((IngestConfig::default(), None))
            }
            _ => Err(e),
        },
    }
}

/// Airport registry to use: command-line, then configuration, then embedded.
///
/// A relative path in the configuration is taken from the configuration file directory.
///
pub fn registry_path(
    opts: Option<&Path>,
    cfg: &IngestConfig,
    cpath: Option<&Path>,
) -> Option<PathBuf> {
    if let Some(p) = opts {
        return Some(p.to_path_buf());
    }
    let p = PathBuf::from(cfg.airports.as_ref()?);
    match cpath.and_then(Path::parent) {
        Some(dir) if p.is_relative() => Some(dir.join(p)),
        _ => Some(p),
    }
}

/// Start logging and load everything.
///
#[tracing::instrument(skip(opts))]
pub fn init_runtime(opts: &Opts) -> Result<Context> {
    // Initialise logging early
    //
    init_logging(NAME, opts.use_tree, opts.use_file.clone())?;
    trace!("Logging initialised.");

    let (cfg, path) = load_config(opts.config.as_deref())?;
    let config = cfg.with_env(|k| std::env::var(k).ok());
    config.check()?;

    let apath = registry_path(opts.airports.as_deref(), &config, path.as_deref());
    let registry = load_airports(apath.as_deref())?;
    debug!("{} airports loaded", registry.len());

    Ok(Context {
        path,
        config,
        registry,
    })
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::io::Write;

    use tempfile::NamedTempFile;

    use super::*;

    const FULL: &str = r##"
version = 1

opensky {
  base_url  = "http://localhost:8080/api"
  client_id = "me-api-client"
}

area {
  lamin = 36.0
  lamax = 42.0
  lomin = 26.0
  lomax = 44.0
}

database {
  table = "flights"
  mode  = "append"
}

approach {
  threshold_km = 50.0
}

airports = "airports.hcl"
"##;

    #[test]
    fn test_config_full() {
        let cfg: IngestConfig = hcl::from_str(FULL).unwrap();
        assert_eq!(1, cfg.version());
        assert_eq!("http://localhost:8080/api", cfg.opensky.base_url);
        assert_eq!(Some("me-api-client".to_string()), cfg.opensky.client_id);
        assert_eq!(None, cfg.opensky.client_secret);
        assert_eq!(36., cfg.area.lamin);
        assert_eq!("flights", cfg.database.table);
        assert_eq!(Mode::Append, cfg.database.mode);
        assert_eq!(50., cfg.approach.threshold_km);
        assert_eq!(4000., cfg.approach.ceiling_m);
        assert_eq!(Some("airports.hcl".to_string()), cfg.airports);
    }

    #[test]
    fn test_config_minimal() {
        let cfg: IngestConfig = hcl::from_str("version = 1").unwrap();
        assert_eq!(IngestConfig::default(), cfg);
        assert_eq!(DEF_TABLE, cfg.database.table);
        assert_eq!(Mode::Replace, cfg.database.mode);
        assert!(cfg.check().is_ok());
    }

    #[test]
    fn test_config_env() {
        let env = HashMap::from([
            (ENV_CLIENT_ID, "env-client"),
            (ENV_CLIENT_SECRET, "env-secret"),
            (ENV_DB_URL, "postgres://u:p@localhost/db"),
        ]);
        let cfg: IngestConfig = hcl::from_str(FULL).unwrap();
        let cfg = cfg.with_env(|k| env.get(k).map(|v| v.to_string()));

        assert_eq!(Some("env-client".to_string()), cfg.opensky.client_id);
        assert_eq!(Some("postgres://u:p@localhost/db".to_string()), cfg.database.url);
        assert!(matches!(cfg.auth(), Ok(Auth::Client { .. })));
    }

    #[test]
    fn test_config_auth() {
        let cfg = IngestConfig::default();
        assert_eq!(Auth::Anon, cfg.auth().unwrap());

        let cfg: IngestConfig = hcl::from_str(FULL).unwrap();
        assert!(matches!(cfg.auth(), Err(Status::MissingCredentials)));
    }

    #[test]
    fn test_config_check() {
        let mut cfg = IngestConfig::default();
        cfg.database.table = "drop table".into();
        assert!(matches!(cfg.check(), Err(Status::BadTableName(_))));

        let mut cfg = IngestConfig::default();
        cfg.area.lamin = 50.;
        assert!(matches!(cfg.check(), Err(Status::BadArea(_))));
    }

    #[test]
    fn test_load_config_file() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{FULL}").unwrap();

        let (cfg, path) = load_config(Some(file.path())).unwrap();
        assert_eq!("flights", cfg.database.table);
        assert!(path.is_some());
    }

    #[test]
    fn test_load_config_missing() {
        let res = load_config(Some(Path::new("/nonexistent/airwatch.hcl")));
        assert!(res.is_err());
    }

    #[test]
    fn test_load_config_bad_version() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "version = 2").unwrap();
        assert!(load_config(Some(file.path())).is_err());
    }

    #[test]
    fn test_registry_path() {
        let cfg = IngestConfig::default();
        assert_eq!(None, registry_path(None, &cfg, None));

        let cli = Path::new("/tmp/mine.hcl");
        assert_eq!(Some(cli.to_path_buf()), registry_path(Some(cli), &cfg, None));

        let cfg: IngestConfig = hcl::from_str(FULL).unwrap();
        let cpath = Path::new("/etc/airwatch/airwatch.hcl");
        assert_eq!(
            Some(PathBuf::from("/etc/airwatch/airports.hcl")),
            registry_path(None, &cfg, Some(cpath))
        );
        assert_eq!(Some(PathBuf::from("airports.hcl")), registry_path(None, &cfg, None));
    }
}
