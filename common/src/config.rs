//! This is the `ConfigFile` struct.
//!
//! This is for finding the right default locations for the configuration files of `airwatch`.
//! This is a configuration file/struct neutral loading engine, `load()` reads the proper file
//! or the default one.
//!
//! This encapsulates the configuration file, available with `.inner()`.
//!

use std::fmt::Debug;
use std::fs;
use std::path::{Path, PathBuf};

use directories::BaseDirs;
use eyre::Result;
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::{debug, trace};

/// Main name for the directory base
const TAG: &str = "airwatch";

/// Simple macro to generate PathBuf from a series of entries
///
#[macro_export]
macro_rules! makepath {
    ($($item:expr),+) => {
        [
        $(::std::path::PathBuf::from($item),)+
        ]
        .iter()
        .collect::<::std::path::PathBuf>()
    };
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Unknown config file {0:?} and no default in {1:?}")]
    MissingConfig(PathBuf, PathBuf),
    #[error("Bad file version {found}, expected {expected}")]
    BadFileVersion { found: usize, expected: usize },
    #[error("No home directory, can not locate configuration")]
    NoHome,
}

/// Every configuration file carries a `version` field.
///
pub trait Versioned {
    fn version(&self) -> usize;
}

/// What the loading engine needs to know about a given configuration struct.
///
pub trait IntoConfig: Versioned {
    /// Default filename, inside the base directory
    const FILENAME: &'static str;
    /// Version we know how to read
    const VERSION: usize;
}

/// Configuration for the CLI tool, supposed to include parameters and most importantly
/// credentials for the various sources.
///
#[derive(Debug)]
pub struct ConfigFile<T: Debug + DeserializeOwned + IntoConfig> {
    /// Where we actually read it from
    path: PathBuf,
    inner: T,
}

/// Returns `$HOME/.config/airwatch` (or the platform equivalent).
///
#[tracing::instrument]
pub fn config_dir() -> Result<PathBuf, ConfigError> {
    let base = BaseDirs::new().ok_or(ConfigError::NoHome)?;

    #[cfg(unix)]
    let base = base.home_dir().join(".config");

    #[cfg(windows)]
    let base = base.data_local_dir().to_path_buf();

    let dir = makepath!(base, TAG);
    debug!("base = {dir:?}");
    Ok(dir)
}

impl<T> ConfigFile<T>
where
    T: Debug + DeserializeOwned + IntoConfig,
{
    /// Returns the path of the file that was actually loaded
    ///
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the file and return a struct T in the right format.
    ///
    /// Use the following search path:
    /// - file specified on CLI
    /// - default basedir (base on $HOME or $LOCALAPPDATA)
    ///
    #[tracing::instrument]
    pub fn load(fname: Option<&Path>) -> Result<ConfigFile<T>> {
        let basedir = config_dir().unwrap_or_else(|_| PathBuf::from("."));
        let default = basedir.join(T::FILENAME);

        let fname = match fname {
            Some(fname) => fname.to_path_buf(),
            None => default.clone(),
        };

        if !fname.exists() {
            return Err(ConfigError::MissingConfig(fname, default).into());
        }
        let fname = fname.canonicalize()?;

        trace!("Loading config file {fname:?}");
        let data = fs::read_to_string(&fname)?;

        let inner: T = hcl::from_str(&data)?;
        debug!("struct data = {inner:?}");

        if inner.version() != T::VERSION {
            return Err(ConfigError::BadFileVersion {
                found: inner.version(),
                expected: T::VERSION,
            }
            .into());
        }

        Ok(ConfigFile {
            path: fname,
            inner,
        })
    }

    /// Return the inner configuration file
    ///
    pub fn inner(&self) -> &T {
        &self.inner
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use serde::Deserialize;

    use super::*;

    #[derive(Debug, Deserialize)]
    struct Foo {
        version: usize,
        name: String,
    }

    impl Versioned for Foo {
        fn version(&self) -> usize {
            self.version
        }
    }

    impl IntoConfig for Foo {
        const FILENAME: &'static str = "foo.hcl";
        const VERSION: usize = 2;
    }

    #[test]
    fn test_makepath() {
        let p = makepath!("a", "b", "c.hcl");
        assert_eq!(PathBuf::from("a/b/c.hcl"), p);
    }

    #[test]
    fn test_config_engine_load_file() -> Result<()> {
        let mut file = tempfile::NamedTempFile::new()?;
        writeln!(file, "version = 2\nname = \"foo\"")?;

        let cfg = ConfigFile::<Foo>::load(Some(file.path()))?;
        assert_eq!("foo", cfg.inner().name);
        assert_eq!(2, cfg.inner().version());
        Ok(())
    }

    #[test]
    fn test_config_engine_bad_version() -> Result<()> {
        let mut file = tempfile::NamedTempFile::new()?;
        writeln!(file, "version = 1\nname = \"foo\"")?;

        let cfg = ConfigFile::<Foo>::load(Some(file.path()));
        let err = cfg.unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ConfigError>(),
            Some(ConfigError::BadFileVersion { found: 1, expected: 2 })
        ));
        Ok(())
    }

    #[test]
    fn test_config_engine_missing_file() {
        let cfg = ConfigFile::<Foo>::load(Some(Path::new("/nonexistent/foo.hcl")));
        assert!(cfg.is_err());
    }
}
