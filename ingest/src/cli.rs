//! Module describing all possible commands and sub-commands to the `airwatch` main driver
//!
//! The main one is `fetch`: get one snapshot of the area, flag the planes approaching one of
//! the airports and store everything in the database.  The others are here to look at what
//! the classifier would do without touching anything.
//!

use std::path::PathBuf;

use clap::{crate_authors, crate_description, crate_version, Parser};

/// CLI options
#[derive(Debug, Parser)]
#[command(disable_version_flag = true)]
#[clap(name = "airwatch", about = crate_description!())]
#[clap(version = crate_version!(), author = crate_authors!())]
pub struct Opts {
    /// configuration file.
    #[clap(short = 'c', long)]
    pub config: Option<PathBuf>,
    /// Airport registry file (default is the embedded one).
    #[clap(short = 'A', long)]
    pub airports: Option<PathBuf>,
    /// Use hierarchical display for traces.
    #[clap(long)]
    pub use_tree: bool,
    /// Also log into hourly files in this directory.
    #[clap(long)]
    pub use_file: Option<String>,
    /// Sub-commands (see below).
    #[clap(subcommand)]
    pub subcmd: SubCommand,
}

// ------

/// All sub-commands:
///
/// `fetch [--append|--replace] [-n] [-t TABLE]`
/// `airports`
/// `distance LAT1 LON1 LAT2 LON2`
/// `classify LAT LON ALT [--on-ground]`
/// `version`
///
#[derive(Debug, Parser)]
pub enum SubCommand {
    /// Fetch one snapshot, enrich and store it
    Fetch(FetchOpts),
    /// List airports in the registry
    Airports,
    /// Great-circle distance between two points, in km
    #[command(allow_negative_numbers = true)]
    Distance(DistanceOpts),
    /// Which airports a plane at this position would be approaching
    #[command(allow_negative_numbers = true)]
    Classify(ClassifyOpts),
    /// List all package versions.
    Version,
}

// ------

/// Options for fetching data
///
#[derive(Debug, Parser)]
pub struct FetchOpts {
    /// Add to the existing table.
    #[clap(long, conflicts_with = "replace")]
    pub append: bool,
    /// Drop the existing table first.
    #[clap(long)]
    pub replace: bool,
    /// Do everything except writing into the database.
    #[clap(short = 'n', long)]
    pub dry_run: bool,
    /// Table name (overrides the configuration).
    #[clap(short = 't', long)]
    pub table: Option<String>,
}

// ------

#[derive(Debug, Parser)]
pub struct DistanceOpts {
    /// Latitude of the first point
    pub lat1: f64,
    /// Longitude of the first point
    pub lon1: f64,
    /// Latitude of the second point
    pub lat2: f64,
    /// Longitude of the second point
    pub lon2: f64,
}

// ------

/// Options for classifying a synthetic record
///
#[derive(Debug, Parser)]
pub struct ClassifyOpts {
    pub lat: f64,
    pub lon: f64,
    /// Barometric altitude in meters
    pub altitude: f64,
    /// Plane is on the ground.
    #[clap(long)]
    pub on_ground: bool,
    /// Distance threshold in km (overrides the configuration).
    #[clap(long)]
    pub threshold: Option<f64>,
    /// Altitude ceiling in meters (overrides the configuration).
    #[clap(long)]
    pub ceiling: Option<f64>,
}
