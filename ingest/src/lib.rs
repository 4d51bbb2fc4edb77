//! Library part of `airwatch`.
//!
//! The binary fetches one snapshot of state vectors over an area, flags the planes that are
//! approaching one of the registered airports and stores the enriched result in PostgreSQL.
//!
//! The classifier itself is in `approach`, it is pure and can be used on its own.
//!

use clap::{crate_authors, crate_version};

pub use approach::*;
pub use cli::*;
pub use cmds::*;
pub use config::*;
pub use enrich::*;
pub use error::*;
pub use store::*;

mod approach;
mod cli;
mod cmds;
mod config;
mod enrich;
mod error;
mod store;

/// Binary name
pub const NAME: &str = "airwatch";
/// Binary version
pub const VERSION: &str = crate_version!();
/// Authors
pub const AUTHORS: &str = crate_authors!();
