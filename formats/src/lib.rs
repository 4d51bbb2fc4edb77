//! Definition of the data formats
//!
//! This module makes the link between what the Opensky API sends us (`StateList` made of
//! `StateVector`) and what we store (`EnrichedState`).
//!

pub use common::*;
pub use enriched::*;
pub use error::*;
pub use opensky::*;

mod common;
mod enriched;
mod error;
mod opensky;

pub fn version() -> String {
    format!("{}/{}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"))
}
