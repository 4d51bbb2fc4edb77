//! Module to deal with the source we fetch data from.
//!
//! The different submodules deal with:
//!
//! - authentication (OAuth2 client credentials, or none)
//! - fetching data (state vectors over a bounding box).
//!

use std::fmt::{Debug, Display, Formatter};

use serde::Serialize;

use airwatch_common::BB;
use airwatch_formats::StateList;

// Re-export these modules for a shorted import path.
//
pub use auth::*;
pub use error::*;
pub use opensky::*;
pub use site::*;
pub use token::*;

mod auth;
mod error;
mod opensky;
mod site;
mod token;

pub fn version() -> String {
    format!("{}/{}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"))
}

/// Statistics gathering struct for one fetch
///
#[derive(Clone, Debug, Default, Serialize)]
pub struct Stats {
    /// Duration in ms
    pub tm: u128,
    pub states: usize,
    pub bytes: u64,
    pub dropped: usize,
}

impl Display for Stats {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "time={}ms states={} bytes={} dropped={}",
            self.tm, self.states, self.bytes, self.dropped
        )
    }
}

/// This trait enables us to manage different ways of connecting and fetching data under
/// a single interface.
///
#[allow(async_fn_in_trait)]
pub trait Fetchable: Debug {
    /// Return site's name
    fn name(&self) -> String;
    /// If credentials are needed, get a token for subsequent operations
    async fn authenticate(&self) -> Result<String, AuthError>;
    /// Fetch actual data
    async fn fetch(&self, token: &str, area: &BB) -> Result<(StateList, Stats), FetchError>;
}
