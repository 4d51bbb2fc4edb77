//! This library is there to share some common code amongst all airwatch modules.
//!

mod airports;
mod config;
mod location;
mod logging;

use clap::{crate_name, crate_version};
pub use airports::*;
pub use config::*;
pub use location::*;
pub use logging::*;

const NAME: &str = crate_name!();
const VERSION: &str = crate_version!();

pub fn version() -> String {
    format!("{}/{}", NAME, VERSION)
}
