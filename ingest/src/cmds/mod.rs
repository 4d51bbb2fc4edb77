//! This is the main driver module for all the different commands.
//!

use eyre::Result;
use tracing::trace;

use airwatch_common::{distance, list_airports};

pub use classify::*;
pub use fetch::*;

use crate::cli::{Opts, SubCommand};
use crate::config::Context;
use crate::{NAME, VERSION};

mod classify;
mod fetch;

#[tracing::instrument(skip(ctx, opts))]
pub async fn handle_cmds(ctx: &Context, opts: &Opts) -> Result<()> {
    trace!("Execute commands.");

    match &opts.subcmd {
        SubCommand::Fetch(fopts) => {
            let stats = fetch_snapshot(ctx, fopts).await?;
            println!("{stats}");
        }
        SubCommand::Airports => {
            println!("{}", list_airports(&ctx.registry));
        }
        SubCommand::Distance(dopts) => {
            let d = distance(dopts.lat1, dopts.lon1, dopts.lat2, dopts.lon2);
            println!("{d:.2} km");
        }
        SubCommand::Classify(copts) => {
            println!("{}", classify_point(ctx, copts));
        }
        SubCommand::Version => {
            println!("{NAME} v{VERSION}\n");
            println!("Modules: ");
            println!("\t{}", airwatch_common::version());
            println!("\t{}", airwatch_formats::version());
            println!("\t{}", airwatch_sources::version());
        }
    }
    Ok(())
}
