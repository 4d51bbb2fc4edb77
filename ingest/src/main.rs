//! Fetch a snapshot of live state vectors, flag planes approaching airports and store the
//! result in PostgreSQL.
//!

use clap::Parser;
use eyre::Result;
use tracing::{info, trace};

use airwatch_ingest::{handle_cmds, init_runtime, Opts, AUTHORS, NAME, VERSION};

#[tokio::main]
async fn main() -> Result<()> {
    let opts = Opts::parse();

    let ctx = init_runtime(&opts)?;
    trace!("{NAME} v{VERSION} by {AUTHORS}");

    handle_cmds(&ctx, &opts).await?;

    info!("Done.");
    Ok(())
}
