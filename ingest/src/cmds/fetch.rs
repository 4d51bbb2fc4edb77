//! This is the module handling the `fetch` sub-command.
//!
//! One run is one snapshot: authenticate, get all state vectors in the area, enrich them and
//! store the result.  Anything failing on the way aborts the run, nothing is retried.
//!

use std::fmt::{Display, Formatter};

use eyre::Result;
use tracing::{info, trace, warn};

use airwatch_formats::Snapshot;
use airwatch_sources::{Fetchable, Opensky};

use crate::cli::FetchOpts;
use crate::config::Context;
use crate::enrich::{approaching_count, enrich, outside_area, summary};
use crate::error::Status;
use crate::store::{check_table_name, Mode, Store};

/// What happened during one run
///
#[derive(Clone, Debug, Default)]
pub struct FetchStats {
    /// State vectors received
    pub states: usize,
    /// Rows dropped while decoding
    pub dropped: usize,
    /// Planes approaching at least one airport
    pub approaching: usize,
    /// Rows written, `None` for a dry run
    pub written: Option<u64>,
}

impl Display for FetchStats {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "states={} dropped={} approaching={}",
            self.states, self.dropped, self.approaching
        )?;
        match self.written {
            Some(n) => write!(f, " written={n}"),
            None => write!(f, " (dry run)"),
        }
    }
}

/// Mode from the command-line flags, falling back on the configuration.
///
pub fn resolve_mode(fopts: &FetchOpts, default: Mode) -> Mode {
    if fopts.append {
        Mode::Append
    } else if fopts.replace {
        Mode::Replace
    } else {
        default
    }
}

/// Get one snapshot and store it.
///
#[tracing::instrument(skip(ctx))]
pub async fn fetch_snapshot(ctx: &Context, fopts: &FetchOpts) -> Result<FetchStats> {
    trace!("fetch_snapshot");

    let cfg = &ctx.config;
    let mode = resolve_mode(fopts, cfg.database.mode);
    let table = fopts.table.as_deref().unwrap_or(&cfg.database.table);
    check_table_name(table)?;

    // Fail before touching the network
    //
    let url = match (&cfg.database.url, fopts.dry_run) {
        (Some(url), _) => Some(url.as_str()),
        (None, true) => None,
        (None, false) => {
            let from = ctx
                .path
                .as_ref()
                .map(|p| p.display().to_string())
                .unwrap_or_else(|| "none".to_string());
            return Err(Status::NoDatabase(from).into());
        }
    };

    let site = Opensky::new(&cfg.opensky, cfg.auth()?)?;
    info!("Fetching from {}", site.name());

    let token = site.authenticate().await?;
    let (list, stats) = site.fetch(&token, &cfg.area).await?;
    let snapshot = Snapshot::now();
    info!("Snapshot at {}", snapshot.retrieved_at);

    let outside = outside_area(&list.states, &cfg.area);
    if outside > 0 {
        warn!("{outside} states outside of the requested area");
    }

    let rows = enrich(&list.states, &snapshot, &ctx.registry, &cfg.approach);
    let mut res = FetchStats {
        states: stats.states,
        dropped: stats.dropped,
        approaching: approaching_count(&rows),
        written: None,
    };

    match url {
        Some(url) if !fopts.dry_run => {
            let store = Store::connect(url, table).await?;
            res.written = Some(store.save(&rows, mode).await?);
            store.close().await;
        }
        _ => {
            println!("{}", summary(&rows));
        }
    }
    Ok(res)
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    fn fopts(append: bool, replace: bool) -> FetchOpts {
        FetchOpts {
            append,
            replace,
            dry_run: false,
            table: None,
        }
    }

    #[rstest]
    #[case(fopts(false, false), Mode::Replace, Mode::Replace)]
    #[case(fopts(false, false), Mode::Append, Mode::Append)]
    #[case(fopts(true, false), Mode::Replace, Mode::Append)]
    #[case(fopts(false, true), Mode::Append, Mode::Replace)]
    fn test_resolve_mode(#[case] f: FetchOpts, #[case] def: Mode, #[case] mode: Mode) {
        assert_eq!(mode, resolve_mode(&f, def));
    }

    #[test]
    fn test_fetch_stats_display() {
        let mut s = FetchStats {
            states: 10,
            dropped: 1,
            approaching: 3,
            written: None,
        };
        assert_eq!("states=10 dropped=1 approaching=3 (dry run)", s.to_string());
        s.written = Some(10);
        assert_eq!("states=10 dropped=1 approaching=3 written=10", s.to_string());
    }
}
