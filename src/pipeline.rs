//! One complete run: fetch, resolve, materialise.
//!
//! Runs sequentially on the calling thread.  Only filesystem failures while
//! building the library abort a run; feed problems, extraction misses and
//! thumbnail failures are logged and absorbed.

use anyhow::Result;
use tracing::{error, warn};

use crate::config::Config;
use crate::output::thumbnail::ThumbnailFetcher;
use crate::output::{MaterializeReport, Materializer};
use crate::resolve::{self, ResolveStats};
use crate::source::FeedSource;

/// How a run ended, short of a materialisation error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    /// A new library was promoted.
    Promoted {
        stats: ResolveStats,
        report: MaterializeReport,
    },
    /// The feed could not be fetched or parsed, or had no entries; the
    /// library was left alone.
    FeedUnavailable { reason: String },
}

pub fn run(
    config: &Config,
    source: &dyn FeedSource,
    fetcher: Option<&dyn ThumbnailFetcher>,
) -> Result<RunOutcome> {
    let entries = match source.fetch() {
        Ok(entries) => entries,
        Err(err) => {
            let reason = format!("{err:#}");
            error!(feed = source.name(), %reason, "feed unavailable, library left unchanged");
            return Ok(RunOutcome::FeedUnavailable { reason });
        }
    };
    if entries.is_empty() {
        warn!(feed = source.name(), "feed has no entries, library left unchanged");
        return Ok(RunOutcome::FeedUnavailable {
            reason: "feed has no entries".to_string(),
        });
    }

    let (items, stats) = resolve::resolve_all(&entries, &config.filter);

    let mut materializer =
        Materializer::new(&config.output_dir).collision_policy(config.collision);
    if let Some(fetcher) = fetcher {
        materializer = materializer.thumbnails(fetcher);
    }
    let report = materializer.materialize(&items)?;
    Ok(RunOutcome::Promoted { stats, report })
}
