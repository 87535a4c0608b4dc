//! rss2strm turns an RSS video feed into a media-library directory tree.
//!
//! ## Architecture overview
//!
//! ```text
//! ┌───────────┐ RawEntry ┌────────────┐ ResolvedItem ┌────────────┐
//! │  source/  │ ───────► │ resolve.rs │ ───────────► │  output/   │ ──► <library>/
//! │ (fetch +  │          │ (filter +  │              │ (stage +   │
//! │  adapt)   │          │  extract)  │              │  promote)  │
//! └───────────┘          └────────────┘              └────────────┘
//!                          │        ▲
//!                          ▼        │
//!                     ┌──────────────────┐
//!                     │ extract/ metadata│
//!                     └──────────────────┘
//! ```
//!
//! * **`source/`**: the `FeedSource` trait, the `RawEntry` view and the RSS
//!   adapter that fills it.
//! * **`extract/`**: ordered strategy lists that pick the video and
//!   thumbnail URLs out of an entry.
//! * **`metadata`**: dates, plot, author, tags and runtime.
//! * **`resolve`**: title derivation, keyword filtering, per-entry outcome.
//! * **`output/`**: staging, `.strm` / `.nfo` / thumbnail files, atomic
//!   promotion and rollback.
//! * **`pipeline`**: runs the stages above once.
//! * **`main`**: parse args, set up logging, run, map the result to an exit
//!   code.

mod config;
mod extract;
mod metadata;
mod output;
mod pipeline;
mod resolve;
mod source;

use std::process::ExitCode;

use clap::Parser;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use config::{Cli, Config};
use output::thumbnail::{HttpThumbnailFetcher, ThumbnailFetcher};
use pipeline::RunOutcome;
use source::RssSource;

fn init_logging() {
    let filter = EnvFilter::try_from_env("RSS2STRM_LOG")
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

fn main() -> ExitCode {
    init_logging();

    let config = Config::from(Cli::parse());
    info!(
        feed = %config.feed,
        output = %config.output_dir.display(),
        filter = ?config.filter.keywords(),
        collision = ?config.collision,
        "configuration"
    );

    let source = RssSource::new(&config.feed);

    let fetcher = if config.fetch_thumbnails {
        match HttpThumbnailFetcher::new(config.thumbnail_timeout) {
            Ok(fetcher) => Some(fetcher),
            Err(err) => {
                warn!(error = %err, "thumbnail downloads disabled");
                None
            }
        }
    } else {
        None
    };

    let result = pipeline::run(
        &config,
        &source,
        fetcher.as_ref().map(|f| f as &dyn ThumbnailFetcher),
    );

    match result {
        Ok(RunOutcome::Promoted { stats, report }) => {
            info!(
                entries = stats.seen,
                written = report.items,
                filtered = stats.filtered,
                skipped = report.skipped,
                thumbnails = report.thumbnails,
                thumbnail_failures = report.thumbnail_failures,
                "library updated"
            );
            ExitCode::SUCCESS
        }
        Ok(RunOutcome::FeedUnavailable { reason }) => {
            warn!(%reason, "nothing written");
            ExitCode::SUCCESS
        }
        Err(err) => {
            error!("run failed: {err:#}");
            ExitCode::FAILURE
        }
    }
}
