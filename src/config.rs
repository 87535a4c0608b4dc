//! Command-line arguments and the immutable run configuration.

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

use crate::output::naming::CollisionPolicy;
use crate::resolve::KeywordFilter;

pub const DEFAULT_FEED: &str = "https://mediathekviewweb.de/feed?query=%3E30%20%23markus%2CLanz%20%23maischberger%20%23caren%2Cmiosga%20%23presseclub%20%23hart%2Caber%2Cfair%20%23maybrit%2Cillner%20%23phoenix%2Crunde%20%23internationaler%2Cfr%C3%BChschoppen&everywhere=true";
pub const DEFAULT_OUTPUT: &str = "./output/";
pub const DEFAULT_FILTER: &str = "";

#[derive(Parser, Debug)]
#[command(name = "rss2strm", version)]
#[command(about = "Turn an RSS video feed into a library of .strm/.nfo files", long_about = None)]
pub struct Cli {
    /// Feed URL or local path
    pub feed: Option<String>,

    /// Output library directory
    pub output: Option<PathBuf>,

    /// Comma-separated title keywords to exclude (case-insensitive)
    pub filter: Option<String>,

    /// How to handle items whose names collide
    #[arg(long, value_enum, default_value_t = CollisionPolicy::Overwrite)]
    pub on_collision: CollisionPolicy,

    /// Do not download thumbnails
    #[arg(long)]
    pub no_thumbnails: bool,

    /// Connect/read timeout for thumbnail downloads, in seconds
    #[arg(long, default_value_t = 15)]
    pub thumbnail_timeout: u64,
}

/// Everything a run needs, fixed before the pipeline starts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub feed: String,
    pub output_dir: PathBuf,
    pub filter: KeywordFilter,
    pub collision: CollisionPolicy,
    pub fetch_thumbnails: bool,
    pub thumbnail_timeout: Duration,
}

impl From<Cli> for Config {
    fn from(cli: Cli) -> Self {
        Self {
            feed: cli.feed.unwrap_or_else(|| DEFAULT_FEED.to_string()),
            output_dir: cli.output.unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT)),
            filter: KeywordFilter::parse(cli.filter.as_deref().unwrap_or(DEFAULT_FILTER)),
            collision: cli.on_collision,
            fetch_thumbnails: !cli.no_thumbnails,
            thumbnail_timeout: Duration::from_secs(cli.thumbnail_timeout),
        }
    }
}
