//! Feed source abstraction layer.
//!
//! This module defines the [`FeedSource`] trait and the [`RawEntry`] view that
//! every source produces.  Concrete implementations live in sub-modules
//! (currently only [`rss`]).
//!
//! ## For contributors: adding a new source
//!
//! 1. Create a new file in this directory (e.g. `atom.rs`).
//! 2. Define a struct (e.g. `AtomSource`) and implement [`FeedSource`] for it.
//! 3. Map every native field onto [`RawEntry`]; leave fields `None` / empty
//!    when the format has no equivalent.
//! 4. Add `mod atom;` below and re-export your struct in the `pub use` block.
//!
//! The extraction engine, resolver and materializer are all source-agnostic.

mod raw_entry;
mod rss;

pub use self::rss::RssSource;
pub use raw_entry::{
    AuthorDetail, ContentBlock, Enclosure, Image, Link, MediaContent, MediaPlayer, MediaThumbnail,
    RawEntry, Tag,
};

use anyhow::Result;

/// Trait that every feed source must implement.
///
/// The pipeline calls [`fetch()`](FeedSource::fetch) exactly once per run.
pub trait FeedSource {
    /// Human-readable label used in log output.
    fn name(&self) -> &str;

    /// Fetch and parse the feed.
    ///
    /// `Err` means the feed was unreachable or malformed.  A well-formed feed
    /// with no items is `Ok(vec![])`; the pipeline treats both the same way
    /// and leaves the existing library alone.
    fn fetch(&self) -> Result<Vec<RawEntry>>;
}
