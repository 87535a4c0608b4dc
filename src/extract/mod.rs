//! The extraction engine.
//!
//! Each extractor is an ordered list of independent strategies.  A strategy
//! is a plain function from a [`RawEntry`] to an optional URL; the list is
//! evaluated left to right and the first strategy that yields a non-blank URL
//! wins.  Nothing is merged across strategies.
//!
//! ## For contributors
//!
//! To support a new place where publishers hide URLs, write one more
//! strategy function and insert it into [`video::STRATEGIES`] or
//! [`thumbnail::STRATEGIES`] at the position that reflects its priority.

pub mod classify;
pub mod thumbnail;
pub mod video;

use crate::source::RawEntry;

/// One named extraction strategy.
pub type Strategy = (&'static str, fn(&RawEntry) -> Option<String>);

/// A URL together with the strategy that found it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub url: String,
    pub strategy: &'static str,
}

/// Run `strategies` in order and return the first non-blank result.
pub fn first_match(entry: &RawEntry, strategies: &[Strategy]) -> Option<Candidate> {
    strategies.iter().find_map(|(name, strategy)| {
        let url = strategy(entry)?;
        let url = url.trim();
        (!url.is_empty()).then(|| Candidate {
            url: url.to_string(),
            strategy: *name,
        })
    })
}
