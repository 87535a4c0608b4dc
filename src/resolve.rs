//! Entry resolution.
//!
//! Walks the raw entries in feed order and turns each one into a
//! [`ResolvedItem`], or records why it was dropped.  Output order equals feed
//! order minus dropped and filtered entries.

use tracing::{debug, info};

use crate::extract::video;
use crate::metadata::Metadata;
use crate::source::RawEntry;

/// A feed entry with a playable URL and its metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedItem {
    /// Never empty.
    pub title: String,
    /// Never empty or whitespace-only.
    pub video_url: String,
    pub metadata: Metadata,
}

/// What happened to one raw entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Resolved(ResolvedItem),
    /// Title matched a configured keyword.
    Filtered { title: String, keyword: String },
    /// No strategy produced a video URL.
    NoVideo { title: String },
    /// No usable title.
    Untitled,
}

/// Case-insensitive title keyword filter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeywordFilter {
    keywords: Vec<String>,
}

impl KeywordFilter {
    pub fn new<I, S>(keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            keywords: keywords
                .into_iter()
                .map(|k| k.as_ref().trim().to_lowercase())
                .filter(|k| !k.is_empty())
                .collect(),
        }
    }

    /// Parse a comma-separated keyword list.
    pub fn parse(list: &str) -> Self {
        Self::new(list.split(','))
    }

    pub fn is_empty(&self) -> bool {
        self.keywords.is_empty()
    }

    pub fn keywords(&self) -> &[String] {
        &self.keywords
    }

    /// The first keyword contained in `title`, if any.
    pub fn matching(&self, title: &str) -> Option<&str> {
        if self.keywords.is_empty() {
            return None;
        }
        let title = title.to_lowercase();
        self.keywords
            .iter()
            .find(|keyword| title.contains(keyword.as_str()))
            .map(String::as_str)
    }
}

/// Counters for one resolution pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ResolveStats {
    pub seen: usize,
    pub resolved: usize,
    pub filtered: usize,
    pub no_video: usize,
    pub untitled: usize,
}

/// The text before the first `" - "`, trimmed.  `None` when that is empty.
pub fn derive_title(raw: &str) -> Option<String> {
    let head = raw.split(" - ").next().unwrap_or(raw).trim();
    (!head.is_empty()).then(|| head.to_string())
}

pub fn resolve_entry(entry: &RawEntry, filter: &KeywordFilter) -> Outcome {
    let Some(title) = entry.title.as_deref().and_then(derive_title) else {
        return Outcome::Untitled;
    };

    if let Some(keyword) = filter.matching(&title) {
        return Outcome::Filtered {
            keyword: keyword.to_string(),
            title,
        };
    }

    let Some(candidate) = video::find(entry) else {
        return Outcome::NoVideo { title };
    };
    debug!(%title, url = %candidate.url, strategy = candidate.strategy, "video url resolved");

    let metadata = Metadata::from_entry(entry, &title, &candidate.url);
    Outcome::Resolved(ResolvedItem {
        title,
        video_url: candidate.url,
        metadata,
    })
}

/// Resolve every entry in feed order.
pub fn resolve_all(entries: &[RawEntry], filter: &KeywordFilter) -> (Vec<ResolvedItem>, ResolveStats) {
    let mut items = Vec::new();
    let mut stats = ResolveStats {
        seen: entries.len(),
        ..Default::default()
    };

    for entry in entries {
        match resolve_entry(entry, filter) {
            Outcome::Resolved(item) => {
                stats.resolved += 1;
                items.push(item);
            }
            Outcome::Filtered { title, keyword } => {
                stats.filtered += 1;
                info!(%title, %keyword, "entry filtered");
            }
            Outcome::NoVideo { title } => {
                stats.no_video += 1;
                debug!(%title, "no video url, entry dropped");
            }
            Outcome::Untitled => {
                stats.untitled += 1;
                debug!("entry without title dropped");
            }
        }
    }

    info!(
        seen = stats.seen,
        resolved = stats.resolved,
        filtered = stats.filtered,
        no_video = stats.no_video,
        untitled = stats.untitled,
        "entries resolved"
    );
    (items, stats)
}
