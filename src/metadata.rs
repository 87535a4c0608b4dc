//! Metadata normalisation.
//!
//! Turns the loosely-typed fields of a [`RawEntry`] into the [`Metadata`]
//! record written to the `.nfo` file.  Every step degrades to "field absent"
//! on bad input; nothing here can fail.

use std::sync::LazyLock;

use chrono::{DateTime, NaiveDate};
use regex::Regex;

use crate::extract::thumbnail;
use crate::source::RawEntry;

/// Maximum plot length, in characters.
pub const SUMMARY_LIMIT: usize = 500;

/// Descriptive fields for one resolved item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Metadata {
    pub title: String,
    pub aired: Option<NaiveDate>,
    /// At most [`SUMMARY_LIMIT`] characters.
    pub summary: Option<String>,
    pub author: Option<String>,
    pub tags: Vec<String>,
    /// Formatted as `"<minutes> min"`.
    pub duration: Option<String>,
    pub thumbnail: Option<String>,
    /// Always equal to the resolved video URL.
    pub source_url: String,
}

impl Metadata {
    /// Build the metadata record for an entry whose title and video URL are
    /// already known.
    pub fn from_entry(entry: &RawEntry, title: &str, video_url: &str) -> Self {
        Self {
            title: title.to_string(),
            aired: aired(entry),
            summary: summary(entry),
            author: author(entry),
            tags: tags(entry),
            duration: entry.duration.as_deref().and_then(format_duration),
            thumbnail: thumbnail::find(entry).map(|candidate| candidate.url),
            source_url: video_url.to_string(),
        }
    }

    /// `aired` as `YYYY-MM-DD`.
    pub fn aired_string(&self) -> Option<String> {
        self.aired.map(|date| date.format("%Y-%m-%d").to_string())
    }
}

/// `published`, else `updated`.
pub fn aired(entry: &RawEntry) -> Option<NaiveDate> {
    [&entry.published, &entry.updated]
        .into_iter()
        .flatten()
        .find_map(|value| parse_date(value))
}

/// RFC 2822 first, RFC 3339 as a fallback.  The calendar date is taken in
/// the timestamp's own offset.
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    DateTime::parse_from_rfc2822(value)
        .or_else(|_| DateTime::parse_from_rfc3339(value))
        .ok()
        .map(|dt| dt.date_naive())
}

static HTML_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<[^>]*>").expect("tag pattern compiles"));

pub fn strip_tags(html: &str) -> String {
    HTML_TAG.replace_all(html, "").into_owned()
}

/// First content block (tags stripped), else summary, else subtitle.
pub fn summary(entry: &RawEntry) -> Option<String> {
    let content = entry.first_content().map(strip_tags);
    [content, entry.summary.clone(), entry.subtitle.clone()]
        .into_iter()
        .flatten()
        .map(|text| text.trim().to_string())
        .find(|text| !text.is_empty())
        .map(|text| truncate(&text, SUMMARY_LIMIT))
}

/// Cut to `limit` characters, without an ellipsis.
pub fn truncate(text: &str, limit: usize) -> String {
    match text.char_indices().nth(limit) {
        Some((byte_index, _)) => text[..byte_index].to_string(),
        None => text.to_string(),
    }
}

/// Plain author, else the structured author's name, else its URL.
pub fn author(entry: &RawEntry) -> Option<String> {
    let detail = entry.author_detail.as_ref();
    [
        entry.author.as_deref(),
        detail.and_then(|d| d.name.as_deref()),
        detail.and_then(|d| d.href.as_deref()),
    ]
    .into_iter()
    .flatten()
    .map(str::trim)
    .find(|value| !value.is_empty())
    .map(String::from)
}

pub fn tags(entry: &RawEntry) -> Vec<String> {
    entry
        .tags
        .iter()
        .filter_map(|tag| tag.display())
        .map(String::from)
        .collect()
}

/// Whole seconds to `"<minutes> min"`; anything else is dropped.
pub fn format_duration(raw: &str) -> Option<String> {
    let seconds: u64 = raw.trim().parse().ok()?;
    Some(format!("{} min", seconds / 60))
}
