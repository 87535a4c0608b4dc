//! Thumbnail URL extraction.
//!
//! Finding no thumbnail is a normal outcome, so [`find`] simply returns
//! `None` and callers carry on without one.

use std::sync::LazyLock;

use regex::Regex;

use super::classify::{has_url, is_image_like, is_image_url};
use super::{first_match, Candidate, Strategy};
use crate::source::RawEntry;

pub const STRATEGIES: &[Strategy] = &[
    ("media:thumbnail", from_media_thumbnail),
    ("media:content", from_media_content),
    ("image", from_image),
    ("enclosures", from_enclosures),
    ("links", from_links),
    ("summary", from_summary_html),
];

pub fn find(entry: &RawEntry) -> Option<Candidate> {
    first_match(entry, STRATEGIES)
}

pub fn from_media_thumbnail(entry: &RawEntry) -> Option<String> {
    entry
        .media_thumbnails
        .iter()
        .map(|t| &t.url)
        .find(|url| has_url(url))
        .cloned()
}

pub fn from_media_content(entry: &RawEntry) -> Option<String> {
    entry
        .media_content
        .iter()
        .filter(|c| {
            c.medium
                .as_deref()
                .is_some_and(|m| m.eq_ignore_ascii_case("image"))
                || c.mime_type.as_deref().is_some_and(is_image_like)
        })
        .find_map(|c| c.url.clone().filter(|url| has_url(url)))
}

pub fn from_image(entry: &RawEntry) -> Option<String> {
    entry.image.as_ref().and_then(|i| i.url()).map(String::from)
}

pub fn from_enclosures(entry: &RawEntry) -> Option<String> {
    entry
        .enclosures
        .iter()
        .find(|e| has_url(&e.href) && e.mime_type.as_deref().is_some_and(is_image_like))
        .map(|e| e.href.clone())
}

pub fn from_links(entry: &RawEntry) -> Option<String> {
    entry
        .links
        .iter()
        .filter(|l| has_url(&l.href))
        .find(|l| {
            let rel = l.rel.as_deref().unwrap_or_default();
            l.mime_type.as_deref().is_some_and(is_image_like)
                || is_image_like(rel)
                || rel.eq_ignore_ascii_case("preview")
        })
        .map(|l| l.href.clone())
}

static IMG_SRC: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)<img\b[^>]*?\bsrc\s*=\s*["']([^"']+)["']"#).expect("img pattern compiles")
});

/// `src` values of every `<img>` tag, in document order.
pub fn img_sources(html: &str) -> impl Iterator<Item = &str> {
    IMG_SRC
        .captures_iter(html)
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str())
}

pub fn from_summary_html(entry: &RawEntry) -> Option<String> {
    let summary = entry.summary.as_deref()?;
    img_sources(summary)
        .find(|src| is_image_url(src))
        .map(String::from)
}
