//! Video URL extraction.
//!
//! Strategies in priority order:
//!
//! 1. `links`: the entry's link list, itself scanned in five passes.
//! 2. `enclosures`: a video MIME type, else a video file extension.
//! 3. `link`: the singular `<link>` element, when it is a video file.
//! 4. `media`: `media:content` with a video MIME type, else `media:player`.
//! 5. `content`: a video URL inside the first content block.
//! 6. `description`: a video URL inside summary, description or subtitle.

use std::sync::LazyLock;

use regex::Regex;

use super::classify::{has_url, is_video_mime, is_video_url};
use super::{first_match, Candidate, Strategy};
use crate::source::{Link, RawEntry};

pub const STRATEGIES: &[Strategy] = &[
    ("links", from_links),
    ("enclosures", from_enclosures),
    ("link", from_direct_link),
    ("media", from_media),
    ("content", from_content),
    ("description", from_description),
];

/// Resolve the entry's video URL, if any strategy finds one.
pub fn find(entry: &RawEntry) -> Option<Candidate> {
    first_match(entry, STRATEGIES)
}

fn mime(link: &Link) -> &str {
    link.mime_type.as_deref().unwrap_or_default()
}

fn rel(link: &Link) -> &str {
    link.rel.as_deref().unwrap_or_default()
}

/// Each pass scans the whole list before the next pass starts.  Links with a
/// blank `href` are never candidates.
pub fn from_links(entry: &RawEntry) -> Option<String> {
    let passes: [fn(&Link) -> bool; 5] = [
        |l| rel(l).eq_ignore_ascii_case("enclosure") && is_video_mime(mime(l)),
        |l| {
            let mentions_media = rel(l).to_lowercase().contains("media")
                || mime(l).to_lowercase().contains("media");
            mentions_media && (is_video_url(&l.href) || is_video_mime(mime(l)))
        },
        |l| is_video_mime(mime(l)),
        |l| rel(l).eq_ignore_ascii_case("alternate") && is_video_url(&l.href),
        |l| is_video_url(&l.href),
    ];

    passes
        .iter()
        .find_map(|pass| {
            entry
                .links
                .iter()
                .filter(|l| has_url(&l.href))
                .find(|l| pass(l))
        })
        .map(|l| l.href.clone())
}

pub fn from_enclosures(entry: &RawEntry) -> Option<String> {
    let mut usable = entry.enclosures.iter().filter(|e| has_url(&e.href));
    usable
        .clone()
        .find(|e| e.mime_type.as_deref().is_some_and(is_video_mime))
        .or_else(|| usable.find(|e| is_video_url(&e.href)))
        .map(|e| e.href.clone())
}

pub fn from_direct_link(entry: &RawEntry) -> Option<String> {
    entry.link.clone().filter(|link| is_video_url(link))
}

pub fn from_media(entry: &RawEntry) -> Option<String> {
    entry
        .media_content
        .iter()
        .filter(|c| c.mime_type.as_deref().is_some_and(is_video_mime))
        .find_map(|c| c.url.clone().filter(|url| has_url(url)))
        .or_else(|| {
            entry
                .media_player
                .as_ref()
                .and_then(|player| player.url.clone())
                .filter(|url| is_video_url(url))
        })
}

pub fn from_content(entry: &RawEntry) -> Option<String> {
    entry.first_content().and_then(scan_text)
}

pub fn from_description(entry: &RawEntry) -> Option<String> {
    [&entry.summary, &entry.description, &entry.subtitle]
        .into_iter()
        .flatten()
        .find_map(|text| scan_text(text))
}

/// `http(s)://` followed by anything that is not whitespace, a bracket or a
/// quote.
static URL_TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"https?://[^\s<>"'\[\]]+"#).expect("URL pattern compiles"));

/// First URL in free text whose path ends in a video extension.
///
/// Sentence punctuation glued to the end of a URL is not part of it.
pub fn scan_text(text: &str) -> Option<String> {
    URL_TOKEN
        .find_iter(text)
        .map(|m| m.as_str().trim_end_matches(['.', ',', ';', ':', '!', ')']))
        .find(|url| is_video_url(url))
        .map(String::from)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::{ContentBlock, Enclosure, MediaContent, MediaPlayer};

    fn link(href: &str, rel: Option<&str>, mime: Option<&str>) -> Link {
        Link {
            href: href.into(),
            rel: rel.map(String::from),
            mime_type: mime.map(String::from),
        }
    }

    fn enclosure(href: &str, mime: Option<&str>) -> Enclosure {
        Enclosure {
            href: href.into(),
            mime_type: mime.map(String::from),
        }
    }

    #[test]
    fn enclosure_beats_media_and_description() {
        let entry = RawEntry {
            enclosures: vec![enclosure("https://cdn.example.com/enc.mp4", Some("video/mp4"))],
            media_content: vec![MediaContent {
                url: Some("https://cdn.example.com/media.mp4".into()),
                mime_type: Some("video/mp4".into()),
                ..Default::default()
            }],
            summary: Some("see https://cdn.example.com/desc.mp4".into()),
            ..Default::default()
        };

        let found = find(&entry).unwrap();
        assert_eq!(found.url, "https://cdn.example.com/enc.mp4");
        assert_eq!(found.strategy, "enclosures");
    }

    #[test]
    fn link_passes_run_in_order() {
        // Pass (e) candidate listed first, pass (a) candidate listed last.
        let entry = RawEntry {
            links: vec![
                link("https://cdn.example.com/any.mp4", Some("related"), None),
                link("https://cdn.example.com/alt.mp4", Some("alternate"), None),
                link("https://cdn.example.com/stream", None, Some("video/mp4")),
                link("https://cdn.example.com/enc", Some("enclosure"), Some("video/webm")),
            ],
            ..Default::default()
        };
        assert_eq!(
            from_links(&entry).as_deref(),
            Some("https://cdn.example.com/enc")
        );
    }

    #[test]
    fn blank_link_does_not_hide_later_pass() {
        let entry = RawEntry {
            links: vec![
                link("", Some("enclosure"), Some("video/mp4")),
                link("https://cdn.example.com/stream", None, Some("video/mp4")),
            ],
            ..Default::default()
        };
        assert_eq!(
            from_links(&entry).as_deref(),
            Some("https://cdn.example.com/stream")
        );
    }

    #[test]
    fn link_pass_media_relation() {
        let entry = RawEntry {
            links: vec![
                link("https://cdn.example.com/alt.mp4", Some("alternate"), None),
                link("https://cdn.example.com/m.webm", Some("media"), None),
            ],
            ..Default::default()
        };
        assert_eq!(
            from_links(&entry).as_deref(),
            Some("https://cdn.example.com/m.webm")
        );
    }

    #[test]
    fn link_pass_video_mime_before_alternate_extension() {
        let entry = RawEntry {
            links: vec![
                link("https://cdn.example.com/alt.mp4", Some("alternate"), None),
                link("https://cdn.example.com/hls", Some("related"), Some("application/x-mpegURL")),
            ],
            ..Default::default()
        };
        assert_eq!(
            from_links(&entry).as_deref(),
            Some("https://cdn.example.com/hls")
        );
    }

    #[test]
    fn link_pass_alternate_before_any() {
        let entry = RawEntry {
            links: vec![
                link("https://cdn.example.com/other.mp4", Some("related"), None),
                link("https://cdn.example.com/alt.mov", Some("alternate"), None),
            ],
            ..Default::default()
        };
        assert_eq!(
            from_links(&entry).as_deref(),
            Some("https://cdn.example.com/alt.mov")
        );
    }

    #[test]
    fn non_video_links_are_ignored() {
        let entry = RawEntry {
            links: vec![link("https://example.com/page", Some("alternate"), Some("text/html"))],
            ..Default::default()
        };
        assert!(from_links(&entry).is_none());
    }

    #[test]
    fn enclosure_mime_before_extension() {
        let entry = RawEntry {
            enclosures: vec![
                enclosure("https://cdn.example.com/a.mp4", None),
                enclosure("https://cdn.example.com/b", Some("video/mp4")),
            ],
            ..Default::default()
        };
        assert_eq!(
            from_enclosures(&entry).as_deref(),
            Some("https://cdn.example.com/b")
        );
    }

    #[test]
    fn blank_enclosure_is_skipped() {
        let entry = RawEntry {
            enclosures: vec![
                enclosure(" ", Some("video/mp4")),
                enclosure("https://cdn.example.com/b.mp4", None),
            ],
            ..Default::default()
        };
        assert_eq!(
            from_enclosures(&entry).as_deref(),
            Some("https://cdn.example.com/b.mp4")
        );
    }

    #[test]
    fn image_enclosure_is_not_video() {
        let entry = RawEntry {
            enclosures: vec![enclosure("https://img.example.com/a?x=1", Some("image/jpeg"))],
            ..Default::default()
        };
        assert!(from_enclosures(&entry).is_none());
    }

    #[test]
    fn direct_link_requires_video_extension() {
        let page = RawEntry {
            link: Some("https://example.com/video1".into()),
            ..Default::default()
        };
        assert!(from_direct_link(&page).is_none());

        let file = RawEntry {
            link: Some("https://example.com/video1.mp4?dl=1".into()),
            ..Default::default()
        };
        assert_eq!(
            from_direct_link(&file).as_deref(),
            Some("https://example.com/video1.mp4?dl=1")
        );
    }

    #[test]
    fn media_content_skips_images() {
        let entry = RawEntry {
            media_content: vec![
                MediaContent {
                    url: Some("https://img.example.com/t.jpg".into()),
                    mime_type: Some("image/jpeg".into()),
                    medium: Some("image".into()),
                    ..Default::default()
                },
                MediaContent {
                    url: Some("https://cdn.example.com/v.mp4".into()),
                    mime_type: Some("video/mp4".into()),
                    ..Default::default()
                },
            ],
            ..Default::default()
        };
        assert_eq!(
            from_media(&entry).as_deref(),
            Some("https://cdn.example.com/v.mp4")
        );
    }

    #[test]
    fn second_video_media_content_after_blank_url() {
        let entry = RawEntry {
            media_content: vec![
                MediaContent {
                    url: Some("".into()),
                    mime_type: Some("video/mp4".into()),
                    ..Default::default()
                },
                MediaContent {
                    url: Some("https://cdn.example.com/second.mp4".into()),
                    mime_type: Some("video/mp4".into()),
                    ..Default::default()
                },
            ],
            ..Default::default()
        };
        let found = find(&entry).unwrap();
        assert_eq!(found.url, "https://cdn.example.com/second.mp4");
        assert_eq!(found.strategy, "media");
    }

    #[test]
    fn media_player_needs_video_extension() {
        let page = RawEntry {
            media_player: Some(MediaPlayer {
                url: Some("https://example.com/embed/123".into()),
            }),
            ..Default::default()
        };
        assert!(from_media(&page).is_none());

        let file = RawEntry {
            media_player: Some(MediaPlayer {
                url: Some("https://cdn.example.com/123.flv".into()),
            }),
            ..Default::default()
        };
        assert_eq!(
            from_media(&file).as_deref(),
            Some("https://cdn.example.com/123.flv")
        );
    }

    #[test]
    fn content_scan_keeps_query() {
        let entry = RawEntry {
            content: vec![ContentBlock {
                value: r#"<a href="https://cdn.example.com/c.webm?sig=1">x</a>"#.into(),
            }],
            ..Default::default()
        };
        let found = find(&entry).unwrap();
        assert_eq!(found.url, "https://cdn.example.com/c.webm?sig=1");
        assert_eq!(found.strategy, "content");
    }

    #[test]
    fn description_fields_scanned_in_order() {
        let entry = RawEntry {
            summary: Some("no links here".into()),
            description: Some("Download: https://cdn.example.com/d.mkv.".into()),
            subtitle: Some("https://cdn.example.com/s.mp4".into()),
            ..Default::default()
        };
        let found = find(&entry).unwrap();
        assert_eq!(found.url, "https://cdn.example.com/d.mkv");
        assert_eq!(found.strategy, "description");
    }

    #[test]
    fn scan_text_skips_non_video_urls() {
        assert_eq!(
            scan_text("https://example.com/page and https://cdn.example.com/v.ogv").as_deref(),
            Some("https://cdn.example.com/v.ogv")
        );
        assert!(scan_text("https://example.com/a.mp4.html").is_none());
        assert!(scan_text("").is_none());
    }

    #[test]
    fn blank_candidates_never_win() {
        let entry = RawEntry {
            media_content: vec![MediaContent {
                url: Some("   ".into()),
                mime_type: Some("video/mp4".into()),
                ..Default::default()
            }],
            summary: Some("https://cdn.example.com/fallback.mp4".into()),
            ..Default::default()
        };
        assert_eq!(find(&entry).unwrap().url, "https://cdn.example.com/fallback.mp4");
    }

    #[test]
    fn nothing_found() {
        let entry = RawEntry {
            title: Some("Just text".into()),
            link: Some("https://example.com/article".into()),
            ..Default::default()
        };
        assert!(find(&entry).is_none());
    }
}
