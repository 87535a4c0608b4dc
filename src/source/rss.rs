//! RSS 2.0 feed source.
//!
//! Fetches a feed from a URL or a local path, parses it with the [`rss`]
//! crate and maps each item onto a [`RawEntry`].  All of the "which element
//! or namespace does this publisher use" knowledge lives here; the rest of
//! the program only sees the normalised record.
//!
//! ## Field mapping
//!
//! | `RawEntry` field   | Source                                                   |
//! |--------------------|----------------------------------------------------------|
//! | `published`        | `<pubDate>`, else `dc:date`                              |
//! | `updated`          | `atom:updated`, else `dc:date`                           |
//! | `summary`          | `<description>`                                          |
//! | `subtitle`         | `itunes:subtitle`                                        |
//! | `content`          | `content:encoded`                                        |
//! | `tags`             | `<category>`, then `dc:subject`                          |
//! | `author`           | `<author>`, `dc:creator`, `itunes:author`                |
//! | `links`            | `<link>`, `<enclosure>`, every `atom:link`               |
//! | `media_*`          | `media:` elements, including those inside `media:group`  |
//! | `image`            | `itunes:image`, else any namespaced `image` element      |

use std::fs::File;
use std::io::BufReader;
use std::time::Duration;

use anyhow::{Context, Result};
use rss::extension::{Extension, ExtensionMap};
use tracing::{debug, info};

use super::{
    AuthorDetail, ContentBlock, Enclosure, FeedSource, Image, Link, MediaContent, MediaPlayer,
    MediaThumbnail, RawEntry, Tag,
};

const MEDIA_NAMESPACE: &str = "http://search.yahoo.com/mrss/";
const ATOM_NAMESPACE: &str = "http://www.w3.org/2005/Atom";

const FETCH_TIMEOUT: Duration = Duration::from_secs(30);
const USER_AGENT: &str = concat!("rss2strm/", env!("CARGO_PKG_VERSION"));

/// An RSS feed read from a URL or a local file.
pub struct RssSource {
    /// `http(s)://` URL, `file://` URL or plain filesystem path.
    pub location: String,
}

impl RssSource {
    pub fn new(location: impl Into<String>) -> Self {
        Self {
            location: location.into(),
        }
    }

    /// Map an already-parsed [`rss::Channel`] onto [`RawEntry`] values.
    ///
    /// Pure function so tests can exercise the mapping without I/O.
    pub fn parse_channel(channel: &rss::Channel) -> Vec<RawEntry> {
        let prefixes = Prefixes::of(channel);
        channel
            .items()
            .iter()
            .map(|item| entry_from_item(item, &prefixes))
            .collect()
    }

    fn read_channel(&self) -> Result<rss::Channel> {
        if is_remote(&self.location) {
            let client = reqwest::blocking::Client::builder()
                .timeout(FETCH_TIMEOUT)
                .user_agent(USER_AGENT)
                .build()
                .context("failed to build HTTP client")?;
            let body = client
                .get(&self.location)
                .send()
                .and_then(|response| response.error_for_status())
                .and_then(|response| response.bytes())
                .with_context(|| format!("failed to fetch feed {}", self.location))?;
            rss::Channel::read_from(&body[..])
                .with_context(|| format!("failed to parse feed {}", self.location))
        } else {
            let path = self
                .location
                .strip_prefix("file://")
                .unwrap_or(&self.location);
            let file = File::open(path).with_context(|| format!("failed to open feed {path}"))?;
            rss::Channel::read_from(BufReader::new(file))
                .with_context(|| format!("failed to parse feed {path}"))
        }
    }
}

impl FeedSource for RssSource {
    fn name(&self) -> &str {
        &self.location
    }

    fn fetch(&self) -> Result<Vec<RawEntry>> {
        info!(feed = %self.location, "fetching feed");
        let channel = self.read_channel()?;
        debug!(title = channel.title(), items = channel.items().len(), "feed parsed");
        Ok(Self::parse_channel(&channel))
    }
}

fn is_remote(location: &str) -> bool {
    let lower = location.to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}

// ---------------------------------------------------------------------------
// Item mapping
// ---------------------------------------------------------------------------

/// Extension-map keys for the namespaces we read.
///
/// The `rss` crate keys extensions by the prefix the document declared, so a
/// feed that binds Media RSS to `mrss:` instead of `media:` is still found.
struct Prefixes {
    media: String,
    atom: String,
}

impl Prefixes {
    fn of(channel: &rss::Channel) -> Self {
        let lookup = |uri: &str, fallback: &str| {
            channel
                .namespaces()
                .iter()
                .find(|(_, declared)| declared.as_str() == uri)
                .map(|(prefix, _)| prefix.clone())
                .unwrap_or_else(|| fallback.to_string())
        };
        Self {
            media: lookup(MEDIA_NAMESPACE, "media"),
            atom: lookup(ATOM_NAMESPACE, "atom"),
        }
    }
}

fn entry_from_item(item: &rss::Item, prefixes: &Prefixes) -> RawEntry {
    let ext = item.extensions();
    let dc = item.dublin_core_ext();
    let itunes = item.itunes_ext();

    let dc_date = dc.and_then(|dc| dc.dates().first()).cloned();

    let published = item.pub_date().map(String::from).or_else(|| dc_date.clone());
    let updated = elements(ext, &prefixes.atom, "updated")
        .find_map(|e| e.value().map(String::from))
        .or(dc_date);

    let author = item
        .author()
        .map(String::from)
        .or_else(|| dc.and_then(|dc| dc.creators().first()).cloned())
        .or_else(|| itunes.and_then(|it| it.author()).map(String::from));

    let author_detail = elements(ext, &prefixes.atom, "author")
        .next()
        .map(|author| AuthorDetail {
            name: child_value(author, "name"),
            href: child_value(author, "uri"),
        });

    let mut tags: Vec<Tag> = item
        .categories()
        .iter()
        .map(|category| Tag::new(category.name()))
        .collect();
    if let Some(dc) = dc {
        tags.extend(dc.subjects().iter().map(Tag::new));
    }

    let enclosures: Vec<Enclosure> = item
        .enclosure()
        .map(|enc| Enclosure {
            href: enc.url().to_string(),
            mime_type: non_empty(enc.mime_type()),
        })
        .into_iter()
        .collect();

    let media_content: Vec<MediaContent> = media_elements(ext, &prefixes.media, "content")
        .map(|e| MediaContent {
            url: attr(e, "url"),
            mime_type: attr(e, "type"),
            medium: attr(e, "medium"),
            duration: attr(e, "duration"),
        })
        .collect();

    let duration = itunes
        .and_then(|it| it.duration())
        .map(String::from)
        .or_else(|| media_content.iter().find_map(|c| c.duration.clone()));

    RawEntry {
        title: item.title().map(String::from),
        published,
        updated,
        summary: item.description().map(String::from),
        description: item.description().map(String::from),
        subtitle: itunes.and_then(|it| it.subtitle()).map(String::from),
        content: item
            .content()
            .map(|value| ContentBlock {
                value: value.to_string(),
            })
            .into_iter()
            .collect(),
        author,
        author_detail,
        tags,
        duration,
        link: item.link().map(String::from),
        links: links(item, &enclosures, ext, &prefixes.atom),
        enclosures,
        media_thumbnails: media_elements(ext, &prefixes.media, "thumbnail")
            .filter_map(|e| attr(e, "url"))
            .map(|url| MediaThumbnail { url })
            .collect(),
        media_content,
        media_player: media_elements(ext, &prefixes.media, "player")
            .next()
            .map(|e| MediaPlayer { url: attr(e, "url") }),
        image: image(item, ext),
    }
}

/// The alternate `<link>`, the enclosure and every `atom:link`, in that order.
fn links(
    item: &rss::Item,
    enclosures: &[Enclosure],
    ext: &ExtensionMap,
    atom: &str,
) -> Vec<Link> {
    let alternate = item.link().map(|href| Link {
        href: href.to_string(),
        rel: Some("alternate".to_string()),
        mime_type: Some("text/html".to_string()),
    });
    let enclosed = enclosures.iter().map(|enc| Link {
        href: enc.href.clone(),
        rel: Some("enclosure".to_string()),
        mime_type: enc.mime_type.clone(),
    });
    let atom_links = elements(ext, atom, "link").filter_map(|e| {
        Some(Link {
            href: attr(e, "href")?,
            rel: Some(attr(e, "rel").unwrap_or_else(|| "alternate".to_string())),
            mime_type: attr(e, "type"),
        })
    });

    alternate.into_iter().chain(enclosed).chain(atom_links).collect()
}

fn image(item: &rss::Item, ext: &ExtensionMap) -> Option<Image> {
    if let Some(href) = item.itunes_ext().and_then(|it| it.image()) {
        return Some(Image::Url(href.to_string()));
    }
    ext.values()
        .filter_map(|names| names.get("image"))
        .flatten()
        .next()
        .map(|e| Image::Structured {
            url: attr(e, "url")
                .or_else(|| attr(e, "href"))
                .or_else(|| child_value(e, "url")),
        })
}

// ---------------------------------------------------------------------------
// Extension helpers
// ---------------------------------------------------------------------------

fn elements<'a>(
    ext: &'a ExtensionMap,
    prefix: &str,
    name: &str,
) -> impl Iterator<Item = &'a Extension> + 'a {
    ext.get(prefix)
        .and_then(|names| names.get(name))
        .into_iter()
        .flatten()
}

/// Media RSS elements, both top-level and nested inside `media:group`.
fn media_elements<'a>(
    ext: &'a ExtensionMap,
    prefix: &str,
    name: &'a str,
) -> impl Iterator<Item = &'a Extension> + 'a {
    let grouped = elements(ext, prefix, "group").flat_map(move |group| children(group, name));
    elements(ext, prefix, name).chain(grouped)
}

/// Child elements by local name; tolerates children keyed with their prefix.
fn children<'a>(ext: &'a Extension, name: &'a str) -> impl Iterator<Item = &'a Extension> + 'a {
    ext.children()
        .iter()
        .filter(move |(key, _)| {
            key.as_str() == name || key.rsplit_once(':').is_some_and(|(_, local)| local == name)
        })
        .flat_map(|(_, values)| values.iter())
}

fn child_value(ext: &Extension, name: &str) -> Option<String> {
    children(ext, name).find_map(|child| child.value().and_then(non_empty))
}

fn attr(ext: &Extension, name: &str) -> Option<String> {
    ext.attrs().get(name).and_then(|value| non_empty(value))
}

fn non_empty(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
