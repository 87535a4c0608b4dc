//! The normalised, read-only view of one feed entry.
//!
//! `RawEntry` is what every feed adapter produces and what the extraction
//! engine consumes.  Publishers scatter the same information across plain RSS
//! elements, namespace extensions (`media:`, `atom:`, `itunes:`, `dc:`) and
//! free-form HTML, so every field here is optional and list fields may be
//! empty.  The adapter decides *where* a value comes from; the extractors only
//! ever see this record and never perform dynamic lookups of their own.
//!
//! ## For contributors
//!
//! If a new adapter can surface an extra source of video or thumbnail URLs,
//! prefer mapping it onto one of the existing fields (for example an Atom
//! `<link rel="enclosure">` belongs in [`RawEntry::links`]).  Only add a new
//! field when no existing one carries the same meaning.

/// One feed entry with every field optional.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawEntry {
    pub title: Option<String>,

    /// Publication timestamp, unparsed.
    pub published: Option<String>,

    /// Last-modified timestamp, unparsed.
    pub updated: Option<String>,

    pub summary: Option<String>,
    pub description: Option<String>,
    pub subtitle: Option<String>,

    /// Structured content blocks (e.g. `content:encoded`), in document order.
    pub content: Vec<ContentBlock>,

    /// Plain author string.
    pub author: Option<String>,

    /// Structured author information, used when `author` is missing.
    pub author_detail: Option<AuthorDetail>,

    /// Categories / tags in feed order.
    pub tags: Vec<Tag>,

    /// Duration as published; usually whole seconds.
    pub duration: Option<String>,

    /// The entry's singular `<link>` element.
    pub link: Option<String>,

    /// Every link-like reference, including the alternate link and enclosures.
    pub links: Vec<Link>,

    pub enclosures: Vec<Enclosure>,

    pub media_thumbnails: Vec<MediaThumbnail>,
    pub media_content: Vec<MediaContent>,
    pub media_player: Option<MediaPlayer>,

    /// A generic "image" field, which publishers emit in two shapes.
    pub image: Option<Image>,
}

impl RawEntry {
    /// Raw value of the first structured content block, if any.
    pub fn first_content(&self) -> Option<&str> {
        self.content.first().map(|block| block.value.as_str())
    }
}

/// A structured content block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentBlock {
    pub value: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuthorDetail {
    pub name: Option<String>,
    /// Reference URL (Atom `uri`).
    pub href: Option<String>,
}

/// A category or tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tag {
    pub term: String,
    pub label: Option<String>,
}

impl Tag {
    pub fn new(term: impl Into<String>) -> Self {
        Self {
            term: term.into(),
            label: None,
        }
    }

    /// The text surfaced for this tag: the term, or the label when the term
    /// is blank.
    pub fn display(&self) -> Option<&str> {
        let term = self.term.trim();
        if !term.is_empty() {
            return Some(term);
        }
        self.label
            .as_deref()
            .map(str::trim)
            .filter(|label| !label.is_empty())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Link {
    pub href: String,
    pub rel: Option<String>,
    pub mime_type: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Enclosure {
    pub href: String,
    pub mime_type: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaThumbnail {
    pub url: String,
}

/// One `media:content` element.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MediaContent {
    pub url: Option<String>,
    pub mime_type: Option<String>,
    /// Declared medium (`image`, `video`, `audio`, ...).
    pub medium: Option<String>,
    pub duration: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MediaPlayer {
    pub url: Option<String>,
}

/// The generic image field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Image {
    /// A bare URL string.
    Url(String),
    /// A structured element whose URL lives in a sub-field.
    Structured { url: Option<String> },
}

impl Image {
    pub fn url(&self) -> Option<&str> {
        match self {
            Image::Url(url) => Some(url),
            Image::Structured { url } => url.as_deref(),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
