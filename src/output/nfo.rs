//! `.nfo` metadata documents.
//!
//! The layout follows the `episodedetails` schema understood by common media
//! library software.  Optional fields are omitted entirely rather than written
//! empty; `season` and `episode` are fixed so libraries sort the items.

use crate::metadata::Metadata;

const XML_DECLARATION: &str = r#"<?xml version="1.0" encoding="UTF-8"?>"#;

pub fn render(meta: &Metadata) -> String {
    let mut doc = String::new();
    doc.push_str(XML_DECLARATION);
    doc.push('\n');
    doc.push_str("<episodedetails>\n");

    element(&mut doc, "title", &meta.title);
    if let Some(aired) = meta.aired_string() {
        element(&mut doc, "aired", &aired);
    }
    if let Some(plot) = &meta.summary {
        element(&mut doc, "plot", plot);
    }
    if let Some(author) = &meta.author {
        element(&mut doc, "director", author);
    }
    for tag in &meta.tags {
        element(&mut doc, "genre", tag);
    }
    if let Some(runtime) = &meta.duration {
        element(&mut doc, "runtime", runtime);
    }
    if let Some(thumb) = &meta.thumbnail {
        element(&mut doc, "thumb", thumb);
        element(&mut doc, "cover", thumb);
    }
    element(&mut doc, "season", "1");
    element(&mut doc, "episode", "1");

    doc.push_str("</episodedetails>\n");
    doc
}

fn element(doc: &mut String, name: &str, text: &str) {
    doc.push_str(&format!("  <{name}>{}</{name}>\n", escape(text)));
}

/// Escape the five XML special characters.
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}
