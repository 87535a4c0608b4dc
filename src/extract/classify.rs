//! Pure predicates deciding whether a URL or MIME type looks like video or
//! image content.

/// File suffixes recognised as direct video links.
pub const VIDEO_EXTENSIONS: &[&str] = &[
    ".mp4", ".mkv", ".avi", ".mov", ".webm", ".m3u8", ".ts", ".flv", ".ogv", ".3gp", ".f4v",
];

/// File suffixes accepted for thumbnails found in HTML.
pub const IMAGE_EXTENSIONS: &[&str] = &[".jpg", ".jpeg", ".png", ".gif", ".webp", ".svg", ".bmp"];

const PLAYLIST_MIME_TYPES: &[&str] = &["application/x-mpegurl", "application/vnd.apple.mpegurl"];

/// False for empty and whitespace-only URLs.
pub fn has_url(url: &str) -> bool {
    !url.trim().is_empty()
}

/// The part of `url` before the first `?`.
pub fn strip_query(url: &str) -> &str {
    url.split_once('?').map_or(url, |(path, _)| path)
}

fn has_suffix(url: &str, suffixes: &[&str]) -> bool {
    let path = strip_query(url).to_lowercase();
    suffixes.iter().any(|suffix| path.ends_with(suffix))
}

/// True when the URL, ignoring any query string, ends in a video extension.
pub fn is_video_url(url: &str) -> bool {
    has_suffix(url, VIDEO_EXTENSIONS)
}

/// True for `video/*` and the two HLS playlist types.
pub fn is_video_mime(mime_type: &str) -> bool {
    let mime = mime_type.trim().to_lowercase();
    mime.starts_with("video/") || PLAYLIST_MIME_TYPES.contains(&mime.as_str())
}

/// Loose check for "image" anywhere in a MIME type or link relation.
pub fn is_image_like(mime_or_rel: &str) -> bool {
    mime_or_rel.to_lowercase().contains("image")
}

/// True when the URL, ignoring any query string, ends in an image extension.
pub fn is_image_url(url: &str) -> bool {
    has_suffix(url, IMAGE_EXTENSIONS)
}
