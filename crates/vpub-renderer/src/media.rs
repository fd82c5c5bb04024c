//! Extension-keyed media tag generation.
//!
//! Embedded files are turned into concrete HTML tags based on a static
//! extension table. Unrecognized extensions fall back to a download
//! link rather than failing the render.

use crate::util::escape_html;

/// Media category for an embedded file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    /// Rendered as `<img>`.
    Image,
    /// Rendered as `<video controls>`.
    Video,
    /// Rendered as `<audio controls>`.
    Audio,
    /// Rendered as an inline pdf `<embed>`.
    Pdf,
    /// Rendered as a download link.
    Other,
}

/// Image extensions rendered with `<img>`.
const IMAGE_EXTENSIONS: &[&str] = &["avif", "bmp", "gif", "jpeg", "jpg", "png", "svg", "webp"];

/// Video extensions rendered with `<video>`.
const VIDEO_EXTENSIONS: &[&str] = &["mkv", "mov", "mp4", "ogv", "webm"];

/// Audio extensions rendered with `<audio>`.
const AUDIO_EXTENSIONS: &[&str] = &["3gp", "flac", "m4a", "mp3", "ogg", "wav", "webm"];

/// Classify a lowercased file extension.
#[must_use]
pub fn media_kind(extension: &str) -> MediaKind {
    if IMAGE_EXTENSIONS.contains(&extension) {
        MediaKind::Image
    } else if VIDEO_EXTENSIONS.contains(&extension) {
        MediaKind::Video
    } else if AUDIO_EXTENSIONS.contains(&extension) {
        MediaKind::Audio
    } else if extension == "pdf" {
        MediaKind::Pdf
    } else {
        MediaKind::Other
    }
}

/// Build the HTML tag for an embedded file.
///
/// `src` is emitted as-is (callers pass either a bare filename for
/// vault files or an untouched external URL); `alt` is escaped.
#[must_use]
pub fn media_tag(kind: MediaKind, src: &str, alt: &str) -> String {
    let src = escape_html(src);
    match kind {
        MediaKind::Image => {
            format!(r#"<img src="{src}" alt="{}">"#, escape_html(alt))
        }
        MediaKind::Video => {
            format!(r#"<video controls src="{src}"></video>"#)
        }
        MediaKind::Audio => {
            format!(r#"<audio controls src="{src}"></audio>"#)
        }
        MediaKind::Pdf => {
            format!(r#"<embed src="{src}" type="application/pdf" width="100%" height="800px">"#)
        }
        MediaKind::Other => {
            let label = if alt.is_empty() {
                src.clone()
            } else {
                escape_html(alt)
            };
            format!(r#"<a href="{src}" download>{label}</a>"#)
        }
    }
}
