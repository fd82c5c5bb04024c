//! Markdown rendering for published pages.
//!
//! Converts a vault document's raw markdown into sanitized HTML ready
//! for deployment:
//!
//! - `[[Target]]` wikilinks and internal markdown links are rewritten
//!   to deployment-relative paths under the owning page's slug folder,
//! - `![[file]]` embeds and markdown images become concrete media tags
//!   (`<img>`, `<video>`, `<audio>`, pdf `<embed>`, or a download link)
//!   with the source reduced to a bare filename,
//! - external `http(s)`/`data:` URLs pass through verbatim,
//! - raw inline HTML from the source is escaped rather than emitted.
//!
//! The media tag chosen for an embed is keyed by file extension via a
//! static table, never by sniffing content.

mod media;
mod page;
mod renderer;
mod slugify;
mod util;

pub use media::{MediaKind, media_kind, media_tag};
pub use page::render_page;
pub use renderer::PageRenderer;
pub use slugify::normalize_slug;
pub use util::escape_html;
