//! Document rendering with link and embed rewriting.

use std::sync::LazyLock;

use pulldown_cmark::{CowStr, Event, Options, Parser, Tag, TagEnd, html};
use regex::Regex;
use tracing::debug;
use vpub_vault::Vault;

use crate::media::{MediaKind, media_kind, media_tag};
use crate::slugify::normalize_slug;
use crate::util::{escape_html, is_external_url};

/// `![[file]]` / `![[file|alt]]` embed references.
static EMBED_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"!\[\[([^\[\]\n]+)\]\]").unwrap());

/// `[[Target]]` / `[[Target|alias]]` wikilinks (embeds already consumed).
static WIKILINK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[\[([^\[\]\n]+)\]\]").unwrap());

/// Renders one vault document to sanitized body markup.
///
/// The renderer needs vault access to resolve embed references to
/// stored files; it never writes anything. Link rewriting targets the
/// deployment layout: documents live at `/{slug}/{page}` and assets sit
/// next to the page as bare filenames.
pub struct PageRenderer<'v> {
    vault: &'v dyn Vault,
}

impl<'v> PageRenderer<'v> {
    /// Create a renderer over the given vault.
    #[must_use]
    pub fn new(vault: &'v dyn Vault) -> Self {
        Self { vault }
    }

    /// Render markdown to body HTML.
    ///
    /// * `source_path` - vault path of the document, for resolving
    ///   relative references;
    /// * `slug_folder` - owning page's slug; when given, internal
    ///   document links become absolute-rooted `/{slug}/{target}`
    ///   paths, otherwise the bare target is used.
    #[must_use]
    pub fn render(&self, markdown: &str, source_path: &str, slug_folder: Option<&str>) -> String {
        let prepared = preprocess_wiki_syntax(markdown);

        let options = Options::ENABLE_TABLES
            | Options::ENABLE_STRIKETHROUGH
            | Options::ENABLE_TASKLISTS
            | Options::ENABLE_GFM;

        let mut parser = Parser::new_ext(&prepared, options);
        let mut events: Vec<Event> = Vec::new();

        while let Some(event) = parser.next() {
            match event {
                Event::Start(Tag::Image { dest_url, .. }) => {
                    // Consume the alt text up to the closing tag; the
                    // whole image becomes one opaque HTML event.
                    let mut alt = String::new();
                    for inner in parser.by_ref() {
                        match inner {
                            Event::End(TagEnd::Image) => break,
                            Event::Text(t) | Event::Code(t) => alt.push_str(&t),
                            _ => {}
                        }
                    }
                    let tag = self.embed_tag(&dest_url, &alt, source_path);
                    events.push(Event::Html(CowStr::from(tag)));
                }
                Event::Start(Tag::Link {
                    link_type,
                    dest_url,
                    title,
                    id,
                }) => {
                    let dest = rewrite_link_dest(&dest_url, slug_folder);
                    events.push(Event::Start(Tag::Link {
                        link_type,
                        dest_url: CowStr::from(dest),
                        title,
                        id,
                    }));
                }
                // Raw HTML from the source is emitted as text, which
                // the writer escapes.
                Event::Html(raw) => events.push(Event::Text(raw)),
                Event::InlineHtml(raw) => events.push(Event::Text(raw)),
                other => events.push(other),
            }
        }

        let mut output = String::with_capacity(markdown.len() * 3 / 2);
        html::push_html(&mut output, events.into_iter());
        output
    }

    /// Build the media tag for an embedded reference.
    fn embed_tag(&self, dest: &str, alt: &str, source_path: &str) -> String {
        if is_external_url(dest) {
            // External sources stay verbatim; markdown image syntax
            // implies an image when the extension says nothing.
            let kind = match media_kind(&url_extension(dest)) {
                MediaKind::Other => MediaKind::Image,
                kind => kind,
            };
            return media_tag(kind, dest, alt);
        }

        match self.vault.resolve_link(dest, source_path) {
            Some(file) => {
                let kind = media_kind(file.extension().as_deref().unwrap_or(""));
                media_tag(kind, file.name(), alt)
            }
            None => {
                debug!(reference = dest, source = source_path, "unresolved embed");
                escape_html(dest)
            }
        }
    }
}

/// Rewrite wiki syntax into standard markdown before parsing.
///
/// `![[file|alt]]` becomes an image and `[[Target|alias]]` a link, both
/// with angle-bracket destinations so filenames with spaces survive
/// the markdown parser.
fn preprocess_wiki_syntax(markdown: &str) -> String {
    let step = EMBED_RE.replace_all(markdown, |caps: &regex::Captures<'_>| {
        let (target, alt) = split_alias(&caps[1]);
        format!("![{alt}](<{target}>)")
    });
    WIKILINK_RE
        .replace_all(&step, |caps: &regex::Captures<'_>| {
            let (target, alias) = split_alias(&caps[1]);
            format!("[{alias}](<{target}>)")
        })
        .into_owned()
}

/// Split `target|alias`, defaulting the alias to the target text.
fn split_alias(reference: &str) -> (&str, &str) {
    match reference.split_once('|') {
        Some((target, alias)) => (target.trim(), alias.trim()),
        None => (reference.trim(), reference.trim()),
    }
}

/// Rewrite an internal link destination to its deployment path.
///
/// External URLs and same-page `#` anchors pass through unchanged, as
/// do links to non-markdown files: only documents deploy as pages, so
/// a rewritten file link would point at nothing. Document targets are
/// reduced to their normalized stem (extension and directory stripped)
/// and rooted under the slug folder when one is given.
fn rewrite_link_dest(dest: &str, slug_folder: Option<&str>) -> String {
    if is_external_url(dest) || dest.starts_with('#') {
        return dest.to_owned();
    }

    let target = dest.split(['#', '^']).next().unwrap_or(dest);
    let name = target.rsplit('/').next().unwrap_or(target);
    let stem = match name.rsplit_once('.') {
        Some((stem, ext)) if ext.eq_ignore_ascii_case("md") => stem,
        Some(_) => return dest.to_owned(),
        None => name,
    };
    let page = normalize_slug(stem);

    match slug_folder {
        Some(slug) => format!("/{slug}/{page}"),
        None => page,
    }
}

/// Extension of an external URL's path component, lowercased.
fn url_extension(url: &str) -> String {
    let path = url.split(['?', '#']).next().unwrap_or(url);
    path.rsplit('/')
        .next()
        .and_then(|name| name.rsplit_once('.'))
        .map(|(_, ext)| ext.to_lowercase())
        .unwrap_or_default()
}
