//! Full-page HTML template.

use crate::util::escape_html;

/// Stylesheet embedded in every published page.
const PAGE_STYLE: &str = "\
:root{color-scheme:light dark}\
body{max-width:46rem;margin:0 auto;padding:2rem 1rem;\
font-family:-apple-system,BlinkMacSystemFont,'Segoe UI',sans-serif;line-height:1.6}\
img,video,embed{max-width:100%}\
pre{overflow-x:auto;padding:.75rem;background:rgba(128,128,128,.1)}\
code{font-family:ui-monospace,monospace}\
blockquote{margin-left:0;padding-left:1rem;border-left:3px solid rgba(128,128,128,.4)}";

/// Wrap rendered body markup in a complete HTML document.
///
/// Pure function of `{title, body}`; the body is assumed to be
/// already-sanitized markup from [`PageRenderer`](crate::PageRenderer).
#[must_use]
pub fn render_page(title: &str, body: &str) -> String {
    let title = escape_html(title);
    format!(
        "<!DOCTYPE html>\n\
         <html>\n\
         <head>\n\
         <meta charset=\"utf-8\">\n\
         <meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n\
         <title>{title}</title>\n\
         <style>{PAGE_STYLE}</style>\n\
         </head>\n\
         <body>\n\
         <article>\n{body}\n</article>\n\
         </body>\n\
         </html>\n"
    )
}
