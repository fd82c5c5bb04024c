//! One-hop link and embed graph discovery.
//!
//! Given a root document, finds the documents it links to and the
//! media assets the root or any linked document embeds. Depth is
//! exactly one hop: links inside linked documents are never followed,
//! which bounds the publication set and keeps page naming local to
//! one slug folder.

use std::collections::BTreeSet;
use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;
use vpub_vault::{Vault, VaultError};

/// `[[Target]]` / `![[file]]` double-bracket references; the optional
/// leading `!` marks an embed.
static WIKI_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(!?)\[\[([^\[\]\n]+)\]\]").unwrap());

/// Markdown `[text](target)` / `![alt](target)` references.
static MARKDOWN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(!?)\[[^\]\n]*\]\(([^)\n]+)\)").unwrap());

/// Files reachable from one root document.
///
/// Sets keep discovery deterministic for identical vault state; no
/// meaning attaches to the ordering.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct Discovery {
    /// Vault paths of one-hop linked documents.
    pub linked: BTreeSet<String>,
    /// Vault paths of embedded media assets, from the root and every
    /// linked document.
    pub assets: BTreeSet<String>,
}

/// A raw reference found in document text.
struct Reference {
    target: String,
    embed: bool,
}

/// Discover the publication set of `root`.
///
/// Unresolvable references are skipped; only a missing or unreadable
/// root is an error.
///
/// # Errors
///
/// Returns [`VaultError`] if the root document cannot be read.
pub fn discover(vault: &dyn Vault, root: &str) -> Result<Discovery, VaultError> {
    let text = vault.read_text(root)?;

    let mut discovery = Discovery::default();
    collect(vault, root, &text, Some(&mut discovery.linked), &mut discovery.assets);
    discovery.linked.remove(root);

    // One hop only: linked documents contribute assets, not links.
    for path in discovery.linked.clone() {
        match vault.read_text(&path) {
            Ok(linked_text) => {
                collect(vault, &path, &linked_text, None, &mut discovery.assets);
            }
            Err(err) => debug!(document = %path, error = %err, "skipping unreadable linked document"),
        }
    }

    Ok(discovery)
}

/// Scan one document's text for references.
///
/// `linked` is `None` when scanning a linked document, where only
/// assets are collected.
fn collect(
    vault: &dyn Vault,
    source: &str,
    text: &str,
    mut linked: Option<&mut BTreeSet<String>>,
    assets: &mut BTreeSet<String>,
) {
    for reference in parse_references(text) {
        let Some(file) = vault.resolve_link(&reference.target, source) else {
            debug!(reference = %reference.target, source, "unresolved reference");
            continue;
        };

        if file.is_document() {
            // Embedded notes render alongside linked notes, so both
            // count as one-hop links.
            if let Some(linked) = linked.as_deref_mut() {
                linked.insert(file.path);
            }
        } else if reference.embed {
            assets.insert(file.path);
        }
    }
}

/// Extract internal reference targets from markdown text.
///
/// External `http(s)`/`data:` targets and same-page `#` anchors are
/// excluded here; everything else is handed to link resolution.
fn parse_references(text: &str) -> Vec<Reference> {
    let mut references = Vec::new();

    for caps in WIKI_RE.captures_iter(text) {
        let target = caps[2].split('|').next().unwrap_or(&caps[2]).trim();
        push_reference(&mut references, target, !caps[1].is_empty());
    }

    for caps in MARKDOWN_RE.captures_iter(text) {
        let target = clean_markdown_target(&caps[2]);
        push_reference(&mut references, target, !caps[1].is_empty());
    }

    references
}

fn push_reference(references: &mut Vec<Reference>, target: &str, embed: bool) {
    if target.is_empty()
        || target.starts_with('#')
        || target.starts_with("http://")
        || target.starts_with("https://")
        || target.starts_with("data:")
    {
        return;
    }
    references.push(Reference {
        target: target.to_owned(),
        embed,
    });
}

/// Strip angle brackets and trailing titles from a markdown link target.
fn clean_markdown_target(raw: &str) -> &str {
    let raw = raw.trim();
    if let Some(stripped) = raw.strip_prefix('<') {
        return stripped.split('>').next().unwrap_or(stripped);
    }
    raw.split_whitespace().next().unwrap_or(raw)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use vpub_vault::MockVault;

    use super::*;

    fn paths(set: &BTreeSet<String>) -> Vec<&str> {
        set.iter().map(String::as_str).collect()
    }

    #[test]
    fn test_discovers_wikilinked_document() {
        let vault = MockVault::new()
            .with_text("A.md", "See [[B]]")
            .with_text("B.md", "no links");

        let discovery = discover(&vault, "A.md").unwrap();
        assert_eq!(paths(&discovery.linked), vec!["B.md"]);
        assert!(discovery.assets.is_empty());
    }

    #[test]
    fn test_discovers_markdown_linked_document() {
        let vault = MockVault::new()
            .with_text("A.md", "See [b](notes/B.md)")
            .with_text("notes/B.md", "no links");

        let discovery = discover(&vault, "A.md").unwrap();
        assert_eq!(paths(&discovery.linked), vec!["notes/B.md"]);
    }

    #[test]
    fn test_discovers_embedded_asset() {
        let vault = MockVault::new()
            .with_text("A.md", "![[pic.png]]")
            .with_binary("media/pic.png", vec![1]);

        let discovery = discover(&vault, "A.md").unwrap();
        assert_eq!(paths(&discovery.assets), vec!["media/pic.png"]);
    }

    #[test]
    fn test_assets_collected_from_linked_documents() {
        let vault = MockVault::new()
            .with_text("A.md", "[[B]]")
            .with_text("B.md", "![[chart.png]]")
            .with_binary("chart.png", vec![1]);

        let discovery = discover(&vault, "A.md").unwrap();
        assert_eq!(paths(&discovery.assets), vec!["chart.png"]);
    }

    #[test]
    fn test_one_hop_limit() {
        let vault = MockVault::new()
            .with_text("A.md", "[[B]]")
            .with_text("B.md", "[[E]]")
            .with_text("E.md", "deep");

        let discovery = discover(&vault, "A.md").unwrap();
        assert_eq!(paths(&discovery.linked), vec!["B.md"]);
        assert!(!discovery.linked.contains("E.md"));
    }

    #[test]
    fn test_external_targets_excluded() {
        let vault = MockVault::new().with_text(
            "A.md",
            "[site](https://example.com) ![img](https://example.com/x.png)",
        );

        let discovery = discover(&vault, "A.md").unwrap();
        assert!(discovery.linked.is_empty());
        assert!(discovery.assets.is_empty());
    }

    #[test]
    fn test_unresolved_references_skipped() {
        let vault = MockVault::new().with_text("A.md", "[[Missing]] ![[gone.png]]");

        let discovery = discover(&vault, "A.md").unwrap();
        assert!(discovery.linked.is_empty());
        assert!(discovery.assets.is_empty());
    }

    #[test]
    fn test_embedded_note_counts_as_link() {
        let vault = MockVault::new()
            .with_text("A.md", "![[B]]")
            .with_text("B.md", "body");

        let discovery = discover(&vault, "A.md").unwrap();
        assert_eq!(paths(&discovery.linked), vec!["B.md"]);
    }

    #[test]
    fn test_deduplicates_by_resolved_file() {
        let vault = MockVault::new()
            .with_text("A.md", "[[B]] and [b again](B.md) and ![[pic.png]] ![p](pic.png)")
            .with_text("B.md", "x")
            .with_binary("pic.png", vec![1]);

        let discovery = discover(&vault, "A.md").unwrap();
        assert_eq!(paths(&discovery.linked), vec!["B.md"]);
        assert_eq!(paths(&discovery.assets), vec!["pic.png"]);
    }

    #[test]
    fn test_self_link_ignored() {
        let vault = MockVault::new().with_text("A.md", "[[A]]");

        let discovery = discover(&vault, "A.md").unwrap();
        assert!(discovery.linked.is_empty());
    }

    #[test]
    fn test_missing_root_errors() {
        let vault = MockVault::new();

        assert!(discover(&vault, "A.md").is_err());
    }

    #[test]
    fn test_wikilink_alias_and_heading_stripped() {
        let vault = MockVault::new()
            .with_text("A.md", "[[B#section|see b]]")
            .with_text("B.md", "x");

        let discovery = discover(&vault, "A.md").unwrap();
        assert_eq!(paths(&discovery.linked), vec!["B.md"]);
    }

    #[test]
    fn test_asset_resolved_by_name_search() {
        let vault = MockVault::new()
            .with_text("A.md", "![[pic.png]]")
            .with_binary("attachments/pic.png", vec![1]);

        let discovery = discover(&vault, "A.md").unwrap();
        assert_eq!(paths(&discovery.assets), vec!["attachments/pic.png"]);
    }
}
