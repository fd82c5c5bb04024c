//! Stable slug assignment for published pages.

use sha2::{Digest, Sha256};
use vpub_renderer::normalize_slug;

use crate::registry::Registry;

/// Length in hex characters of a derived slug.
const DERIVED_SLUG_LEN: usize = 8;

/// Derive a slug from a document's vault path.
///
/// Stable under content changes; changes only when the document moves.
#[must_use]
pub fn derived_slug(path: &str) -> String {
    let digest = Sha256::digest(path.as_bytes());
    hex::encode(&digest[..DERIVED_SLUG_LEN / 2])
}

/// Resolve the slug a document publishes under.
///
/// Priority:
/// 1. a supplied custom slug, normalized - overwrites whatever the
///    registry held for this document;
/// 2. the slug already stored in the registry;
/// 3. a digest derived from the vault path.
///
/// A custom slug that normalizes to the empty string is ignored.
/// Nothing prevents two documents from being given the same custom
/// slug; the later publish owns the folder (last write wins).
///
/// Pure: consults only its arguments, never the network or the vault.
#[must_use]
pub fn resolve_slug(registry: &Registry, path: &str, custom: Option<&str>) -> String {
    if let Some(custom) = custom {
        let normalized = normalize_slug(custom);
        if !normalized.is_empty() {
            return normalized;
        }
    }
    if let Some(page) = registry.get(path) {
        return page.slug.clone();
    }
    derived_slug(path)
}
