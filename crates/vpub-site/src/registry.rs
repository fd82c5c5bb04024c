//! Durable registry of published pages.
//!
//! The registry is the only mutable shared state in the system. All
//! mutations are in-memory; durability requires an explicit
//! [`Registry::save`]. A crash between the two leaves the stored view
//! stale until the next load.

use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

/// Registry persistence error.
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    /// I/O error reading or writing the registry file.
    #[error("registry I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// Malformed registry file.
    #[error("registry parse error: {0}")]
    Json(#[from] serde_json::Error),
}

/// One published root document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublishedPage {
    /// Vault path of the document; its identity. A rename makes this
    /// entry point at nothing and the page is skipped at build time
    /// until explicitly unpublished.
    pub path: String,
    /// Slug folder the page deploys under.
    pub slug: String,
    /// Unix timestamp of the last publish attempt.
    pub published_at: u64,
    /// Id of the last deployment that included this page. After any
    /// successful deploy every entry carries the same id.
    #[serde(default)]
    pub deployment_id: Option<String>,
}

/// Collection of published pages, persisted as JSON.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Registry {
    pages: Vec<PublishedPage>,
}

impl Registry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Load the registry from disk.
    ///
    /// A missing file yields an empty registry; nothing has been
    /// published yet.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError`] if the file exists but cannot be read
    /// or parsed.
    pub fn load(path: &Path) -> Result<Self, RegistryError> {
        if !path.exists() {
            return Ok(Self::new());
        }
        let content = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Write the registry to disk, creating parent directories.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError`] on I/O failure.
    pub fn save(&self, path: &Path) -> Result<(), RegistryError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// All published pages, in insertion order.
    #[must_use]
    pub fn all(&self) -> &[PublishedPage] {
        &self.pages
    }

    /// Look up a page by document path.
    #[must_use]
    pub fn get(&self, path: &str) -> Option<&PublishedPage> {
        self.pages.iter().find(|p| p.path == path)
    }

    /// Number of published pages.
    #[must_use]
    pub fn len(&self) -> usize {
        self.pages.len()
    }

    /// True when nothing is published.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    /// Insert or update the page for `path`.
    ///
    /// Updates the slug and publish timestamp of an existing entry;
    /// the deployment id is left for [`Self::stamp_deployment`].
    pub fn upsert(&mut self, path: &str, slug: &str) {
        let published_at = unix_now();
        if let Some(page) = self.pages.iter_mut().find(|p| p.path == path) {
            page.slug = slug.to_owned();
            page.published_at = published_at;
        } else {
            self.pages.push(PublishedPage {
                path: path.to_owned(),
                slug: slug.to_owned(),
                published_at,
                deployment_id: None,
            });
        }
    }

    /// Remove the page for `path`. Returns the removed entry, if any.
    pub fn remove(&mut self, path: &str) -> Option<PublishedPage> {
        let index = self.pages.iter().position(|p| p.path == path)?;
        Some(self.pages.remove(index))
    }

    /// Stamp every page with the deployment id that now serves it.
    ///
    /// One deployment carries the whole site, so the id fans out to
    /// all entries.
    pub fn stamp_deployment(&mut self, deployment_id: &str) {
        for page in &mut self.pages {
            page.deployment_id = Some(deployment_id.to_owned());
        }
    }

    /// Deployment ids currently referenced by any page.
    #[must_use]
    pub fn deployment_ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self
            .pages
            .iter()
            .filter_map(|p| p.deployment_id.as_deref())
            .collect();
        ids.sort_unstable();
        ids.dedup();
        ids
    }
}

fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_upsert_inserts_then_updates() {
        let mut registry = Registry::new();
        registry.upsert("a.md", "slug-one");
        registry.upsert("a.md", "slug-two");

        assert_eq!(registry.len(), 1);
        assert_eq!(registry.get("a.md").unwrap().slug, "slug-two");
    }

    #[test]
    fn test_upsert_preserves_deployment_id() {
        let mut registry = Registry::new();
        registry.upsert("a.md", "s");
        registry.stamp_deployment("dpl_1");
        registry.upsert("a.md", "s2");

        assert_eq!(
            registry.get("a.md").unwrap().deployment_id.as_deref(),
            Some("dpl_1")
        );
    }

    #[test]
    fn test_remove() {
        let mut registry = Registry::new();
        registry.upsert("a.md", "s");

        let removed = registry.remove("a.md").unwrap();
        assert_eq!(removed.path, "a.md");
        assert!(registry.is_empty());
        assert!(registry.remove("a.md").is_none());
    }

    #[test]
    fn test_stamp_deployment_fans_out() {
        let mut registry = Registry::new();
        registry.upsert("a.md", "sa");
        registry.upsert("d.md", "sd");
        registry.stamp_deployment("dpl_9");

        for page in registry.all() {
            assert_eq!(page.deployment_id.as_deref(), Some("dpl_9"));
        }
    }

    #[test]
    fn test_deployment_ids_deduped() {
        let mut registry = Registry::new();
        registry.upsert("a.md", "sa");
        registry.upsert("d.md", "sd");
        registry.stamp_deployment("dpl_9");

        assert_eq!(registry.deployment_ids(), vec!["dpl_9"]);
    }

    #[test]
    fn test_load_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let registry = Registry::load(&dir.path().join("published.json")).unwrap();

        assert!(registry.is_empty());
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state/published.json");

        let mut registry = Registry::new();
        registry.upsert("a.md", "s");
        registry.stamp_deployment("dpl_1");
        registry.save(&path).unwrap();

        let loaded = Registry::load(&path).unwrap();
        assert_eq!(loaded.all(), registry.all());
    }

    #[test]
    fn test_load_malformed_file_errors() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("published.json");
        std::fs::write(&path, "not json").unwrap();

        assert!(matches!(
            Registry::load(&path),
            Err(RegistryError::Json(_))
        ));
    }
}
