//! Whole-site manifest building.
//!
//! The manifest is the complete path-to-content mapping for one
//! deployment. It is rebuilt from scratch on every publish by
//! iterating the registry, so it is fully determined by current vault
//! content plus registry state. Stale content from unpublished pages
//! disappears by omission; the hosting backend replaces the whole
//! file set per deployment.

use std::collections::BTreeMap;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use rayon::prelude::*;
use tracing::warn;
use vpub_renderer::{PageRenderer, normalize_slug, render_page};
use vpub_vault::{Vault, VaultFile};
use vpub_vercel::DeploymentFile;

use crate::registry::Registry;
use crate::walker::discover;

/// Path of the static hosting configuration entry.
pub const SITE_CONFIG_PATH: &str = "vercel.json";

/// Hosting configuration: serve clean URLs without trailing slashes.
fn site_config_entry() -> DeploymentFile {
    let config = serde_json::json!({
        "cleanUrls": true,
        "trailingSlash": false,
    });
    DeploymentFile {
        file: SITE_CONFIG_PATH.to_owned(),
        data: config.to_string(),
        encoding: None,
    }
}

/// Build the deployment manifest for every published page.
///
/// Per page: the root renders at `{slug}/index.html`, each one-hop
/// linked document at `{slug}/{normalized-name}.html`, and each
/// embedded asset at `{slug}/{filename}` as base64. Namespacing every
/// file under its owning page's slug keeps independently discovered
/// subgraphs from colliding; two same-named assets under one slug are
/// last write wins.
///
/// Pages whose backing document has vanished from the vault are
/// skipped with a warning; their registry entries stay until the user
/// unpublishes them.
#[must_use]
pub fn build_manifest(vault: &dyn Vault, registry: &Registry) -> Vec<DeploymentFile> {
    let mut entries: BTreeMap<String, DeploymentFile> = BTreeMap::new();
    entries.insert(SITE_CONFIG_PATH.to_owned(), site_config_entry());

    let renderer = PageRenderer::new(vault);

    for page in registry.all() {
        let discovery = match discover(vault, &page.path) {
            Ok(discovery) => discovery,
            Err(err) => {
                warn!(page = %page.path, error = %err, "skipping page with missing document");
                continue;
            }
        };

        let Ok(text) = vault.read_text(&page.path) else {
            warn!(page = %page.path, "skipping unreadable page");
            continue;
        };
        let root = VaultFile::new(page.path.clone());
        let body = renderer.render(&text, &page.path, Some(&page.slug));
        entries.insert(
            format!("{}/index.html", page.slug),
            DeploymentFile::text(
                format!("{}/index.html", page.slug),
                render_page(root.stem(), &body),
            ),
        );

        for linked in &discovery.linked {
            let Ok(linked_text) = vault.read_text(linked) else {
                warn!(document = %linked, "skipping unreadable linked document");
                continue;
            };
            let file = VaultFile::new(linked.clone());
            let name = normalize_slug(file.stem());
            if name.is_empty() {
                continue;
            }
            let body = renderer.render(&linked_text, linked, Some(&page.slug));
            let path = format!("{}/{name}.html", page.slug);
            entries.insert(
                path.clone(),
                DeploymentFile::text(path, render_page(file.stem(), &body)),
            );
        }

        // Asset reads are independent; do them in parallel.
        let assets: Vec<(String, DeploymentFile)> = discovery
            .assets
            .par_iter()
            .filter_map(|asset| {
                let bytes = match vault.read_binary(asset) {
                    Ok(bytes) => bytes,
                    Err(err) => {
                        warn!(asset = %asset, error = %err, "skipping unreadable asset");
                        return None;
                    }
                };
                let file = VaultFile::new(asset.clone());
                let path = format!("{}/{}", page.slug, file.name());
                Some((path.clone(), DeploymentFile::base64(path, BASE64.encode(&bytes))))
            })
            .collect();
        entries.extend(assets);
    }

    entries.into_values().collect()
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use vpub_vault::MockVault;

    use super::*;
    use crate::slug::derived_slug;

    fn manifest_paths(manifest: &[DeploymentFile]) -> Vec<&str> {
        manifest.iter().map(|f| f.file.as_str()).collect()
    }

    fn entry<'a>(manifest: &'a [DeploymentFile], path: &str) -> &'a DeploymentFile {
        manifest
            .iter()
            .find(|f| f.file == path)
            .unwrap_or_else(|| panic!("no manifest entry {path}"))
    }

    #[test]
    fn test_empty_registry_is_config_only() {
        let vault = MockVault::new();
        let manifest = build_manifest(&vault, &Registry::new());

        assert_eq!(manifest_paths(&manifest), vec![SITE_CONFIG_PATH]);
        let config = entry(&manifest, SITE_CONFIG_PATH);
        assert!(config.data.contains("\"cleanUrls\":true"));
        assert!(config.data.contains("\"trailingSlash\":false"));
        assert!(config.encoding.is_none());
    }

    #[test]
    fn test_scenario_root_link_and_asset() {
        let vault = MockVault::new()
            .with_text("A.md", "[[B]] and ![[pic.png]]")
            .with_text("B.md", "no further links")
            .with_binary("pic.png", vec![0x89, 0x50]);

        let mut registry = Registry::new();
        let slug = derived_slug("A.md");
        registry.upsert("A.md", &slug);

        let manifest = build_manifest(&vault, &registry);
        assert_eq!(
            manifest_paths(&manifest),
            vec![
                format!("{slug}/b.html"),
                format!("{slug}/index.html"),
                format!("{slug}/pic.png"),
                SITE_CONFIG_PATH.to_owned(),
            ]
        );

        let index = entry(&manifest, &format!("{slug}/index.html"));
        assert!(index.data.contains(&format!("href=\"/{slug}/b\"")));
        assert_eq!(index.encoding, Some(vpub_vercel::FileEncoding::Utf8));

        let asset = entry(&manifest, &format!("{slug}/pic.png"));
        assert_eq!(asset.encoding, Some(vpub_vercel::FileEncoding::Base64));
        assert_eq!(asset.data, BASE64.encode([0x89u8, 0x50]));
    }

    #[test]
    fn test_manifest_contains_every_published_page() {
        let vault = MockVault::new()
            .with_text("A.md", "[[B]] ![[pic.png]]")
            .with_text("B.md", "x")
            .with_binary("pic.png", vec![1])
            .with_text("D.md", "unrelated");

        let mut registry = Registry::new();
        registry.upsert("A.md", "aaa");
        registry.upsert("D.md", "ddd");

        let manifest = build_manifest(&vault, &registry);
        let paths = manifest_paths(&manifest);
        assert!(paths.contains(&"aaa/index.html"));
        assert!(paths.contains(&"aaa/b.html"));
        assert!(paths.contains(&"aaa/pic.png"));
        assert!(paths.contains(&"ddd/index.html"));
    }

    #[test]
    fn test_unpublished_page_leaves_no_entries() {
        let vault = MockVault::new()
            .with_text("A.md", "[[B]]")
            .with_text("B.md", "x")
            .with_text("D.md", "y");

        let mut registry = Registry::new();
        registry.upsert("A.md", "aaa");
        registry.upsert("D.md", "ddd");
        registry.remove("A.md");

        let manifest = build_manifest(&vault, &registry);
        let paths = manifest_paths(&manifest);
        assert!(!paths.iter().any(|p| p.starts_with("aaa/")));
        assert!(paths.contains(&"ddd/index.html"));
    }

    #[test]
    fn test_shared_linked_name_namespaced_per_slug() {
        let vault = MockVault::new()
            .with_text("A.md", "[[shared/Notes]]")
            .with_text("shared/Notes.md", "x")
            .with_text("D.md", "[[other/Notes]]")
            .with_text("other/Notes.md", "y");

        let mut registry = Registry::new();
        registry.upsert("A.md", "aaa");
        registry.upsert("D.md", "ddd");

        let manifest = build_manifest(&vault, &registry);
        let paths = manifest_paths(&manifest);
        assert!(paths.contains(&"aaa/notes.html"));
        assert!(paths.contains(&"ddd/notes.html"));
    }

    #[test]
    fn test_vanished_document_skipped_registry_kept() {
        let vault = MockVault::new().with_text("D.md", "y");

        let mut registry = Registry::new();
        registry.upsert("gone.md", "ggg");
        registry.upsert("D.md", "ddd");

        let manifest = build_manifest(&vault, &registry);
        let paths = manifest_paths(&manifest);
        assert!(!paths.iter().any(|p| p.starts_with("ggg/")));
        assert!(paths.contains(&"ddd/index.html"));
        // The stale entry is not auto-pruned.
        assert!(registry.get("gone.md").is_some());
    }

    #[test]
    fn test_asset_placed_as_bare_filename() {
        let vault = MockVault::new()
            .with_text("A.md", "![[pic.png]]")
            .with_binary("deeply/nested/pic.png", vec![1]);

        let mut registry = Registry::new();
        registry.upsert("A.md", "aaa");

        let manifest = build_manifest(&vault, &registry);
        assert!(manifest_paths(&manifest).contains(&"aaa/pic.png"));
    }
}
