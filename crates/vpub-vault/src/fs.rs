//! Filesystem vault backend.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{VaultError, VaultErrorKind};
use crate::vault::{Vault, VaultFile};

/// Backend identifier for error context.
const BACKEND: &str = "Fs";

/// Vault backed by a directory tree on disk.
///
/// Hidden entries (names starting with `.`) are ignored, which keeps
/// tool state like `.git` and `.obsidian` out of the file listing.
#[derive(Debug)]
pub struct FsVault {
    root: PathBuf,
}

impl FsVault {
    /// Create a vault rooted at the given directory.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Vault root directory.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Map a vault-relative path to an on-disk path.
    ///
    /// Rejects absolute paths and `..` segments so a manifest entry can
    /// never read outside the vault root.
    fn disk_path(&self, path: &str) -> Result<PathBuf, VaultError> {
        if path.is_empty()
            || path.starts_with('/')
            || path.split('/').any(|s| s == "..")
        {
            return Err(VaultError::new(VaultErrorKind::InvalidPath)
                .with_backend(BACKEND)
                .with_path(path));
        }
        Ok(self.root.join(path))
    }

    fn collect_files(&self, dir: &Path, prefix: &str, files: &mut Vec<VaultFile>) {
        let Ok(entries) = fs::read_dir(dir) else {
            debug!(dir = %dir.display(), "skipping unreadable directory");
            return;
        };

        for entry in entries.filter_map(Result::ok) {
            let name = entry.file_name().to_string_lossy().into_owned();
            if name.starts_with('.') {
                continue;
            }
            let rel = if prefix.is_empty() {
                name.clone()
            } else {
                format!("{prefix}/{name}")
            };
            let is_dir = entry.file_type().is_ok_and(|t| t.is_dir());
            if is_dir {
                self.collect_files(&entry.path(), &rel, files);
            } else {
                files.push(VaultFile::new(rel));
            }
        }
    }
}

impl Vault for FsVault {
    fn list(&self) -> Result<Vec<VaultFile>, VaultError> {
        if !self.root.is_dir() {
            return Err(VaultError::new(VaultErrorKind::NotFound)
                .with_backend(BACKEND)
                .with_path(&self.root));
        }
        let mut files = Vec::new();
        self.collect_files(&self.root, "", &mut files);
        files.sort();
        Ok(files)
    }

    fn read_text(&self, path: &str) -> Result<String, VaultError> {
        let disk = self.disk_path(path)?;
        fs::read(&disk)
            .map_err(|e| VaultError::io(e, Some(disk.clone())).with_backend(BACKEND))
            .and_then(|bytes| {
                String::from_utf8(bytes).map_err(|e| {
                    VaultError::new(VaultErrorKind::NotText)
                        .with_backend(BACKEND)
                        .with_path(&disk)
                        .with_source(e)
                })
            })
    }

    fn read_binary(&self, path: &str) -> Result<Vec<u8>, VaultError> {
        let disk = self.disk_path(path)?;
        fs::read(&disk).map_err(|e| VaultError::io(e, Some(disk.clone())).with_backend(BACKEND))
    }

    fn exists(&self, path: &str) -> bool {
        self.disk_path(path).is_ok_and(|disk| disk.is_file())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn vault_with(files: &[(&str, &str)]) -> (tempfile::TempDir, FsVault) {
        let dir = tempfile::tempdir().unwrap();
        for (path, content) in files {
            let full = dir.path().join(path);
            if let Some(parent) = full.parent() {
                fs::create_dir_all(parent).unwrap();
            }
            fs::write(full, content).unwrap();
        }
        let vault = FsVault::new(dir.path());
        (dir, vault)
    }

    #[test]
    fn test_list_recursive_sorted() {
        let (_dir, vault) = vault_with(&[("b.md", "b"), ("notes/a.md", "a")]);

        let files = vault.list().unwrap();
        let paths: Vec<_> = files.iter().map(|f| f.path.as_str()).collect();
        assert_eq!(paths, vec!["b.md", "notes/a.md"]);
    }

    #[test]
    fn test_list_skips_hidden() {
        let (_dir, vault) = vault_with(&[(".obsidian/config", "{}"), ("a.md", "a")]);

        let files = vault.list().unwrap();
        assert_eq!(files.len(), 1);
        assert_eq!(files[0].path, "a.md");
    }

    #[test]
    fn test_read_text() {
        let (_dir, vault) = vault_with(&[("a.md", "# Title")]);

        assert_eq!(vault.read_text("a.md").unwrap(), "# Title");
    }

    #[test]
    fn test_read_text_missing() {
        let (_dir, vault) = vault_with(&[]);

        let err = vault.read_text("nope.md").unwrap_err();
        assert_eq!(err.kind, VaultErrorKind::NotFound);
    }

    #[test]
    fn test_read_binary() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("pic.png"), [0x89u8, 0x50, 0x4e]).unwrap();
        let vault = FsVault::new(dir.path());

        assert_eq!(vault.read_binary("pic.png").unwrap(), vec![0x89, 0x50, 0x4e]);
    }

    #[test]
    fn test_rejects_escaping_path() {
        let (_dir, vault) = vault_with(&[]);

        let err = vault.read_text("../outside.md").unwrap_err();
        assert_eq!(err.kind, VaultErrorKind::InvalidPath);
        assert!(!vault.exists("../outside.md"));
    }

    #[test]
    fn test_exists() {
        let (_dir, vault) = vault_with(&[("a.md", "a")]);

        assert!(vault.exists("a.md"));
        assert!(!vault.exists("b.md"));
    }
}
