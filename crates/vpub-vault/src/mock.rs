//! Mock vault implementation for testing.
//!
//! Provides [`MockVault`] for unit testing without filesystem access.

use std::collections::BTreeMap;

use crate::error::{VaultError, VaultErrorKind};
use crate::vault::{Vault, VaultFile};

/// Backend identifier for error context.
const BACKEND: &str = "Mock";

/// In-memory vault for testing.
///
/// Use the builder methods to configure the mock with test data.
///
/// # Example
///
/// ```
/// use vpub_vault::{MockVault, Vault};
///
/// let vault = MockVault::new()
///     .with_text("a.md", "Hello [[B]]")
///     .with_binary("pic.png", vec![1, 2, 3]);
///
/// assert!(vault.exists("a.md"));
/// assert_eq!(vault.read_binary("pic.png").unwrap(), vec![1, 2, 3]);
/// ```
#[derive(Debug, Default)]
pub struct MockVault {
    texts: BTreeMap<String, String>,
    binaries: BTreeMap<String, Vec<u8>>,
}

impl MockVault {
    /// Create a new empty mock vault.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a text file.
    #[must_use]
    pub fn with_text(mut self, path: impl Into<String>, content: impl Into<String>) -> Self {
        self.texts.insert(path.into(), content.into());
        self
    }

    /// Add a binary file.
    #[must_use]
    pub fn with_binary(mut self, path: impl Into<String>, content: Vec<u8>) -> Self {
        self.binaries.insert(path.into(), content);
        self
    }

    /// Remove a file, simulating deletion from the vault.
    pub fn remove(&mut self, path: &str) {
        self.texts.remove(path);
        self.binaries.remove(path);
    }
}

impl Vault for MockVault {
    fn list(&self) -> Result<Vec<VaultFile>, VaultError> {
        let mut files: Vec<VaultFile> = self
            .texts
            .keys()
            .chain(self.binaries.keys())
            .map(VaultFile::new)
            .collect();
        files.sort();
        Ok(files)
    }

    fn read_text(&self, path: &str) -> Result<String, VaultError> {
        if self.binaries.contains_key(path) {
            return Err(VaultError::new(VaultErrorKind::NotText)
                .with_backend(BACKEND)
                .with_path(path));
        }
        self.texts
            .get(path)
            .cloned()
            .ok_or_else(|| VaultError::not_found(path).with_backend(BACKEND))
    }

    fn read_binary(&self, path: &str) -> Result<Vec<u8>, VaultError> {
        if let Some(bytes) = self.binaries.get(path) {
            return Ok(bytes.clone());
        }
        self.texts
            .get(path)
            .map(|s| s.as_bytes().to_vec())
            .ok_or_else(|| VaultError::not_found(path).with_backend(BACKEND))
    }

    fn exists(&self, path: &str) -> bool {
        self.texts.contains_key(path) || self.binaries.contains_key(path)
    }
}
