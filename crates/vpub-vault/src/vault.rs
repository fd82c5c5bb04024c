//! Vault trait and file handle type.

use crate::error::VaultError;

/// Handle to a stored file, identified by its vault-relative path.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct VaultFile {
    /// Vault-relative path with `/` separators (e.g. "notes/guide.md").
    pub path: String,
}

impl VaultFile {
    /// Create a handle for the given vault-relative path.
    #[must_use]
    pub fn new(path: impl Into<String>) -> Self {
        Self { path: path.into() }
    }

    /// Filename component (e.g. "guide.md").
    #[must_use]
    pub fn name(&self) -> &str {
        self.path.rsplit('/').next().unwrap_or(&self.path)
    }

    /// Filename without the final extension (e.g. "guide").
    #[must_use]
    pub fn stem(&self) -> &str {
        let name = self.name();
        name.rsplit_once('.').map_or(name, |(stem, _)| stem)
    }

    /// Lowercased final extension without the dot, if any.
    #[must_use]
    pub fn extension(&self) -> Option<String> {
        self.name()
            .rsplit_once('.')
            .map(|(_, ext)| ext.to_lowercase())
    }

    /// True if this is a markdown document.
    #[must_use]
    pub fn is_document(&self) -> bool {
        self.extension().as_deref() == Some("md")
    }
}

/// Resolve `.` and `..` segments in a joined vault path.
///
/// Returns `None` if `..` would escape the vault root.
fn normalize_path(path: &str) -> Option<String> {
    let mut segments: Vec<&str> = Vec::new();
    for segment in path.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop()?;
            }
            other => segments.push(other),
        }
    }
    Some(segments.join("/"))
}

/// Path-addressed access to vault content.
///
/// Implementations handle backend specifics; consumers treat paths as
/// opaque vault-relative identifiers. Link resolution follows the
/// note-taking convention: a link target is tried as an exact path,
/// as a path with `.md` appended, relative to the linking document's
/// directory, and finally by filename search across the whole vault.
pub trait Vault: Send + Sync {
    /// List every file in the vault.
    ///
    /// # Errors
    ///
    /// Returns [`VaultError`] if the backing store cannot be enumerated.
    fn list(&self) -> Result<Vec<VaultFile>, VaultError>;

    /// Read a file as UTF-8 text.
    ///
    /// # Errors
    ///
    /// Returns [`VaultError`] if the file is missing, unreadable, or
    /// not valid UTF-8.
    fn read_text(&self, path: &str) -> Result<String, VaultError>;

    /// Read a file as raw bytes.
    ///
    /// # Errors
    ///
    /// Returns [`VaultError`] if the file is missing or unreadable.
    fn read_binary(&self, path: &str) -> Result<Vec<u8>, VaultError>;

    /// Check whether a file exists at the given vault-relative path.
    ///
    /// Returns `false` on errors (treats errors as "doesn't exist").
    fn exists(&self, path: &str) -> bool;

    /// Resolve a link target to a stored file.
    ///
    /// `source` is the vault-relative path of the document containing
    /// the link, used for relative resolution. Heading (`#`) and block
    /// (`^`) fragments are stripped from the target before lookup.
    /// Returns `None` when nothing in the vault matches.
    fn resolve_link(&self, link: &str, source: &str) -> Option<VaultFile> {
        let target = link.split(['#', '^']).next().unwrap_or(link).trim();
        if target.is_empty() {
            return None;
        }

        if self.exists(target) {
            return Some(VaultFile::new(target));
        }
        let with_md = format!("{target}.md");
        if self.exists(&with_md) {
            return Some(VaultFile::new(with_md));
        }

        // Relative to the linking document's directory
        if let Some((dir, _)) = source.rsplit_once('/') {
            for candidate in [
                format!("{dir}/{target}"),
                format!("{dir}/{target}.md"),
            ] {
                if let Some(normalized) = normalize_path(&candidate) {
                    if self.exists(&normalized) {
                        return Some(VaultFile::new(normalized));
                    }
                }
            }
        }

        self.find_by_name(target)
    }

    /// Find a file anywhere in the vault by filename or stem.
    ///
    /// Matching is case-insensitive; ties are broken by shortest path.
    /// Returns `None` if listing fails or nothing matches.
    fn find_by_name(&self, name: &str) -> Option<VaultFile> {
        let wanted = name.rsplit('/').next().unwrap_or(name).to_lowercase();
        let files = self.list().ok()?;
        files
            .into_iter()
            .filter(|f| {
                let file_name = f.name().to_lowercase();
                let file_stem = f.stem().to_lowercase();
                file_name == wanted || file_stem == wanted
            })
            .min_by_key(|f| f.path.len())
    }
}
