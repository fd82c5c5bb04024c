//! Vault error type with semantic kinds and backend context.

use std::path::PathBuf;

/// Semantic error categories for vault operations.
#[derive(Debug, PartialEq, Eq)]
#[non_exhaustive]
pub enum VaultErrorKind {
    /// File does not exist in the vault.
    NotFound,
    /// Permission denied by the backing store.
    PermissionDenied,
    /// Path escapes the vault root or is otherwise malformed.
    InvalidPath,
    /// File content is not valid UTF-8 where text was expected.
    NotText,
    /// Other/unknown error category.
    Other,
}

/// Vault error with semantic kind and backend-specific source.
#[derive(Debug)]
pub struct VaultError {
    /// Semantic error category.
    pub kind: VaultErrorKind,
    /// Path context (if applicable).
    pub path: Option<PathBuf>,
    /// Backend identifier (e.g. "Fs", "Mock").
    pub backend: Option<&'static str>,
    source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl VaultError {
    /// Create a new vault error.
    #[must_use]
    pub fn new(kind: VaultErrorKind) -> Self {
        Self {
            kind,
            path: None,
            backend: None,
            source: None,
        }
    }

    /// Attach path context.
    #[must_use]
    pub fn with_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.path = Some(path.into());
        self
    }

    /// Attach backend identifier.
    #[must_use]
    pub fn with_backend(mut self, backend: &'static str) -> Self {
        self.backend = Some(backend);
        self
    }

    /// Attach the underlying error source.
    #[must_use]
    pub fn with_source(mut self, source: impl std::error::Error + Send + Sync + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// Create a not found error with path.
    #[must_use]
    pub fn not_found(path: impl Into<PathBuf>) -> Self {
        Self::new(VaultErrorKind::NotFound).with_path(path)
    }

    /// Create a vault error from an I/O error.
    #[must_use]
    pub fn io(err: std::io::Error, path: Option<PathBuf>) -> Self {
        let kind = match err.kind() {
            std::io::ErrorKind::NotFound => VaultErrorKind::NotFound,
            std::io::ErrorKind::PermissionDenied => VaultErrorKind::PermissionDenied,
            _ => VaultErrorKind::Other,
        };
        let mut error = Self::new(kind).with_source(err);
        if let Some(p) = path {
            error = error.with_path(p);
        }
        error
    }
}

impl std::fmt::Display for VaultError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Format: "[Backend] Kind: message (path: foo/bar)"
        if let Some(backend) = self.backend {
            write!(f, "[{backend}] ")?;
        }

        let kind_str = match self.kind {
            VaultErrorKind::NotFound => "Not found",
            VaultErrorKind::PermissionDenied => "Permission denied",
            VaultErrorKind::InvalidPath => "Invalid path",
            VaultErrorKind::NotText => "Not a text file",
            VaultErrorKind::Other => "Error",
        };

        write!(f, "{kind_str}")?;

        if let Some(source) = &self.source {
            write!(f, ": {source}")?;
        }

        if let Some(path) = &self.path {
            write!(f, " (path: {})", path.display())?;
        }

        Ok(())
    }
}

impl std::error::Error for VaultError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_ref()
            .map(|s| s.as_ref() as &(dyn std::error::Error + 'static))
    }
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use super::*;

    #[test]
    fn test_not_found_constructor() {
        let err = VaultError::not_found("notes/a.md");

        assert_eq!(err.kind, VaultErrorKind::NotFound);
        assert_eq!(err.path.as_deref(), Some(Path::new("notes/a.md")));
    }

    #[test]
    fn test_io_maps_not_found() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err = VaultError::io(io_err, Some(PathBuf::from("a.md")));

        assert_eq!(err.kind, VaultErrorKind::NotFound);
        assert_eq!(err.path.as_deref(), Some(Path::new("a.md")));
    }

    #[test]
    fn test_io_maps_permission_denied() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err = VaultError::io(io_err, None);

        assert_eq!(err.kind, VaultErrorKind::PermissionDenied);
    }

    #[test]
    fn test_display_full() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err = VaultError::new(VaultErrorKind::NotFound)
            .with_backend("Fs")
            .with_path("notes/a.md")
            .with_source(io_err);

        assert_eq!(err.to_string(), "[Fs] Not found: missing (path: notes/a.md)");
    }

    #[test]
    fn test_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<VaultError>();
    }
}
