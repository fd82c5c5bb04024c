//! Vault abstraction for the vpub publisher.
//!
//! A vault is a directory tree of markdown documents and media files.
//! The [`Vault`] trait gives the publisher path-addressed access to
//! text and binary content plus link-target resolution, independent of
//! the backing store.
//!
//! # Path Convention
//!
//! All path parameters are vault-relative paths with `/` separators
//! (e.g. `"notes/guide.md"`, `"media/pic.png"`). Backends map these to
//! their internal representation.

mod error;
mod fs;
#[cfg(any(test, feature = "mock"))]
mod mock;
mod vault;

pub use error::{VaultError, VaultErrorKind};
pub use fs::FsVault;
#[cfg(any(test, feature = "mock"))]
pub use mock::MockVault;
pub use vault::{Vault, VaultFile};
