//! Publication set building and deployment reconciliation.
//!
//! This crate holds the publishing core:
//!
//! - [`slug`]: stable per-document slug assignment,
//! - [`walker`]: one-hop link/embed graph discovery,
//! - [`registry`]: the durable record of published pages,
//! - [`manifest`]: merging every published page's subgraph into one
//!   whole-site file manifest,
//! - [`publisher`]: the atomic deploy / stamp / prune cycle.
//!
//! Every publish rebuilds the entire site from the registry: the
//! hosting backend replaces the whole file set per deployment, so
//! removal of unpublished pages falls out of simply not emitting them.

pub mod manifest;
pub mod publisher;
pub mod registry;
pub mod slug;
pub mod walker;

pub use manifest::{SITE_CONFIG_PATH, build_manifest};
pub use publisher::{DeployTarget, PublishError, PublishOutcome, Publisher, page_url};
pub use registry::{PublishedPage, Registry, RegistryError};
pub use slug::{derived_slug, resolve_slug};
pub use walker::{Discovery, discover};
