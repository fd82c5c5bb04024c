//! Vercel deployment API client.
//!
//! Sync HTTP client for the Vercel REST API with bearer token
//! authentication. Covers the surface the publisher needs: atomic
//! file-upload deployments, status polling, deployment deletion and
//! listing, project domains, and credential validation.

mod client;
mod error;
mod types;

pub use client::VercelClient;
pub use error::VercelError;
pub use types::{Deployment, DeploymentFile, DeploymentSummary, FileEncoding, ReadyState};
