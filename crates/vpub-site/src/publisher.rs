//! Publish/unpublish orchestration against the deployment backend.
//!
//! Every operation follows the same cycle: mutate the registry, save
//! it, rebuild the whole-site manifest, submit it as one atomic
//! deployment, stamp the returned id on every registry entry, save
//! again, then prune deployments nothing references anymore.
//!
//! The registry mutation is deliberately durable before the deployment
//! is attempted: a failed publish keeps the slug reserved for the next
//! attempt, at the cost of a registry entry with no deployment behind
//! it.

use std::collections::BTreeSet;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use rayon::prelude::*;
use tracing::{debug, info};
use vpub_vault::Vault;
use vpub_vercel::{
    Deployment, DeploymentFile, DeploymentSummary, ReadyState, VercelClient, VercelError,
};

use crate::manifest::build_manifest;
use crate::registry::{Registry, RegistryError};
use crate::slug::resolve_slug;

/// Interval between deployment status polls.
pub const POLL_INTERVAL: Duration = Duration::from_secs(2);

/// Total time budget for deployment status polling.
pub const MAX_POLL_WAIT: Duration = Duration::from_secs(60);

/// Error from a publish, unpublish, or wait operation.
#[derive(Debug, thiserror::Error)]
pub enum PublishError {
    /// The document to publish does not exist in the vault.
    #[error("document not found in vault: {0}")]
    DocumentMissing(String),

    /// Unpublish of a document that has no registry entry.
    #[error("page is not published: {0}")]
    NotPublished(String),

    /// Deployment API call failed.
    #[error(transparent)]
    Vercel(#[from] VercelError),

    /// Registry persistence failed.
    #[error(transparent)]
    Registry(#[from] RegistryError),
}

/// Result of a successful publish or unpublish.
#[derive(Debug)]
pub struct PublishOutcome {
    /// Slug of the page the operation targeted.
    pub slug: String,
    /// The accepted deployment (typically still queued or building).
    pub deployment: Deployment,
    /// Number of files in the submitted manifest.
    pub file_count: usize,
    /// Number of pages the deployment serves.
    pub page_count: usize,
}

/// Deployment backend operations the publisher needs.
///
/// [`VercelClient`] is the production implementation; tests substitute
/// an in-memory fake.
pub trait DeployTarget: Sync {
    /// Submit a complete file set as one deployment.
    ///
    /// # Errors
    ///
    /// Returns [`VercelError`] if submission fails.
    fn create_deployment(&self, files: &[DeploymentFile]) -> Result<Deployment, VercelError>;

    /// Current ready state of a deployment.
    ///
    /// # Errors
    ///
    /// Returns [`VercelError`] if the status fetch fails.
    fn deployment_status(&self, id: &str) -> Result<ReadyState, VercelError>;

    /// Delete a deployment.
    ///
    /// # Errors
    ///
    /// Returns [`VercelError`] if deletion fails.
    fn delete_deployment(&self, id: &str) -> Result<(), VercelError>;

    /// List the project's deployments.
    ///
    /// # Errors
    ///
    /// Returns [`VercelError`] if listing fails.
    fn list_deployments(&self) -> Result<Vec<DeploymentSummary>, VercelError>;
}

impl DeployTarget for VercelClient {
    fn create_deployment(&self, files: &[DeploymentFile]) -> Result<Deployment, VercelError> {
        Self::create_deployment(self, files)
    }

    fn deployment_status(&self, id: &str) -> Result<ReadyState, VercelError> {
        Self::deployment_status(self, id)
    }

    fn delete_deployment(&self, id: &str) -> Result<(), VercelError> {
        Self::delete_deployment(self, id)
    }

    fn list_deployments(&self) -> Result<Vec<DeploymentSummary>, VercelError> {
        Self::list_deployments(self)
    }
}

/// URL of a published page on the given domain.
#[must_use]
pub fn page_url(domain: &str, slug: &str) -> String {
    format!("https://{domain}/{slug}/")
}

/// Drives the publish/unpublish cycle for one vault and project.
///
/// Operations are single-flow: one runs at a time, and nothing guards
/// against a second publisher racing this one (last submitted manifest
/// wins).
pub struct Publisher<'a, D: DeployTarget> {
    vault: &'a dyn Vault,
    target: &'a D,
    registry: Registry,
    registry_path: PathBuf,
}

impl<'a, D: DeployTarget> Publisher<'a, D> {
    /// Create a publisher, loading the registry from `registry_path`.
    ///
    /// # Errors
    ///
    /// Returns [`PublishError::Registry`] if an existing registry file
    /// cannot be read.
    pub fn new(
        vault: &'a dyn Vault,
        target: &'a D,
        registry_path: impl Into<PathBuf>,
    ) -> Result<Self, PublishError> {
        let registry_path = registry_path.into();
        let registry = Registry::load(&registry_path)?;
        Ok(Self {
            vault,
            target,
            registry,
            registry_path,
        })
    }

    /// Currently registered pages.
    #[must_use]
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Publish a document, redeploying the whole site.
    ///
    /// # Errors
    ///
    /// Returns [`PublishError`] if the document is missing, the
    /// registry cannot be saved, or the deployment is rejected. The
    /// slug reservation survives a failed deployment.
    pub fn publish(
        &mut self,
        document: &str,
        custom_slug: Option<&str>,
    ) -> Result<PublishOutcome, PublishError> {
        if !self.vault.exists(document) {
            return Err(PublishError::DocumentMissing(document.to_owned()));
        }

        let slug = resolve_slug(&self.registry, document, custom_slug);
        info!(document, slug, "publishing");

        // Reserve the slug before any network I/O.
        self.registry.upsert(document, &slug);
        self.registry.save(&self.registry_path)?;

        let (deployment, file_count) = self.deploy_and_stamp()?;
        Ok(PublishOutcome {
            slug,
            deployment,
            file_count,
            page_count: self.registry.len(),
        })
    }

    /// Unpublish a document, redeploying the site without it.
    ///
    /// Unpublishing the last page still deploys; the resulting site
    /// holds only the hosting configuration entry.
    ///
    /// # Errors
    ///
    /// Returns [`PublishError::NotPublished`] if the document has no
    /// registry entry, or any deployment/persistence failure.
    pub fn unpublish(&mut self, document: &str) -> Result<PublishOutcome, PublishError> {
        let removed = self
            .registry
            .remove(document)
            .ok_or_else(|| PublishError::NotPublished(document.to_owned()))?;
        info!(document, slug = %removed.slug, "unpublishing");
        self.registry.save(&self.registry_path)?;

        let (deployment, file_count) = self.deploy_and_stamp()?;
        Ok(PublishOutcome {
            slug: removed.slug,
            deployment,
            file_count,
            page_count: self.registry.len(),
        })
    }

    /// Resolve the slug and manifest a publish of `document` would
    /// deploy, without deploying or touching the stored registry.
    ///
    /// # Errors
    ///
    /// Returns [`PublishError::DocumentMissing`] if the document is
    /// not in the vault.
    pub fn preview(
        &self,
        document: &str,
        custom_slug: Option<&str>,
    ) -> Result<(String, Vec<DeploymentFile>), PublishError> {
        if !self.vault.exists(document) {
            return Err(PublishError::DocumentMissing(document.to_owned()));
        }
        let slug = resolve_slug(&self.registry, document, custom_slug);
        let mut registry = self.registry.clone();
        registry.upsert(document, &slug);
        Ok((slug, build_manifest(self.vault, &registry)))
    }

    /// Poll a deployment until it is READY.
    ///
    /// Not part of the default publish flow; callers that want
    /// confirmation opt in. Polls every [`POLL_INTERVAL`] up to
    /// [`MAX_POLL_WAIT`] total.
    ///
    /// # Errors
    ///
    /// Returns [`VercelError::DeploymentFailed`] for ERROR/CANCELED,
    /// [`VercelError::Timeout`] when the wait budget is exhausted, or
    /// any status-fetch failure.
    pub fn wait_for_deployment(&self, id: &str) -> Result<(), PublishError> {
        let start = Instant::now();
        loop {
            let state = self.target.deployment_status(id)?;
            debug!(deployment = id, state = %state, "polled deployment");

            if state.is_ready() {
                return Ok(());
            }
            if state.is_failed() {
                return Err(VercelError::DeploymentFailed {
                    id: id.to_owned(),
                    state: state.to_string(),
                }
                .into());
            }
            if start.elapsed() >= MAX_POLL_WAIT {
                return Err(VercelError::Timeout(id.to_owned()).into());
            }
            std::thread::sleep(POLL_INTERVAL);
        }
    }

    /// Build, deploy, stamp every page with the new deployment id,
    /// persist, then prune.
    fn deploy_and_stamp(&mut self) -> Result<(Deployment, usize), PublishError> {
        let manifest = build_manifest(self.vault, &self.registry);
        let file_count = manifest.len();

        let deployment = self.target.create_deployment(&manifest)?;
        info!(deployment = %deployment.id, files = file_count, "deployment accepted");

        self.registry.stamp_deployment(&deployment.id);
        self.registry.save(&self.registry_path)?;

        self.prune_stale(&deployment.id);
        Ok((deployment, file_count))
    }

    /// Delete deployments no registry entry references.
    ///
    /// `current` is the deployment that now serves the site and is
    /// always kept; with an empty registry nothing references it, yet
    /// it must survive (unpublishing the last page deploys a site that
    /// holds only the hosting configuration).
    ///
    /// Advisory cleanup: every failure here is swallowed, since a
    /// leftover deployment never affects site correctness.
    fn prune_stale(&self, current: &str) {
        let mut keep: BTreeSet<&str> = self.registry.deployment_ids().into_iter().collect();
        keep.insert(current);

        let summaries = match self.target.list_deployments() {
            Ok(summaries) => summaries,
            Err(err) => {
                debug!(error = %err, "skipping deployment pruning");
                return;
            }
        };

        let stale: Vec<DeploymentSummary> = summaries
            .into_iter()
            .filter(|s| !keep.contains(s.uid.as_str()))
            .collect();
        if stale.is_empty() {
            return;
        }

        debug!(count = stale.len(), "pruning stale deployments");
        stale.par_iter().for_each(|summary| {
            if let Err(err) = self.target.delete_deployment(&summary.uid) {
                debug!(deployment = %summary.uid, error = %err, "failed to prune deployment");
            }
        });
    }
}
