//! Vercel REST API client.

use std::time::Duration;

use serde_json::json;
use tracing::{debug, info};
use ureq::Agent;

use crate::error::VercelError;
use crate::types::{
    Deployment, DeploymentFile, DeploymentSummary, DeploymentsResponse, DomainsResponse,
    ReadyState, StatusResponse, order_domains,
};

/// Default HTTP timeout in seconds.
const DEFAULT_TIMEOUT: u64 = 30;

/// API base URL.
const API_BASE: &str = "https://api.vercel.com";

/// Page size for the deployment list endpoint.
const LIST_LIMIT: u32 = 100;

/// Vercel REST API client.
///
/// All requests carry the bearer token; HTTP statuses are handled
/// manually so API error bodies can be surfaced in
/// [`VercelError::HttpResponse`].
pub struct VercelClient {
    agent: Agent,
    base_url: String,
    token: String,
    project: String,
}

impl VercelClient {
    /// Create a client for the given project.
    ///
    /// # Arguments
    /// * `token` - Vercel API bearer token
    /// * `project` - project name, used as the deployment name
    #[must_use]
    pub fn new(token: impl Into<String>, project: impl Into<String>) -> Self {
        let agent = Agent::config_builder()
            .timeout_global(Some(Duration::from_secs(DEFAULT_TIMEOUT)))
            .http_status_as_error(false)
            .build()
            .into();

        Self {
            agent,
            base_url: API_BASE.to_owned(),
            token: token.into(),
            project: project.into(),
        }
    }

    /// Override the API base URL (for tests against a local server).
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Project name this client deploys to.
    #[must_use]
    pub fn project(&self) -> &str {
        &self.project
    }

    fn bearer(&self) -> String {
        format!("Bearer {}", self.token)
    }

    /// Submit a complete file set as one atomic production deployment.
    ///
    /// Blocks until the API acknowledges receipt; the returned
    /// deployment is typically still queued or building.
    ///
    /// # Errors
    ///
    /// Returns [`VercelError`] on network failure or an error status
    /// from the API.
    pub fn create_deployment(
        &self,
        files: &[DeploymentFile],
    ) -> Result<Deployment, VercelError> {
        let url = format!("{}/v13/deployments", self.base_url);

        info!(
            project = %self.project,
            files = files.len(),
            "creating deployment"
        );

        let body = json!({
            "name": self.project,
            "files": files,
            "target": "production",
            "projectSettings": { "framework": null },
        });

        let response = self
            .agent
            .post(&url)
            .header("Authorization", &self.bearer())
            .send_json(&body)?;

        let status = response.status().as_u16();
        let mut body_reader = response.into_body();

        if status >= 400 {
            let error_body = body_reader
                .read_to_string()
                .unwrap_or_else(|_| "(unable to read error body)".to_owned());
            return Err(VercelError::HttpResponse {
                status,
                body: error_body,
            });
        }

        Ok(body_reader.read_json()?)
    }

    /// Fetch the current ready state of a deployment.
    ///
    /// # Errors
    ///
    /// Returns [`VercelError`] on network failure or an error status.
    pub fn deployment_status(&self, id: &str) -> Result<ReadyState, VercelError> {
        let url = format!("{}/v13/deployments/{id}", self.base_url);

        let response = self
            .agent
            .get(&url)
            .header("Authorization", &self.bearer())
            .call()?;

        let status = response.status().as_u16();
        let mut body_reader = response.into_body();

        if status >= 400 {
            let error_body = body_reader
                .read_to_string()
                .unwrap_or_else(|_| "(unable to read error body)".to_owned());
            return Err(VercelError::HttpResponse {
                status,
                body: error_body,
            });
        }

        let parsed: StatusResponse = body_reader.read_json()?;
        Ok(ReadyState::parse(&parsed.ready_state))
    }

    /// Delete a deployment by id.
    ///
    /// # Errors
    ///
    /// Returns [`VercelError`] on network failure or an error status.
    pub fn delete_deployment(&self, id: &str) -> Result<(), VercelError> {
        let url = format!("{}/v13/deployments/{id}", self.base_url);

        debug!(deployment = id, "deleting deployment");

        let response = self
            .agent
            .delete(&url)
            .header("Authorization", &self.bearer())
            .call()?;

        let status = response.status().as_u16();
        if status >= 400 {
            let error_body = response
                .into_body()
                .read_to_string()
                .unwrap_or_else(|_| "(unable to read error body)".to_owned());
            return Err(VercelError::HttpResponse {
                status,
                body: error_body,
            });
        }
        Ok(())
    }

    /// List deployments belonging to the project.
    ///
    /// # Errors
    ///
    /// Returns [`VercelError`] on network failure or an error status.
    pub fn list_deployments(&self) -> Result<Vec<DeploymentSummary>, VercelError> {
        let url = format!(
            "{}/v6/deployments?projectId={}&limit={LIST_LIMIT}",
            self.base_url, self.project
        );

        let response = self
            .agent
            .get(&url)
            .header("Authorization", &self.bearer())
            .call()?;

        let status = response.status().as_u16();
        let mut body_reader = response.into_body();

        if status >= 400 {
            let error_body = body_reader
                .read_to_string()
                .unwrap_or_else(|_| "(unable to read error body)".to_owned());
            return Err(VercelError::HttpResponse {
                status,
                body: error_body,
            });
        }

        let parsed: DeploymentsResponse = body_reader.read_json()?;
        Ok(parsed.deployments)
    }

    /// List domains serving the project.
    ///
    /// Verified custom domains come first; the default
    /// `{project}.vercel.app` domain is always appended last.
    ///
    /// # Errors
    ///
    /// Returns [`VercelError`] on network failure or an error status.
    pub fn domains(&self) -> Result<Vec<String>, VercelError> {
        let url = format!("{}/v9/projects/{}/domains", self.base_url, self.project);

        let response = self
            .agent
            .get(&url)
            .header("Authorization", &self.bearer())
            .call()?;

        let status = response.status().as_u16();
        let mut body_reader = response.into_body();

        if status >= 400 {
            // Domain listing is presentation-only; fall back to the
            // default domain rather than failing the caller.
            debug!(status, "domain listing failed, using default domain");
            return Ok(vec![format!("{}.vercel.app", self.project)]);
        }

        let parsed: DomainsResponse = body_reader.read_json()?;
        Ok(order_domains(parsed.domains, &self.project))
    }

    /// Check that the token can see the project.
    ///
    /// Returns `true` when the project endpoint answers 200, `false`
    /// on auth or not-found statuses.
    ///
    /// # Errors
    ///
    /// Returns [`VercelError`] on network failure or an unexpected
    /// error status.
    pub fn validate_credentials(&self) -> Result<bool, VercelError> {
        let url = format!("{}/v9/projects/{}", self.base_url, self.project);

        let response = self
            .agent
            .get(&url)
            .header("Authorization", &self.bearer())
            .call()?;

        let status = response.status().as_u16();
        match status {
            200 => Ok(true),
            401 | 403 | 404 => Ok(false),
            _ => {
                let error_body = response
                    .into_body()
                    .read_to_string()
                    .unwrap_or_else(|_| "(unable to read error body)".to_owned());
                Err(VercelError::HttpResponse {
                    status,
                    body: error_body,
                })
            }
        }
    }
}
