//! Error types for the Vercel API client.

/// Error from Vercel API operations.
#[derive(Debug, thiserror::Error)]
pub enum VercelError {
    /// HTTP request failed (network error, timeout, etc).
    #[error("HTTP request failed")]
    HttpRequest(#[from] ureq::Error),

    /// HTTP response error (API returned error status).
    #[error("HTTP error: {status} - {body}")]
    HttpResponse {
        /// HTTP status code.
        status: u16,
        /// Response body (may contain error details).
        body: String,
    },

    /// Deployment reached a terminal failure state.
    #[error("deployment {id} ended in state {state}")]
    DeploymentFailed {
        /// Deployment id.
        id: String,
        /// Terminal ready state (ERROR or CANCELED).
        state: String,
    },

    /// Timed out waiting for a deployment to become ready.
    #[error("timed out waiting for deployment {0}")]
    Timeout(String),
}
