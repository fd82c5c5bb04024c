//! Wire types for the Vercel deployment API.

use serde::{Deserialize, Serialize};

/// Content encoding of an uploaded file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FileEncoding {
    /// Plain UTF-8 text.
    #[serde(rename = "utf-8")]
    Utf8,
    /// Base64-encoded binary content.
    Base64,
}

/// One file in a deployment upload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeploymentFile {
    /// Path within the deployment (e.g. "abc123/index.html").
    pub file: String,
    /// Text or base64 content.
    pub data: String,
    /// Encoding tag; omitted for plain text.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub encoding: Option<FileEncoding>,
}

impl DeploymentFile {
    /// Create a plain text file entry.
    #[must_use]
    pub fn text(file: impl Into<String>, data: impl Into<String>) -> Self {
        Self {
            file: file.into(),
            data: data.into(),
            encoding: Some(FileEncoding::Utf8),
        }
    }

    /// Create a base64-encoded binary file entry.
    #[must_use]
    pub fn base64(file: impl Into<String>, data: impl Into<String>) -> Self {
        Self {
            file: file.into(),
            data: data.into(),
            encoding: Some(FileEncoding::Base64),
        }
    }
}

/// Deployment ready state reported by the API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReadyState {
    /// Accepted, waiting to build.
    Queued,
    /// Build in progress.
    Building,
    /// Live.
    Ready,
    /// Build or upload failed.
    Error,
    /// Canceled before completion.
    Canceled,
    /// Unrecognized state (API may add new ones).
    Other(String),
}

impl ReadyState {
    /// Parse the API's state string.
    #[must_use]
    pub fn parse(state: &str) -> Self {
        match state {
            "QUEUED" | "INITIALIZING" => Self::Queued,
            "BUILDING" => Self::Building,
            "READY" => Self::Ready,
            "ERROR" => Self::Error,
            "CANCELED" => Self::Canceled,
            other => Self::Other(other.to_owned()),
        }
    }

    /// True for READY.
    #[must_use]
    pub fn is_ready(&self) -> bool {
        matches!(self, Self::Ready)
    }

    /// True for ERROR and CANCELED.
    #[must_use]
    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Error | Self::Canceled)
    }
}

impl std::fmt::Display for ReadyState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Queued => "QUEUED",
            Self::Building => "BUILDING",
            Self::Ready => "READY",
            Self::Error => "ERROR",
            Self::Canceled => "CANCELED",
            Self::Other(other) => other,
        };
        f.write_str(s)
    }
}

/// Deployment record returned on creation.
#[derive(Debug, Clone, Deserialize)]
pub struct Deployment {
    /// Deployment id (e.g. "dpl_...").
    pub id: String,
    /// Deployment URL without scheme.
    pub url: String,
    /// Deployment name (the project name).
    pub name: String,
    /// Ready state at creation time, if reported.
    #[serde(rename = "readyState")]
    pub ready_state: Option<String>,
}

/// Deployment summary from the list endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct DeploymentSummary {
    /// Deployment id.
    pub uid: String,
}

/// Response envelope for the deployment list endpoint.
#[derive(Debug, Deserialize)]
pub(crate) struct DeploymentsResponse {
    pub deployments: Vec<DeploymentSummary>,
}

/// Response envelope for the status endpoint.
#[derive(Debug, Deserialize)]
pub(crate) struct StatusResponse {
    #[serde(rename = "readyState")]
    pub ready_state: String,
}

/// One project domain.
#[derive(Debug, Deserialize)]
pub(crate) struct DomainInfo {
    pub name: String,
    #[serde(default)]
    pub verified: bool,
}

/// Response envelope for the project domains endpoint.
#[derive(Debug, Deserialize)]
pub(crate) struct DomainsResponse {
    pub domains: Vec<DomainInfo>,
}

/// Order project domains for display: verified custom domains first,
/// the default `{project}.vercel.app` domain appended last.
pub(crate) fn order_domains(domains: Vec<DomainInfo>, project: &str) -> Vec<String> {
    let default_domain = format!("{project}.vercel.app");
    let mut ordered: Vec<String> = domains
        .into_iter()
        .filter(|d| d.verified && d.name != default_domain)
        .map(|d| d.name)
        .collect();
    ordered.push(default_domain);
    ordered
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_file_encoding_serialization() {
        let text = DeploymentFile::text("a/index.html", "<html>");
        let json = serde_json::to_value(&text).unwrap();
        assert_eq!(json["encoding"], "utf-8");

        let binary = DeploymentFile::base64("a/pic.png", "AAAA");
        let json = serde_json::to_value(&binary).unwrap();
        assert_eq!(json["encoding"], "base64");
    }

    #[test]
    fn test_encoding_omitted_when_none() {
        let file = DeploymentFile {
            file: "vercel.json".to_owned(),
            data: "{}".to_owned(),
            encoding: None,
        };
        let json = serde_json::to_value(&file).unwrap();
        assert!(json.get("encoding").is_none());
    }

    #[test]
    fn test_ready_state_parse() {
        assert_eq!(ReadyState::parse("READY"), ReadyState::Ready);
        assert_eq!(ReadyState::parse("QUEUED"), ReadyState::Queued);
        assert_eq!(ReadyState::parse("BUILDING"), ReadyState::Building);
        assert_eq!(ReadyState::parse("ERROR"), ReadyState::Error);
        assert_eq!(ReadyState::parse("CANCELED"), ReadyState::Canceled);
        assert_eq!(
            ReadyState::parse("SOMETHING_NEW"),
            ReadyState::Other("SOMETHING_NEW".to_owned())
        );
    }

    #[test]
    fn test_ready_state_predicates() {
        assert!(ReadyState::Ready.is_ready());
        assert!(ReadyState::Error.is_failed());
        assert!(ReadyState::Canceled.is_failed());
        assert!(!ReadyState::Building.is_ready());
        assert!(!ReadyState::Building.is_failed());
    }

    #[test]
    fn test_order_domains_custom_verified_first() {
        let domains = vec![
            DomainInfo {
                name: "site.vercel.app".to_owned(),
                verified: true,
            },
            DomainInfo {
                name: "notes.example.com".to_owned(),
                verified: true,
            },
            DomainInfo {
                name: "pending.example.com".to_owned(),
                verified: false,
            },
        ];

        let ordered = order_domains(domains, "site");
        assert_eq!(
            ordered,
            vec!["notes.example.com".to_owned(), "site.vercel.app".to_owned()]
        );
    }

    #[test]
    fn test_order_domains_always_includes_default() {
        let ordered = order_domains(Vec::new(), "site");
        assert_eq!(ordered, vec!["site.vercel.app".to_owned()]);
    }
}
