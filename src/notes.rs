//! GitHub release notes
//!
//! The release body is the changelog excerpt of the version being released.
//! Publishing is a capability so the pipeline can be exercised without
//! network access.

use crate::error::{ReleasyError, Result};
use serde::{Deserialize, Serialize};
use std::sync::Mutex;
use std::time::Duration;

pub const GITHUB_API: &str = "https://api.github.com";
pub const TOKEN_ENV: &str = "GITHUB_API_TOKEN";
const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(30);

/// Body of a GitHub "create release" request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReleaseDraft {
    pub name: String,
    pub tag_name: String,
    pub body: String,
    pub draft: bool,
    pub prerelease: bool,
}

impl ReleaseDraft {
    /// Draft named after its tag; an empty body becomes a single space
    pub fn for_tag(tag_name: &str, body: Option<String>, prerelease: bool) -> Self {
        ReleaseDraft {
            name: tag_name.to_string(),
            tag_name: tag_name.to_string(),
            body: body.unwrap_or_else(|| " ".to_string()),
            draft: false,
            prerelease,
        }
    }
}

/// Capability for posting release notes
pub trait ReleaseNotesPublisher {
    fn create_release(&self, auth: &str, org: &str, repo: &str, draft: &ReleaseDraft) -> Result<()>;
}

/// [ReleaseNotesPublisher] talking to the GitHub REST API
pub struct GitHubPublisher {
    client: reqwest::blocking::Client,
}

impl GitHubPublisher {
    /// Build a client; `timeout` defaults to 30 seconds
    pub fn new(timeout: Option<Duration>) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .user_agent(concat!("releasy/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout.unwrap_or(DEFAULT_HTTP_TIMEOUT))
            .build()
            .map_err(|e| ReleasyError::release_notes(format!("Failed to create HTTP client: {}", e)))?;

        Ok(GitHubPublisher { client })
    }

    fn releases_url(&self, org: &str, repo: &str) -> String {
        format!("{}/repos/{}/{}/releases", GITHUB_API, org, repo)
    }
}

impl ReleaseNotesPublisher for GitHubPublisher {
    fn create_release(&self, auth: &str, org: &str, repo: &str, draft: &ReleaseDraft) -> Result<()> {
        let url = self.releases_url(org, repo);
        tracing::debug!(%url, tag = %draft.tag_name, "creating GitHub release");

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("token {}", auth))
            .header("Accept", "application/vnd.github+json")
            .json(draft)
            .send()
            .map_err(|e| ReleasyError::release_notes(format!("Error on request {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(ReleasyError::release_notes(format!(
                "GitHub answered HTTP {} for {}/{}: {}",
                status,
                org,
                repo,
                body.trim()
            )));
        }

        Ok(())
    }
}

/// [ReleaseNotesPublisher] recording every draft instead of posting it
#[derive(Debug, Default)]
pub struct MockPublisher {
    fail: bool,
    releases: Mutex<Vec<(String, String, ReleaseDraft)>>,
}

impl MockPublisher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every request fail
    pub fn with_failure(mut self) -> Self {
        self.fail = true;
        self
    }

    /// `(org, repo, draft)` of every request, in order
    pub fn releases(&self) -> Vec<(String, String, ReleaseDraft)> {
        self.releases.lock().map(|r| r.clone()).unwrap_or_default()
    }
}

impl ReleaseNotesPublisher for MockPublisher {
    fn create_release(&self, _auth: &str, org: &str, repo: &str, draft: &ReleaseDraft) -> Result<()> {
        if self.fail {
            return Err(ReleasyError::release_notes(format!(
                "GitHub answered HTTP 401 Unauthorized for {}/{}",
                org, repo
            )));
        }
        if let Ok(mut releases) = self.releases.lock() {
            releases.push((org.to_string(), repo.to_string(), draft.clone()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_draft_defaults() {
        let draft = ReleaseDraft::for_tag("v1.1.0", None, false);
        assert_eq!(draft.name, "v1.1.0");
        assert_eq!(draft.tag_name, "v1.1.0");
        assert_eq!(draft.body, " ");
        assert!(!draft.draft);
    }

    #[test]
    fn test_draft_serializes_as_github_payload() {
        let draft = ReleaseDraft::for_tag("v2.0.0-beta", Some("### Added\n- x".to_string()), true);
        let json = serde_json::to_value(&draft).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "name": "v2.0.0-beta",
                "tag_name": "v2.0.0-beta",
                "body": "### Added\n- x",
                "draft": false,
                "prerelease": true,
            })
        );
    }

    #[test]
    fn test_releases_url() {
        let publisher = GitHubPublisher::new(None).unwrap();
        assert_eq!(
            publisher.releases_url("my-org", "my-repo"),
            "https://api.github.com/repos/my-org/my-repo/releases"
        );
    }
}
