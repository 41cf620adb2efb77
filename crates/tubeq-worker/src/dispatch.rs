//! Remote worker trigger via GitHub `repository_dispatch`.

use std::fmt;
use std::time::Duration;

use reqwest::Client;
use serde::Serialize;
use tracing::info;

use crate::error::{WorkerError, WorkerResult};

/// Event type the worker workflow listens for.
pub const TRIGGER_EVENT: &str = "trigger-worker";

const DEFAULT_GITHUB_API_URL: &str = "https://api.github.com";

#[derive(Debug, Serialize)]
struct DispatchRequest<'a> {
    event_type: &'a str,
}

/// Posts a `repository_dispatch` event that starts a worker run.
#[derive(Clone)]
pub struct WorkflowDispatcher {
    http: Client,
    api_url: String,
    owner: String,
    repo: String,
    token: String,
}

impl fmt::Debug for WorkflowDispatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WorkflowDispatcher")
            .field("api_url", &self.api_url)
            .field("owner", &self.owner)
            .field("repo", &self.repo)
            .finish_non_exhaustive()
    }
}

impl WorkflowDispatcher {
    pub fn new(
        owner: impl Into<String>,
        repo: impl Into<String>,
        token: impl Into<String>,
    ) -> WorkerResult<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(30))
            .user_agent(concat!("tubeq-dispatch/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            http,
            api_url: DEFAULT_GITHUB_API_URL.to_string(),
            owner: owner.into(),
            repo: repo.into(),
            token: token.into(),
        })
    }

    /// Point at a different API host (GitHub Enterprise, tests).
    pub fn with_api_url(mut self, api_url: impl Into<String>) -> Self {
        self.api_url = api_url.into();
        self
    }

    /// Create from `GITHUB_TOKEN`, `GITHUB_REPO_OWNER` and `GITHUB_REPO_NAME`.
    ///
    /// `GITHUB_API_URL`, when set, replaces the public API host.
    pub fn from_env() -> WorkerResult<Self> {
        let var = |name: &str| std::env::var(name).ok().filter(|v| !v.trim().is_empty());

        let dispatcher = match (var("GITHUB_REPO_OWNER"), var("GITHUB_REPO_NAME"), var("GITHUB_TOKEN")) {
            (Some(owner), Some(repo), Some(token)) => Self::new(owner, repo, token)?,
            _ => {
                return Err(WorkerError::config_error(
                    "GITHUB_TOKEN, GITHUB_REPO_OWNER and GITHUB_REPO_NAME must be set",
                ))
            }
        };

        Ok(match var("GITHUB_API_URL") {
            Some(api_url) => dispatcher.with_api_url(api_url),
            None => dispatcher,
        })
    }

    fn dispatch_url(&self) -> String {
        format!(
            "{}/repos/{}/{}/dispatches",
            self.api_url.trim_end_matches('/'),
            self.owner,
            self.repo
        )
    }

    /// Request a worker run.
    pub async fn trigger(&self) -> WorkerResult<()> {
        let response = self
            .http
            .post(self.dispatch_url())
            .bearer_auth(&self.token)
            .header("Accept", "application/vnd.github.v3+json")
            .json(&DispatchRequest {
                event_type: TRIGGER_EVENT,
            })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(WorkerError::DispatchFailed {
                status: status.as_u16(),
                body,
            });
        }

        info!(owner = %self.owner, repo = %self.repo, "Worker triggered");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_trigger_posts_dispatch_event() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/repos/acme/uploader/dispatches"))
            .and(header("authorization", "Bearer ghp_test"))
            .and(header("accept", "application/vnd.github.v3+json"))
            .and(body_json(json!({ "event_type": "trigger-worker" })))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;

        let dispatcher = WorkflowDispatcher::new("acme", "uploader", "ghp_test")
            .unwrap()
            .with_api_url(server.uri());
        dispatcher.trigger().await.unwrap();
    }

    #[tokio::test]
    async fn test_trigger_error_carries_status_and_body() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(404).set_body_string(r#"{"message":"Not Found"}"#))
            .mount(&server)
            .await;

        let dispatcher = WorkflowDispatcher::new("acme", "missing", "ghp_test")
            .unwrap()
            .with_api_url(server.uri());

        match dispatcher.trigger().await.unwrap_err() {
            WorkerError::DispatchFailed { status, body } => {
                assert_eq!(status, 404);
                assert!(body.contains("Not Found"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_debug_hides_token() {
        let dispatcher = WorkflowDispatcher::new("acme", "uploader", "ghp_secret").unwrap();
        assert!(!format!("{:?}", dispatcher).contains("ghp_secret"));
    }
}
