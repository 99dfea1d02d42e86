//! GitHub hosting adapter: create a remote repository over HTTP.

use std::time::Duration;

use reqwest::StatusCode;
use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;
use url::Url;

use greenfield_core::{
    application::{
        ApplicationError,
        ports::{CreatedRepository, HostingApi, RepositorySpec},
    },
    domain::RemoteCredentials,
    error::GreenfieldResult,
};

/// Default API endpoint; override via configuration for tests or GHE.
pub const DEFAULT_API_URL: &str = "https://api.github.com";

/// Per-request timeout. Repository creation is a small POST; anything slower
/// than this is a stuck connection.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// HTTP transport for the hosting API.
///
/// One endpoint, one call: `POST /user/repos` with basic auth. The request
/// is single-attempt; retry policy belongs to the operator, not this
/// adapter.
#[derive(Debug, Clone)]
pub struct GithubHosting {
    api_url: Url,
    client: Client,
}

impl GithubHosting {
    /// Create an adapter against `api_url` (no trailing path).
    pub fn new(api_url: Url) -> GreenfieldResult<Self> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            // GitHub rejects requests without a User-Agent.
            .user_agent(concat!("greenfield/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ApplicationError::HostingTransport {
                reason: format!("failed to build HTTP client: {e}"),
            })?;

        Ok(Self { api_url, client })
    }

    fn endpoint(&self) -> GreenfieldResult<Url> {
        self.api_url
            .join("user/repos")
            .map_err(|e| {
                ApplicationError::HostingTransport {
                    reason: format!("invalid hosting API URL: {e}"),
                }
                .into()
            })
    }
}

#[derive(Debug, Serialize)]
struct CreateRepositoryBody<'a> {
    name: &'a str,
    homepage: &'a str,
    private: bool,
    has_issues: bool,
    has_wiki: bool,
}

#[derive(Debug, Deserialize)]
struct CreatedResponse {
    clone_url: String,
}

impl HostingApi for GithubHosting {
    fn create_repository(
        &self,
        spec: &RepositorySpec,
        credentials: &RemoteCredentials,
    ) -> GreenfieldResult<CreatedRepository> {
        let endpoint = self.endpoint()?;
        debug!(endpoint = %endpoint, repository = %spec.name, "Creating remote repository");

        let body = CreateRepositoryBody {
            name: &spec.name,
            homepage: &spec.homepage,
            private: spec.private,
            has_issues: spec.has_issues,
            has_wiki: spec.has_wiki,
        };

        let response = self
            .client
            .post(endpoint)
            .basic_auth(credentials.username(), Some(credentials.token()))
            .json(&body)
            .send()
            .map_err(|e| ApplicationError::HostingTransport {
                reason: format!("request failed: {e}"),
            })?;

        let status = response.status();
        let text = response.text().unwrap_or_default();

        // Strictly "created": a 200 or any other 2xx is NOT success for this
        // endpoint and is surfaced raw for diagnosis.
        if status != StatusCode::CREATED {
            return Err(ApplicationError::HostingRefused {
                status: status.as_u16(),
                body: text,
            }
            .into());
        }

        let created: CreatedResponse =
            serde_json::from_str(&text).map_err(|e| ApplicationError::HostingTransport {
                reason: format!("unreadable created-repository response: {e}"),
            })?;

        Ok(CreatedRepository {
            clone_url: created.clone_url,
        })
    }
}

// ── tests ─────────────────────────────────────────────────────────────────────
