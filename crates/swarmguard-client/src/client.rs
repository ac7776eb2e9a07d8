//! Daemon RPC client implementation.

use crate::api::{BootstrapApi, SwarmApi};
use reqwest::Client as HttpClient;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;
use swarmguard_core::{GuardError, Result};
use tracing::debug;
use url::Url;

/// Default daemon RPC address
pub const DEFAULT_API_URL: &str = "http://127.0.0.1:5001";

/// Default request timeout
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// User-Agent sent with every call
const USER_AGENT: &str = concat!("swarmguard/", env!("CARGO_PKG_VERSION"));

/// RPC path prefix
const API_PREFIX: &str = "/api/v0/";

/// Client for the daemon's `/api/v0` RPC surface
#[derive(Clone)]
pub struct SwarmClient {
    inner: Arc<ClientInner>,
}

struct ClientInner {
    http: HttpClient,
    base_url: Url,
}

/// Error body the daemon returns alongside non-2xx statuses
#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct ErrorBody {
    message: String,
}

impl SwarmClient {
    /// Create a client for the daemon at `api_url` using default settings
    pub fn new(api_url: &str) -> Result<Self> {
        SwarmClientBuilder::new(api_url).build()
    }

    /// Create a builder for custom configuration
    #[must_use]
    pub fn builder(api_url: impl Into<String>) -> SwarmClientBuilder {
        SwarmClientBuilder::new(api_url)
    }

    /// Access swarm endpoints (peers, filters)
    #[must_use]
    pub fn swarm(&self) -> SwarmApi<'_> {
        SwarmApi::new(self)
    }

    /// Access bootstrap endpoints
    #[must_use]
    pub fn bootstrap(&self) -> BootstrapApi<'_> {
        BootstrapApi::new(self)
    }

    /// The daemon base URL
    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.inner.base_url
    }

    /// Call a command and decode its JSON response
    pub(crate) async fn call<T: DeserializeOwned>(&self, command: &str, arg: Option<&str>) -> Result<T> {
        let response = self.send(command, arg).await?;
        let body = response
            .text()
            .await
            .map_err(|e| GuardError::Connection(e.to_string()))?;
        serde_json::from_str(&body).map_err(GuardError::Json)
    }

    /// Call a command whose response body is irrelevant
    pub(crate) async fn call_empty(&self, command: &str, arg: Option<&str>) -> Result<()> {
        self.send(command, arg).await.map(drop)
    }

    /// POST a command; every RPC is a POST on this API
    async fn send(&self, command: &str, arg: Option<&str>) -> Result<reqwest::Response> {
        let url = self.build_url(command, arg)?;
        debug!(url = %url, "POST request");

        let response = self
            .inner
            .http
            .post(url)
            .send()
            .await
            .map_err(|e| GuardError::Connection(e.to_string()))?;

        let status = response.status();
        if status.is_success() {
            Ok(response)
        } else {
            Err(Self::to_error(status.as_u16(), response).await)
        }
    }

    /// Build a command URL with an optional `arg` query parameter
    fn build_url(&self, command: &str, arg: Option<&str>) -> Result<Url> {
        let mut url = self
            .inner
            .base_url
            .join(&format!("{API_PREFIX}{command}"))
            .map_err(|e| GuardError::Config(format!("invalid API URL: {e}")))?;

        if let Some(arg) = arg {
            url.query_pairs_mut().append_pair("arg", arg);
        }

        Ok(url)
    }

    /// Convert an error response to a [`GuardError::Api`]
    async fn to_error(status: u16, response: reqwest::Response) -> GuardError {
        let body = response.text().await.unwrap_or_default();

        let message = serde_json::from_str::<ErrorBody>(&body)
            .map(|e| e.message)
            .unwrap_or(body);

        GuardError::Api {
            code: status,
            message,
        }
    }
}

/// Builder for configuring a [`SwarmClient`]
pub struct SwarmClientBuilder {
    api_url: String,
    timeout: Duration,
}

impl SwarmClientBuilder {
    /// Create a new builder for the daemon at `api_url`
    #[must_use]
    pub fn new(api_url: impl Into<String>) -> Self {
        Self {
            api_url: api_url.into(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Set the request timeout
    #[must_use]
    pub const fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Build the client
    pub fn build(self) -> Result<SwarmClient> {
        let base_url = Url::parse(&self.api_url)
            .map_err(|e| GuardError::Config(format!("invalid API URL {}: {e}", self.api_url)))?;

        let http = HttpClient::builder()
            .timeout(self.timeout)
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| GuardError::Config(format!("failed to build HTTP client: {e}")))?;

        Ok(SwarmClient {
            inner: Arc::new(ClientInner { http, base_url }),
        })
    }
}
