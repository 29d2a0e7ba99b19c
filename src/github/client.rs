//! GitHub API client.

use reqwest::blocking::{Client, Response};
use reqwest::header::{ACCEPT, AUTHORIZATION, HeaderMap, HeaderValue, USER_AGENT};
use reqwest::StatusCode;

use crate::config::{DEFAULT_API_URL, ListerConfig};
use crate::error::{Result, StarError};

/// Client for interacting with the GitHub API.
///
/// Anonymous by default; a token only raises the rate limit, the starred
/// endpoint itself is public.
#[derive(Clone)]
pub struct GitHubClient {
    pub(crate) token: Option<String>,
    pub(crate) base_url: String,
    pub(crate) client: Client,
}

impl GitHubClient {
    /// Create an anonymous client for api.github.com.
    pub fn new() -> Self {
        Self {
            token: None,
            base_url: DEFAULT_API_URL.into(),
            client: Client::new(),
        }
    }

    /// Authenticate requests with the given token.
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Point the client at a different API root, e.g. GitHub Enterprise.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        let mut url = base_url.into();
        // Remove trailing slash if present
        if url.ends_with('/') {
            url.pop();
        }
        self.base_url = url;
        self
    }

    /// Build a client from lister settings.
    pub fn from_config(config: &ListerConfig) -> Self {
        let client = Self::new().with_base_url(&config.api_url);
        match &config.token {
            Some(token) if !token.is_empty() => client.with_token(token),
            _ => client,
        }
    }

    /// Get the default headers for API requests.
    pub(crate) fn headers(&self) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();
        if let Some(token) = &self.token {
            let value = HeaderValue::from_str(&format!("Bearer {}", token))
                .map_err(|_| StarError::InvalidConfig("GitHub token is not a valid header".into()))?;
            headers.insert(AUTHORIZATION, value);
        }
        headers.insert(
            ACCEPT,
            HeaderValue::from_static("application/vnd.github+json"),
        );
        headers.insert(USER_AGENT, HeaderValue::from_static("starkit"));
        headers.insert(
            "X-GitHub-Api-Version",
            HeaderValue::from_static("2022-11-28"),
        );
        Ok(headers)
    }

    /// Make a GET request to the GitHub API.
    pub(crate) fn get<T: serde::de::DeserializeOwned>(&self, endpoint: &str) -> Result<T> {
        let url = format!("{}{}", self.base_url, endpoint);
        let response = self
            .client
            .get(&url)
            .headers(self.headers()?)
            .send()?;

        if !response.status().is_success() {
            return Err(error_for(response));
        }

        response.json().map_err(|e| StarError::GitHub {
            message: format!("Failed to parse response: {}", e),
        })
    }

    /// Get the base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

impl Default for GitHubClient {
    fn default() -> Self {
        Self::new()
    }
}

/// Turn a non-2xx response into an error, singling out rate limiting.
fn error_for(response: Response) -> StarError {
    let status = response.status();
    let header = |name: &str| {
        response
            .headers()
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
    };

    let exhausted = header("x-ratelimit-remaining").as_deref() == Some("0");
    if exhausted && (status == StatusCode::FORBIDDEN || status == StatusCode::TOO_MANY_REQUESTS) {
        return StarError::RateLimited {
            reset: header("x-ratelimit-reset").unwrap_or_else(|| "unknown".into()),
        };
    }

    let body = response.text().unwrap_or_default();
    StarError::GitHub {
        message: format!("API request failed ({}): {}", status, body),
    }
}
