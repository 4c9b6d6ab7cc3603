//! HTTP client implementation for fetching remote indices.

use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::Proxy;

use crate::auth::Credentials;

use super::traits::{IndexClient, IndexResponse};
use super::CatalogError;

/// Default HTTP request timeout (30 seconds).
///
/// Every index fetch is bounded so that an unresponsive mirror cannot hang
/// catalog loading indefinitely.
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// HTTP-based implementation of [`IndexClient`].
///
/// # Example
///
/// ```ignore
/// use hatchery::catalog::HttpIndexClient;
///
/// let client = HttpIndexClient::new();
/// let response = client.get("https://eggs.example.com/products")?;
/// ```
#[derive(Clone)]
pub struct HttpIndexClient {
    client: Client,
    credentials: Option<Credentials>,
    timeout: Duration,
}

impl std::fmt::Debug for HttpIndexClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpIndexClient")
            .field("timeout", &self.timeout)
            .field("authenticated", &self.credentials.is_some())
            .finish()
    }
}

impl Default for HttpIndexClient {
    fn default() -> Self {
        Self::new()
    }
}

impl HttpIndexClient {
    /// Create a client with default settings and no proxy.
    pub fn new() -> Self {
        Self::build(Duration::from_secs(DEFAULT_TIMEOUT_SECS), None, None)
            .expect("failed to create HTTP client")
    }

    /// Create a client with explicit timeout, credentials, and proxy.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Client`] when the underlying client cannot be
    /// constructed (for example, an unusable proxy).
    pub fn build(
        timeout: Duration,
        credentials: Option<Credentials>,
        proxy: Option<Proxy>,
    ) -> Result<Self, CatalogError> {
        let mut builder = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("hatchery/", env!("CARGO_PKG_VERSION")));
        if let Some(proxy) = proxy {
            builder = builder.proxy(proxy);
        }
        let client = builder
            .build()
            .map_err(|e| CatalogError::Client(e.to_string()))?;

        Ok(Self {
            client,
            credentials,
            timeout,
        })
    }

    /// The configured request timeout.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

impl IndexClient for HttpIndexClient {
    fn get(&self, url: &str) -> Result<IndexResponse, CatalogError> {
        let mut request = self.client.get(url);
        if let Some(credentials) = &self.credentials {
            request = request.basic_auth(&credentials.username, credentials.password.as_deref());
        }

        let response = request.send().map_err(|e| {
            let reason = if e.is_timeout() {
                format!("timed out after {}s", self.timeout.as_secs())
            } else {
                e.to_string()
            };
            CatalogError::Http {
                url: url.to_string(),
                reason,
            }
        })?;

        let status = response.status().as_u16();
        let body = response.text().map_err(|e| CatalogError::Http {
            url: url.to_string(),
            reason: e.to_string(),
        })?;

        Ok(IndexResponse { status, body })
    }
}
