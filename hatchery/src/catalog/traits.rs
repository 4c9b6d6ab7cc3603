//! Transport abstraction for index fetching.
//!
//! The catalog loader only needs "GET this URL, give me status and body".
//! Keeping that behind a trait lets tests drive the dual-index lookup and
//! failure aggregation without network access.

use super::CatalogError;

/// Response from an index endpoint.
#[derive(Debug, Clone)]
pub struct IndexResponse {
    /// HTTP status code.
    pub status: u16,

    /// Response body.
    pub body: String,
}

impl IndexResponse {
    /// True for HTTP 200.
    pub fn is_success(&self) -> bool {
        self.status == 200
    }
}

/// Client for fetching index resources.
///
/// Implementations must be callable from multiple threads: the dual index
/// lookup issues the platform-independent and platform-specific requests
/// concurrently.
pub trait IndexClient: Send + Sync {
    /// Issue a GET for an index resource.
    ///
    /// Non-200 statuses are returned as a normal [`IndexResponse`]; only
    /// transport-level failures are errors.
    fn get(&self, url: &str) -> Result<IndexResponse, CatalogError>;
}
