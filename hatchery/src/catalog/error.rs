//! Error types for catalog loading and merging.

use std::fmt;

use thiserror::Error;

/// One index source that could not be read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexFailure {
    /// The URL that failed.
    pub url: String,
    /// Why it failed.
    pub reason: String,
}

impl fmt::Display for IndexFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.url, self.reason)
    }
}

/// Errors that can occur while loading or merging catalogs.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// One or more index sources unreachable or unparseable. Aggregated
    /// across products; unaffected products stay usable.
    #[error("unable to read package indices:\n{}", format_failures(.0))]
    IndexUnavailable(Vec<IndexFailure>),

    /// A fetched index declares a platform other than the running one.
    /// Configuration error, fatal and never aggregated.
    #[error("index is for platform {declared}, but running on {running}")]
    PlatformMismatch { declared: String, running: String },

    /// A catalog entry's derived canonical name disagrees with its table key.
    #[error("spec integrity: '{filename}' derives canonical name '{derived}', table key is '{key}'")]
    SpecIntegrity {
        filename: String,
        derived: String,
        key: String,
    },

    /// A catalog entry that cannot be interpreted at all.
    #[error("malformed catalog entry '{filename}': {reason}")]
    MalformedEntry { filename: String, reason: String },

    /// Transport-level HTTP failure.
    #[error("HTTP error for {url}: {reason}")]
    Http { url: String, reason: String },

    /// A 200 response whose body is not the expected JSON.
    #[error("invalid JSON from {url}: {reason}")]
    Json { url: String, reason: String },

    /// The HTTP client itself could not be constructed.
    #[error("failed to build HTTP client: {0}")]
    Client(String),
}

fn format_failures(failures: &[IndexFailure]) -> String {
    failures
        .iter()
        .map(|f| format!("  {}", f))
        .collect::<Vec<_>>()
        .join("\n")
}

impl CatalogError {
    /// The failing sources, when this is an aggregated index error.
    pub fn failures(&self) -> &[IndexFailure] {
        match self {
            CatalogError::IndexUnavailable(failures) => failures,
            _ => &[],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_unavailable_lists_every_source() {
        let err = CatalogError::IndexUnavailable(vec![
            IndexFailure {
                url: "http://a/index.json".to_string(),
                reason: "HTTP 404".to_string(),
            },
            IndexFailure {
                url: "http://b/index.json".to_string(),
                reason: "timed out".to_string(),
            },
        ]);
        let text = err.to_string();
        assert!(text.contains("http://a/index.json: HTTP 404"));
        assert!(text.contains("http://b/index.json: timed out"));
        assert_eq!(err.failures().len(), 2);
    }

    #[test]
    fn test_platform_mismatch_message() {
        let err = CatalogError::PlatformMismatch {
            declared: "win-64".to_string(),
            running: "linux-64".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "index is for platform win-64, but running on linux-64"
        );
    }
}
