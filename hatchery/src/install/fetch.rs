//! HTTP implementation of the egg fetch contract.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use reqwest::blocking::Client;
use sha2::{Digest, Sha256};
use tracing::{debug, warn};

use crate::auth::Credentials;
use crate::egg::Distribution;

use super::traits::EggFetcher;
use super::InstallError;

/// Default download timeout (300 seconds). Eggs are much larger than
/// indices, so this is deliberately looser than the index timeout.
const DEFAULT_TIMEOUT_SECS: u64 = 300;

/// Downloads eggs over HTTP, verifying published checksums on demand.
pub struct HttpEggFetcher {
    client: Client,
    credentials: Option<Credentials>,
    checksums: HashMap<String, String>,
}

impl HttpEggFetcher {
    /// Create a fetcher with default settings.
    pub fn new() -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .user_agent(concat!("hatchery/", env!("CARGO_PKG_VERSION")))
            .build()
            .expect("failed to create HTTP client");
        Self {
            client,
            credentials: None,
            checksums: HashMap::new(),
        }
    }

    /// Authenticate requests with the given credentials.
    pub fn with_credentials(mut self, credentials: Option<Credentials>) -> Self {
        self.credentials = credentials;
        self
    }

    /// Known SHA-256 checksums keyed by egg filename.
    ///
    /// Checksum verification only happens for filenames present here;
    /// an unknown filename is downloaded with a warning.
    pub fn with_checksums(mut self, checksums: HashMap<String, String>) -> Self {
        self.checksums = checksums;
        self
    }
}

impl Default for HttpEggFetcher {
    fn default() -> Self {
        Self::new()
    }
}

impl EggFetcher for HttpEggFetcher {
    fn fetch(
        &self,
        dist: &Distribution,
        dest_dir: &Path,
        verify_checksum: bool,
    ) -> Result<PathBuf, InstallError> {
        let dest = dest_dir.join(dist.filename());

        // A cached copy is good enough unless the caller forces a
        // re-download with verification.
        if !verify_checksum && dest.exists() {
            debug!("{} already cached", dist.filename());
            return Ok(dest);
        }

        let url = dist.url();
        let mut request = self.client.get(&url);
        if let Some(credentials) = &self.credentials {
            request = request.basic_auth(&credentials.username, credentials.password.as_deref());
        }

        let response = request.send().map_err(|e| InstallError::FetchFailed {
            url: url.clone(),
            reason: e.to_string(),
        })?;
        if !response.status().is_success() {
            return Err(InstallError::FetchFailed {
                url: url.clone(),
                reason: format!("HTTP {}", response.status()),
            });
        }

        let bytes = response.bytes().map_err(|e| InstallError::FetchFailed {
            url: url.clone(),
            reason: e.to_string(),
        })?;

        if verify_checksum {
            match self.checksums.get(dist.filename()) {
                Some(expected) => {
                    let actual = format!("{:x}", Sha256::digest(&bytes));
                    if !actual.eq_ignore_ascii_case(expected) {
                        return Err(InstallError::ChecksumMismatch {
                            filename: dist.filename().to_string(),
                            expected: expected.clone(),
                            actual,
                        });
                    }
                }
                None => warn!("no published checksum for {}", dist.filename()),
            }
        }

        fs::write(&dest, &bytes).map_err(|e| InstallError::FetchFailed {
            url,
            reason: format!("failed to write {}: {}", dest.display(), e),
        })?;
        Ok(dest)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_cached_copy_reused_without_verification() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("acme-1.0.0-1.egg"), b"cached").unwrap();

        // unreachable repo URL: the fetch must not touch the network
        let fetcher = HttpEggFetcher::new();
        let dist = Distribution::new("http://127.0.0.1:1/eggs/", "acme-1.0.0-1.egg");
        let path = fetcher.fetch(&dist, temp.path(), false).unwrap();
        assert_eq!(fs::read(path).unwrap(), b"cached");
    }

    #[test]
    fn test_verification_forces_redownload() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("acme-1.0.0-1.egg"), b"cached").unwrap();

        let fetcher = HttpEggFetcher::new();
        let dist = Distribution::new("http://127.0.0.1:1/eggs/", "acme-1.0.0-1.egg");
        let err = fetcher.fetch(&dist, temp.path(), true).unwrap_err();
        assert!(matches!(err, InstallError::FetchFailed { .. }));
    }
}
