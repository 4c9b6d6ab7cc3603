//! CLI error handling with user-friendly messages.
//!
//! Centralizes error formatting and the exit-code policy: true failures
//! exit 1, usage errors exit 2. "Nothing to do" outcomes are not errors
//! and exit 0 from the handlers themselves.

use std::fmt;
use std::process;

use hatchery::catalog::CatalogError;
use hatchery::config::ConfigError;
use hatchery::install::InstallError;
use hatchery::installed::ProbeError;
use hatchery::proxy::ProxyError;

/// CLI-specific errors with user-friendly messages.
#[derive(Debug)]
pub enum CliError {
    /// Failed to initialize logging
    Logging(String),
    /// Configuration error
    Config(ConfigError),
    /// Proxy configuration error
    Proxy(ProxyError),
    /// Catalog could not be loaded
    Catalog(CatalogError),
    /// Install/remove orchestration failed
    Install(InstallError),
    /// Installed set could not be read
    Probe(ProbeError),
    /// Search pattern did not compile
    Pattern(regex::Error),
    /// Command line misuse
    Usage(String),
}

impl CliError {
    fn exit_code(&self) -> i32 {
        match self {
            CliError::Usage(_) => 2,
            _ => 1,
        }
    }

    /// Exit the process with an appropriate error message and code.
    pub fn exit(&self) -> ! {
        eprintln!("Error: {}", self);

        if let CliError::Catalog(CatalogError::IndexUnavailable(_)) = self {
            eprintln!();
            eprintln!("Check the index roots in your config file and your network");
            eprintln!("connection; partial results from reachable products were");
            eprintln!("discarded for this command.");
        }

        process::exit(self.exit_code())
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::Logging(msg) => write!(f, "failed to initialize logging: {}", msg),
            CliError::Config(e) => write!(f, "configuration error: {}", e),
            CliError::Proxy(e) => write!(f, "proxy configuration error: {}", e),
            CliError::Catalog(e) => write!(f, "{}", e),
            CliError::Install(e) => write!(f, "{}", e),
            CliError::Probe(e) => write!(f, "{}", e),
            CliError::Pattern(e) => write!(f, "invalid search pattern: {}", e),
            CliError::Usage(msg) => write!(f, "{}", msg),
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::Config(e) => Some(e),
            CliError::Proxy(e) => Some(e),
            CliError::Catalog(e) => Some(e),
            CliError::Install(e) => Some(e),
            CliError::Probe(e) => Some(e),
            CliError::Pattern(e) => Some(e),
            _ => None,
        }
    }
}

impl From<InstallError> for CliError {
    fn from(e: InstallError) -> Self {
        CliError::Install(e)
    }
}

impl From<ProbeError> for CliError {
    fn from(e: ProbeError) -> Self {
        CliError::Probe(e)
    }
}
