//! Hatchery - prebuilt egg package management
//!
//! This library orchestrates installation, removal, and status reporting of
//! versioned, prebuilt packages ("eggs") into a target installation prefix,
//! using one or more remote package-index servers as the source of truth
//! for available versions.
//!
//! # High-Level Flow
//!
//! ```ignore
//! use hatchery::catalog::{CatalogLoader, CatalogResolver, HttpIndexClient};
//! use hatchery::egg::Requirement;
//! use hatchery::install::{ActionPlan, ForceMode, Resolver};
//! use hatchery::installed::LocalEggStore;
//! use hatchery::platform::custom_platform;
//!
//! let mut loader = CatalogLoader::new(HttpIndexClient::new(), custom_platform());
//! loader.load("https://eggs.example.com")?;
//! let catalog = loader.into_catalog();
//!
//! let req: Requirement = "acme".parse()?;
//! let targets = CatalogResolver::new(&catalog).resolve(&req, true);
//! // compute an ActionPlan from targets + installed sets and execute it
//! ```

pub mod auth;
pub mod catalog;
pub mod config;
pub mod egg;
pub mod history;
pub mod install;
pub mod installed;
pub mod logging;
pub mod platform;
pub mod proxy;
pub mod status;

/// Version of the hatchery library and CLI.
///
/// This is synchronized across all components in the workspace.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
