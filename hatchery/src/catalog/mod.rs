//! Remote package-index catalogs.
//!
//! One or more remote index servers publish products, each with an egg table
//! mapping canonical names to distribution files. This module fetches those
//! indices, validates them, and merges them into a single in-memory
//! [`Catalog`] that the status and install paths read.
//!
//! # Overview
//!
//! - [`CatalogLoader`] fetches and merges remote indices
//! - [`Catalog`] is the merged, read-only result
//! - [`IndexClient`] abstracts the HTTP transport for testing
//! - [`CatalogResolver`] walks declared dependencies over best candidates
//!
//! # Example
//!
//! ```ignore
//! use hatchery::catalog::{CatalogLoader, HttpIndexClient};
//! use hatchery::platform::custom_platform;
//!
//! let client = HttpIndexClient::new();
//! let mut loader = CatalogLoader::new(client, custom_platform());
//! loader.load("https://eggs.example.com")?;
//! let catalog = loader.into_catalog();
//! ```

mod client;
mod error;
mod index;
mod merger;
mod resolve;
mod traits;

pub use client::HttpIndexClient;
pub use error::{CatalogError, IndexFailure};
pub use index::{EggTable, FileEntry, ProductDescriptor, ProductIndex};
pub use merger::{fetch_product_index, Catalog, CatalogLoader, EggMeta, ProductEntry};
pub use resolve::CatalogResolver;
pub use traits::{IndexClient, IndexResponse};
