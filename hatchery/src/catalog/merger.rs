//! The merged catalog and the product-index merge algorithm.

use std::collections::HashMap;
use std::thread;

use regex::Regex;
use tracing::{debug, warn};

use crate::egg::{
    canonical_name, comparable_key, split_eggname, Distribution, EggSpec, Requirement,
    RequirementParseError, VersionKey,
};

use super::index::{ProductDescriptor, ProductIndex};
use super::traits::IndexClient;
use super::{CatalogError, IndexFailure};

/// A product that has been merged into the catalog.
#[derive(Debug, Clone)]
pub struct ProductEntry {
    /// Product name (the last path segment of the product URL).
    pub name: String,

    /// Product URL under the index root.
    pub url: String,

    /// The sub-index URL the product was actually loaded from.
    pub index_url: String,
}

/// Searchable display metadata for one canonical name.
#[derive(Debug, Clone, Default)]
pub struct EggMeta {
    /// Display name, when the index publishes one.
    pub display_name: Option<String>,

    /// Human-readable description.
    pub description: Option<String>,
}

/// The merged, in-memory view of all packages known across remote indices.
///
/// Two structures are kept in lock-step: an exact index from distribution to
/// spec, and per-canonical-name candidate groups in insertion order. The
/// catalog is append-only during merge and never mutated afterwards except
/// by re-running a full load.
#[derive(Debug, Default)]
pub struct Catalog {
    index: HashMap<Distribution, EggSpec>,
    groups: HashMap<String, Vec<Distribution>>,
    repos: Vec<String>,
    products: Vec<ProductEntry>,
    meta: HashMap<String, EggMeta>,
}

impl Catalog {
    /// An empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Spec for an exact distribution.
    pub fn spec(&self, dist: &Distribution) -> Option<&EggSpec> {
        self.index.get(dist)
    }

    /// Candidate distributions for a canonical name, in insertion order.
    pub fn group(&self, cname: &str) -> Option<&[Distribution]> {
        self.groups.get(cname).map(Vec::as_slice)
    }

    /// All canonical names known to the catalog.
    pub fn cnames(&self) -> impl Iterator<Item = &str> {
        self.groups.keys().map(String::as_str)
    }

    /// Known repository locations, in discovery order.
    pub fn repos(&self) -> &[String] {
        &self.repos
    }

    /// Products merged so far.
    pub fn products(&self) -> &[ProductEntry] {
        &self.products
    }

    /// Number of distributions in the catalog.
    pub fn len(&self) -> usize {
        self.index.len()
    }

    /// True when nothing has been merged.
    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Best candidate satisfying a requirement.
    ///
    /// Highest `(version, build)` among the canonical name's group.
    /// Entries whose version cannot be interpreted are excluded from the
    /// comparison rather than failing it.
    pub fn best_candidate(&self, req: &Requirement) -> Option<&Distribution> {
        let group = self.groups.get(&req.name)?;
        group
            .iter()
            .filter_map(|dist| {
                let egg = dist.egg_name().ok()?;
                if !req.matches(&egg) {
                    return None;
                }
                let key = comparable_key(dist.filename())?;
                Some((key, dist))
            })
            .max_by(|a, b| a.0.cmp(&b.0))
            .map(|(_, dist)| dist)
    }

    /// Best available distribution for a canonical name, any version.
    pub fn best_available(&self, cname: &str) -> Option<&Distribution> {
        self.best_candidate(&Requirement::any(cname))
    }

    /// All comparable `version-build` strings for a name, ascending.
    pub fn list_versions(&self, name: &str) -> Vec<String> {
        let cname = canonical_name(name);
        let Some(group) = self.groups.get(&cname) else {
            return Vec::new();
        };

        let mut versions: Vec<_> = group
            .iter()
            .filter_map(|dist| {
                let egg = dist.egg_name().ok()?;
                let key = comparable_key(dist.filename())?;
                Some((key, format!("{}-{}", egg.version, egg.build)))
            })
            .collect();
        versions.sort_by(|a, b| a.0.cmp(&b.0));
        versions.dedup_by(|a, b| a.1 == b.1);
        versions.into_iter().map(|(_, v)| v).collect()
    }

    /// Canonical names whose name or description matches the pattern.
    pub fn search(&self, pattern: &Regex) -> Vec<String> {
        let mut matches: Vec<String> = self
            .groups
            .keys()
            .filter(|cname| {
                if pattern.is_match(cname) {
                    return true;
                }
                match self.meta.get(*cname) {
                    Some(meta) => {
                        meta.display_name.as_deref().is_some_and(|n| pattern.is_match(n))
                            || meta.description.as_deref().is_some_and(|d| pattern.is_match(d))
                    }
                    None => false,
                }
            })
            .cloned()
            .collect();
        matches.sort();
        matches
    }
}

/// Everything one product contributes, staged before commit.
///
/// A product that fails validation mid-table must leave the catalog
/// untouched, so the merge builds into this first.
struct StagedProduct {
    repos: Vec<String>,
    entries: Vec<(Distribution, EggSpec)>,
    meta: Vec<(String, EggMeta)>,
}

/// Fetches remote product indices and merges them into a [`Catalog`].
pub struct CatalogLoader<C: IndexClient> {
    client: C,
    platform: String,
    catalog: Catalog,
}

impl<C: IndexClient> CatalogLoader<C> {
    /// Create a loader for the given platform tag.
    pub fn new(client: C, platform: impl Into<String>) -> Self {
        Self {
            client,
            platform: platform.into(),
            catalog: Catalog::new(),
        }
    }

    /// The catalog merged so far.
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Consume the loader, yielding the merged catalog.
    pub fn into_catalog(self) -> Catalog {
        self.catalog
    }

    /// Load a root index and merge every product it names.
    ///
    /// Product failures are collected and reported together; products that
    /// load cleanly stay merged, so a partial catalog remains usable even
    /// when this returns an error.
    ///
    /// # Errors
    ///
    /// [`CatalogError::IndexUnavailable`] listing every failing source, or
    /// [`CatalogError::PlatformMismatch`] immediately on a configuration
    /// error.
    pub fn load(&mut self, root_url: &str) -> Result<(), CatalogError> {
        let root = root_url.trim_end_matches('/');
        let products_url = format!("{}/products", root);

        let unavailable = |reason: String| {
            CatalogError::IndexUnavailable(vec![IndexFailure {
                url: products_url.clone(),
                reason,
            }])
        };

        let response = match self.client.get(&products_url) {
            Ok(response) if response.is_success() => response,
            Ok(response) => return Err(unavailable(format!("HTTP {}", response.status))),
            Err(e) => return Err(unavailable(e.to_string())),
        };
        let descriptors: Vec<ProductDescriptor> = serde_json::from_str(&response.body)
            .map_err(|e| unavailable(format!("invalid JSON: {}", e)))?;

        let mut failures = Vec::new();
        for descriptor in &descriptors {
            let product_url = format!("{}/products/{}", root, descriptor.product.trim_matches('/'));
            match self.add_product(&product_url) {
                Ok(()) => {}
                Err(CatalogError::PlatformMismatch { declared, running }) => {
                    return Err(CatalogError::PlatformMismatch { declared, running });
                }
                Err(CatalogError::IndexUnavailable(inner)) => failures.extend(inner),
                Err(e) => failures.push(IndexFailure {
                    url: product_url,
                    reason: e.to_string(),
                }),
            }
        }

        if failures.is_empty() {
            Ok(())
        } else {
            Err(CatalogError::IndexUnavailable(failures))
        }
    }

    /// Fetch one product's sub-index and merge it into the catalog.
    ///
    /// # Errors
    ///
    /// [`CatalogError::PlatformMismatch`] when the index declares a platform
    /// other than the running one; [`CatalogError::SpecIntegrity`] or
    /// [`CatalogError::MalformedEntry`] when the egg table is structurally
    /// broken. On error the catalog is left exactly as it was.
    pub fn add_product(&mut self, product_url: &str) -> Result<(), CatalogError> {
        let url = product_url.trim_end_matches('/');
        debug!("adding product {}", url);

        let (index_url, index) = fetch_product_index(&self.client, url, &self.platform)?;

        if let Some(declared) = &index.platform {
            if declared != &self.platform {
                return Err(CatalogError::PlatformMismatch {
                    declared: declared.clone(),
                    running: self.platform.clone(),
                });
            }
        }

        let staged = stage_product(url, &index)?;
        self.commit(url, index_url, staged);
        Ok(())
    }

    fn commit(&mut self, product_url: &str, index_url: String, staged: StagedProduct) {
        self.catalog.repos.extend(staged.repos);

        for (dist, spec) in staged.entries {
            self.catalog
                .groups
                .entry(spec.cname.clone())
                .or_default()
                .push(dist.clone());
            self.catalog.index.insert(dist, spec);
        }

        for (cname, meta) in staged.meta {
            let slot = self.catalog.meta.entry(cname).or_default();
            if meta.display_name.is_some() {
                slot.display_name = meta.display_name;
            }
            if meta.description.is_some() {
                slot.description = meta.description;
            }
        }

        let name = product_url.rsplit('/').next().unwrap_or(product_url);
        self.catalog.products.push(ProductEntry {
            name: name.to_string(),
            url: product_url.to_string(),
            index_url,
        });
    }
}

/// Fetch a product's sub-index with dual lookup.
///
/// Both the platform-independent `index.json` and the platform-specific
/// `index-<platform>.json` requests are issued before either response is
/// read, so the two round-trips overlap. The platform-independent result is
/// preferred when it returns HTTP 200; otherwise the platform-specific one
/// is used. When neither succeeds, the failures are aggregated.
pub fn fetch_product_index<C: IndexClient>(
    client: &C,
    product_url: &str,
    platform: &str,
) -> Result<(String, ProductIndex), CatalogError> {
    let independent_url = format!("{}/index.json", product_url);
    let specific_url = format!("{}/index-{}.json", product_url, platform);

    let (independent, specific) = thread::scope(|scope| {
        let specific = scope.spawn(|| client.get(&specific_url));
        let independent = client.get(&independent_url);
        let specific = specific.join().unwrap_or_else(|_| {
            Err(CatalogError::Http {
                url: specific_url.clone(),
                reason: "index fetch thread panicked".to_string(),
            })
        });
        (independent, specific)
    });

    let mut failures = Vec::new();

    match independent {
        Ok(response) if response.is_success() => {
            let index = parse_index(&independent_url, &response.body)?;
            return Ok((independent_url, index));
        }
        Ok(response) => failures.push(IndexFailure {
            url: independent_url,
            reason: format!("HTTP {}", response.status),
        }),
        Err(e) => failures.push(IndexFailure {
            url: independent_url,
            reason: e.to_string(),
        }),
    }

    match specific {
        Ok(response) if response.is_success() => {
            let index = parse_index(&specific_url, &response.body)?;
            return Ok((specific_url, index));
        }
        Ok(response) => failures.push(IndexFailure {
            url: specific_url,
            reason: format!("HTTP {}", response.status),
        }),
        Err(e) => failures.push(IndexFailure {
            url: specific_url,
            reason: e.to_string(),
        }),
    }

    Err(CatalogError::IndexUnavailable(failures))
}

fn parse_index(url: &str, body: &str) -> Result<ProductIndex, CatalogError> {
    serde_json::from_str(body).map_err(|e| CatalogError::Json {
        url: url.to_string(),
        reason: e.to_string(),
    })
}

fn stage_product(product_url: &str, index: &ProductIndex) -> Result<StagedProduct, CatalogError> {
    let repos: Vec<String> = if index.egg_repos.is_empty() {
        vec![format!("{}/", product_url)]
    } else {
        index
            .egg_repos
            .iter()
            .map(|path| format!("{}/{}/", product_url, path.trim_matches('/')))
            .collect()
    };

    let mut entries = Vec::new();
    let mut meta = Vec::new();

    for (cname, table) in &index.eggs {
        if table.name.is_some() || table.description.is_some() {
            meta.push((
                cname.clone(),
                EggMeta {
                    display_name: table.name.clone(),
                    description: table.description.clone(),
                },
            ));
        }

        for (filename, entry) in &table.files {
            let egg = split_eggname(filename).map_err(|e| CatalogError::MalformedEntry {
                filename: filename.clone(),
                reason: e.to_string(),
            })?;

            let derived = egg.cname();
            if &derived != cname {
                return Err(CatalogError::SpecIntegrity {
                    filename: filename.clone(),
                    derived,
                    key: cname.clone(),
                });
            }

            // Version strings are not required to be comparable at load
            // time, but an uninterpretable one is worth a warning since the
            // entry will be invisible to best-available selection.
            if let Err(e) = VersionKey::parse(&egg.version) {
                warn!("{}: {}", filename, e);
            }

            let mut packages = Vec::with_capacity(entry.depends.len());
            for depend in &entry.depends {
                let req: Requirement =
                    depend
                        .parse()
                        .map_err(|e: RequirementParseError| CatalogError::MalformedEntry {
                            filename: filename.clone(),
                            reason: format!("dependency '{}': {}", depend, e),
                        })?;
                packages.push(req);
            }

            let repo = repos
                .get(entry.repo)
                .ok_or_else(|| CatalogError::MalformedEntry {
                    filename: filename.clone(),
                    reason: format!(
                        "repo index {} out of range ({} known)",
                        entry.repo,
                        repos.len()
                    ),
                })?;

            let spec = EggSpec {
                name: egg.name.clone(),
                version: egg.version.clone(),
                build: egg.build,
                python: entry.python.clone(),
                packages,
                cname: derived,
                checksum: entry.sha256.clone(),
            };
            entries.push((Distribution::new(repo.clone(), filename.clone()), spec));
        }
    }

    Ok(StagedProduct {
        repos,
        entries,
        meta,
    })
}
