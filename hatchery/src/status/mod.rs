//! Status classification of known packages.
//!
//! Combines the catalog's view of "best available" with the installed-set
//! probe's view of "currently installed" to classify every known canonical
//! name. Results are cached as an immutable snapshot; callers invalidate
//! with [`StatusEngine::clear_cache`] after any install or removal.

use std::collections::{BTreeMap, BTreeSet};

use tracing::debug;

use crate::catalog::Catalog;
use crate::egg::{comparable_key, lenient_cname, Distribution};
use crate::installed::{LocalEggStore, ProbeError};

/// Status of one canonical name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EggStatus {
    /// Installed, with no available catalog entry to compare against.
    Installed,
    /// Installed at the best available version and build.
    UpToDate,
    /// Installed, and the catalog offers something strictly newer.
    Updateable,
    /// Not installed, but available from the catalog.
    Installable,
}

impl std::fmt::Display for EggStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let text = match self {
            EggStatus::Installed => "installed",
            EggStatus::UpToDate => "up-to-date",
            EggStatus::Updateable => "updateable",
            EggStatus::Installable => "installable",
        };
        write!(f, "{}", text)
    }
}

/// Per-canonical-name status record.
#[derive(Debug, Clone)]
pub struct StatusRecord {
    /// Canonical name.
    pub cname: String,

    /// Installed egg filename, if any.
    pub installed: Option<String>,

    /// Best available distribution, if any.
    pub available: Option<Distribution>,

    /// Derived status.
    pub status: EggStatus,
}

impl StatusRecord {
    /// Installed `version-build`, when the filename parses.
    pub fn installed_version(&self) -> Option<String> {
        let filename = self.installed.as_deref()?;
        let egg = crate::egg::split_eggname(filename).ok()?;
        Some(format!("{}-{}", egg.version, egg.build))
    }

    /// Available `version-build`, when present.
    pub fn available_version(&self) -> Option<String> {
        let egg = self.available.as_ref()?.egg_name().ok()?;
        Some(format!("{}-{}", egg.version, egg.build))
    }
}

/// Classify one name from its installed filename and best available filename.
///
/// This is a total function of the pair. An installed filename whose version
/// cannot be interpreted is incomparable and defaults to `installed` rather
/// than failing.
pub fn classify(installed: Option<&str>, available: Option<&str>) -> Option<EggStatus> {
    match (installed, available) {
        (None, None) => None,
        (None, Some(_)) => Some(EggStatus::Installable),
        (Some(_), None) => Some(EggStatus::Installed),
        (Some(installed), Some(available)) => {
            let (Some(installed_key), Some(available_key)) =
                (comparable_key(installed), comparable_key(available))
            else {
                return Some(EggStatus::Installed);
            };
            if available_key <= installed_key {
                Some(EggStatus::UpToDate)
            } else {
                Some(EggStatus::Updateable)
            }
        }
    }
}

/// Builds and caches status records for every known canonical name.
///
/// Reads the catalog and one or two installed-set probes (the primary
/// runtime prefix, and optionally a distinct target prefix). The snapshot is
/// replaced wholesale on [`clear_cache`](Self::clear_cache); it is never
/// patched in place.
pub struct StatusEngine<'a> {
    catalog: &'a Catalog,
    primary: &'a LocalEggStore,
    prefix: Option<&'a LocalEggStore>,
    cache: Option<BTreeMap<String, StatusRecord>>,
}

impl<'a> StatusEngine<'a> {
    /// Create an engine over a catalog and the primary installed-set probe.
    pub fn new(catalog: &'a Catalog, primary: &'a LocalEggStore) -> Self {
        Self {
            catalog,
            primary,
            prefix: None,
            cache: None,
        }
    }

    /// Also consider a target prefix distinct from the primary one.
    pub fn with_prefix(mut self, prefix: &'a LocalEggStore) -> Self {
        self.prefix = Some(prefix);
        self
    }

    /// Drop the cached snapshot.
    ///
    /// Must be called after any install or uninstall; status is never
    /// recomputed implicitly.
    pub fn clear_cache(&mut self) {
        self.cache = None;
    }

    /// Status records keyed by canonical name.
    pub fn status(&mut self) -> Result<&BTreeMap<String, StatusRecord>, ProbeError> {
        if self.cache.is_none() {
            self.cache = Some(self.rebuild()?);
        }
        // just populated above
        Ok(self.cache.as_ref().expect("status cache populated"))
    }

    /// Filenames of everything installed anywhere relevant.
    pub fn installed_filenames(&mut self) -> Result<BTreeSet<String>, ProbeError> {
        Ok(self
            .status()?
            .values()
            .filter_map(|record| record.installed.clone())
            .collect())
    }

    fn rebuild(&self) -> Result<BTreeMap<String, StatusRecord>, ProbeError> {
        let mut installed_by_cname: BTreeMap<String, String> = BTreeMap::new();
        let mut filenames = self.primary.list()?;
        if let Some(prefix) = self.prefix {
            filenames.extend(prefix.list()?);
        }
        for filename in filenames {
            installed_by_cname.insert(lenient_cname(&filename), filename);
        }

        let mut cnames: BTreeSet<String> = installed_by_cname.keys().cloned().collect();
        cnames.extend(self.catalog.cnames().map(str::to_string));

        let mut records = BTreeMap::new();
        for cname in cnames {
            let installed = installed_by_cname.get(&cname).cloned();
            let available = self.catalog.best_available(&cname).cloned();

            let status = classify(
                installed.as_deref(),
                available.as_ref().map(|d| d.filename()),
            );
            let Some(status) = status else {
                continue;
            };

            records.insert(
                cname.clone(),
                StatusRecord {
                    cname,
                    installed,
                    available,
                    status,
                },
            );
        }

        debug!("classified {} packages", records.len());
        Ok(records)
    }
}
