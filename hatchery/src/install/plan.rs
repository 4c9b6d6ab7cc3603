//! Pure computation of fetch/remove/install action sets.

use std::collections::BTreeSet;
use std::fmt;

use crate::egg::{cname_from_filename, lenient_cname, Distribution};

use super::InstallError;

/// Force-override semantics for exclusion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ForceMode {
    /// Leave everything already installed untouched (idempotent re-runs).
    #[default]
    None,
    /// Force-refresh only the last target distribution, the one satisfying
    /// the requirement itself, without disturbing satisfied dependencies.
    Force,
    /// Force a full reinstall of the entire resolved chain.
    ForceAll,
}

impl ForceMode {
    /// True for either force variant. Checksums are verified exactly when
    /// a force mode is active.
    pub fn is_forced(&self) -> bool {
        !matches!(self, ForceMode::None)
    }
}

/// Why a removal was planned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemovalReason {
    /// A different build or version of the same canonical name is being
    /// installed; at most one version per prefix (replace, not stack).
    ReplacedBy(String),
}

impl fmt::Display for RemovalReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RemovalReason::ReplacedBy(filename) => write!(f, "replaced by {}", filename),
        }
    }
}

/// The computed action sets for one orchestration.
///
/// A value object: computed fresh per invocation, consumed immediately,
/// never persisted.
#[derive(Debug, Clone)]
pub struct ActionPlan {
    /// Filenames excluded from fetch and install because they are already
    /// installed somewhere relevant.
    pub exclude: BTreeSet<String>,

    /// Distributions to download, forward dependency order.
    pub fetch: Vec<Distribution>,

    /// Filenames to remove from the target prefix, reverse dependency
    /// order, each with the reason it is going away.
    pub remove: Vec<(String, RemovalReason)>,

    /// Distributions to install, forward dependency order.
    pub install: Vec<Distribution>,

    /// The force mode the plan was computed under.
    pub mode: ForceMode,
}

impl ActionPlan {
    /// Compute the action sets for a dependency-ordered target list.
    ///
    /// `targets` must come from a [`Resolver`](super::Resolver):
    /// dependencies first, the requested distribution last.
    ///
    /// # Errors
    ///
    /// Returns an error when a target filename is malformed; targets come
    /// from the catalog, so this indicates a broken invariant upstream.
    pub fn compute(
        targets: &[Distribution],
        primary_installed: &BTreeSet<String>,
        prefix_installed: &BTreeSet<String>,
        mode: ForceMode,
    ) -> Result<Self, InstallError> {
        let mut exclude: BTreeSet<String> = primary_installed
            .union(prefix_installed)
            .cloned()
            .collect();

        match mode {
            ForceMode::None => {}
            ForceMode::Force => {
                if let Some(last) = targets.last() {
                    exclude.remove(last.filename());
                }
            }
            ForceMode::ForceAll => exclude.clear(),
        }

        let wanted: Vec<Distribution> = targets
            .iter()
            .filter(|dist| !exclude.contains(dist.filename()))
            .cloned()
            .collect();

        let mut remove = Vec::new();
        for dist in targets.iter().rev() {
            let filename = dist.filename();
            // Never remove something the base environment already provides,
            // even when installing into a different prefix.
            if primary_installed.contains(filename) {
                continue;
            }
            let cname = cname_from_filename(filename)?;
            for installed in prefix_installed {
                if installed == filename {
                    continue;
                }
                if lenient_cname(installed) == cname {
                    remove.push((
                        installed.clone(),
                        RemovalReason::ReplacedBy(filename.to_string()),
                    ));
                }
            }
        }

        Ok(Self {
            exclude,
            fetch: wanted.clone(),
            remove,
            install: wanted,
            mode,
        })
    }

    /// True when no phase has anything to do.
    pub fn is_empty(&self) -> bool {
        self.fetch.is_empty() && self.remove.is_empty() && self.install.is_empty()
    }
}
