//! Trait definitions for the orchestrator's external collaborators.
//!
//! Resolution, downloading, and the bytes-on-disk installer are all
//! collaborators of this crate. The orchestrator only depends on these
//! contracts, which also makes every phase testable with mocks.

use std::path::{Path, PathBuf};

use crate::egg::{Distribution, Requirement};

use super::InstallError;

/// Produces the dependency-ordered distribution list for a requirement.
///
/// Contract: dependencies precede dependents, and the distribution
/// satisfying the requirement itself is the **last** element. Force
/// semantics target that last element, so the ordering is load-bearing.
pub trait Resolver {
    /// Resolve a requirement, or `None` when no candidate exists.
    ///
    /// With `recurse` false, only the requirement's own distribution is
    /// returned.
    fn resolve(&self, req: &Requirement, recurse: bool) -> Option<Vec<Distribution>>;
}

/// Downloads egg distributions into a local cache directory.
pub trait EggFetcher: Send + Sync {
    /// Fetch a distribution into `dest_dir`, returning the local file path.
    ///
    /// With `verify_checksum` set the implementation must validate the egg
    /// against its published checksum and re-download rather than reuse a
    /// cached copy. Without it, an already-cached file may be returned
    /// as-is.
    fn fetch(
        &self,
        dist: &Distribution,
        dest_dir: &Path,
        verify_checksum: bool,
    ) -> Result<PathBuf, InstallError>;
}

/// The external installer tool, invoked as a black box.
pub trait EggTool: Send + Sync {
    /// Install a local egg file into the prefix.
    fn install(&self, prefix: &Path, egg_path: &Path) -> Result<(), InstallError>;

    /// Remove an installed egg (by filename) from the prefix.
    fn remove(&self, prefix: &Path, filename: &str) -> Result<(), InstallError>;
}
