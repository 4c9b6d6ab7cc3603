//! Probe for the set of eggs installed under a prefix.
//!
//! The bytes-on-disk installer records each installed egg as a marker
//! directory `<prefix>/egg-info/<cname>/` containing `egg-name.txt` with the
//! egg filename. This module only reads that layout; writing it is the
//! installer tool's job.
//!
//! Installed sets are snapshots. They are re-read, never incrementally
//! patched, whenever a caller invalidates its view after an install or
//! removal.

use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::egg::{split_eggname, EggName};

/// Directory under the prefix holding per-egg markers.
const EGG_INFO_DIR: &str = "egg-info";

/// Marker file naming the installed egg.
const EGG_NAME_FILE: &str = "egg-name.txt";

/// Errors reading the installed set.
#[derive(Debug, Error)]
pub enum ProbeError {
    /// Failed to read a marker directory or file
    #[error("failed to read installed set under {path}: {source}")]
    ReadFailed {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Metadata for one installed egg.
#[derive(Debug, Clone)]
pub struct InstalledEgg {
    /// The installed egg filename.
    pub egg_name: String,

    /// Marker directory the record was read from.
    pub meta_dir: PathBuf,
}

impl InstalledEgg {
    /// Parsed filename fields, when the filename is well-formed.
    pub fn egg(&self) -> Option<EggName> {
        split_eggname(&self.egg_name).ok()
    }
}

/// Read-only view of the eggs installed under one prefix.
pub struct LocalEggStore {
    prefix: PathBuf,
}

impl LocalEggStore {
    /// Create a store for the given prefix.
    pub fn new(prefix: impl Into<PathBuf>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }

    /// The prefix this store reads.
    pub fn prefix(&self) -> &Path {
        &self.prefix
    }

    /// Marker directory for a canonical name.
    pub fn meta_dir(&self, cname: &str) -> PathBuf {
        self.prefix.join(EGG_INFO_DIR).join(cname)
    }

    /// True when an egg with this canonical name is installed.
    pub fn is_installed(&self, cname: &str) -> bool {
        self.meta_dir(cname).join(EGG_NAME_FILE).exists()
    }

    /// The set of installed egg filenames.
    ///
    /// A missing prefix or marker directory is an empty set, not an error.
    pub fn list(&self) -> Result<BTreeSet<String>, ProbeError> {
        let info_dir = self.prefix.join(EGG_INFO_DIR);
        let mut installed = BTreeSet::new();

        if !info_dir.exists() {
            return Ok(installed);
        }

        let entries = fs::read_dir(&info_dir).map_err(|e| ProbeError::ReadFailed {
            path: info_dir.clone(),
            source: e,
        })?;

        for entry in entries.flatten() {
            let path = entry.path();
            if !path.is_dir() {
                continue;
            }
            let marker = path.join(EGG_NAME_FILE);
            if let Ok(content) = fs::read_to_string(&marker) {
                let filename = content.trim();
                if !filename.is_empty() {
                    installed.insert(filename.to_string());
                }
            }
        }

        Ok(installed)
    }

    /// Metadata for one installed canonical name, or `None`.
    pub fn info(&self, cname: &str) -> Result<Option<InstalledEgg>, ProbeError> {
        let meta_dir = self.meta_dir(cname);
        let marker = meta_dir.join(EGG_NAME_FILE);
        if !marker.exists() {
            return Ok(None);
        }

        let content = fs::read_to_string(&marker).map_err(|e| ProbeError::ReadFailed {
            path: marker,
            source: e,
        })?;

        Ok(Some(InstalledEgg {
            egg_name: content.trim().to_string(),
            meta_dir,
        }))
    }
}
