//! Egg naming, versioning, and spec types.
//!
//! An egg is one prebuilt, versioned distribution of a package. Its filename
//! encodes everything needed to identify it:
//!
//! ```text
//! <name>-<version>-<build>.egg
//! ```
//!
//! This module provides:
//!
//! - **Naming**: filename parsing, canonical names, distribution identifiers
//! - **Version**: totally-ordered comparison keys over version strings
//! - **Spec**: per-distribution metadata and partially-specified requirements

mod naming;
mod spec;
mod version;

pub use naming::{
    canonical_name, cname_from_filename, lenient_cname, split_eggname, Distribution, EggName,
    NamingError,
};
pub use spec::{EggSpec, Requirement, RequirementParseError};
pub use version::{comparable_key, VersionKey, VersionParseError};
