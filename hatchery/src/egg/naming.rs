//! Egg filename parsing and distribution identifiers.

use std::fmt;
use std::str::FromStr;

/// Filename extension for egg distributions.
const EGG_SUFFIX: &str = ".egg";

/// The parsed fields of an egg filename.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EggName {
    /// Project name as written in the filename.
    pub name: String,

    /// Version string (not yet interpreted, see [`super::VersionKey`]).
    pub version: String,

    /// Build number, the tie-breaker between builds of one version.
    pub build: u32,
}

impl EggName {
    /// Reassemble the egg filename.
    pub fn filename(&self) -> String {
        format!("{}-{}-{}{}", self.name, self.version, self.build, EGG_SUFFIX)
    }

    /// Canonical name derived from the name field.
    pub fn cname(&self) -> String {
        canonical_name(&self.name)
    }
}

/// Error parsing an egg filename or distribution string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NamingError {
    /// Filename does not end in `.egg`
    MissingSuffix(String),
    /// Filename does not have exactly name, version, and build fields
    FieldCount { filename: String, found: usize },
    /// Build field is not an unsigned integer
    InvalidBuild { filename: String, value: String },
    /// Distribution string has no repository/filename separator
    MissingSeparator(String),
    /// Distribution string has an empty filename part
    EmptyFilename(String),
}

impl fmt::Display for NamingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NamingError::MissingSuffix(s) => {
                write!(f, "egg filename '{}' does not end in {}", s, EGG_SUFFIX)
            }
            NamingError::FieldCount { filename, found } => {
                write!(
                    f,
                    "egg filename '{}' has {} dash-separated fields, expected 3",
                    filename, found
                )
            }
            NamingError::InvalidBuild { filename, value } => {
                write!(
                    f,
                    "egg filename '{}' has invalid build number '{}'",
                    filename, value
                )
            }
            NamingError::MissingSeparator(s) => {
                write!(f, "distribution '{}' has no repository separator", s)
            }
            NamingError::EmptyFilename(s) => {
                write!(f, "distribution '{}' has an empty filename", s)
            }
        }
    }
}

impl std::error::Error for NamingError {}

/// Split an egg filename into its name, version, and build fields.
///
/// The filename must end in `.egg` and consist of exactly three
/// dash-separated fields. Anything else is a malformed catalog entry.
///
/// # Errors
///
/// Returns a [`NamingError`] describing the first violated rule.
pub fn split_eggname(filename: &str) -> Result<EggName, NamingError> {
    let stem = filename
        .strip_suffix(EGG_SUFFIX)
        .ok_or_else(|| NamingError::MissingSuffix(filename.to_string()))?;

    let fields: Vec<&str> = stem.split('-').collect();
    if fields.len() != 3 || fields.iter().any(|p| p.is_empty()) {
        return Err(NamingError::FieldCount {
            filename: filename.to_string(),
            found: fields.len(),
        });
    }

    let build: u32 = fields[2].parse().map_err(|_| NamingError::InvalidBuild {
        filename: filename.to_string(),
        value: fields[2].to_string(),
    })?;

    Ok(EggName {
        name: fields[0].to_string(),
        version: fields[1].to_string(),
        build,
    })
}

/// Normalize a project name into the canonical catalog lookup key.
pub fn canonical_name(name: &str) -> String {
    name.to_lowercase()
}

/// Canonical name of a well-formed egg filename.
///
/// # Errors
///
/// Returns a [`NamingError`] when the filename does not parse.
pub fn cname_from_filename(filename: &str) -> Result<String, NamingError> {
    Ok(split_eggname(filename)?.cname())
}

/// Best-effort canonical name for any installed filename.
///
/// Installed sets can contain filenames that predate the current naming
/// rules. Those still need a stable lookup key so that status reporting can
/// classify them instead of crashing.
pub fn lenient_cname(filename: &str) -> String {
    let stem = filename.strip_suffix(EGG_SUFFIX).unwrap_or(filename);
    let name = stem.split('-').next().unwrap_or(stem);
    canonical_name(name)
}

/// A fully qualified reference to one specific egg distribution.
///
/// Pairs the repository location the egg can be fetched from with the
/// filename encoding its name, version, and build. Immutable once
/// constructed.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Distribution {
    repo_url: String,
    filename: String,
}

impl Distribution {
    /// Create a distribution from a repository URL and an egg filename.
    pub fn new(repo_url: impl Into<String>, filename: impl Into<String>) -> Self {
        Self {
            repo_url: repo_url.into(),
            filename: filename.into(),
        }
    }

    /// The repository location, ending in `/`.
    pub fn repo_url(&self) -> &str {
        &self.repo_url
    }

    /// The egg filename.
    pub fn filename(&self) -> &str {
        &self.filename
    }

    /// The full fetch URL for this distribution.
    pub fn url(&self) -> String {
        format!("{}{}", self.repo_url, self.filename)
    }

    /// Parse the filename fields.
    ///
    /// # Errors
    ///
    /// Returns a [`NamingError`] when the filename does not parse.
    pub fn egg_name(&self) -> Result<EggName, NamingError> {
        split_eggname(&self.filename)
    }
}

impl fmt::Display for Distribution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.repo_url, self.filename)
    }
}

impl FromStr for Distribution {
    type Err = NamingError;

    /// Parse a distribution string by splitting at the last `/`.
    ///
    /// Everything up to and including the last slash is the repository
    /// location, the rest is the filename.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let split = s
            .rfind('/')
            .ok_or_else(|| NamingError::MissingSeparator(s.to_string()))?;
        let (repo, filename) = s.split_at(split + 1);
        if filename.is_empty() {
            return Err(NamingError::EmptyFilename(s.to_string()));
        }
        Ok(Self::new(repo, filename))
    }
}
