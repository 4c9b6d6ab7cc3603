//! Distribution metadata and requirements.

use std::fmt;
use std::str::FromStr;

use super::naming::{canonical_name, EggName};

/// Normalized metadata for one egg distribution.
///
/// Synthesized while merging a remote product index. Field defaults are
/// documented on the wire format in [`crate::catalog`]; a spec always
/// satisfies `spec.cname == canonical_name(spec.name)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EggSpec {
    /// Project name as written in the egg filename.
    pub name: String,

    /// Version string.
    pub version: String,

    /// Build number.
    pub build: u32,

    /// Target runtime version the egg was built for, default `2.7`.
    pub python: String,

    /// Declared dependency requirements.
    pub packages: Vec<Requirement>,

    /// Canonical name, always `canonical_name(name)`.
    pub cname: String,

    /// SHA-256 checksum of the egg file, when the index publishes one.
    pub checksum: Option<String>,
}

/// A package requirement: a canonical name plus optional version and build.
///
/// Partially specified requirements match the best available candidate.
/// `acme`, `acme 1.2.0`, and `acme 1.2.0-1` are all valid spellings.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Requirement {
    /// Canonical package name.
    pub name: String,

    /// Exact version to match, or any.
    pub version: Option<String>,

    /// Exact build to match, or any. Only meaningful with a version.
    pub build: Option<u32>,
}

/// Error parsing a requirement string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequirementParseError {
    /// Requirement string is empty
    Empty,
    /// More than a name and a version
    TooManyWords(String),
    /// Build part is not an unsigned integer
    InvalidBuild { requirement: String, value: String },
}

impl fmt::Display for RequirementParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RequirementParseError::Empty => write!(f, "empty requirement"),
            RequirementParseError::TooManyWords(s) => {
                write!(
                    f,
                    "requirement '{}' is more than a name and an optional version",
                    s
                )
            }
            RequirementParseError::InvalidBuild { requirement, value } => {
                write!(
                    f,
                    "requirement '{}' has invalid build number '{}'",
                    requirement, value
                )
            }
        }
    }
}

impl std::error::Error for RequirementParseError {}

impl Requirement {
    /// Requirement matching any version of a package.
    pub fn any(name: &str) -> Self {
        Self {
            name: canonical_name(name),
            version: None,
            build: None,
        }
    }

    /// True if the given egg satisfies this requirement.
    pub fn matches(&self, egg: &EggName) -> bool {
        if egg.cname() != self.name {
            return false;
        }
        if let Some(version) = &self.version {
            if version != &egg.version {
                return false;
            }
            if let Some(build) = self.build {
                return build == egg.build;
            }
        }
        true
    }
}

impl FromStr for Requirement {
    type Err = RequirementParseError;

    /// Parse `name`, `name version`, or `name version-build`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut words = s.split_whitespace();
        let name = words.next().ok_or(RequirementParseError::Empty)?;
        let version_word = words.next();
        if words.next().is_some() {
            return Err(RequirementParseError::TooManyWords(s.to_string()));
        }

        let mut requirement = Self::any(name);
        if let Some(word) = version_word {
            match word.rsplit_once('-') {
                Some((version, build)) if !version.is_empty() => {
                    let build: u32 =
                        build
                            .parse()
                            .map_err(|_| RequirementParseError::InvalidBuild {
                                requirement: s.to_string(),
                                value: build.to_string(),
                            })?;
                    requirement.version = Some(version.to_string());
                    requirement.build = Some(build);
                }
                _ => requirement.version = Some(word.to_string()),
            }
        }
        Ok(requirement)
    }
}

impl fmt::Display for Requirement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)?;
        if let Some(version) = &self.version {
            write!(f, " {}", version)?;
            if let Some(build) = self.build {
                write!(f, "-{}", build)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::egg::split_eggname;

    #[test]
    fn test_parse_name_only() {
        let req: Requirement = "Acme".parse().unwrap();
        assert_eq!(req.name, "acme");
        assert_eq!(req.version, None);
        assert_eq!(req.build, None);
        assert_eq!(req.to_string(), "acme");
    }

    #[test]
    fn test_parse_name_version() {
        let req: Requirement = "acme 1.2.0".parse().unwrap();
        assert_eq!(req.version.as_deref(), Some("1.2.0"));
        assert_eq!(req.build, None);
        assert_eq!(req.to_string(), "acme 1.2.0");
    }

    #[test]
    fn test_parse_name_version_build() {
        let req: Requirement = "acme 1.2.0-3".parse().unwrap();
        assert_eq!(req.version.as_deref(), Some("1.2.0"));
        assert_eq!(req.build, Some(3));
        assert_eq!(req.to_string(), "acme 1.2.0-3");
    }

    #[test]
    fn test_parse_errors() {
        assert!(matches!(
            "".parse::<Requirement>().unwrap_err(),
            RequirementParseError::Empty
        ));
        assert!(matches!(
            "acme 1.0 extra".parse::<Requirement>().unwrap_err(),
            RequirementParseError::TooManyWords(_)
        ));
        assert!(matches!(
            "acme 1.0-x".parse::<Requirement>().unwrap_err(),
            RequirementParseError::InvalidBuild { .. }
        ));
    }

    #[test]
    fn test_matches() {
        let egg = split_eggname("Acme-1.2.0-3.egg").unwrap();

        assert!(Requirement::any("acme").matches(&egg));
        assert!(Requirement::any("ACME").matches(&egg));
        assert!(!Requirement::any("other").matches(&egg));

        let versioned: Requirement = "acme 1.2.0".parse().unwrap();
        assert!(versioned.matches(&egg));

        let wrong_version: Requirement = "acme 1.3.0".parse().unwrap();
        assert!(!wrong_version.matches(&egg));

        let exact: Requirement = "acme 1.2.0-3".parse().unwrap();
        assert!(exact.matches(&egg));

        let wrong_build: Requirement = "acme 1.2.0-4".parse().unwrap();
        assert!(!wrong_build.matches(&egg));
    }
}
