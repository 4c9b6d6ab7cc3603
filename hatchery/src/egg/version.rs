//! Totally-ordered comparison keys for egg version strings.

use std::cmp::Ordering;
use std::fmt;

use super::naming::split_eggname;

/// A pre-release qualifier, e.g. the `b1` in `1.2.0b1`.
#[derive(Debug, Clone, PartialEq, Eq)]
struct PreRelease {
    tag: String,
    number: u64,
}

/// Comparable representation of an egg version string.
///
/// Versions are dotted sequences of numeric components. The final component
/// may carry a single alphabetic release qualifier with an optional number
/// (`1.2.0b1`, `2.0rc2`, `1.0.dev3`); such versions are pre-releases and sort
/// below the final release with the same numeric prefix. Trailing zero
/// components are insignificant, so `1.2` and `1.2.0` compare equal.
///
/// The key orders versions only. Build numbers are a separate tie-breaker
/// owned by the caller, see [`comparable_key`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionKey {
    release: Vec<u64>,
    pre: Option<PreRelease>,
}

/// Error interpreting a version string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VersionParseError {
    /// Version string is empty
    Empty,
    /// A dotted component is empty
    EmptyComponent { version: String },
    /// A component contains characters the comparator cannot interpret
    InvalidComponent { version: String, component: String },
    /// A release qualifier appears before the final component
    QualifierNotLast { version: String, component: String },
}

impl fmt::Display for VersionParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VersionParseError::Empty => write!(f, "empty version string"),
            VersionParseError::EmptyComponent { version } => {
                write!(f, "version '{}' has an empty component", version)
            }
            VersionParseError::InvalidComponent { version, component } => {
                write!(
                    f,
                    "version '{}' has uninterpretable component '{}'",
                    version, component
                )
            }
            VersionParseError::QualifierNotLast { version, component } => {
                write!(
                    f,
                    "version '{}' has release qualifier '{}' before the final component",
                    version, component
                )
            }
        }
    }
}

impl std::error::Error for VersionParseError {}

/// What one dotted component contributed to the key.
enum Component {
    Numeric(u64),
    Qualified(u64, PreRelease),
    Qualifier(PreRelease),
}

impl VersionKey {
    /// Parse a version string into a comparison key.
    ///
    /// # Errors
    ///
    /// Returns a [`VersionParseError`] when any component cannot be
    /// interpreted. Callers performing status comparisons must treat such
    /// versions as incomparable and skip them, never abort.
    pub fn parse(version: &str) -> Result<Self, VersionParseError> {
        if version.is_empty() {
            return Err(VersionParseError::Empty);
        }

        let components: Vec<&str> = version.split('.').collect();
        let last = components.len() - 1;

        let mut release = Vec::with_capacity(components.len());
        let mut pre = None;

        for (i, raw) in components.iter().enumerate() {
            match parse_component(version, raw)? {
                Component::Numeric(n) => release.push(n),
                Component::Qualified(n, q) if i == last => {
                    release.push(n);
                    pre = Some(q);
                }
                Component::Qualifier(q) if i == last => pre = Some(q),
                Component::Qualified(..) | Component::Qualifier(_) => {
                    return Err(VersionParseError::QualifierNotLast {
                        version: version.to_string(),
                        component: raw.to_string(),
                    });
                }
            }
        }

        // Trailing zeros carry no ordering information and would make
        // equality disagree with comparison.
        while release.len() > 1 && release.last() == Some(&0) {
            release.pop();
        }

        Ok(Self { release, pre })
    }

    /// True if this version carries a pre-release qualifier.
    pub fn is_pre_release(&self) -> bool {
        self.pre.is_some()
    }
}

fn parse_component(version: &str, raw: &str) -> Result<Component, VersionParseError> {
    if raw.is_empty() {
        return Err(VersionParseError::EmptyComponent {
            version: version.to_string(),
        });
    }

    let invalid = || VersionParseError::InvalidComponent {
        version: version.to_string(),
        component: raw.to_string(),
    };

    let digits: String = raw.chars().take_while(|c| c.is_ascii_digit()).collect();
    let rest = &raw[digits.len()..];

    if rest.is_empty() {
        return Ok(Component::Numeric(digits.parse().map_err(|_| invalid())?));
    }

    let tag: String = rest.chars().take_while(|c| c.is_ascii_alphabetic()).collect();
    let tail = &rest[tag.len()..];
    if tag.is_empty() || !tail.chars().all(|c| c.is_ascii_digit()) {
        return Err(invalid());
    }

    let number = if tail.is_empty() {
        0
    } else {
        tail.parse().map_err(|_| invalid())?
    };
    let qualifier = PreRelease {
        tag: tag.to_lowercase(),
        number,
    };

    if digits.is_empty() {
        Ok(Component::Qualifier(qualifier))
    } else {
        let n = digits.parse().map_err(|_| invalid())?;
        Ok(Component::Qualified(n, qualifier))
    }
}

impl Ord for VersionKey {
    fn cmp(&self, other: &Self) -> Ordering {
        let len = self.release.len().max(other.release.len());
        for i in 0..len {
            let a = self.release.get(i).copied().unwrap_or(0);
            let b = other.release.get(i).copied().unwrap_or(0);
            match a.cmp(&b) {
                Ordering::Equal => continue,
                ord => return ord,
            }
        }
        match (&self.pre, &other.pre) {
            (None, None) => Ordering::Equal,
            (None, Some(_)) => Ordering::Greater,
            (Some(_), None) => Ordering::Less,
            (Some(a), Some(b)) => a.tag.cmp(&b.tag).then_with(|| a.number.cmp(&b.number)),
        }
    }
}

impl PartialOrd for VersionKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Comparison key for an egg filename, or `None` when incomparable.
///
/// Combines the version key with the build number so that callers can select
/// the best of several builds with a plain `max`. Malformed filenames and
/// uninterpretable versions yield `None`; status comparisons exclude those
/// entries instead of propagating the error.
pub fn comparable_key(filename: &str) -> Option<(VersionKey, u32)> {
    let egg = split_eggname(filename).ok()?;
    let key = VersionKey::parse(&egg.version).ok()?;
    Some((key, egg.build))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(s: &str) -> VersionKey {
        VersionKey::parse(s).unwrap()
    }

    #[test]
    fn test_numeric_ordering() {
        assert!(key("1.0.0") < key("1.0.1"));
        assert!(key("1.9") < key("1.10"));
        assert!(key("2.0") > key("1.99.99"));
    }

    #[test]
    fn test_trailing_zeros_equal() {
        assert_eq!(key("1.2"), key("1.2.0"));
        assert_eq!(key("1.2").cmp(&key("1.2.0.0")), Ordering::Equal);
        assert!(key("1.2") < key("1.2.1"));
    }

    #[test]
    fn test_pre_release_sorts_below_final() {
        assert!(key("1.2.0b1") < key("1.2.0"));
        assert!(key("2.0rc1") < key("2.0"));
        assert!(key("1.0.dev1") < key("1.0"));
        // but above earlier finals
        assert!(key("1.2.0b1") > key("1.1.9"));
    }

    #[test]
    fn test_pre_release_ordering() {
        assert!(key("1.0a1") < key("1.0b1"));
        assert!(key("1.0b1") < key("1.0b2"));
        assert!(key("1.0b") < key("1.0b1"));
    }

    #[test]
    fn test_qualifier_case_insensitive() {
        assert_eq!(key("1.0B1"), key("1.0b1"));
    }

    #[test]
    fn test_parse_errors() {
        assert!(matches!(
            VersionKey::parse("").unwrap_err(),
            VersionParseError::Empty
        ));
        assert!(matches!(
            VersionKey::parse("1..2").unwrap_err(),
            VersionParseError::EmptyComponent { .. }
        ));
        assert!(matches!(
            VersionKey::parse("1.2b3c4").unwrap_err(),
            VersionParseError::InvalidComponent { .. }
        ));
        assert!(matches!(
            VersionKey::parse("1.x+y").unwrap_err(),
            VersionParseError::InvalidComponent { .. }
        ));
        assert!(matches!(
            VersionKey::parse("1.2b1.3").unwrap_err(),
            VersionParseError::QualifierNotLast { .. }
        ));
    }

    #[test]
    fn test_is_pre_release() {
        assert!(key("1.0b1").is_pre_release());
        assert!(!key("1.0").is_pre_release());
    }

    #[test]
    fn test_comparable_key() {
        let (v1, b1) = comparable_key("acme-1.0.0-1.egg").unwrap();
        let (v2, b2) = comparable_key("acme-1.0.0-2.egg").unwrap();
        assert_eq!(v1, v2);
        assert!(b1 < b2);

        let (v3, _) = comparable_key("acme-1.2.0-1.egg").unwrap();
        assert!(v3 > v1);
    }

    #[test]
    fn test_comparable_key_incomparable() {
        assert!(comparable_key("not-an-egg").is_none());
        assert!(comparable_key("acme-1.2.oops-1.egg").is_none());
        assert!(comparable_key("acme-1.0.0.egg").is_none());
    }

    #[test]
    fn test_build_breaks_version_ties() {
        let a = comparable_key("acme-1.2-1.egg").unwrap();
        let b = comparable_key("acme-1.2.0-2.egg").unwrap();
        assert!(b > a);
    }
}
