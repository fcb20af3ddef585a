use crate::domain::bump::IncrementKind;
use crate::error::{ReleasyError, Result};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// A single dot-separated prerelease identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Identifier {
    Numeric(u64),
    AlphaNumeric(String),
}

impl Identifier {
    fn parse(part: &str) -> Self {
        if !part.is_empty() && part.chars().all(|c| c.is_ascii_digit()) {
            if let Ok(n) = part.parse::<u64>() {
                return Identifier::Numeric(n);
            }
        }
        Identifier::AlphaNumeric(part.to_string())
    }
}

impl From<&str> for Identifier {
    fn from(value: &str) -> Self {
        Identifier::parse(value)
    }
}

impl From<u64> for Identifier {
    fn from(value: u64) -> Self {
        Identifier::Numeric(value)
    }
}

impl Ord for Identifier {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Identifier::Numeric(a), Identifier::Numeric(b)) => a.cmp(b),
            (Identifier::Numeric(_), Identifier::AlphaNumeric(_)) => Ordering::Less,
            (Identifier::AlphaNumeric(_), Identifier::Numeric(_)) => Ordering::Greater,
            (Identifier::AlphaNumeric(a), Identifier::AlphaNumeric(b)) => a.cmp(b),
        }
    }
}

impl PartialOrd for Identifier {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Identifier::Numeric(n) => write!(f, "{}", n),
            Identifier::AlphaNumeric(s) => write!(f, "{}", s),
        }
    }
}

/// Semantic version representation
///
/// Build metadata is accepted when parsing but not retained, so formatting
/// always round-trips through [`Version::parse`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Version {
    pub major: u64,
    pub minor: u64,
    pub patch: u64,
    pub prerelease: Vec<Identifier>,
}

impl Version {
    /// Create a new stable version
    pub fn new(major: u64, minor: u64, patch: u64) -> Self {
        Version {
            major,
            minor,
            patch,
            prerelease: Vec::new(),
        }
    }

    /// Replace the prerelease identifiers
    pub fn with_prerelease<I, T>(mut self, identifiers: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<Identifier>,
    {
        self.prerelease = identifiers.into_iter().map(Into::into).collect();
        self
    }

    /// Parse a version string (e.g., "1.2.3", "v1.2.3-beta.4")
    ///
    /// Surrounding whitespace and a single leading `v` or `=` are tolerated.
    pub fn parse(input: &str) -> Result<Self> {
        let trimmed = input.trim();
        let clean = trimmed
            .strip_prefix('=')
            .unwrap_or(trimmed)
            .trim_start_matches(['v', 'V']);

        let parsed = semver::Version::parse(clean)
            .map_err(|e| ReleasyError::malformed(input, e.to_string()))?;

        let prerelease = if parsed.pre.is_empty() {
            Vec::new()
        } else {
            parsed.pre.as_str().split('.').map(Identifier::parse).collect()
        };

        Ok(Version {
            major: parsed.major,
            minor: parsed.minor,
            patch: parsed.patch,
            prerelease,
        })
    }

    /// Check if this version carries a prerelease
    pub fn is_prerelease(&self) -> bool {
        !self.prerelease.is_empty()
    }

    /// Same version with the prerelease dropped
    pub fn stable(&self) -> Self {
        Version::new(self.major, self.minor, self.patch)
    }

    /// Apply an increment the way npm's semver does
    pub fn increment(&self, kind: IncrementKind) -> Self {
        let mut next = self.clone();
        match kind {
            IncrementKind::Major => {
                if self.minor != 0 || self.patch != 0 || !self.is_prerelease() {
                    next.major += 1;
                }
                next.minor = 0;
                next.patch = 0;
                next.prerelease.clear();
            }
            IncrementKind::Minor => {
                if self.patch != 0 || !self.is_prerelease() {
                    next.minor += 1;
                }
                next.patch = 0;
                next.prerelease.clear();
            }
            IncrementKind::Patch => {
                if !self.is_prerelease() {
                    next.patch += 1;
                }
                next.prerelease.clear();
            }
            IncrementKind::PreMajor => {
                next = Version::new(self.major + 1, 0, 0);
                next.bump_prerelease_counter();
            }
            IncrementKind::PreMinor => {
                next = Version::new(self.major, self.minor + 1, 0);
                next.bump_prerelease_counter();
            }
            IncrementKind::PrePatch => {
                next = Version::new(self.major, self.minor, self.patch + 1);
                next.bump_prerelease_counter();
            }
            IncrementKind::PreRelease => {
                if !self.is_prerelease() {
                    next = next.increment(IncrementKind::Patch);
                }
                next.bump_prerelease_counter();
            }
        }
        next
    }

    // Increments the trailing numeric identifier, appending `0` when none exists.
    fn bump_prerelease_counter(&mut self) {
        let last_numeric = self
            .prerelease
            .iter_mut()
            .rev()
            .find_map(|id| match id {
                Identifier::Numeric(n) => Some(n),
                Identifier::AlphaNumeric(_) => None,
            });

        match last_numeric {
            Some(n) => *n += 1,
            None => self.prerelease.push(Identifier::Numeric(0)),
        }
    }
}

impl FromStr for Version {
    type Err = ReleasyError;

    fn from_str(s: &str) -> Result<Self> {
        Version::parse(s)
    }
}

impl Ord for Version {
    fn cmp(&self, other: &Self) -> Ordering {
        self.major
            .cmp(&other.major)
            .then(self.minor.cmp(&other.minor))
            .then(self.patch.cmp(&other.patch))
            .then_with(|| match (self.is_prerelease(), other.is_prerelease()) {
                (false, false) => Ordering::Equal,
                (false, true) => Ordering::Greater,
                (true, false) => Ordering::Less,
                (true, true) => self.prerelease.cmp(&other.prerelease),
            })
    }
}

impl PartialOrd for Version {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)?;
        for (i, id) in self.prerelease.iter().enumerate() {
            let sep = if i == 0 { '-' } else { '.' };
            write!(f, "{}{}", sep, id)?;
        }
        Ok(())
    }
}
