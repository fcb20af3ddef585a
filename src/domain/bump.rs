use crate::error::{ReleasyError, Result};
use std::fmt;
use std::str::FromStr;

/// Release type requested by the user
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BumpType {
    Major,
    Minor,
    Patch,
    /// Turn a prerelease into a stable version without touching the numbers
    Promote,
    /// Advance the counter of an existing prerelease
    Prerelease,
}

impl BumpType {
    /// All accepted names, including the `pre` shorthand
    pub const NAMES: [&'static str; 6] = ["major", "minor", "patch", "promote", "prerelease", "pre"];

    pub fn name(&self) -> &'static str {
        match self {
            BumpType::Major => "major",
            BumpType::Minor => "minor",
            BumpType::Patch => "patch",
            BumpType::Promote => "promote",
            BumpType::Prerelease => "prerelease",
        }
    }

    /// Increment applied to a stable version (or when leaving a prerelease series)
    pub fn increment_kind(&self) -> IncrementKind {
        match self {
            BumpType::Major => IncrementKind::Major,
            BumpType::Minor => IncrementKind::Minor,
            BumpType::Patch | BumpType::Promote => IncrementKind::Patch,
            BumpType::Prerelease => IncrementKind::PreRelease,
        }
    }

    /// `pre`-prefixed increment that starts a new prerelease series
    pub fn pre_increment_kind(&self) -> IncrementKind {
        match self {
            BumpType::Major => IncrementKind::PreMajor,
            BumpType::Minor => IncrementKind::PreMinor,
            BumpType::Patch | BumpType::Promote => IncrementKind::PrePatch,
            BumpType::Prerelease => IncrementKind::PreRelease,
        }
    }
}

impl FromStr for BumpType {
    type Err = ReleasyError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "major" => Ok(BumpType::Major),
            "minor" => Ok(BumpType::Minor),
            "patch" => Ok(BumpType::Patch),
            "promote" => Ok(BumpType::Promote),
            "prerelease" | "pre" => Ok(BumpType::Prerelease),
            other => Err(ReleasyError::config(format!(
                "Unknown release type '{}', expected one of: {}",
                other,
                BumpType::NAMES.join(", ")
            ))),
        }
    }
}

impl fmt::Display for BumpType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Concrete increment applied to a [`Version`](crate::domain::Version)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IncrementKind {
    Major,
    Minor,
    Patch,
    PreMajor,
    PreMinor,
    PrePatch,
    PreRelease,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_bump_types() {
        assert_eq!("major".parse::<BumpType>().unwrap(), BumpType::Major);
        assert_eq!("Minor".parse::<BumpType>().unwrap(), BumpType::Minor);
        assert_eq!("patch".parse::<BumpType>().unwrap(), BumpType::Patch);
        assert_eq!("promote".parse::<BumpType>().unwrap(), BumpType::Promote);
        assert_eq!("prerelease".parse::<BumpType>().unwrap(), BumpType::Prerelease);
    }

    #[test]
    fn test_pre_is_prerelease_alias() {
        assert_eq!("pre".parse::<BumpType>().unwrap(), BumpType::Prerelease);
    }

    #[test]
    fn test_parse_unknown_bump_type() {
        let err = "huge".parse::<BumpType>().unwrap_err();
        assert!(err.to_string().contains("Unknown release type 'huge'"));
    }

    #[test]
    fn test_pre_increment_kinds() {
        assert_eq!(BumpType::Major.pre_increment_kind(), IncrementKind::PreMajor);
        assert_eq!(BumpType::Minor.pre_increment_kind(), IncrementKind::PreMinor);
        assert_eq!(BumpType::Patch.pre_increment_kind(), IncrementKind::PrePatch);
    }
}
