//! Next-version computation
//!
//! [`resolve`] reads the current version from a provider and applies the
//! requested bump. The rules, in order:
//!
//! 1. `promote` requires a prerelease, clears it and behaves as if the
//!    prerelease tag were `stable`.
//! 2. Otherwise the increment is the plain bump when the bump is
//!    `prerelease`, the tag is `stable` or the current version is stable;
//!    on a prerelease version the `pre*` form starts a new series instead.
//! 3. A prerelease tag other than `stable` replaces the prerelease
//!    identifiers (no counter), except for `prerelease` bumps.

use crate::domain::{BumpType, Version};
use crate::error::{ReleasyError, Result};
use crate::providers::VersionProvider;

/// Prerelease tag value meaning "no prerelease"
pub const STABLE_TAG: &str = "stable";

/// Current and next version of a release
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub current: Version,
    pub new: Version,
}

/// Compute the next version for `provider`
///
/// An unset `bump` means `patch`. An empty `prerelease_tag` is treated as unset.
///
/// # Errors
/// * [`ReleasyError::AlreadyStable`] when promoting a stable version
/// * provider read errors
pub fn resolve(
    provider: &dyn VersionProvider,
    bump: Option<BumpType>,
    prerelease_tag: Option<&str>,
) -> Result<Resolution> {
    let current = provider.read_version()?;
    let new = next_version(&current, bump, prerelease_tag)?;

    tracing::debug!(%current, %new, bump = ?bump, tag = ?prerelease_tag, "resolved version");
    Ok(Resolution { current, new })
}

/// Pure version transition used by [`resolve`]
pub fn next_version(
    current: &Version,
    bump: Option<BumpType>,
    prerelease_tag: Option<&str>,
) -> Result<Version> {
    let mut tag = prerelease_tag.filter(|t| !t.is_empty());

    let mut next = if bump == Some(BumpType::Promote) {
        if !current.is_prerelease() {
            return Err(ReleasyError::AlreadyStable(current.to_string()));
        }
        tag = Some(STABLE_TAG);
        current.stable()
    } else {
        let bump_type = bump.unwrap_or(BumpType::Patch);
        let plain = bump_type == BumpType::Prerelease
            || tag == Some(STABLE_TAG)
            || !current.is_prerelease();

        let kind = if plain {
            bump_type.increment_kind()
        } else {
            bump_type.pre_increment_kind()
        };
        current.increment(kind)
    };

    if let Some(tag) = tag {
        if tag != STABLE_TAG && bump != Some(BumpType::Prerelease) {
            next = next.with_prerelease([tag]);
        }
    }

    Ok(next)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v(s: &str) -> Version {
        Version::parse(s).unwrap()
    }

    fn next(current: &str, bump: Option<BumpType>, tag: Option<&str>) -> Result<Version> {
        next_version(&v(current), bump, tag)
    }

    #[test]
    fn test_plain_bumps_zero_lower_components() {
        assert_eq!(next("1.2.3", Some(BumpType::Major), None).unwrap(), v("2.0.0"));
        assert_eq!(next("1.2.3", Some(BumpType::Minor), None).unwrap(), v("1.3.0"));
        assert_eq!(next("1.2.3", Some(BumpType::Patch), None).unwrap(), v("1.2.4"));
    }

    #[test]
    fn test_plain_bumps_strictly_increase() {
        let versions = ["0.0.0", "1.2.3", "1.2.3-beta.1", "2.0.0-0", "9.9.9"];
        let bumps = [BumpType::Major, BumpType::Minor, BumpType::Patch];
        for current in versions {
            for bump in bumps {
                let new = next(current, Some(bump), Some(STABLE_TAG)).unwrap();
                assert!(new > v(current), "{} {} -> {}", current, bump, new);
            }
        }
    }

    #[test]
    fn test_unset_bump_defaults_to_patch() {
        assert_eq!(next("1.2.3", None, None).unwrap(), v("1.2.4"));
    }

    #[test]
    fn test_promote() {
        assert_eq!(next("1.0.0-beta.2", Some(BumpType::Promote), None).unwrap(), v("1.0.0"));
        assert_eq!(
            next("1.0.0-beta.2", Some(BumpType::Promote), Some("beta")).unwrap(),
            v("1.0.0")
        );
    }

    #[test]
    fn test_promote_stable_fails() {
        let err = next("1.0.0", Some(BumpType::Promote), None).unwrap_err();
        assert!(matches!(err, ReleasyError::AlreadyStable(ref s) if s == "1.0.0"));
    }

    #[test]
    fn test_patch_with_tag_on_stable() {
        assert_eq!(next("1.2.3", Some(BumpType::Patch), Some("beta")).unwrap(), v("1.2.4-beta"));
        assert_eq!(next("1.2.3", Some(BumpType::Minor), Some("beta")).unwrap(), v("1.3.0-beta"));
    }

    #[test]
    fn test_bump_on_prerelease_starts_new_series() {
        assert_eq!(next("1.2.3-beta.1", Some(BumpType::Minor), None).unwrap(), v("1.3.0-0"));
        assert_eq!(next("1.2.3-beta.1", None, None).unwrap(), v("1.2.4-0"));
        assert_eq!(
            next("1.2.3-beta.1", Some(BumpType::Major), Some("alpha")).unwrap(),
            v("2.0.0-alpha")
        );
    }

    #[test]
    fn test_stable_tag_leaves_prerelease_series() {
        assert_eq!(
            next("1.2.3-beta.1", Some(BumpType::Patch), Some(STABLE_TAG)).unwrap(),
            v("1.2.3")
        );
    }

    #[test]
    fn test_prerelease_bump() {
        assert_eq!(
            next("1.2.3-beta.4", Some(BumpType::Prerelease), Some("beta")).unwrap(),
            v("1.2.3-beta.5")
        );
        assert_eq!(next("1.2.3", Some(BumpType::Prerelease), None).unwrap(), v("1.2.4-0"));
    }

    #[test]
    fn test_empty_tag_is_unset() {
        assert_eq!(next("1.2.3", Some(BumpType::Patch), Some("")).unwrap(), v("1.2.4"));
    }
}
