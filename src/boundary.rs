use crate::notes::TOKEN_ENV;
use std::fmt;

/// Non-fatal conditions met while preparing or running a release.
/// These are reported to the user and the release carries on.
#[derive(Debug, Clone, PartialEq)]
pub enum ReleaseWarning {
    /// No GitHub token in the environment
    MissingToken,
    /// No changelog file, so no release notes
    MissingChangelog { path: String },
    /// Changelog exists but has no unreleased marker; neither the version
    /// section nor the release notes can be produced
    ChangelogFormat { path: String, marker: String },
    /// Origin remote missing or not a GitHub URL
    UnknownRepository { remote: String },
    /// Release notes step did nothing
    NotesSkipped { reason: String },
}

impl fmt::Display for ReleaseWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReleaseWarning::MissingToken => write!(
                f,
                "You must set {} env if you want to post the Release Notes of your project.\n\
                 Access https://github.com/settings/tokens/new to create a Personal Token.",
                TOKEN_ENV
            ),
            ReleaseWarning::MissingChangelog { path } => write!(
                f,
                "Create a {} if you want a Release Notes in your Github Project",
                path
            ),
            ReleaseWarning::ChangelogFormat { path, marker } => write!(
                f,
                "Cannot update your CHANGELOG file {}: no '{}' heading.\n\
                 You must follow the CHANGELOG conventions defined in http://keepachangelog.com/en/1.0.0/",
                path, marker
            ),
            ReleaseWarning::UnknownRepository { remote } => write!(
                f,
                "Cannot read the GitHub organization and repository from remote '{}'; \
                 changelog links and release notes are skipped",
                remote
            ),
            ReleaseWarning::NotesSkipped { reason } => {
                write!(f, "Release notes not posted: {}", reason)
            }
        }
    }
}
