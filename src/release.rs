//! Release preparation and the top-level `releasy` entry point
//!
//! [`prepare`] turns a [`ReleaseRequest`] into an immutable [`ReleaseConfig`]:
//! it picks the provider, resolves the versions, names the tag and reads the
//! changelog excerpt. Nothing on disk changes until the pipeline runs.

use crate::boundary::ReleaseWarning;
use crate::changelog::{self, DEFAULT_PATH, UNRELEASED_LABEL, UNRELEASED_MARKER};
use crate::domain::{BumpType, TagPattern, Version};
use crate::error::Result;
use crate::git::{parse_org_repo, Repository};
use crate::notes::{ReleaseDraft, ReleaseNotesPublisher, TOKEN_ENV};
use crate::pipeline::{ReleasePipeline, ReleaseReport};
use crate::providers::{ProviderRegistry, VersionProvider};
use crate::resolver::{self, STABLE_TAG};
use crate::runner::CommandRunner;
use crate::ui::{format_versions, Confirmer, Logger};
use chrono::NaiveDate;
use std::fmt;
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

/// Remote that receives the release commit and tag
pub const DEFAULT_REMOTE: &str = "origin";

/// Default prerelease identifier of the command line
pub const DEFAULT_PRERELEASE_TAG: &str = "beta";

/// What to release
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseRequest {
    /// Version file the provider is picked for
    pub filename: PathBuf,
    /// `None` means patch
    pub bump: Option<BumpType>,
    /// Prerelease identifier, `stable` for none
    pub prerelease_tag: Option<String>,
    /// Overrides `prerelease_tag` with `stable`
    pub stable: bool,
    pub npm_tag: Option<String>,
    /// Folder handed to `npm publish`
    pub npm_folder: Option<PathBuf>,
    pub changelog_path: PathBuf,
    pub dry_run: bool,
    pub quiet: bool,
    /// Limit for each external command
    pub timeout: Option<Duration>,
}

impl Default for ReleaseRequest {
    fn default() -> Self {
        ReleaseRequest {
            filename: PathBuf::from("package.json"),
            bump: None,
            prerelease_tag: None,
            stable: false,
            npm_tag: None,
            npm_folder: None,
            changelog_path: PathBuf::from(DEFAULT_PATH),
            dry_run: false,
            quiet: false,
            timeout: None,
        }
    }
}

/// Which steps run and how the run is driven
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseOptions {
    pub commit: bool,
    pub tag: bool,
    pub push: bool,
    pub notes: bool,
    pub npm: bool,
    /// Tag as `{project}@{version}`
    pub display_name: bool,
    /// Skip the confirmation question
    pub silent: bool,
    /// Started from the command line; only then is the user asked to confirm
    pub cli: bool,
    /// npm one-time password known up front
    pub otp: Option<String>,
}

impl Default for ReleaseOptions {
    fn default() -> Self {
        ReleaseOptions {
            commit: true,
            tag: true,
            push: true,
            notes: false,
            npm: false,
            display_name: false,
            silent: false,
            cli: false,
            otp: None,
        }
    }
}

/// Values read from the process environment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Environment {
    pub github_token: Option<String>,
    pub today: NaiveDate,
}

impl Environment {
    /// `GITHUB_API_TOKEN` and the current UTC date
    pub fn from_process() -> Self {
        Environment {
            github_token: std::env::var(TOKEN_ENV).ok().filter(|t| !t.is_empty()),
            today: chrono::Utc::now().date_naive(),
        }
    }
}

/// Everything the pipeline needs, computed once per run
pub struct ReleaseConfig {
    pub provider: Box<dyn VersionProvider>,
    pub current_version: Version,
    pub new_version: Version,
    pub tag_name: String,
    pub current_version_tag_name: String,
    pub commit_message: String,
    pub tag_message: String,
    pub changelog_path: PathBuf,
    pub unreleased_marker: String,
    pub unreleased_label: String,
    pub release_date: NaiveDate,
    pub github_auth: Option<String>,
    pub github_org_repo: Option<(String, String)>,
    pub release_draft: ReleaseDraft,
    pub dry_run: bool,
    pub quiet: bool,
    pub npm_tag: Option<String>,
    pub npm_folder: Option<PathBuf>,
    pub remote: String,
    pub timeout: Option<Duration>,
}

impl fmt::Debug for ReleaseConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReleaseConfig")
            .field("provider", &self.provider)
            .field("current_version", &self.current_version)
            .field("new_version", &self.new_version)
            .field("tag_name", &self.tag_name)
            .field("changelog_path", &self.changelog_path)
            .field("github_auth", &self.github_auth.as_ref().map(|_| "<redacted>"))
            .field("github_org_repo", &self.github_org_repo)
            .field("dry_run", &self.dry_run)
            .finish_non_exhaustive()
    }
}

impl ReleaseConfig {
    /// Whether the changelog file is present
    pub fn has_changelog(&self) -> bool {
        self.changelog_path.is_file()
    }
}

/// Capabilities a release run talks to
#[derive(Clone, Copy)]
pub struct Collaborators<'a> {
    pub repo: &'a dyn Repository,
    pub runner: &'a dyn CommandRunner,
    pub publisher: &'a dyn ReleaseNotesPublisher,
    pub confirmer: &'a dyn Confirmer,
    pub logger: &'a dyn Logger,
}

/// How a run ended
#[derive(Debug)]
pub enum ReleaseOutcome {
    /// The user declined the confirmation
    Cancelled,
    /// The pipeline ran; check the report for failure
    Completed(ReleaseReport),
}

/// Build the [`ReleaseConfig`] of a run
///
/// Reports non-fatal conditions (missing token, changelog problems, unknown
/// GitHub repository) through the logger.
///
/// # Errors
/// Provider selection, version reading and resolution errors. Nothing has
/// been modified when this fails.
pub fn prepare(
    request: &ReleaseRequest,
    options: &ReleaseOptions,
    registry: &ProviderRegistry,
    repo: &dyn Repository,
    logger: &dyn Logger,
    env: &Environment,
) -> Result<ReleaseConfig> {
    let provider = registry.pick(&request.filename)?;

    let prerelease_tag = if request.stable {
        Some(STABLE_TAG)
    } else {
        request.prerelease_tag.as_deref()
    };
    let resolution = resolver::resolve(provider.as_ref(), request.bump, prerelease_tag)?;

    let pattern = if options.display_name {
        TagPattern::named(&provider.read_name()?)
    } else {
        TagPattern::versioned()
    };
    let tag_name = pattern.format(&resolution.new);
    let current_version_tag_name = pattern.format(&resolution.current);

    if !request.quiet {
        logger.info(&format_versions(
            &resolution.current.to_string(),
            &resolution.new.to_string(),
        ));
    }

    let github_auth = env.github_token.clone();
    if github_auth.is_none() && options.notes {
        logger.warn(&ReleaseWarning::MissingToken);
    }

    let github_org_repo = repo
        .remote_url(DEFAULT_REMOTE)?
        .as_deref()
        .and_then(parse_org_repo);

    let changelog_path = request.changelog_path.clone();
    let body = if changelog_path.is_file() {
        if github_org_repo.is_none() {
            logger.warn(&ReleaseWarning::UnknownRepository {
                remote: DEFAULT_REMOTE.to_string(),
            });
        }
        let doc = fs::read_to_string(&changelog_path)?;
        if !doc.contains(UNRELEASED_MARKER) {
            logger.warn(&ReleaseWarning::ChangelogFormat {
                path: changelog_path.display().to_string(),
                marker: UNRELEASED_MARKER.to_string(),
            });
        }
        changelog::release_notes_excerpt(
            &doc,
            UNRELEASED_MARKER,
            &resolution.current.to_string(),
        )
    } else {
        if options.notes {
            logger.warn(&ReleaseWarning::MissingChangelog {
                path: changelog_path.display().to_string(),
            });
        }
        None
    };

    let release_draft = ReleaseDraft::for_tag(&tag_name, body, resolution.new.is_prerelease());
    let message = format!("Release {}", tag_name);

    tracing::debug!(
        tag = %tag_name,
        org_repo = ?github_org_repo,
        changelog = %changelog_path.display(),
        "prepared release"
    );

    Ok(ReleaseConfig {
        provider,
        current_version: resolution.current,
        new_version: resolution.new,
        tag_name,
        current_version_tag_name,
        commit_message: message.clone(),
        tag_message: message,
        changelog_path,
        unreleased_marker: UNRELEASED_MARKER.to_string(),
        unreleased_label: UNRELEASED_LABEL.to_string(),
        release_date: env.today,
        github_auth,
        github_org_repo,
        release_draft,
        dry_run: request.dry_run,
        quiet: request.quiet,
        npm_tag: request.npm_tag.clone(),
        npm_folder: request.npm_folder.clone(),
        remote: DEFAULT_REMOTE.to_string(),
        timeout: request.timeout,
    })
}

/// Prepare, confirm and run a release
///
/// The confirmation question is only asked for command-line runs that are
/// not silent. Pipeline failures are reported in the returned
/// [`ReleaseReport`], not as `Err`.
///
/// # Errors
/// Preparation errors and a failing confirmation prompt.
pub fn releasy(
    request: &ReleaseRequest,
    options: &ReleaseOptions,
    registry: &ProviderRegistry,
    collaborators: Collaborators<'_>,
    env: &Environment,
) -> Result<ReleaseOutcome> {
    let config = prepare(
        request,
        options,
        registry,
        collaborators.repo,
        collaborators.logger,
        env,
    )?;

    if options.cli && !options.silent && !collaborators.confirmer.confirm("Are you sure?")? {
        tracing::info!("release cancelled by user");
        return Ok(ReleaseOutcome::Cancelled);
    }

    let report = ReleasePipeline::new(&config, options, collaborators).run();
    Ok(ReleaseOutcome::Completed(report))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::git::MockRepository;
    use crate::ui::MemoryLogger;
    use std::path::Path;
    use tempfile::TempDir;

    fn write(dir: &Path, name: &str, contents: &str) -> PathBuf {
        let path = dir.join(name);
        fs::write(&path, contents).unwrap();
        path
    }

    fn env() -> Environment {
        Environment {
            github_token: None,
            today: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
        }
    }

    #[test]
    fn test_prepare_names_tag_and_messages() {
        let dir = TempDir::new().unwrap();
        let request = ReleaseRequest {
            filename: write(dir.path(), "package.json", r#"{"name": "app", "version": "1.0.0"}"#),
            bump: Some(BumpType::Minor),
            changelog_path: dir.path().join("CHANGELOG.md"),
            ..ReleaseRequest::default()
        };
        let repo = MockRepository::new().with_remote("origin", "git@github.com:acme/app.git");
        let logger = MemoryLogger::new();

        let config = prepare(
            &request,
            &ReleaseOptions::default(),
            &ProviderRegistry::default(),
            &repo,
            &logger,
            &env(),
        )
        .unwrap();

        assert_eq!(config.new_version.to_string(), "1.1.0");
        assert_eq!(config.tag_name, "v1.1.0");
        assert_eq!(config.current_version_tag_name, "v1.0.0");
        assert_eq!(config.commit_message, "Release v1.1.0");
        assert_eq!(config.tag_message, "Release v1.1.0");
        assert_eq!(
            config.github_org_repo,
            Some(("acme".to_string(), "app".to_string()))
        );
        assert_eq!(config.release_draft.body, " ");
        assert!(logger.contains("Old version: "));
    }

    #[test]
    fn test_prepare_display_name_tag() {
        let dir = TempDir::new().unwrap();
        let request = ReleaseRequest {
            filename: write(dir.path(), "package.json", r#"{"name": "app", "version": "0.1.0"}"#),
            changelog_path: dir.path().join("CHANGELOG.md"),
            ..ReleaseRequest::default()
        };
        let options = ReleaseOptions {
            display_name: true,
            ..ReleaseOptions::default()
        };

        let config = prepare(
            &request,
            &options,
            &ProviderRegistry::default(),
            &MockRepository::new(),
            &MemoryLogger::new(),
            &env(),
        )
        .unwrap();

        assert_eq!(config.tag_name, "app@0.1.1");
        assert_eq!(config.github_org_repo, None);
    }

    #[test]
    fn test_prepare_reads_release_body() {
        let dir = TempDir::new().unwrap();
        let changelog = write(
            dir.path(),
            "CHANGELOG.md",
            "# Changelog\n\n## [Unreleased]\n### Added\n- Login\n\n## [1.0.0] - 2024-01-01\n- First\n",
        );
        let request = ReleaseRequest {
            filename: write(dir.path(), "package.json", r#"{"version": "1.0.0"}"#),
            bump: Some(BumpType::Major),
            changelog_path: changelog,
            ..ReleaseRequest::default()
        };
        let repo = MockRepository::new().with_remote("origin", "https://github.com/acme/app");

        let config = prepare(
            &request,
            &ReleaseOptions::default(),
            &ProviderRegistry::default(),
            &repo,
            &MemoryLogger::new(),
            &env(),
        )
        .unwrap();

        assert_eq!(config.release_draft.body, "### Added\n- Login");
        assert_eq!(config.release_draft.tag_name, "v2.0.0");
        assert!(!config.release_draft.prerelease);
    }

    #[test]
    fn test_prepare_warns_when_notes_cannot_be_posted() {
        let dir = TempDir::new().unwrap();
        let request = ReleaseRequest {
            filename: write(dir.path(), "package.json", r#"{"version": "1.0.0"}"#),
            changelog_path: dir.path().join("CHANGELOG.md"),
            ..ReleaseRequest::default()
        };
        let options = ReleaseOptions {
            notes: true,
            ..ReleaseOptions::default()
        };
        let logger = MemoryLogger::new();

        prepare(
            &request,
            &options,
            &ProviderRegistry::default(),
            &MockRepository::new(),
            &logger,
            &env(),
        )
        .unwrap();

        assert!(logger.contains(TOKEN_ENV));
        assert!(logger.contains("Create a"));
    }

    #[test]
    fn test_prepare_stable_flag_wins_over_tag() {
        let dir = TempDir::new().unwrap();
        let request = ReleaseRequest {
            filename: write(dir.path(), "package.json", r#"{"version": "1.0.0-beta.1"}"#),
            bump: Some(BumpType::Minor),
            prerelease_tag: Some("beta".to_string()),
            stable: true,
            changelog_path: dir.path().join("CHANGELOG.md"),
            quiet: true,
            ..ReleaseRequest::default()
        };
        let logger = MemoryLogger::new();

        let config = prepare(
            &request,
            &ReleaseOptions::default(),
            &ProviderRegistry::default(),
            &MockRepository::new(),
            &logger,
            &env(),
        )
        .unwrap();

        assert_eq!(config.new_version.to_string(), "1.0.0");
        assert!(logger.lines().is_empty());
    }

    #[test]
    fn test_prepare_unknown_file_type() {
        let request = ReleaseRequest {
            filename: PathBuf::from("Cargo.toml"),
            ..ReleaseRequest::default()
        };

        let err = prepare(
            &request,
            &ReleaseOptions::default(),
            &ProviderRegistry::default(),
            &MockRepository::new(),
            &MemoryLogger::new(),
            &env(),
        )
        .unwrap_err();

        assert!(matches!(err, crate::error::ReleasyError::ProviderNotFound(_)));
    }
}
