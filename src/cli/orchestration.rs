//! Command-line workflow
//!
//! Keeps `main.rs` down to argument parsing: this module merges the parsed
//! [`Cli`] with the options file and wires the production collaborators into
//! [`releasy`].

use anyhow::{Context, Result};
use std::path::PathBuf;
use std::time::Duration;

use crate::cli::Cli;
use crate::config::{self, OptionsFile};
use crate::domain::BumpType;
use crate::git::Git2Repository;
use crate::notes::GitHubPublisher;
use crate::pipeline::ReleaseState;
use crate::providers::ProviderRegistry;
use crate::release::{
    releasy, Collaborators, Environment, ReleaseOptions, ReleaseOutcome, ReleaseRequest,
    DEFAULT_PRERELEASE_TAG,
};
use crate::runner::ProcessRunner;
use crate::ui::{ConsoleLogger, Logger, TerminalConfirmer};

/// Merge command-line values with the options file
///
/// A value given on the command line wins, then the file, then the default.
/// Boolean flags only count when present.
pub fn merge(cli: &Cli, file: &OptionsFile) -> crate::Result<(ReleaseRequest, ReleaseOptions)> {
    let bump = cli
        .release_type
        .as_deref()
        .or(file.release_type.as_deref())
        .map(str::parse::<BumpType>)
        .transpose()?;

    let defaults = ReleaseRequest::default();
    let request = ReleaseRequest {
        filename: cli
            .filename
            .clone()
            .or_else(|| file.filename.as_ref().map(PathBuf::from))
            .unwrap_or(defaults.filename),
        bump,
        prerelease_tag: Some(
            cli.tag_name
                .clone()
                .or_else(|| file.tag_name.clone())
                .unwrap_or_else(|| DEFAULT_PRERELEASE_TAG.to_string()),
        ),
        stable: flag(cli.stable, file.stable, false),
        npm_tag: cli
            .npm_tag
            .clone()
            .or_else(|| file.npm_tag.clone())
            .filter(|t| !t.is_empty()),
        npm_folder: cli
            .folder
            .clone()
            .or_else(|| file.folder.as_ref().map(PathBuf::from))
            .filter(|f| !f.as_os_str().is_empty()),
        changelog_path: cli
            .changelog
            .clone()
            .or_else(|| file.changelog.as_ref().map(PathBuf::from))
            .unwrap_or(defaults.changelog_path),
        dry_run: flag(cli.dry_run, file.dry_run, false),
        quiet: flag(cli.quiet, file.quiet, false),
        timeout: cli.timeout.or(file.timeout).map(Duration::from_secs),
    };

    let options = ReleaseOptions {
        commit: negated_flag(cli.no_commit, file.commit),
        tag: negated_flag(cli.no_tag, file.tag),
        push: negated_flag(cli.no_push, file.push),
        notes: flag(cli.notes, file.notes, false),
        npm: flag(cli.npm, file.npm, false),
        display_name: flag(cli.display_name, file.display_name, false),
        silent: flag(cli.silent, file.silent, false),
        cli: true,
        otp: cli.otp.clone().or_else(|| file.otp.clone()).filter(|c| !c.is_empty()),
    };

    Ok((request, options))
}

fn flag(given: bool, file: Option<bool>, default: bool) -> bool {
    given || file.unwrap_or(default)
}

// `--no-x` forces false; otherwise the file decides, default true
fn negated_flag(negated: bool, file: Option<bool>) -> bool {
    !negated && file.unwrap_or(true)
}

/// Run a release from the command line
///
/// # Returns
/// The process exit code: 0 when the release finished or was cancelled,
/// 1 when a step failed.
pub fn run_cli(cli: &Cli) -> Result<i32> {
    let (file, source) = config::load_options(cli.config.as_deref())?;
    if let Some(source) = &source {
        tracing::info!(path = %source.display(), "using options file");
    }

    let (request, options) = merge(cli, &file)?;
    if let Some(bump) = request.bump {
        tracing::info!(release = %bump, "release type");
    }

    let logger = ConsoleLogger::new(request.quiet);
    let repo = Git2Repository::open(".").context("Not inside a git repository")?;
    let runner = ProcessRunner::new();
    let publisher = GitHubPublisher::new(request.timeout)?;
    let confirmer = TerminalConfirmer::new();

    let collaborators = Collaborators {
        repo: &repo,
        runner: &runner,
        publisher: &publisher,
        confirmer: &confirmer,
        logger: &logger,
    };

    let outcome = releasy(
        &request,
        &options,
        &ProviderRegistry::default(),
        collaborators,
        &Environment::from_process(),
    );

    match outcome {
        Ok(ReleaseOutcome::Cancelled) => Ok(0),
        Ok(ReleaseOutcome::Completed(report)) if report.state == ReleaseState::Failed => Ok(1),
        Ok(ReleaseOutcome::Completed(_)) => Ok(0),
        Err(e) => {
            if !request.quiet {
                logger.error(&format!("[ERROR] Failed to release.\n{}", e));
            }
            Ok(1)
        }
    }
}
