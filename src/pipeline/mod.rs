//! Release pipeline
//!
//! A release is a fixed, ordered list of steps. Each step is enabled or not
//! by the [`ReleaseOptions`]; [`ReleasePipeline::plan`] resolves that list and
//! [`ReleasePipeline::run`] executes it in a single loop, stopping at the
//! first failure.
//!
//! In dry-run mode every step still logs what it would do but nothing is
//! written, committed, tagged, pushed, posted or published, and project
//! scripts are not executed.
//!
//! The run ends in a [`ReleaseReport`]: the last state reached, the steps
//! executed and the error that stopped it. There is no rollback; a failure
//! after the commit leaves the commit in place.

pub mod publish;

use crate::boundary::ReleaseWarning;
use crate::changelog::{self, CompareLinks};
use crate::error::{ReleasyError, Result};
use crate::hooks::{HookContext, HookExecutor, HookType};
use crate::providers::write_files;
use crate::release::{Collaborators, ReleaseConfig, ReleaseOptions};
use std::fmt;
use std::fs;
use std::path::PathBuf;

/// The steps of a release, in execution order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StepKind {
    PreReleasy,
    Bump,
    Add,
    Commit,
    Tag,
    Push,
    ReleaseNotes,
    Publish,
    PostReleasy,
}

impl StepKind {
    pub const ALL: [StepKind; 9] = [
        StepKind::PreReleasy,
        StepKind::Bump,
        StepKind::Add,
        StepKind::Commit,
        StepKind::Tag,
        StepKind::Push,
        StepKind::ReleaseNotes,
        StepKind::Publish,
        StepKind::PostReleasy,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            StepKind::PreReleasy => "prereleasy",
            StepKind::Bump => "bump",
            StepKind::Add => "add",
            StepKind::Commit => "commit",
            StepKind::Tag => "tag",
            StepKind::Push => "push",
            StepKind::ReleaseNotes => "release-notes",
            StepKind::Publish => "publish",
            StepKind::PostReleasy => "postreleasy",
        }
    }

    /// Whether the step runs under `options`
    pub fn is_enabled(&self, options: &ReleaseOptions) -> bool {
        match self {
            StepKind::PreReleasy | StepKind::Bump | StepKind::PostReleasy => true,
            StepKind::Add | StepKind::Commit => options.commit,
            StepKind::Tag => options.tag,
            StepKind::Push => options.push,
            StepKind::ReleaseNotes => options.notes,
            StepKind::Publish => options.npm,
        }
    }

    /// State reached once the step completes
    pub fn completed_state(&self) -> Option<ReleaseState> {
        match self {
            StepKind::PreReleasy => Some(ReleaseState::PreHook),
            StepKind::Bump => Some(ReleaseState::Bumped),
            StepKind::Add => None,
            StepKind::Commit => Some(ReleaseState::Committed),
            StepKind::Tag => Some(ReleaseState::Tagged),
            StepKind::Push => Some(ReleaseState::Pushed),
            StepKind::ReleaseNotes => Some(ReleaseState::NotesPosted),
            StepKind::Publish => Some(ReleaseState::Published),
            StepKind::PostReleasy => Some(ReleaseState::PostHook),
        }
    }
}

impl fmt::Display for StepKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Progress of a release run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReleaseState {
    NotStarted,
    PreHook,
    Bumped,
    Committed,
    Tagged,
    Pushed,
    NotesPosted,
    Published,
    PostHook,
    Done,
    Failed,
}

/// Result of [`ReleasePipeline::run`]
#[derive(Debug)]
pub struct ReleaseReport {
    pub state: ReleaseState,
    /// Steps that completed, in order
    pub executed: Vec<StepKind>,
    /// Step that failed and why
    pub failure: Option<(StepKind, ReleasyError)>,
}

impl ReleaseReport {
    fn new() -> Self {
        ReleaseReport {
            state: ReleaseState::NotStarted,
            executed: Vec::new(),
            failure: None,
        }
    }

    pub fn is_success(&self) -> bool {
        self.state == ReleaseState::Done
    }

    pub fn error(&self) -> Option<&ReleasyError> {
        self.failure.as_ref().map(|(_, e)| e)
    }
}

/// Executes the planned steps of one release
pub struct ReleasePipeline<'a> {
    config: &'a ReleaseConfig,
    options: &'a ReleaseOptions,
    collaborators: Collaborators<'a>,
}

impl<'a> ReleasePipeline<'a> {
    pub fn new(
        config: &'a ReleaseConfig,
        options: &'a ReleaseOptions,
        collaborators: Collaborators<'a>,
    ) -> Self {
        ReleasePipeline {
            config,
            options,
            collaborators,
        }
    }

    /// Every step with whether it runs under `options`
    pub fn plan(options: &ReleaseOptions) -> Vec<(StepKind, bool)> {
        StepKind::ALL
            .iter()
            .map(|step| (*step, step.is_enabled(options)))
            .collect()
    }

    /// Run the enabled steps in order, stopping at the first failure
    pub fn run(&self) -> ReleaseReport {
        let mut report = ReleaseReport::new();
        self.info("Starting release...");

        for (step, enabled) in Self::plan(self.options) {
            if !enabled {
                tracing::debug!(step = step.name(), "step disabled");
                continue;
            }

            tracing::debug!(step = step.name(), dry_run = self.config.dry_run, "running step");
            if let Err(e) = self.execute(step) {
                tracing::error!(step = step.name(), error = %e, "release step failed");
                if !self.config.quiet {
                    self.collaborators
                        .logger
                        .error(&format!("[ERROR] Failed to release.\n{}", e));
                }
                report.state = ReleaseState::Failed;
                report.failure = Some((step, e));
                return report;
            }

            if let Some(state) = step.completed_state() {
                report.state = state;
            }
            report.executed.push(step);
        }

        report.state = ReleaseState::Done;
        if !self.config.quiet {
            self.collaborators
                .logger
                .success("All steps finished successfully.");
        }
        report
    }

    fn execute(&self, step: StepKind) -> Result<()> {
        match step {
            StepKind::PreReleasy => self.pre_releasy(),
            StepKind::Bump => self.bump(),
            StepKind::Add => self.add(),
            StepKind::Commit => self.commit(),
            StepKind::Tag => self.tag(),
            StepKind::Push => self.push(),
            StepKind::ReleaseNotes => self.release_notes(),
            StepKind::Publish => publish::publish(
                self.config,
                self.collaborators.runner,
                self.collaborators.confirmer,
                self.collaborators.logger,
                self.options.otp.clone(),
                if self.options.otp.is_some() { 0 } else { publish::OTP_RETRIES },
            ),
            StepKind::PostReleasy => self.post_releasy(),
        }
    }

    fn info(&self, message: &str) {
        if !self.config.quiet {
            self.collaborators.logger.info(message);
        }
    }

    fn success(&self, message: &str) {
        if !self.config.quiet {
            self.collaborators.logger.success(message);
        }
    }

    fn step(&self, message: &str, command: &str) {
        if !self.config.quiet {
            self.collaborators.logger.step(message, command);
        }
    }

    fn pre_releasy(&self) -> Result<()> {
        let repo = self.collaborators.repo;
        if !repo.is_clean()? {
            if !self.config.dry_run {
                return Err(ReleasyError::UncommittedChanges);
            }
            tracing::warn!("working tree has uncommitted changes");
        }

        let Some(script) = self.config.provider.script(HookType::PreReleasy.name())? else {
            return Ok(());
        };
        self.run_script(HookType::PreReleasy, &script)?;

        if !self.config.dry_run && !repo.is_clean()? {
            repo.stage_all()?;
            repo.commit(&format!("Pre releasy commit\n\n {}", script))?;
            self.step("Pre releasy changes committed", "git commit -a");
        }
        Ok(())
    }

    fn post_releasy(&self) -> Result<()> {
        match self.config.provider.script(HookType::PostReleasy.name())? {
            Some(script) => self.run_script(HookType::PostReleasy, &script),
            None => Ok(()),
        }
    }

    fn run_script(&self, hook: HookType, script: &str) -> Result<()> {
        if !self.config.dry_run {
            let context = HookContext {
                hook_type: hook,
                version: self.config.new_version.to_string(),
                previous_version: self.config.current_version.to_string(),
                tag: self.config.tag_name.clone(),
                dry_run: self.config.dry_run,
            };
            HookExecutor::new(self.collaborators.runner, self.config.quiet, self.config.timeout)
                .execute(script, &context)?;
        }
        self.step(hook.label(), script);
        Ok(())
    }

    fn bump(&self) -> Result<()> {
        let config = self.config;

        if config.has_changelog() {
            let doc = fs::read_to_string(&config.changelog_path)?;
            match self.rewrite_changelog(&doc) {
                Ok(updated) => {
                    if !config.dry_run {
                        write_files(&[(config.changelog_path.clone(), updated)])?;
                    }
                    self.step(
                        &format!("{} updated", config.changelog_path.display()),
                        &format!("add '## [{}]' section", config.new_version),
                    );
                }
                Err(ReleasyError::ChangelogFormat(_)) => {
                    self.collaborators.logger.warn(&ReleaseWarning::ChangelogFormat {
                        path: config.changelog_path.display().to_string(),
                        marker: config.unreleased_marker.clone(),
                    });
                }
                Err(e) => return Err(e),
            }
        }

        if !config.dry_run {
            config.provider.write_version(&config.new_version)?;
        }
        self.success(&format!("Version bumped to {}", config.new_version));
        Ok(())
    }

    fn rewrite_changelog(&self, doc: &str) -> Result<String> {
        let config = self.config;
        let new_version = config.new_version.to_string();

        let heading = changelog::version_heading(&new_version, config.release_date);
        let mut updated = changelog::add_version_section(doc, &config.unreleased_marker, &heading)?;

        if let Some((org, repo)) = &config.github_org_repo {
            let current_version = config.current_version.to_string();
            updated = changelog::add_compare_links(
                &updated,
                &CompareLinks {
                    org,
                    repo,
                    current_tag: &config.current_version_tag_name,
                    new_tag: &config.tag_name,
                    unreleased_label: &config.unreleased_label,
                    current_label: &current_version,
                    new_label: &new_version,
                },
            );
        }
        Ok(updated)
    }

    /// Files the release commit carries
    fn release_files(&self) -> Vec<PathBuf> {
        let mut files = self.config.provider.file_paths().to_vec();
        if self.config.has_changelog() {
            files.push(self.config.changelog_path.clone());
        }
        files
    }

    fn add(&self) -> Result<()> {
        let files = self.release_files();
        if !self.config.dry_run {
            self.collaborators.repo.stage(&files)?;
        }

        let names = files
            .iter()
            .map(|f| f.display().to_string())
            .collect::<Vec<_>>()
            .join(" ");
        self.step(&format!("File(s) {} added", names), &format!("git add {}", names));
        Ok(())
    }

    fn commit(&self) -> Result<()> {
        let message = &self.config.commit_message;
        if !self.config.dry_run {
            self.collaborators.repo.commit(message)?;
        }
        self.step(
            &format!("Commit \"{}\" created", message),
            &format!("git commit -m \"{}\"", message),
        );
        Ok(())
    }

    fn tag(&self) -> Result<()> {
        let config = self.config;
        if !config.dry_run {
            self.collaborators
                .repo
                .create_annotated_tag(&config.tag_name, &config.tag_message)?;
        }
        self.step(
            &format!("Tag created: {}", config.tag_name),
            &format!("git tag {} -m \"{}\"", config.tag_name, config.tag_message),
        );
        Ok(())
    }

    fn push(&self) -> Result<()> {
        let config = self.config;
        let tag = self.options.tag.then_some(config.tag_name.as_str());
        if !config.dry_run {
            self.collaborators.repo.push(&config.remote, tag)?;
        }
        self.step("Pushed commit and tags", &format!("git push {} --follow-tags", config.remote));
        Ok(())
    }

    fn release_notes(&self) -> Result<()> {
        let config = self.config;

        let skipped = if !config.has_changelog() {
            Some("no changelog")
        } else if config.github_auth.is_none() {
            Some("no GitHub token")
        } else if config.github_org_repo.is_none() {
            Some("unknown GitHub repository")
        } else if config.dry_run {
            Some("dry run")
        } else {
            None
        };

        match (skipped, &config.github_auth, &config.github_org_repo) {
            (None, Some(auth), Some((org, repo))) => {
                self.collaborators
                    .publisher
                    .create_release(auth, org, repo, &config.release_draft)?;
                self.success("Release Notes submitted");
            }
            (reason, _, _) => {
                self.collaborators.logger.warn(&ReleaseWarning::NotesSkipped {
                    reason: reason.unwrap_or("nothing to post").to_string(),
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plan_follows_options() {
        let options = ReleaseOptions {
            push: false,
            npm: true,
            ..ReleaseOptions::default()
        };

        let plan = ReleasePipeline::plan(&options);
        let enabled: Vec<StepKind> = plan.iter().filter(|(_, on)| *on).map(|(s, _)| *s).collect();

        assert_eq!(plan.len(), StepKind::ALL.len());
        assert_eq!(
            enabled,
            vec![
                StepKind::PreReleasy,
                StepKind::Bump,
                StepKind::Add,
                StepKind::Commit,
                StepKind::Tag,
                StepKind::Publish,
                StepKind::PostReleasy,
            ]
        );

        let no_commit = ReleaseOptions {
            commit: false,
            ..ReleaseOptions::default()
        };
        let disabled: Vec<StepKind> = ReleasePipeline::plan(&no_commit)
            .into_iter()
            .filter(|(_, on)| !*on)
            .map(|(s, _)| s)
            .collect();
        assert_eq!(
            disabled,
            vec![StepKind::Add, StepKind::Commit, StepKind::ReleaseNotes, StepKind::Publish]
        );
    }

    #[test]
    fn test_completed_states_are_ordered() {
        let states: Vec<ReleaseState> = StepKind::ALL
            .iter()
            .filter_map(|s| s.completed_state())
            .collect();
        assert_eq!(states.first(), Some(&ReleaseState::PreHook));
        assert_eq!(states.last(), Some(&ReleaseState::PostHook));
        assert_eq!(StepKind::ReleaseNotes.to_string(), "release-notes");
    }
}
