//! Command-line interface
//!
//! [`Cli`] is the clap definition; [`orchestration`] merges it with the
//! options file into the values the release consumes.

pub mod orchestration;

use clap::Parser;
use std::path::PathBuf;

#[derive(Debug, Clone, Default, Parser)]
#[command(
    name = "releasy",
    version,
    about = "Bump the version of a project, commit, tag, push and publish it",
    override_usage = "releasy [major|minor|patch|promote|prerelease|pre] [OPTIONS]"
)]
pub struct Cli {
    #[arg(
        value_name = "TYPE",
        help = "Release type: major, minor, patch (default), promote, prerelease or pre"
    )]
    pub release_type: Option<String>,

    #[arg(short, long, value_name = "PATH", help = "Your package manifest file [default: package.json]")]
    pub filename: Option<PathBuf>,

    #[arg(short = 't', long, value_name = "TAG", help = "The prerelease tag in your version [default: beta]")]
    pub tag_name: Option<String>,

    #[arg(long, value_name = "TAG", help = "Tag option for npm publish")]
    pub npm_tag: Option<String>,

    #[arg(long, value_name = "FOLDER", help = "Folder option for npm publish")]
    pub folder: Option<PathBuf>,

    #[arg(long, value_name = "CODE", help = "One-time password code for npm publish")]
    pub otp: Option<String>,

    #[arg(long, value_name = "PATH", help = "Changelog file [default: CHANGELOG.md]")]
    pub changelog: Option<PathBuf>,

    #[arg(long, help = "Mark this as a stable release (no prerelease tag)")]
    pub stable: bool,

    #[arg(long, help = "Do not commit the version change")]
    pub no_commit: bool,

    #[arg(long, help = "Do not tag the version change")]
    pub no_tag: bool,

    #[arg(long, help = "Do not push changes to remote")]
    pub no_push: bool,

    #[arg(long, help = "Add the project name to the tag and release commit")]
    pub display_name: bool,

    #[arg(
        long,
        help = "Publish notes to GitHub Release Notes. Personal Token is required to use this option"
    )]
    pub notes: bool,

    #[arg(short = 'n', long, help = "Publish to npm")]
    pub npm: bool,

    #[arg(short = 'd', long, help = "Don't do anything, just show what would be done")]
    pub dry_run: bool,

    #[arg(short = 's', long, help = "Don't ask for confirmation")]
    pub silent: bool,

    #[arg(short = 'q', long, help = "Don't write messages to console")]
    pub quiet: bool,

    #[arg(long, value_name = "SECONDS", help = "Time limit for each external command")]
    pub timeout: Option<u64>,

    #[arg(short = 'c', long, value_name = "PATH", help = "Options file path")]
    pub config: Option<PathBuf>,
}
