//! Git operations abstraction layer
//!
//! The release pipeline only needs a handful of repository operations: a
//! cleanliness check, staging, committing, annotated tags and a push. They
//! are expressed by the [Repository] trait so the pipeline can run against
//! a real repository or a recording mock.
//!
//! - [repository::Git2Repository]: implementation using the `git2` crate
//! - [mock::MockRepository]: in-memory implementation for tests
//!
//! ```rust
//! # use releasy::git::Repository;
//! # fn example<R: Repository>(repo: &R) -> releasy::Result<()> {
//! if repo.is_clean()? {
//!     repo.create_annotated_tag("v1.0.0", "Release v1.0.0")?;
//! }
//! # Ok(())
//! # }
//! ```

pub mod mock;
pub mod repository;

pub use mock::{GitCall, MockRepository};
pub use repository::Git2Repository;

use crate::error::Result;
use std::path::PathBuf;

/// Repository operations used by a release
///
/// Implementors must be `Send` so a repository can be handed to a worker
/// thread. Errors from the underlying library are mapped to
/// [crate::error::ReleasyError] variants.
pub trait Repository: Send {
    /// `true` when the working tree has no staged, unstaged or untracked changes
    ///
    /// Ignored files do not count.
    fn is_clean(&self) -> Result<bool>;

    /// URL of the named remote, `None` when the remote does not exist
    fn remote_url(&self, remote: &str) -> Result<Option<String>>;

    /// Stage the given files
    ///
    /// Paths may be absolute or relative to the current directory; they must
    /// live inside the working tree.
    fn stage(&self, paths: &[PathBuf]) -> Result<()>;

    /// Stage every change in the working tree, deletions included
    fn stage_all(&self) -> Result<()>;

    /// Commit the index on top of HEAD
    fn commit(&self, message: &str) -> Result<()>;

    /// Create an annotated tag pointing at HEAD
    fn create_annotated_tag(&self, name: &str, message: &str) -> Result<()>;

    /// Push the current branch, and `tag` when given, to `remote`
    fn push(&self, remote: &str, tag: Option<&str>) -> Result<()>;
}

/// Extract `(org, repo)` from a GitHub remote URL
///
/// Accepts ssh (`git@github.com:org/repo.git`) and https
/// (`https://github.com/org/repo.git`) forms.
pub fn parse_org_repo(url: &str) -> Option<(String, String)> {
    let trimmed = url.trim().trim_end_matches('/');
    let trimmed = trimmed.strip_suffix(".git").unwrap_or(trimmed);

    let mut segments = trimmed
        .rsplit(|c: char| c == '/' || c == ':')
        .filter(|s| !s.is_empty());
    let repo = segments.next()?;
    let org = segments.next()?;

    // A host segment means the URL had no owner part.
    if org.contains('@') || org.contains('.') {
        return None;
    }

    Some((org.to_string(), repo.to_string()))
}
