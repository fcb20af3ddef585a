use crate::error::{ReleasyError, Result};
use crate::git::Repository;
use std::collections::VecDeque;
use std::path::PathBuf;
use std::sync::Mutex;

/// Mutating call recorded by [MockRepository]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GitCall {
    Stage(Vec<PathBuf>),
    StageAll,
    Commit(String),
    Tag { name: String, message: String },
    Push { remote: String, tag: Option<String> },
}

/// Mock repository for testing without actual git operations
///
/// Cleanliness answers are served from a queue; once it is empty the tree
/// reports clean.
#[derive(Debug, Default)]
pub struct MockRepository {
    clean_answers: Mutex<VecDeque<bool>>,
    remotes: Vec<(String, String)>,
    fail_push: bool,
    calls: Mutex<Vec<GitCall>>,
}

impl MockRepository {
    /// Create a new clean mock repository without remotes
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a remote
    pub fn with_remote(mut self, name: impl Into<String>, url: impl Into<String>) -> Self {
        self.remotes.push((name.into(), url.into()));
        self
    }

    /// Queue answers for successive `is_clean` calls
    pub fn with_clean_answers(self, answers: impl IntoIterator<Item = bool>) -> Self {
        if let Ok(mut queue) = self.clean_answers.lock() {
            queue.extend(answers);
        }
        self
    }

    /// Make every push fail
    pub fn with_push_failure(mut self) -> Self {
        self.fail_push = true;
        self
    }

    /// Mutating calls in the order they were made
    pub fn calls(&self) -> Vec<GitCall> {
        self.calls.lock().map(|calls| calls.clone()).unwrap_or_default()
    }

    fn record(&self, call: GitCall) {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(call);
        }
    }
}

impl Repository for MockRepository {
    fn is_clean(&self) -> Result<bool> {
        Ok(self
            .clean_answers
            .lock()
            .ok()
            .and_then(|mut queue| queue.pop_front())
            .unwrap_or(true))
    }

    fn remote_url(&self, remote: &str) -> Result<Option<String>> {
        Ok(self
            .remotes
            .iter()
            .find(|(name, _)| name == remote)
            .map(|(_, url)| url.clone()))
    }

    fn stage(&self, paths: &[PathBuf]) -> Result<()> {
        self.record(GitCall::Stage(paths.to_vec()));
        Ok(())
    }

    fn stage_all(&self) -> Result<()> {
        self.record(GitCall::StageAll);
        Ok(())
    }

    fn commit(&self, message: &str) -> Result<()> {
        self.record(GitCall::Commit(message.to_string()));
        Ok(())
    }

    fn create_annotated_tag(&self, name: &str, message: &str) -> Result<()> {
        self.record(GitCall::Tag {
            name: name.to_string(),
            message: message.to_string(),
        });
        Ok(())
    }

    fn push(&self, remote: &str, tag: Option<&str>) -> Result<()> {
        if self.fail_push {
            return Err(ReleasyError::remote(format!("Failed to push to '{}'", remote)));
        }
        self.record(GitCall::Push {
            remote: remote.to_string(),
            tag: tag.map(str::to_string),
        });
        Ok(())
    }
}
