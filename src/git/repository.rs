use crate::error::{ReleasyError, Result};
use git2::{IndexAddOption, Repository as Git2Repo, StatusOptions};
use std::cell::RefCell;
use std::path::{Path, PathBuf};

/// Wrapper around git2::Repository with our trait interface
pub struct Git2Repository {
    repo: Git2Repo,
}

impl Git2Repository {
    /// Open or discover a git repository
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let repo = Git2Repo::discover(path)?;

        Ok(Git2Repository { repo })
    }

    /// Create from existing git2::Repository
    pub fn from_git2(repo: Git2Repo) -> Self {
        Git2Repository { repo }
    }

    fn workdir(&self) -> Result<PathBuf> {
        let workdir = self
            .repo
            .workdir()
            .ok_or_else(|| ReleasyError::remote("Cannot release from a bare repository"))?;
        Ok(workdir.canonicalize()?)
    }

    /// Path of `path` relative to the working tree, as the index expects
    fn index_path(&self, workdir: &Path, path: &Path) -> Result<PathBuf> {
        let absolute = if path.is_absolute() {
            path.to_path_buf()
        } else {
            std::env::current_dir()?.join(path)
        };
        let absolute = absolute.canonicalize()?;

        absolute
            .strip_prefix(workdir)
            .map(Path::to_path_buf)
            .map_err(|_| {
                ReleasyError::Git(git2::Error::from_str(&format!(
                    "{} is outside the repository at {}",
                    absolute.display(),
                    workdir.display()
                )))
            })
    }
}

impl super::Repository for Git2Repository {
    fn is_clean(&self) -> Result<bool> {
        let mut options = StatusOptions::new();
        options
            .include_untracked(true)
            .recurse_untracked_dirs(true)
            .include_ignored(false);

        let statuses = self.repo.statuses(Some(&mut options))?;
        Ok(statuses.is_empty())
    }

    fn remote_url(&self, remote: &str) -> Result<Option<String>> {
        match self.repo.find_remote(remote) {
            Ok(remote) => Ok(remote.url().map(str::to_string)),
            Err(e) if e.code() == git2::ErrorCode::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn stage(&self, paths: &[PathBuf]) -> Result<()> {
        let workdir = self.workdir()?;
        let mut index = self.repo.index()?;

        for path in paths {
            let relative = self.index_path(&workdir, path)?;
            index.add_path(&relative)?;
        }

        index.write()?;
        Ok(())
    }

    fn stage_all(&self) -> Result<()> {
        let mut index = self.repo.index()?;

        index.add_all(["*"].iter(), IndexAddOption::DEFAULT, None)?;
        index.update_all(["*"].iter(), None)?;
        index.write()?;
        Ok(())
    }

    fn commit(&self, message: &str) -> Result<()> {
        let signature = self.repo.signature()?;
        let mut index = self.repo.index()?;
        let tree_id = index.write_tree()?;
        let tree = self.repo.find_tree(tree_id)?;

        // Unborn HEAD means this is the first commit.
        let parent = match self.repo.head() {
            Ok(head) => Some(head.peel_to_commit()?),
            Err(e) if e.code() == git2::ErrorCode::UnbornBranch => None,
            Err(e) => return Err(e.into()),
        };
        let parents: Vec<&git2::Commit> = parent.iter().collect();

        self.repo
            .commit(Some("HEAD"), &signature, &signature, message, &tree, &parents)?;
        Ok(())
    }

    fn create_annotated_tag(&self, name: &str, message: &str) -> Result<()> {
        let signature = self.repo.signature()?;
        let head = self.repo.head()?.peel_to_commit()?;

        self.repo
            .tag(name, head.as_object(), &signature, message, false)?;
        Ok(())
    }

    fn push(&self, remote_name: &str, tag: Option<&str>) -> Result<()> {
        let mut remote = self
            .repo
            .find_remote(remote_name)
            .map_err(|_| ReleasyError::remote(format!("No remote named '{}' found", remote_name)))?;

        let head = self.repo.head()?;
        let mut refspecs = Vec::new();
        if head.is_branch() {
            if let Some(branch_ref) = head.name() {
                refspecs.push(format!("{0}:{0}", branch_ref));
            }
        }
        if let Some(tag) = tag {
            refspecs.push(format!("refs/tags/{0}:refs/tags/{0}", tag));
        }
        if refspecs.is_empty() {
            return Err(ReleasyError::remote(
                "HEAD is detached and there is no tag to push",
            ));
        }

        let rejected: RefCell<Vec<String>> = RefCell::new(Vec::new());
        let mut callbacks = git2::RemoteCallbacks::new();
        callbacks.credentials(|_url, username_from_url, allowed_types| {
            if allowed_types.contains(git2::CredentialType::SSH_KEY) {
                let username = username_from_url.unwrap_or("git");

                if let Some(home) = dirs::home_dir() {
                    for key in ["id_ed25519", "id_rsa", "id_ecdsa"] {
                        let path = home.join(".ssh").join(key);
                        if path.exists() {
                            if let Ok(cred) = git2::Cred::ssh_key(username, None, &path, None) {
                                return Ok(cred);
                            }
                        }
                    }
                }

                if let Ok(cred) = git2::Cred::ssh_key_from_agent(username) {
                    return Ok(cred);
                }
            }

            git2::Cred::default()
        });
        callbacks.push_update_reference(|refname, status| {
            if let Some(status) = status {
                tracing::warn!(refname, status, "remote rejected reference");
                rejected.borrow_mut().push(format!("{} ({})", refname, status));
            }
            Ok(())
        });

        let mut push_options = git2::PushOptions::new();
        push_options.remote_callbacks(callbacks);

        let refspec_strs: Vec<&str> = refspecs.iter().map(String::as_str).collect();
        remote
            .push(&refspec_strs, Some(&mut push_options))
            .map_err(|e| match e.class() {
                git2::ErrorClass::Net => ReleasyError::remote(format!("Network error during push: {}", e)),
                git2::ErrorClass::Reference => {
                    ReleasyError::remote(format!("Reference error during push: {}", e))
                }
                _ => ReleasyError::remote(format!("Failed to push to '{}': {}", remote_name, e)),
            })?;

        let rejected = rejected.borrow();
        if !rejected.is_empty() {
            return Err(ReleasyError::remote(format!(
                "Push rejected for {}",
                rejected.join(", ")
            )));
        }

        Ok(())
    }
}
