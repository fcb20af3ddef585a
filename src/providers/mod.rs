//! Version providers
//!
//! A provider knows how to locate, read and rewrite the version-of-record of
//! one kind of project file. Variants are listed explicitly in
//! [`ProviderRegistry`], which picks the first one whose `supports` predicate
//! accepts the requested path.
//!
//! - [`json::JsonManifestProvider`]: `package.json`-style manifests, optionally
//!   paired with a sibling `manifest.json`
//! - [`assembly::AssemblyInfoProvider`]: C# `AssemblyInfo.cs` attributes

pub mod assembly;
pub mod json;
pub mod registry;

pub use assembly::AssemblyInfoProvider;
pub use json::JsonManifestProvider;
pub use registry::{ProviderEntry, ProviderRegistry};

use crate::domain::Version;
use crate::error::{ReleasyError, Result};
use std::fmt::Debug;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Capabilities every version file format implements
///
/// Implementations are created per release run and own the files they track.
pub trait VersionProvider: Debug {
    /// Files whose version is managed, primary first
    fn file_paths(&self) -> &[PathBuf];

    /// Read the current version
    ///
    /// # Errors
    /// * [`ReleasyError::VersionNotFound`] when no tracked file declares a version
    /// * [`ReleasyError::MalformedVersion`] when the declared version does not parse
    fn read_version(&self) -> Result<Version>;

    /// Read the project name, as `vendor.name` when a vendor is declared
    fn read_name(&self) -> Result<String>;

    /// Write `version` into every tracked file
    fn write_version(&self, version: &Version) -> Result<()>;

    /// Look up a named project script; `Ok(None)` when it is not declared
    fn script(&self, name: &str) -> Result<Option<String>>;
}

/// Replace the contents of several files as one unit
///
/// All temp files are written next to their targets before any target is
/// replaced, so a rendering or write failure leaves every original intact.
pub(crate) fn write_files(files: &[(PathBuf, String)]) -> Result<()> {
    let mut staged = Vec::with_capacity(files.len());

    for (path, contents) in files {
        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        let mut temp = tempfile::NamedTempFile::new_in(&dir)?;
        temp.write_all(contents.as_bytes())?;
        temp.flush()?;
        staged.push((temp, path));
    }

    let mut replaced: Vec<&Path> = Vec::new();
    for (temp, path) in staged {
        temp.persist(path).map_err(|e| {
            let done = replaced
                .iter()
                .map(|p| p.display().to_string())
                .collect::<Vec<_>>()
                .join(", ");
            tracing::error!(path = %path.display(), already_written = %done, "partial version write");
            ReleasyError::Io(e.error)
        })?;
        replaced.push(path);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_write_files_replaces_all() {
        let dir = TempDir::new().unwrap();
        let a = dir.path().join("a.json");
        let b = dir.path().join("b.json");
        fs::write(&a, "old a").unwrap();
        fs::write(&b, "old b").unwrap();

        write_files(&[(a.clone(), "new a".to_string()), (b.clone(), "new b".to_string())])
            .unwrap();

        assert_eq!(fs::read_to_string(&a).unwrap(), "new a");
        assert_eq!(fs::read_to_string(&b).unwrap(), "new b");
    }

    #[test]
    fn test_write_files_leaves_originals_when_staging_fails() {
        let dir = TempDir::new().unwrap();
        let a = dir.path().join("a.json");
        fs::write(&a, "old a").unwrap();
        let missing_dir = dir.path().join("nope").join("b.json");

        let result = write_files(&[(a.clone(), "new a".to_string()), (missing_dir, "b".to_string())]);

        assert!(result.is_err());
        assert_eq!(fs::read_to_string(&a).unwrap(), "old a");
    }
}
