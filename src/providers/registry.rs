use crate::error::{ReleasyError, Result};
use crate::providers::{AssemblyInfoProvider, JsonManifestProvider, VersionProvider};
use std::fmt;
use std::path::Path;

/// Constructor for a boxed provider
pub type OpenFn = fn(&Path) -> Result<Box<dyn VersionProvider>>;

/// One registered provider variant
#[derive(Clone, Copy)]
pub struct ProviderEntry {
    pub name: &'static str,
    /// Pure dispatch predicate; must not touch the filesystem
    pub supports: fn(&Path) -> bool,
    pub open: OpenFn,
}

impl fmt::Debug for ProviderEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderEntry").field("name", &self.name).finish()
    }
}

/// Ordered list of provider variants; the first match wins
#[derive(Debug, Clone)]
pub struct ProviderRegistry {
    entries: Vec<ProviderEntry>,
}

impl ProviderRegistry {
    pub fn new(entries: Vec<ProviderEntry>) -> Self {
        ProviderRegistry { entries }
    }

    pub fn entries(&self) -> &[ProviderEntry] {
        &self.entries
    }

    /// Instantiate the first provider whose predicate accepts `path`
    ///
    /// # Errors
    /// * [`ReleasyError::ProviderNotFound`] when no entry supports the path
    /// * whatever the chosen provider's constructor reports
    pub fn pick(&self, path: &Path) -> Result<Box<dyn VersionProvider>> {
        let entry = self
            .entries
            .iter()
            .find(|entry| (entry.supports)(path))
            .ok_or_else(|| ReleasyError::ProviderNotFound(path.display().to_string()))?;

        tracing::debug!(provider = entry.name, path = %path.display(), "picked version provider");
        (entry.open)(path)
    }
}

impl Default for ProviderRegistry {
    fn default() -> Self {
        ProviderRegistry::new(vec![
            ProviderEntry {
                name: "json",
                supports: JsonManifestProvider::supports,
                open: |path| Ok(Box::new(JsonManifestProvider::open(path)?)),
            },
            ProviderEntry {
                name: "assembly",
                supports: AssemblyInfoProvider::supports,
                open: |path| Ok(Box::new(AssemblyInfoProvider::open(path)?)),
            },
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Version;
    use std::path::PathBuf;

    #[derive(Debug)]
    struct FixedProvider {
        files: Vec<PathBuf>,
    }

    impl VersionProvider for FixedProvider {
        fn file_paths(&self) -> &[PathBuf] {
            &self.files
        }
        fn read_version(&self) -> Result<Version> {
            Ok(Version::new(9, 9, 9))
        }
        fn read_name(&self) -> Result<String> {
            Ok("fixed".to_string())
        }
        fn write_version(&self, _version: &Version) -> Result<()> {
            Ok(())
        }
        fn script(&self, _name: &str) -> Result<Option<String>> {
            Ok(None)
        }
    }

    fn always_open(path: &Path) -> Result<Box<dyn VersionProvider>> {
        Ok(Box::new(FixedProvider {
            files: vec![path.to_path_buf()],
        }))
    }

    #[test]
    fn test_pick_unknown_extension() {
        let err = ProviderRegistry::default()
            .pick(Path::new("myversion.bla"))
            .unwrap_err();
        assert!(matches!(err, ReleasyError::ProviderNotFound(ref p) if p == "myversion.bla"));
    }

    #[test]
    fn test_pick_first_matching_entry() {
        let registry = ProviderRegistry::new(vec![
            ProviderEntry {
                name: "never",
                supports: |_| false,
                open: |_| Err(ReleasyError::NotImplemented("never".into())),
            },
            ProviderEntry {
                name: "first",
                supports: |_| true,
                open: always_open,
            },
            ProviderEntry {
                name: "second",
                supports: |_| true,
                open: |_| Err(ReleasyError::NotImplemented("second".into())),
            },
        ]);

        let provider = registry.pick(Path::new("anything.txt")).unwrap();
        assert_eq!(provider.read_version().unwrap(), Version::new(9, 9, 9));
    }

    #[test]
    fn test_default_registry_order() {
        let names: Vec<_> = ProviderRegistry::default()
            .entries()
            .iter()
            .map(|e| e.name)
            .collect();
        assert_eq!(names, vec!["json", "assembly"]);
    }
}
