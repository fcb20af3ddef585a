use crate::domain::Version;
use crate::error::{ReleasyError, Result};
use crate::providers::{write_files, VersionProvider};
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};

/// Provider for JSON manifests (`package.json`, `manifest.json`, ...)
///
/// Next to the primary file a sibling named `manifest` with the same
/// extension is probed. Which files end up tracked:
///
/// | primary usable | sibling exists | tracked |
/// |---|---|---|
/// | yes | yes | primary, sibling |
/// | yes | no | primary |
/// | no | yes | sibling |
/// | no | no | error |
///
/// The primary is usable when it parses, declares a non-null version and is
/// not marked `private`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JsonManifestProvider {
    files: Vec<PathBuf>,
}

impl JsonManifestProvider {
    pub fn supports(path: &Path) -> bool {
        path.extension().map(|ext| ext == "json").unwrap_or(false)
    }

    /// Resolve the tracked files for `path`
    pub fn open(path: &Path) -> Result<Self> {
        let manifest = sibling_manifest(path);
        let has_manifest = manifest.is_file();
        let mut files = Vec::new();

        match read_json(path) {
            Ok(pkg) => {
                if is_versioned(&pkg) {
                    files.push(path.to_path_buf());
                }
                if has_manifest && manifest != path {
                    files.push(manifest);
                }
            }
            Err(e) => {
                if !has_manifest {
                    tracing::debug!(path = %path.display(), error = %e, "primary manifest unreadable");
                    return Err(ReleasyError::VersionNotFound(format!(
                        "{} (version file not found)",
                        path.display()
                    )));
                }
                files.push(manifest);
            }
        }

        if files.is_empty() {
            return Err(ReleasyError::VersionNotFound(path.display().to_string()));
        }

        Ok(JsonManifestProvider { files })
    }

    fn manifest_file(&self) -> Option<&Path> {
        if self.files.len() == 2 {
            self.files.last().map(PathBuf::as_path)
        } else {
            None
        }
    }
}

impl VersionProvider for JsonManifestProvider {
    fn file_paths(&self) -> &[PathBuf] {
        &self.files
    }

    fn read_version(&self) -> Result<Version> {
        let mut highest: Option<Version> = None;

        for path in &self.files {
            let doc = read_json(path)?;
            let raw = match doc.get("version") {
                Some(Value::String(s)) => s.clone(),
                Some(Value::Null) | None => {
                    return Err(ReleasyError::VersionNotFound(format!(
                        "{} (missing version property; add \"version\": \"0.0.0\" to use the manifest version instead)",
                        path.display()
                    )))
                }
                Some(other) => {
                    return Err(ReleasyError::malformed(
                        other.to_string(),
                        format!("version in {} is not a string", path.display()),
                    ))
                }
            };
            let version = Version::parse(&raw)?;

            highest = match highest {
                Some(current) if current >= version => Some(current),
                _ => Some(version),
            };
        }

        highest.ok_or_else(|| ReleasyError::VersionNotFound("no tracked manifest".to_string()))
    }

    fn read_name(&self) -> Result<String> {
        let source = self.manifest_file().unwrap_or(&self.files[0]);
        let doc = read_json(source)?;

        let name = doc.get("name").and_then(Value::as_str).filter(|s| !s.is_empty());
        let vendor = doc.get("vendor").and_then(Value::as_str).filter(|s| !s.is_empty());

        match (vendor, name) {
            (Some(vendor), Some(name)) => Ok(format!("{}.{}", vendor, name)),
            (None, Some(name)) => Ok(name.to_string()),
            _ => Err(ReleasyError::MissingName(source.display().to_string())),
        }
    }

    fn write_version(&self, version: &Version) -> Result<()> {
        let mut rendered = Vec::with_capacity(self.files.len());

        for path in &self.files {
            let mut doc = read_json(path)?;
            match doc.as_object_mut() {
                Some(object) => {
                    object.insert("version".to_string(), Value::String(version.to_string()));
                }
                None => {
                    return Err(ReleasyError::VersionNotFound(format!(
                        "{} (top level is not an object)",
                        path.display()
                    )))
                }
            }
            let mut contents = serde_json::to_string_pretty(&doc)?;
            contents.push('\n');
            rendered.push((path.clone(), contents));
        }

        write_files(&rendered)
    }

    fn script(&self, name: &str) -> Result<Option<String>> {
        for path in self.files.iter().rev() {
            let doc = read_json(path)?;
            let command = doc
                .get("scripts")
                .and_then(|scripts| scripts.get(name))
                .and_then(Value::as_str);

            if let Some(command) = command {
                return Ok(Some(command.to_string()));
            }
        }
        Ok(None)
    }
}

fn read_json(path: &Path) -> Result<Value> {
    let contents = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&contents)?)
}

fn is_versioned(doc: &Value) -> bool {
    let has_version = !matches!(doc.get("version"), None | Some(Value::Null));
    let private = doc.get("private").and_then(Value::as_bool).unwrap_or(false);
    has_version && !private
}

/// `dir/package.json` -> `dir/manifest.json`
fn sibling_manifest(path: &Path) -> PathBuf {
    let file_name = match path.extension() {
        Some(ext) => format!("manifest.{}", ext.to_string_lossy()),
        None => "manifest".to_string(),
    };
    path.with_file_name(file_name)
}
