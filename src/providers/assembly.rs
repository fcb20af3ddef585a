use crate::domain::Version;
use crate::error::{ReleasyError, Result};
use crate::providers::{write_files, VersionProvider};
use regex::{NoExpand, Regex};
use std::fs;
use std::path::{Path, PathBuf};

const ASSEMBLY_VERSION: &str = "AssemblyVersion";
const FILE_VERSION: &str = "AssemblyFileVersion";
const INFORMATIONAL_VERSION: &str = "AssemblyInformationalVersion";

#[cfg(windows)]
const PLATFORM_EOL: &str = "\r\n";
#[cfg(not(windows))]
const PLATFORM_EOL: &str = "\n";

/// Provider for C# `AssemblyInfo.cs` files
///
/// The version is read from the first attribute found in the order
/// informational, file, assembly. Only the informational attribute carries
/// a prerelease.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssemblyInfoProvider {
    files: Vec<PathBuf>,
}

impl AssemblyInfoProvider {
    pub fn supports(path: &Path) -> bool {
        path.extension().map(|ext| ext == "cs").unwrap_or(false)
    }

    pub fn open(path: &Path) -> Result<Self> {
        if !path.is_file() {
            return Err(ReleasyError::VersionNotFound(format!(
                "{} (version file not found)",
                path.display()
            )));
        }

        Ok(AssemblyInfoProvider {
            files: vec![path.to_path_buf()],
        })
    }

    fn path(&self) -> &Path {
        &self.files[0]
    }
}

impl VersionProvider for AssemblyInfoProvider {
    fn file_paths(&self) -> &[PathBuf] {
        &self.files
    }

    fn read_version(&self) -> Result<Version> {
        let text = fs::read_to_string(self.path())?;

        let raw = [INFORMATIONAL_VERSION, FILE_VERSION, ASSEMBLY_VERSION]
            .iter()
            .find_map(|name| {
                attribute_regex(name)?
                    .captures(&text)
                    .and_then(|caps| caps.get(1))
                    .map(|m| m.as_str().to_string())
            })
            .ok_or_else(|| ReleasyError::VersionNotFound(format!("file {}", self.path().display())))?;

        Version::parse(&raw)
    }

    fn read_name(&self) -> Result<String> {
        Err(ReleasyError::NotImplemented(
            "reading the project name from C# assembly info".to_string(),
        ))
    }

    fn write_version(&self, version: &Version) -> Result<()> {
        let mut text = fs::read_to_string(self.path())?;
        let numeric = version.stable().to_string();

        text = replace_or_append(&text, ASSEMBLY_VERSION, &numeric);
        text = replace_or_append(&text, FILE_VERSION, &numeric);
        text = replace_or_append(&text, INFORMATIONAL_VERSION, &version.to_string());

        write_files(&[(self.path().to_path_buf(), text)])
    }

    fn script(&self, _name: &str) -> Result<Option<String>> {
        Ok(None)
    }
}

fn attribute_regex(name: &str) -> Option<Regex> {
    Regex::new(&format!(r#"\[assembly:\s*{}\s*\(\s*"(.+)"\s*\)\s*\]"#, name)).ok()
}

fn render_attribute(name: &str, value: &str) -> String {
    format!(r#"[assembly: {}("{}")]"#, name, value)
}

/// Rewrite every occurrence of the attribute, or append it when absent
fn replace_or_append(text: &str, name: &str, value: &str) -> String {
    let attribute = render_attribute(name, value);

    if let Some(pattern) = attribute_regex(name).filter(|re| re.is_match(text)) {
        return pattern.replace_all(text, NoExpand(&attribute)).into_owned();
    }

    let eol = dominant_line_ending(text);
    if text.ends_with('\n') {
        format!("{}{}{}", text, attribute, eol)
    } else {
        format!("{}{}{}{}", text, eol, attribute, eol)
    }
}

/// Line ending used by most lines of `text`, platform default on a tie
fn dominant_line_ending(text: &str) -> &'static str {
    let crlf = text.matches("\r\n").count();
    let lf = text.matches('\n').count() - crlf;

    match lf.cmp(&crlf) {
        std::cmp::Ordering::Equal => PLATFORM_EOL,
        std::cmp::Ordering::Greater => "\n",
        std::cmp::Ordering::Less => "\r\n",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_supports_cs_only() {
        assert!(AssemblyInfoProvider::supports(Path::new("somefile.cs")));
        assert!(!AssemblyInfoProvider::supports(Path::new("arbitrary.extension")));
        assert!(!AssemblyInfoProvider::supports(Path::new("package.json")));
    }

    #[test]
    fn test_dominant_line_ending() {
        assert_eq!(dominant_line_ending("a\r\nb\r\nc\n"), "\r\n");
        assert_eq!(dominant_line_ending("a\nb\nc\r\n"), "\n");
        assert_eq!(dominant_line_ending("a\r\nb\n"), PLATFORM_EOL);
    }

    #[test]
    fn test_replace_handles_spacing() {
        let text = r#"[assembly:AssemblyVersion ( "1.0.0" ) ]"#;
        assert_eq!(
            replace_or_append(text, ASSEMBLY_VERSION, "2.0.0"),
            r#"[assembly: AssemblyVersion("2.0.0")]"#
        );
    }

    #[test]
    fn test_assembly_pattern_does_not_match_file_version() {
        let text = r#"[assembly: AssemblyFileVersion("1.0.0")]"#;
        assert!(!attribute_regex(ASSEMBLY_VERSION).unwrap().is_match(text));
    }

    #[test]
    fn test_append_without_trailing_newline() {
        let text = "[assembly: AssemblyVersion(\"1.2.3\")]\n// nothing else";
        assert_eq!(
            replace_or_append(text, FILE_VERSION, "2.3.4"),
            "[assembly: AssemblyVersion(\"1.2.3\")]\n// nothing else\n[assembly: AssemblyFileVersion(\"2.3.4\")]\n"
        );
    }
}
