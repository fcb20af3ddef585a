use crate::error::{ReleasyError, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fs;
use std::path::{Path, PathBuf};

/// Options file names, in lookup order
pub const FILE_NAMES: [&str; 4] = ["_releasy.yaml", "_releasy.yml", "_releasy.json", "_releasy.toml"];

/// Defaults read from an options file
///
/// Keys mirror the command-line flags in kebab-case (`tag-name`, `dry-run`)
/// plus `type` for the release type. camelCase keys are accepted and
/// `no-<flag>: true` means `<flag>: false`. Every field is optional; unset
/// fields fall back to the command-line defaults.
#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq)]
#[serde(rename_all = "kebab-case")]
pub struct OptionsFile {
    #[serde(rename = "type")]
    pub release_type: Option<String>,
    pub filename: Option<String>,
    pub tag_name: Option<String>,
    pub npm_tag: Option<String>,
    pub folder: Option<String>,
    pub otp: Option<String>,
    pub changelog: Option<String>,
    pub stable: Option<bool>,
    pub commit: Option<bool>,
    pub tag: Option<bool>,
    pub push: Option<bool>,
    pub display_name: Option<bool>,
    pub notes: Option<bool>,
    pub npm: Option<bool>,
    pub dry_run: Option<bool>,
    pub silent: Option<bool>,
    pub quiet: Option<bool>,
    /// Seconds
    pub timeout: Option<u64>,
}

/// Loads the options file or returns defaults.
///
/// Attempts to load options in the following order:
/// 1. Custom path provided as parameter
/// 2. `_releasy.{yaml,yml,json,toml}` in current directory
/// 3. The same names in `<user config dir>/releasy/`
/// 4. Defaults (every option unset) if no file found
///
/// # Returns
/// * `Ok((OptionsFile, Option<PathBuf>))` - loaded options and the file they came from
/// * `Err` - If a file exists but cannot be read or parsed
pub fn load_options(custom: Option<&Path>) -> Result<(OptionsFile, Option<PathBuf>)> {
    let path = match custom {
        Some(path) => Some(path.to_path_buf()),
        None => find_options_file(Path::new(".")).or_else(|| {
            dirs::config_dir().and_then(|dir| find_options_file(&dir.join("releasy")))
        }),
    };

    match path {
        Some(path) => {
            let contents = fs::read_to_string(&path)
                .map_err(|e| ReleasyError::config(format!("Cannot read {}: {}", path.display(), e)))?;
            let options = parse_options(&path, &contents)?;
            tracing::debug!(path = %path.display(), "loaded options file");
            Ok((options, Some(path)))
        }
        None => Ok((OptionsFile::default(), None)),
    }
}

/// First options file present in `dir`
pub fn find_options_file(dir: &Path) -> Option<PathBuf> {
    FILE_NAMES
        .iter()
        .map(|name| dir.join(name))
        .find(|path| path.is_file())
}

/// Parse options; `.toml` files as TOML, everything else as YAML (a JSON superset)
pub fn parse_options(path: &Path, contents: &str) -> Result<OptionsFile> {
    if contents.trim().is_empty() {
        return Ok(OptionsFile::default());
    }
    let is_toml = path.extension().map(|ext| ext == "toml").unwrap_or(false);

    let raw: Value = if is_toml {
        toml::from_str(contents)
            .map_err(|e| ReleasyError::config(format!("Invalid TOML in {}: {}", path.display(), e)))?
    } else {
        serde_yaml::from_str(contents)
            .map_err(|e| ReleasyError::config(format!("Invalid YAML in {}: {}", path.display(), e)))?
    };

    let normalized = match raw {
        Value::Object(map) => Value::Object(normalize_keys(map)),
        // An empty YAML document
        Value::Null => return Ok(OptionsFile::default()),
        other => {
            return Err(ReleasyError::config(format!(
                "{} must contain a map of options, found {}",
                path.display(),
                other
            )))
        }
    };

    serde_json::from_value(normalized)
        .map_err(|e| ReleasyError::config(format!("Invalid option in {}: {}", path.display(), e)))
}

fn normalize_keys(map: Map<String, Value>) -> Map<String, Value> {
    map.into_iter()
        .map(|(key, value)| {
            let key = to_kebab_case(&key);
            match (key.strip_prefix("no-"), value) {
                (Some(flag), Value::Bool(b)) => (flag.to_string(), Value::Bool(!b)),
                (_, value) => (key, value),
            }
        })
        .collect()
}

/// `tagName` and `tag_name` -> `tag-name`
fn to_kebab_case(key: &str) -> String {
    let mut out = String::with_capacity(key.len() + 4);
    for c in key.chars() {
        if c.is_ascii_uppercase() {
            if !out.is_empty() {
                out.push('-');
            }
            out.push(c.to_ascii_lowercase());
        } else if c == '_' {
            out.push('-');
        } else {
            out.push(c);
        }
    }
    out
}
