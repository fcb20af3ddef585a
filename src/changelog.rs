//! Keep-a-Changelog rewriting
//!
//! The document must contain an unreleased marker (`## [Unreleased]`). A
//! release turns it into a dated version section and maintains the compare
//! link block at the end of the file:
//!
//! ```text
//! [Unreleased]: https://github.com/org/repo/compare/v1.1.0...HEAD
//! [1.1.0]: https://github.com/org/repo/compare/v1.0.0...v1.1.0
//! ```

use crate::error::{ReleasyError, Result};
use chrono::NaiveDate;
use regex::{NoExpand, Regex};

pub const DEFAULT_PATH: &str = "CHANGELOG.md";
pub const UNRELEASED_LABEL: &str = "Unreleased";
pub const UNRELEASED_MARKER: &str = "## [Unreleased]";

/// Heading spliced after the unreleased marker, leading blank line included
pub fn version_heading(version: &str, date: NaiveDate) -> String {
    format!("\n\n## [{}] - {}", version, date.format("%Y-%m-%d"))
}

/// Insert `heading` right after the unreleased marker
///
/// # Errors
/// [`ReleasyError::ChangelogFormat`] when the marker is missing. Callers treat
/// this as a warning.
pub fn add_version_section(doc: &str, marker: &str, heading: &str) -> Result<String> {
    let start = doc.find(marker).ok_or_else(|| {
        ReleasyError::changelog(format!(
            "missing '{}' heading; follow the conventions of https://keepachangelog.com/en/1.0.0/",
            marker
        ))
    })?;
    let split = start + marker.len();

    let mut out = String::with_capacity(doc.len() + heading.len());
    out.push_str(&doc[..split]);
    out.push_str(heading);
    out.push_str(&doc[split..]);
    Ok(out)
}

/// Everything needed to render the compare links of one release
#[derive(Debug, Clone, Copy)]
pub struct CompareLinks<'a> {
    pub org: &'a str,
    pub repo: &'a str,
    pub current_tag: &'a str,
    pub new_tag: &'a str,
    pub unreleased_label: &'a str,
    pub current_label: &'a str,
    pub new_label: &'a str,
}

impl CompareLinks<'_> {
    fn compare_url(&self, from: &str, to: &str) -> String {
        format!(
            "https://github.com/{}/{}/compare/{}...{}",
            self.org, self.repo, from, to
        )
    }
}

/// Update the unreleased link and add a link for the new version
///
/// The unreleased link is replaced in place when present. The new version
/// link goes right above the current version's link, or at the end.
pub fn add_compare_links(doc: &str, links: &CompareLinks<'_>) -> String {
    let unreleased_link = format!(
        "[{}]: {}",
        links.unreleased_label,
        links.compare_url(links.new_tag, "HEAD")
    );
    let unreleased_key = format!("[{}]:", links.unreleased_label);
    let unreleased_line = Regex::new(&format!(r"(?m)^{}[^\r\n]*", regex::escape(&unreleased_key)))
        .ok()
        .filter(|re| re.is_match(doc));

    let mut out = match unreleased_line {
        Some(re) => re.replacen(doc, 1, NoExpand(&unreleased_link)).into_owned(),
        None => format!("{}\n\n{}", doc, unreleased_link),
    };

    let current_key = format!("[{}]:", links.current_label);
    let release_link = format!(
        "[{}]: {}",
        links.new_label,
        links.compare_url(links.current_tag, links.new_tag)
    );

    if out.contains(&current_key) {
        out = out.replacen(&current_key, &format!("{}\n{}", release_link, current_key), 1);
    } else {
        out.push('\n');
        out.push_str(&release_link);
    }

    out
}

/// Release body: the text between the marker and the current version's
/// heading (or the next section heading)
///
/// Returns `None` when the marker is missing or nothing was written under it.
pub fn release_notes_excerpt(doc: &str, marker: &str, current_version: &str) -> Option<String> {
    let start = doc.find(marker)? + marker.len();
    let rest = &doc[start..];

    let current_heading = format!("## [{}]", current_version);
    let end = rest
        .find(&current_heading)
        .or_else(|| rest.find("\n## ").map(|i| i + 1))
        .unwrap_or(rest.len());

    let excerpt = rest[..end].trim();
    if excerpt.is_empty() {
        None
    } else {
        Some(excerpt.to_string())
    }
}
