use crate::domain::Version;

/// Tag naming pattern with a `{version}` placeholder
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagPattern {
    pub pattern: String,
}

impl TagPattern {
    /// Create a new tag pattern
    pub fn new(pattern: impl Into<String>) -> Self {
        TagPattern {
            pattern: pattern.into(),
        }
    }

    /// Default `v{version}` tags
    pub fn versioned() -> Self {
        TagPattern::new("v{version}")
    }

    /// `{project}@{version}` tags, used when the project name is displayed
    pub fn named(project: &str) -> Self {
        TagPattern::new(format!("{}@{{version}}", project))
    }

    /// Format a version according to pattern
    /// Example: pattern="v{version}", version=1.2.3 -> "v1.2.3"
    pub fn format(&self, version: &Version) -> String {
        self.pattern.replace("{version}", &version.to_string())
    }
}

impl Default for TagPattern {
    fn default() -> Self {
        TagPattern::versioned()
    }
}
