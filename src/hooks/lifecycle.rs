use std::collections::HashMap;

/// Project scripts releasy runs around a release
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HookType {
    PreReleasy,
    PostReleasy,
}

impl HookType {
    /// Script name looked up in the project's script table
    pub fn name(&self) -> &'static str {
        match self {
            HookType::PreReleasy => "prereleasy",
            HookType::PostReleasy => "postreleasy",
        }
    }

    /// Prefix of the success line
    pub fn label(&self) -> &'static str {
        match self {
            HookType::PreReleasy => "Pre releasy",
            HookType::PostReleasy => "Post releasy",
        }
    }
}

/// Context information passed to a project script
#[derive(Debug, Clone)]
pub struct HookContext {
    pub hook_type: HookType,
    /// Version being released
    pub version: String,
    /// Version before the bump
    pub previous_version: String,
    pub tag: String,
    pub dry_run: bool,
}

impl HookContext {
    /// Convert context to environment variables for the script
    ///
    /// Maps context fields to RELEASY_* environment variables
    pub fn to_env_vars(&self) -> HashMap<String, String> {
        let mut env = HashMap::new();

        env.insert("RELEASY_HOOK".to_string(), self.hook_type.name().to_string());
        env.insert("RELEASY_VERSION".to_string(), self.version.clone());
        env.insert(
            "RELEASY_PREVIOUS_VERSION".to_string(),
            self.previous_version.clone(),
        );
        env.insert("RELEASY_TAG_NAME".to_string(), self.tag.clone());

        if self.dry_run {
            env.insert("RELEASY_DRY_RUN".to_string(), "1".to_string());
        }

        env
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hook_type_names() {
        assert_eq!(HookType::PreReleasy.name(), "prereleasy");
        assert_eq!(HookType::PostReleasy.name(), "postreleasy");
        assert_eq!(HookType::PreReleasy.label(), "Pre releasy");
    }

    #[test]
    fn test_hook_context_to_env_vars() {
        let ctx = HookContext {
            hook_type: HookType::PostReleasy,
            version: "1.1.0".to_string(),
            previous_version: "1.0.0".to_string(),
            tag: "v1.1.0".to_string(),
            dry_run: false,
        };

        let env = ctx.to_env_vars();
        assert_eq!(env.len(), 4);
        assert_eq!(env.get("RELEASY_HOOK"), Some(&"postreleasy".to_string()));
        assert_eq!(env.get("RELEASY_VERSION"), Some(&"1.1.0".to_string()));
        assert_eq!(env.get("RELEASY_PREVIOUS_VERSION"), Some(&"1.0.0".to_string()));
        assert_eq!(env.get("RELEASY_TAG_NAME"), Some(&"v1.1.0".to_string()));
        assert!(env.get("RELEASY_DRY_RUN").is_none());
    }

    #[test]
    fn test_hook_context_dry_run_flag() {
        let ctx = HookContext {
            hook_type: HookType::PreReleasy,
            version: "2.0.0".to_string(),
            previous_version: "1.9.0".to_string(),
            tag: "v2.0.0".to_string(),
            dry_run: true,
        };

        assert_eq!(ctx.to_env_vars().get("RELEASY_DRY_RUN"), Some(&"1".to_string()));
    }
}
