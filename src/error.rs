use thiserror::Error;

/// Unified error type for releasy operations
#[derive(Error, Debug)]
pub enum ReleasyError {
    #[error("Could not find version information in {0}")]
    VersionNotFound(String),

    #[error("Malformed version '{value}': {reason}")]
    MalformedVersion { value: String, reason: String },

    #[error("Your versioning file {0} is missing the name property")]
    MissingName(String),

    #[error("Not implemented: {0}")]
    NotImplemented(String),

    #[error("The version you are trying to promote to stable ({0}) is already stable")]
    AlreadyStable(String),

    #[error("Please commit your changes before proceeding")]
    UncommittedChanges,

    #[error("Unable to find a provider that supports '{0}' as a version file")]
    ProviderNotFound(String),

    #[error("Command `{command}` exited with {}", exit_code_label(.code))]
    CommandExecution {
        command: String,
        code: Option<i32>,
        output: String,
    },

    #[error("Command `{command}` timed out after {seconds}s")]
    Timeout { command: String, seconds: u64 },

    #[error("npm requires a one-time password and none was provided")]
    OtpRequired,

    #[error("OTP code is incorrect or expired and you have run out of attempts")]
    OtpExhausted,

    #[error("Publish failed: {0}")]
    Publish(String),

    #[error("Cannot update your CHANGELOG file: {0}")]
    ChangelogFormat(String),

    #[error("Release notes request failed: {0}")]
    ReleaseNotes(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Git operation failed: {0}")]
    Git(#[from] git2::Error),

    #[error("Remote operation failed: {0}")]
    Remote(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

fn exit_code_label(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("error code {}", code),
        None => "no exit code (terminated by signal)".to_string(),
    }
}

/// Convenience type alias for Results in releasy
pub type Result<T> = std::result::Result<T, ReleasyError>;

impl ReleasyError {
    /// Create a malformed version error with context
    pub fn malformed(value: impl Into<String>, reason: impl Into<String>) -> Self {
        ReleasyError::MalformedVersion {
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Create a configuration error with context
    pub fn config(msg: impl Into<String>) -> Self {
        ReleasyError::Config(msg.into())
    }

    /// Create a changelog format error with context
    pub fn changelog(msg: impl Into<String>) -> Self {
        ReleasyError::ChangelogFormat(msg.into())
    }

    /// Create a publish error with context
    pub fn publish(msg: impl Into<String>) -> Self {
        ReleasyError::Publish(msg.into())
    }

    /// Create a remote error with context
    pub fn remote(msg: impl Into<String>) -> Self {
        ReleasyError::Remote(msg.into())
    }

    /// Create a release notes error with context
    pub fn release_notes(msg: impl Into<String>) -> Self {
        ReleasyError::ReleaseNotes(msg.into())
    }

    /// Output captured from a failed command, if any
    pub fn command_output(&self) -> Option<&str> {
        match self {
            ReleasyError::CommandExecution { output, .. } => Some(output),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ReleasyError::config("bad key");
        assert_eq!(err.to_string(), "Configuration error: bad key");
    }

    #[test]
    fn test_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: ReleasyError = io_err.into();
        assert!(err.to_string().contains("I/O error"));
    }

    #[test]
    fn test_provider_not_found_message() {
        let err = ReleasyError::ProviderNotFound("myversion.bla".to_string());
        assert!(err
            .to_string()
            .starts_with("Unable to find a provider that supports"));
    }

    #[test]
    fn test_command_execution_message() {
        let err = ReleasyError::CommandExecution {
            command: "npm publish".to_string(),
            code: Some(1),
            output: "npm ERR! code EOTP".to_string(),
        };
        assert_eq!(err.to_string(), "Command `npm publish` exited with error code 1");
        assert_eq!(err.command_output(), Some("npm ERR! code EOTP"));
    }

    #[test]
    fn test_command_execution_without_code() {
        let err = ReleasyError::CommandExecution {
            command: "sh -c true".to_string(),
            code: None,
            output: String::new(),
        };
        assert!(err.to_string().contains("terminated by signal"));
    }

    #[test]
    fn test_error_messages_are_descriptive() {
        let error_pairs = vec![
            (ReleasyError::malformed("x", "y"), "Malformed version"),
            (ReleasyError::changelog("x"), "Cannot update your CHANGELOG"),
            (ReleasyError::publish("x"), "Publish failed"),
            (ReleasyError::release_notes("x"), "Release notes request failed"),
            (ReleasyError::AlreadyStable("1.0.0".into()), "The version you are trying"),
        ];

        for (err, expected_prefix) in error_pairs {
            let msg = err.to_string();
            assert!(
                msg.starts_with(expected_prefix),
                "Error message should start with '{}', but got '{}'",
                expected_prefix,
                msg
            );
        }
    }
}
