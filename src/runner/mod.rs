//! External command execution
//!
//! Everything that spawns a process (project scripts, `npm publish`) goes
//! through [CommandRunner]. Platform shell selection and argument handling
//! stay here, out of the pipeline.

pub mod mock;
pub mod process;

pub use mock::MockRunner;
pub use process::ProcessRunner;

use crate::error::{ReleasyError, Result};
use std::time::Duration;

/// How a command is run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunOptions {
    /// Let the child write straight to our stdout/stderr instead of capturing
    pub inherit_output: bool,
    /// Extra environment variables
    pub env: Vec<(String, String)>,
    /// Kill the child once this much time has passed
    pub timeout: Option<Duration>,
}

impl RunOptions {
    pub fn captured() -> Self {
        Self::default()
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Result of a finished command
///
/// Output fields are empty when the output was inherited.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    pub stdout: String,
    pub stderr: String,
    /// `None` when the process was terminated by a signal
    pub exit_code: Option<i32>,
}

impl CommandOutput {
    pub fn success(stdout: impl Into<String>) -> Self {
        CommandOutput {
            stdout: stdout.into(),
            stderr: String::new(),
            exit_code: Some(0),
        }
    }

    pub fn failure(code: i32, stderr: impl Into<String>) -> Self {
        CommandOutput {
            stdout: String::new(),
            stderr: stderr.into(),
            exit_code: Some(code),
        }
    }

    pub fn is_success(&self) -> bool {
        self.exit_code == Some(0)
    }

    /// Turn a non-zero exit into [`ReleasyError::CommandExecution`]
    pub fn check(self, argv: &[String]) -> Result<CommandOutput> {
        if self.is_success() {
            return Ok(self);
        }

        let mut output = self.stdout;
        if !self.stderr.is_empty() {
            if !output.is_empty() && !output.ends_with('\n') {
                output.push('\n');
            }
            output.push_str(&self.stderr);
        }

        Err(ReleasyError::CommandExecution {
            command: display_command(argv),
            code: self.exit_code,
            output,
        })
    }
}

/// Capability for running external commands
pub trait CommandRunner {
    /// Run `argv` to completion
    ///
    /// A non-zero exit is not an error here; callers decide via
    /// [`CommandOutput::check`]. Spawn failures and timeouts are errors.
    fn run(&self, argv: &[String], options: &RunOptions) -> Result<CommandOutput>;
}

/// Argv that runs `script` through the platform shell
pub fn shell_command(script: &str) -> Vec<String> {
    if cfg!(windows) {
        vec![
            "cmd.exe".to_string(),
            "/s".to_string(),
            "/c".to_string(),
            script.to_string(),
        ]
    } else {
        vec!["sh".to_string(), "-c".to_string(), script.to_string()]
    }
}

/// Space-joined argv for messages
pub fn display_command(argv: &[String]) -> String {
    argv.join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn argv(parts: &[&str]) -> Vec<String> {
        parts.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_check_success_passes_through() {
        let output = CommandOutput::success("ok").check(&argv(&["true"])).unwrap();
        assert_eq!(output.stdout, "ok");
    }

    #[test]
    fn test_check_failure_combines_output() {
        let output = CommandOutput {
            stdout: "partial".to_string(),
            stderr: "npm ERR! code EOTP".to_string(),
            exit_code: Some(1),
        };
        let err = output.check(&argv(&["npm", "publish"])).unwrap_err();

        assert_eq!(err.to_string(), "Command `npm publish` exited with error code 1");
        assert_eq!(err.command_output(), Some("partial\nnpm ERR! code EOTP"));
    }

    #[test]
    #[cfg(not(windows))]
    fn test_shell_command_posix() {
        assert_eq!(shell_command("echo hi"), argv(&["sh", "-c", "echo hi"]));
    }

    #[test]
    fn test_run_options_builders() {
        let options = RunOptions::captured().with_timeout(Some(Duration::from_secs(5)));
        assert!(!options.inherit_output);
        assert!(options.env.is_empty());
        assert_eq!(options.timeout, Some(Duration::from_secs(5)));
    }
}
