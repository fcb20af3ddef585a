use crate::error::Result;
use crate::hooks::HookContext;
use crate::runner::{shell_command, CommandRunner, RunOptions};
use std::time::Duration;

/// Runs project scripts through the platform shell
pub struct HookExecutor<'a> {
    runner: &'a dyn CommandRunner,
    quiet: bool,
    timeout: Option<Duration>,
}

impl<'a> HookExecutor<'a> {
    pub fn new(runner: &'a dyn CommandRunner, quiet: bool, timeout: Option<Duration>) -> Self {
        HookExecutor {
            runner,
            quiet,
            timeout,
        }
    }

    /// Execute a script with the given context
    ///
    /// The script's output goes straight to the terminal unless quiet. Any
    /// non-zero exit code is a failure.
    ///
    /// # Returns
    /// * `Ok(())` if the script exits with code 0
    /// * `Err(CommandExecution)` otherwise
    pub fn execute(&self, script: &str, context: &HookContext) -> Result<()> {
        let argv = shell_command(script);
        let options = RunOptions {
            inherit_output: !self.quiet,
            env: context.to_env_vars().into_iter().collect(),
            timeout: self.timeout,
        };

        tracing::info!(hook = context.hook_type.name(), script, "running project script");
        self.runner.run(&argv, &options)?.check(&argv)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ReleasyError;
    use crate::hooks::HookType;
    use crate::runner::{CommandOutput, MockRunner};

    fn context() -> HookContext {
        HookContext {
            hook_type: HookType::PreReleasy,
            version: "1.0.1".to_string(),
            previous_version: "1.0.0".to_string(),
            tag: "v1.0.1".to_string(),
            dry_run: false,
        }
    }

    #[test]
    fn test_script_runs_through_shell_with_env() {
        let runner = MockRunner::new();
        HookExecutor::new(&runner, false, None)
            .execute("npm run build", &context())
            .unwrap();

        let commands = runner.commands();
        assert_eq!(commands.len(), 1);
        assert_eq!(commands[0].last().map(String::as_str), Some("npm run build"));

        let options = &runner.options()[0];
        assert!(options.inherit_output);
        assert!(options
            .env
            .contains(&("RELEASY_TAG_NAME".to_string(), "v1.0.1".to_string())));
    }

    #[test]
    fn test_quiet_captures_output() {
        let runner = MockRunner::new();
        HookExecutor::new(&runner, true, None)
            .execute("true", &context())
            .unwrap();

        assert!(!runner.options()[0].inherit_output);
    }

    #[test]
    fn test_failing_script() {
        let runner = MockRunner::new().respond(CommandOutput::failure(2, ""));
        let err = HookExecutor::new(&runner, false, None)
            .execute("exit 2", &context())
            .unwrap_err();

        assert!(matches!(err, ReleasyError::CommandExecution { code: Some(2), .. }));
    }
}
