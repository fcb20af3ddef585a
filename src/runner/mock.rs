use crate::error::Result;
use crate::runner::{CommandOutput, CommandRunner, RunOptions};
use std::collections::VecDeque;
use std::sync::Mutex;

/// Scripted [CommandRunner] for tests
///
/// Responses are served in order; once the queue is empty every command
/// succeeds with empty output. Each call's argv and options are recorded.
#[derive(Debug, Default)]
pub struct MockRunner {
    responses: Mutex<VecDeque<CommandOutput>>,
    calls: Mutex<Vec<(Vec<String>, RunOptions)>>,
}

impl MockRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue the output of the next unanswered call
    pub fn respond(self, output: CommandOutput) -> Self {
        if let Ok(mut responses) = self.responses.lock() {
            responses.push_back(output);
        }
        self
    }

    /// Recorded argv of every call, in order
    pub fn commands(&self) -> Vec<Vec<String>> {
        self.calls
            .lock()
            .map(|calls| calls.iter().map(|(argv, _)| argv.clone()).collect())
            .unwrap_or_default()
    }

    /// Recorded options of every call, in order
    pub fn options(&self) -> Vec<RunOptions> {
        self.calls
            .lock()
            .map(|calls| calls.iter().map(|(_, options)| options.clone()).collect())
            .unwrap_or_default()
    }
}

impl CommandRunner for MockRunner {
    fn run(&self, argv: &[String], options: &RunOptions) -> Result<CommandOutput> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push((argv.to_vec(), options.clone()));
        }

        Ok(self
            .responses
            .lock()
            .ok()
            .and_then(|mut responses| responses.pop_front())
            .unwrap_or_else(|| CommandOutput::success("")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_runner_serves_responses_in_order() {
        let runner = MockRunner::new().respond(CommandOutput::failure(1, "boom"));
        let argv = vec!["npm".to_string(), "publish".to_string()];

        let first = runner.run(&argv, &RunOptions::captured()).unwrap();
        let second = runner.run(&argv, &RunOptions::captured()).unwrap();

        assert_eq!(first.exit_code, Some(1));
        assert!(second.is_success());
        assert_eq!(runner.commands(), vec![argv.clone(), argv]);
    }
}
