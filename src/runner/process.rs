use crate::error::{ReleasyError, Result};
use crate::runner::{display_command, CommandOutput, CommandRunner, RunOptions};
use std::io::Read;
use std::process::{Child, Command, ExitStatus, Stdio};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

const POLL_INTERVAL: Duration = Duration::from_millis(20);

/// [CommandRunner] backed by `std::process`
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessRunner;

impl ProcessRunner {
    pub fn new() -> Self {
        ProcessRunner
    }
}

impl CommandRunner for ProcessRunner {
    fn run(&self, argv: &[String], options: &RunOptions) -> Result<CommandOutput> {
        let (program, args) = argv
            .split_first()
            .ok_or_else(|| ReleasyError::config("Cannot run an empty command"))?;

        let mut command = Command::new(program);
        command.args(args).envs(options.env.iter().map(|(k, v)| (k, v)));

        if options.inherit_output {
            command.stdout(Stdio::inherit()).stderr(Stdio::inherit());
        } else {
            command.stdout(Stdio::piped()).stderr(Stdio::piped());
        }

        tracing::debug!(command = %display_command(argv), inherit = options.inherit_output, "spawning");
        let mut child = command.spawn()?;

        // Pipes are drained on reader threads while waiting
        let stdout = child.stdout.take().map(spawn_reader);
        let stderr = child.stderr.take().map(spawn_reader);

        let status = wait(&mut child, options.timeout).map_err(|e| match e {
            WaitError::TimedOut(limit) => ReleasyError::Timeout {
                command: display_command(argv),
                seconds: limit.as_secs(),
            },
            WaitError::Io(e) => ReleasyError::Io(e),
        })?;

        Ok(CommandOutput {
            stdout: join_reader(stdout),
            stderr: join_reader(stderr),
            exit_code: status.code(),
        })
    }
}

enum WaitError {
    TimedOut(Duration),
    Io(std::io::Error),
}

fn wait(child: &mut Child, timeout: Option<Duration>) -> std::result::Result<ExitStatus, WaitError> {
    let Some(limit) = timeout else {
        return child.wait().map_err(WaitError::Io);
    };

    let start = Instant::now();
    loop {
        match child.try_wait() {
            Ok(Some(status)) => return Ok(status),
            Ok(None) => {
                if start.elapsed() >= limit {
                    let _ = child.kill();
                    let _ = child.wait();
                    return Err(WaitError::TimedOut(limit));
                }
                thread::sleep(POLL_INTERVAL);
            }
            Err(e) => return Err(WaitError::Io(e)),
        }
    }
}

fn spawn_reader<R: Read + Send + 'static>(mut source: R) -> JoinHandle<String> {
    thread::spawn(move || {
        let mut buf = Vec::new();
        let _ = source.read_to_end(&mut buf);
        String::from_utf8_lossy(&buf).into_owned()
    })
}

fn join_reader(handle: Option<JoinHandle<String>>) -> String {
    handle.and_then(|h| h.join().ok()).unwrap_or_default()
}
