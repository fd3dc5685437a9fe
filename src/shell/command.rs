//! External command execution.

use crate::error::{ModkeeperError, Result};
use std::collections::HashMap;
use std::io::Read;
use std::process::{Command, Stdio};
use std::thread;
use std::time::{Duration, Instant};

/// How often a running child is polled for exit when a timeout is set.
const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Result of executing an external command.
#[derive(Debug, Clone)]
pub struct CommandResult {
    /// Exit code (None if killed by signal).
    pub exit_code: Option<i32>,

    /// Standard output.
    pub stdout: String,

    /// Standard error.
    pub stderr: String,

    /// Execution duration.
    pub duration: Duration,

    /// Whether command succeeded (exit code 0).
    pub success: bool,
}

impl CommandResult {
    /// Create a success result.
    pub fn success(stdout: String, stderr: String, duration: Duration) -> Self {
        Self {
            exit_code: Some(0),
            stdout,
            stderr,
            duration,
            success: true,
        }
    }

    /// Create a failure result.
    pub fn failure(
        exit_code: Option<i32>,
        stdout: String,
        stderr: String,
        duration: Duration,
    ) -> Self {
        Self {
            exit_code,
            stdout,
            stderr,
            duration,
            success: false,
        }
    }

    /// The most useful diagnostic text: trimmed stderr, or stdout when
    /// stderr is empty.
    pub fn diagnostic(&self) -> String {
        let stderr = self.stderr.trim();
        if stderr.is_empty() {
            self.stdout.trim().to_string()
        } else {
            stderr.to_string()
        }
    }
}

/// Options for command execution.
#[derive(Debug, Clone, Default)]
pub struct CommandOptions {
    /// Environment variables (merged with system env).
    pub env: HashMap<String, String>,

    /// Timeout in seconds (None = no timeout).
    pub timeout: Option<u64>,
}

/// Run `program` with `args`, capturing stdout and stderr.
///
/// A non-zero exit is returned as a failed [`CommandResult`], not an
/// error. Errors are reserved for a program that cannot be spawned and
/// for a run that exceeds its timeout (the child is killed).
pub fn run(program: &str, args: &[String], options: &CommandOptions) -> Result<CommandResult> {
    let start = Instant::now();
    let display = display_command(program, args);

    let mut cmd = Command::new(program);
    cmd.args(args);
    for (key, value) in &options.env {
        cmd.env(key, value);
    }
    cmd.stdin(Stdio::null());
    cmd.stdout(Stdio::piped());
    cmd.stderr(Stdio::piped());

    let mut child = cmd.spawn().map_err(|e| {
        tracing::debug!("Failed to spawn {}: {}", program, e);
        ModkeeperError::CommandFailed {
            command: display.clone(),
            code: None,
        }
    })?;

    let mut stdout = child.stdout.take();
    let mut stderr = child.stderr.take();

    // Drain both pipes on their own threads so a chatty child can't block
    // on a full pipe while we wait for it.
    let stdout_handle = thread::spawn(move || {
        let mut buf = Vec::new();
        if let Some(out) = stdout.as_mut() {
            let _ = out.read_to_end(&mut buf);
        }
        String::from_utf8_lossy(&buf).into_owned()
    });
    let stderr_handle = thread::spawn(move || {
        let mut buf = Vec::new();
        if let Some(err) = stderr.as_mut() {
            let _ = err.read_to_end(&mut buf);
        }
        String::from_utf8_lossy(&buf).into_owned()
    });

    let status = match options.timeout {
        None => child.wait()?,
        Some(seconds) => {
            let deadline = start + Duration::from_secs(seconds);
            loop {
                if let Some(status) = child.try_wait()? {
                    break status;
                }
                if Instant::now() >= deadline {
                    let _ = child.kill();
                    let _ = child.wait();
                    return Err(ModkeeperError::CommandTimedOut {
                        command: display,
                        seconds,
                    });
                }
                thread::sleep(POLL_INTERVAL);
            }
        }
    };

    let stdout_output = stdout_handle.join().unwrap_or_default();
    let stderr_output = stderr_handle.join().unwrap_or_default();
    let duration = start.elapsed();

    if status.success() {
        Ok(CommandResult::success(
            stdout_output,
            stderr_output,
            duration,
        ))
    } else {
        Ok(CommandResult::failure(
            status.code(),
            stdout_output,
            stderr_output,
            duration,
        ))
    }
}

/// Render a program and its arguments for logs and error messages.
pub fn display_command(program: &str, args: &[String]) -> String {
    let mut parts = vec![program.to_string()];
    parts.extend(args.iter().map(|a| {
        if a.contains(' ') {
            format!("\"{}\"", a)
        } else {
            a.clone()
        }
    }));
    parts.join(" ")
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    fn sh(script: &str) -> Vec<String> {
        vec!["-c".to_string(), script.to_string()]
    }

    #[test]
    fn run_successful_command() {
        let result = run("sh", &sh("echo hello"), &CommandOptions::default()).unwrap();

        assert!(result.success);
        assert_eq!(result.exit_code, Some(0));
        assert!(result.stdout.contains("hello"));
    }

    #[test]
    fn run_failing_command_is_not_an_error() {
        let result = run("sh", &sh("echo oops >&2; exit 3"), &CommandOptions::default()).unwrap();

        assert!(!result.success);
        assert_eq!(result.exit_code, Some(3));
        assert_eq!(result.diagnostic(), "oops");
    }

    #[test]
    fn run_missing_program_is_an_error() {
        let err = run(
            "/nonexistent/modkeeper-test-binary",
            &[],
            &CommandOptions::default(),
        )
        .unwrap_err();
        assert!(matches!(err, ModkeeperError::CommandFailed { code: None, .. }));
    }

    #[test]
    fn run_keeps_output_with_invalid_utf8() {
        let result = run(
            "sh",
            &sh("printf '2.25.0\\n\\377\\n'; printf 'bad \\377 byte' >&2; exit 1"),
            &CommandOptions::default(),
        )
        .unwrap();

        assert!(result.stdout.contains("2.25.0"));
        assert!(result.diagnostic().starts_with("bad "));
        assert!(result.diagnostic().ends_with(" byte"));
    }

    #[test]
    fn run_with_env() {
        let mut options = CommandOptions::default();
        options
            .env
            .insert("MY_VAR".to_string(), "my_value".to_string());

        let result = run("sh", &sh("echo $MY_VAR"), &options).unwrap();

        assert!(result.stdout.contains("my_value"));
    }

    #[test]
    fn run_times_out() {
        let options = CommandOptions {
            timeout: Some(1),
            ..Default::default()
        };

        let err = run("sh", &sh("sleep 5"), &options).unwrap_err();
        assert!(matches!(err, ModkeeperError::CommandTimedOut { seconds: 1, .. }));
    }

    #[test]
    fn diagnostic_falls_back_to_stdout() {
        let result = CommandResult::failure(
            Some(1),
            "  from stdout \n".to_string(),
            "   ".to_string(),
            Duration::ZERO,
        );
        assert_eq!(result.diagnostic(), "from stdout");
    }

    #[test]
    fn display_command_quotes_spaces() {
        let shown = display_command("pwsh", &["-Command".to_string(), "Get-Module Az".to_string()]);
        assert_eq!(shown, "pwsh -Command \"Get-Module Az\"");
    }
}
