//! External command execution for scraping collectors
//!
//! Diagnostic commands (`system_profiler`, `wmic`, `ps`, `tasklist`) are the
//! only collection step that can block indefinitely, so every invocation is
//! time-bounded. A command that fails to spawn, times out or exits non-zero
//! yields `None`; callers fall back to default values.

use process_control::{ChildExt, Control};
use std::process::{Command, Stdio};
use std::time::{Duration, Instant};
use tracing::{debug, warn};

pub const DEFAULT_COMMAND_TIMEOUT: Duration = Duration::from_secs(5);

/// Runs a program and returns its standard output
pub trait CommandRunner: Send + Sync {
    fn run(&self, program: &str, args: &[&str]) -> Option<String>;
}

/// Runs real processes with a time limit
#[derive(Debug, Clone)]
pub struct SystemRunner {
    timeout: Duration,
}

impl SystemRunner {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }
}

impl Default for SystemRunner {
    fn default() -> Self {
        Self::new(DEFAULT_COMMAND_TIMEOUT)
    }
}

impl CommandRunner for SystemRunner {
    fn run(&self, program: &str, args: &[&str]) -> Option<String> {
        let start_time = Instant::now();
        debug!("Executing command: {} {:?} (timeout: {:?})", program, args, self.timeout);

        let child = match Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
        {
            Ok(child) => child,
            Err(e) => {
                debug!("Failed to spawn {}: {}", program, e);
                return None;
            }
        };

        let output = match child
            .controlled_with_output()
            .time_limit(self.timeout)
            .terminate_for_timeout()
            .wait()
        {
            Ok(Some(output)) => output,
            Ok(None) => {
                warn!("Command {} timed out after {:?}", program, self.timeout);
                return None;
            }
            Err(e) => {
                debug!("Failed to wait for {}: {}", program, e);
                return None;
            }
        };

        debug!("{} finished in {} ms", program, start_time.elapsed().as_millis());

        if !output.status.success() {
            debug!(
                "{} exited unsuccessfully ({:?}): {}",
                program,
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            );
            return None;
        }

        Some(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    #[test]
    fn test_command_output() {
        let runner = SystemRunner::default();
        let output = runner.run("sh", &["-c", "echo 'Hello World'"]).unwrap();
        assert!(output.contains("Hello World"));
    }

    #[test]
    fn test_non_zero_exit_is_none() {
        let runner = SystemRunner::default();
        assert!(runner.run("sh", &["-c", "exit 3"]).is_none());
    }

    #[test]
    fn test_missing_program_is_none() {
        let runner = SystemRunner::default();
        assert!(runner.run("sysprobe-no-such-program", &[]).is_none());
    }

    #[test]
    fn test_command_timeout() {
        let runner = SystemRunner::new(Duration::from_millis(200));
        let start = Instant::now();
        assert!(runner.run("sleep", &["10"]).is_none());
        assert!(start.elapsed() < Duration::from_secs(5));
    }
}
