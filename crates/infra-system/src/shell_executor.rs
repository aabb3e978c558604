// Shell executor implementation
// reason: tokio for async process management
use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::process::{ExitStatus, Stdio};
use tokio::io::AsyncWriteExt;
use tokio::process::{ChildStdin, Command};
use tokio::time::Instant;
use tracing::{debug, warn};

use shtag_core::domain::{CommandInvocation, Payload};
use shtag_core::port::{CommandExecutor, ExecutionError, ProcessOutput};

/// POSIX shell used when none is configured
pub const DEFAULT_SHELL: &str = "/bin/sh";

/// Environment variable the CLI reads the shell path from
pub const SHELL_ENV_VAR: &str = "SHTAG_SHELL";

/// Exit code reported when the platform gives neither a code nor a signal
const UNKNOWN_EXIT_CODE: i32 = -1;

/// Runs each invocation as `<shell> -c <command>` with stdin, stdout and
/// stderr all piped
///
/// The child handle and all three pipes are owned by `execute` and dropped
/// before it returns, so sequential runs do not accumulate descriptors.
#[derive(Debug, Clone)]
pub struct ShellExecutor {
    shell: PathBuf,
}

impl ShellExecutor {
    /// Create an executor for a specific shell binary
    ///
    /// # Example
    /// ```ignore
    /// let executor = ShellExecutor::new("/bin/dash");
    /// ```
    pub fn new(shell: impl Into<PathBuf>) -> Self {
        Self {
            shell: shell.into(),
        }
    }

    pub fn shell(&self) -> &Path {
        &self.shell
    }

    /// Spawn child process, feed stdin, and wait for output
    ///
    /// The payload write and the stdout/stderr collection run side by side,
    /// so a child that echoes a large payload cannot fill its stdout pipe
    /// while we are still blocked writing its stdin.
    async fn spawn_and_wait(
        &self,
        invocation: &CommandInvocation,
    ) -> Result<std::process::Output, ExecutionError> {
        let mut child = Command::new(&self.shell)
            .arg("-c")
            .arg(&invocation.command)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| {
                ExecutionError::SpawnFailed(format!("{}: {}", self.shell.display(), e))
            })?;

        let stdin = child.stdin.take();
        let (written, output) = tokio::join!(
            write_input(stdin, invocation.input.as_ref()),
            child.wait_with_output()
        );

        let output = output.map_err(|e| ExecutionError::IoError(e.to_string()))?;
        written?;

        Ok(output)
    }
}

impl Default for ShellExecutor {
    fn default() -> Self {
        Self::new(DEFAULT_SHELL)
    }
}

#[async_trait]
impl CommandExecutor for ShellExecutor {
    async fn execute(
        &self,
        invocation: &CommandInvocation,
    ) -> Result<ProcessOutput, ExecutionError> {
        let start = Instant::now();

        let output = self.spawn_and_wait(invocation).await?;

        Ok(ProcessOutput {
            exit_code: exit_code(output.status),
            stdout: output.stdout,
            stderr: output.stderr,
            duration_ms: start.elapsed().as_millis() as i64,
        })
    }
}

/// Write the payload as the single write, then close stdin
///
/// With no payload stdin is closed untouched. A child that exits without
/// reading its input closes the pipe first; that BrokenPipe is not an error.
async fn write_input(
    stdin: Option<ChildStdin>,
    payload: Option<&Payload>,
) -> Result<(), ExecutionError> {
    let Some(mut stdin) = stdin else {
        return Ok(());
    };

    if let Some(payload) = payload {
        match stdin.write_all(payload.as_bytes()).await {
            Ok(()) => {}
            Err(e) if e.kind() == ErrorKind::BrokenPipe => {
                debug!(
                    input_bytes = payload.len(),
                    "Child closed stdin before reading the whole payload"
                );
            }
            Err(e) => return Err(ExecutionError::IoError(format!("stdin write: {}", e))),
        }
    }

    drop(stdin); // EOF for the child
    Ok(())
}

/// Exit code, or `128 + signal` for a signal-terminated child
fn exit_code(status: ExitStatus) -> i32 {
    if let Some(code) = status.code() {
        return code;
    }

    #[cfg(unix)]
    {
        use nix::sys::signal::Signal;
        use std::os::unix::process::ExitStatusExt;

        if let Some(signal) = status.signal() {
            let name = Signal::try_from(signal)
                .map(|s| s.as_str())
                .unwrap_or("UNKNOWN");
            warn!(signal = signal, name = name, "Shell terminated by signal");
            return 128 + signal;
        }
    }

    UNKNOWN_EXIT_CODE
}

#[cfg(test)]
mod tests {
    use super::*;
    use shtag_core::domain::Template;

    fn invocation(command: &str, input: Option<Payload>) -> CommandInvocation {
        CommandInvocation::new(&Template::literal(command), input)
    }

    #[tokio::test]
    async fn test_execute_success() {
        let executor = ShellExecutor::default();

        let output = executor
            .execute(&invocation("echo hello", None))
            .await
            .unwrap();

        assert_eq!(output.exit_code, 0);
        assert_eq!(output.stdout, b"hello\n");
        assert!(output.stderr.is_empty());
    }

    #[tokio::test]
    async fn test_execute_captures_exit_code_and_stderr() {
        let executor = ShellExecutor::default();

        let output = executor
            .execute(&invocation("echo oops >&2; exit 3", None))
            .await
            .unwrap();

        assert_eq!(output.exit_code, 3);
        assert_eq!(output.stderr, b"oops\n");
        assert!(!output.success());
    }

    #[tokio::test]
    async fn test_stdin_payload_passthrough() {
        let executor = ShellExecutor::default();
        let payload = Payload::Bytes(vec![0, 1, 2, 255, b'\n']);

        let output = executor
            .execute(&invocation("cat", Some(payload.clone())))
            .await
            .unwrap();

        assert_eq!(output.stdout, payload.as_bytes());
    }

    #[tokio::test]
    async fn test_stdin_closed_without_payload() {
        let executor = ShellExecutor::default();

        // cat would hang forever if stdin stayed open
        let output = executor.execute(&invocation("cat", None)).await.unwrap();

        assert_eq!(output.exit_code, 0);
        assert!(output.stdout.is_empty());
    }

    #[tokio::test]
    async fn test_large_payload_does_not_deadlock() {
        let executor = ShellExecutor::default();
        let payload = "x".repeat(1 << 20);

        let output = executor
            .execute(&invocation("cat", Some(payload.as_str().into())))
            .await
            .unwrap();

        assert_eq!(output.stdout.len(), payload.len());
    }

    #[tokio::test]
    async fn test_payload_ignored_by_child_is_not_an_error() {
        let executor = ShellExecutor::default();
        let payload = "y".repeat(1 << 20);

        let output = executor
            .execute(&invocation("exit 0", Some(payload.into())))
            .await
            .unwrap();

        assert_eq!(output.exit_code, 0);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_signal_maps_to_128_plus() {
        let executor = ShellExecutor::default();

        let output = executor
            .execute(&invocation("kill -9 $$", None))
            .await
            .unwrap();

        assert_eq!(output.exit_code, 128 + 9);
    }

    #[tokio::test]
    async fn test_missing_shell_fails_to_spawn() {
        let executor = ShellExecutor::new("/nonexistent/shell");

        let result = executor.execute(&invocation("echo hi", None)).await;

        assert!(matches!(result, Err(ExecutionError::SpawnFailed(_))));
    }
}
