// Shell Runner - exit-code policy and output decoding over a CommandExecutor
use std::sync::Arc;
use tracing::{debug, warn};

use crate::domain::{
    decode_output, CommandInvocation, CommandOutput, Payload, RunnerConfig, RunnerOptions,
    Template,
};
use crate::error::{Result, ShellError};
use crate::port::CommandExecutor;

/// A configured runner
///
/// Two entry points share one execution path:
/// - `run_template` / `run`: no stdin payload
/// - `with_input` / `with_args`: bind a payload first, then supply the template
///
/// Interpolated values are inserted into the command text verbatim. Anything
/// that reaches a template is subject to shell expansion; quote untrusted
/// values yourself.
#[derive(Clone)]
pub struct ShellRunner {
    config: RunnerConfig,
    executor: Arc<dyn CommandExecutor>,
}

impl ShellRunner {
    /// Create a runner from an already validated configuration
    pub fn new(config: RunnerConfig, executor: Arc<dyn CommandExecutor>) -> Self {
        Self { config, executor }
    }

    /// Validate `options` and bind them to `executor`
    ///
    /// # Errors
    /// - ShellError::Configuration if `encoding` is None while `trim` is set,
    ///   or the encoding label is unknown
    ///
    /// # Example
    /// ```text
    /// let runner = ShellRunner::configure(
    ///     &RunnerOptions::new().with_ignore_exit_code(true),
    ///     Arc::new(ShellExecutor::default()),
    /// )?;
    /// ```
    pub fn configure(options: &RunnerOptions, executor: Arc<dyn CommandExecutor>) -> Result<Self> {
        let config = RunnerConfig::new(options).map_err(ShellError::Configuration)?;
        Ok(Self::new(config, executor))
    }

    pub fn config(&self) -> &RunnerConfig {
        &self.config
    }

    /// Direct-template form: assemble and run with stdin closed immediately
    pub async fn run_template(&self, template: &Template) -> Result<CommandOutput> {
        self.execute(template, None).await
    }

    /// Run a literal command string
    pub async fn run(&self, command: &str) -> Result<CommandOutput> {
        self.run_template(&Template::literal(command)).await
    }

    /// Curried-input form: bind a stdin payload, supply the template later
    pub fn with_input(&self, payload: impl Into<Payload>) -> InputRunner<'_> {
        InputRunner {
            runner: self,
            input: Some(payload.into()),
        }
    }

    /// Curried-input form over plain arguments: only the first one, if any,
    /// becomes the stdin payload
    pub fn with_args<P, I>(&self, args: I) -> InputRunner<'_>
    where
        P: Into<Payload>,
        I: IntoIterator<Item = P>,
    {
        InputRunner {
            runner: self,
            input: args.into_iter().next().map(Into::into),
        }
    }

    async fn execute(&self, template: &Template, input: Option<Payload>) -> Result<CommandOutput> {
        let invocation = CommandInvocation::new(template, input);

        debug!(
            command = %invocation.command,
            input_bytes = invocation.input_len(),
            "Running shell command"
        );

        let output = self.executor.execute(&invocation).await?;

        debug!(
            command = %invocation.command,
            exit_code = output.exit_code,
            stdout_bytes = output.stdout.len(),
            stderr_bytes = output.stderr.len(),
            duration_ms = output.duration_ms,
            "Shell command finished"
        );

        if !output.success() {
            if !self.config.ignore_exit_code() {
                // stderr is always read as UTF-8, whatever the output encoding
                let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
                warn!(
                    command = %invocation.command,
                    exit_code = output.exit_code,
                    stderr = %stderr,
                    "Shell command failed"
                );
                return Err(ShellError::NonZeroExit {
                    code: output.exit_code,
                    stderr,
                });
            }

            debug!(
                exit_code = output.exit_code,
                "Ignoring non-zero exit code"
            );
        }

        Ok(decode_output(output.stdout, self.config.output())?)
    }
}

impl std::fmt::Debug for ShellRunner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ShellRunner")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

/// Runner with a bound stdin payload (reusable; each run writes the same payload)
#[derive(Debug, Clone)]
pub struct InputRunner<'a> {
    runner: &'a ShellRunner,
    input: Option<Payload>,
}

impl InputRunner<'_> {
    pub fn input(&self) -> Option<&Payload> {
        self.input.as_ref()
    }

    pub async fn run_template(&self, template: &Template) -> Result<CommandOutput> {
        self.runner.execute(template, self.input.clone()).await
    }

    pub async fn run(&self, command: &str) -> Result<CommandOutput> {
        self.run_template(&Template::literal(command)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::DomainError;
    use crate::port::command_executor::mocks::{MockBehavior, MockCommandExecutor};
    use crate::port::ExecutionError;

    fn runner(options: RunnerOptions, executor: Arc<MockCommandExecutor>) -> ShellRunner {
        ShellRunner::configure(&options, executor).unwrap()
    }

    #[test]
    fn test_configure_rejects_trim_without_encoding() {
        let executor = Arc::new(MockCommandExecutor::new_success("x"));
        let err = tokio_test::assert_err!(ShellRunner::configure(
            &RunnerOptions::new().without_encoding(),
            executor.clone()
        ));

        assert!(matches!(
            err,
            ShellError::Configuration(DomainError::TrimWithoutEncoding)
        ));
        assert_eq!(executor.call_count(), 0);
    }

    #[tokio::test]
    async fn test_success_is_decoded_and_trimmed() {
        let executor = Arc::new(MockCommandExecutor::new_success("  hi\n"));
        let runner = runner(RunnerOptions::default(), executor.clone());

        let template = Template::new(["echo ", ""], &[&"hi"]).unwrap();
        let out = runner.run_template(&template).await.unwrap();

        assert_eq!(out, CommandOutput::Text("hi".to_string()));
        let calls = executor.calls();
        assert_eq!(calls[0].command, "echo hi");
        assert_eq!(calls[0].input, None);
    }

    #[tokio::test]
    async fn test_non_zero_exit_raises_with_trimmed_stderr() {
        let executor = Arc::new(MockCommandExecutor::new_exit(2, "out", "\n bad thing \n"));
        let runner = runner(RunnerOptions::default(), executor);

        let err = runner.run("false").await.unwrap_err();

        assert_eq!(err.exit_code(), Some(2));
        assert_eq!(err.to_string(), "Non-zero exit code: 2 bad thing");
    }

    #[tokio::test]
    async fn test_stderr_decoded_as_utf8_even_for_utf16_output() {
        let executor = Arc::new(MockCommandExecutor::new_exit(1, Vec::<u8>::new(), "é"));
        let runner = runner(RunnerOptions::new().with_encoding("utf-16le"), executor);

        let err = runner.run("x").await.unwrap_err();
        assert_eq!(err.to_string(), "Non-zero exit code: 1 é");
    }

    #[tokio::test]
    async fn test_ignored_exit_code_returns_stdout_not_stderr() {
        let executor = Arc::new(MockCommandExecutor::new_exit(7, "partial\n", "noise"));
        let runner = runner(RunnerOptions::new().with_ignore_exit_code(true), executor);

        let out = runner.run("x").await.unwrap();
        assert_eq!(out.as_text(), Some("partial"));
    }

    #[tokio::test]
    async fn test_raw_mode_returns_bytes() {
        let executor = Arc::new(MockCommandExecutor::new_success(vec![0xFF, b'\n']));
        let runner = runner(RunnerOptions::raw(), executor);

        let out = runner.run("x").await.unwrap();
        assert_eq!(out, CommandOutput::Bytes(vec![0xFF, b'\n']));
    }

    #[tokio::test]
    async fn test_invalid_output_is_decode_error() {
        let executor = Arc::new(MockCommandExecutor::new_success(vec![0xFFu8]));
        let runner = runner(RunnerOptions::default(), executor);

        let err = runner.run("x").await.unwrap_err();
        assert!(matches!(err, ShellError::Decode(_)));
    }

    #[tokio::test]
    async fn test_with_input_threads_payload() {
        let executor = Arc::new(MockCommandExecutor::new_echo());
        let runner = runner(RunnerOptions::default(), executor.clone());

        let bound = runner.with_input("payload\n");
        let out = bound.run("cat").await.unwrap();
        assert_eq!(out.as_text(), Some("payload"));

        // reusable
        bound.run("cat").await.unwrap();
        assert_eq!(executor.call_count(), 2);
        assert_eq!(
            executor.calls()[1].input,
            Some(Payload::Text("payload\n".to_string()))
        );
    }

    #[tokio::test]
    async fn test_with_args_uses_first_only() {
        let executor = Arc::new(MockCommandExecutor::new_echo());
        let runner = runner(RunnerOptions::default(), executor.clone());

        let out = runner.with_args(["first", "second"]).run("cat").await.unwrap();
        assert_eq!(out.as_text(), Some("first"));

        let bound = runner.with_args(Vec::<String>::new());
        assert!(bound.input().is_none());
        bound.run("cat").await.unwrap();
        assert_eq!(executor.calls()[1].input, None);
    }

    #[test]
    fn test_same_command_twice_is_stable() {
        let executor = Arc::new(MockCommandExecutor::new_success("hi\n"));
        let runner = runner(RunnerOptions::default(), executor);

        let first = tokio_test::assert_ok!(tokio_test::block_on(runner.run("echo hi")));
        let second = tokio_test::assert_ok!(tokio_test::block_on(runner.run("echo hi")));
        assert_eq!(first, second);
    }

    #[test]
    fn test_latin1_output() {
        let executor = Arc::new(MockCommandExecutor::new_success(b"caf\xE9\n".to_vec()));
        let runner = runner(RunnerOptions::new().with_encoding("latin1"), executor);

        let out = tokio_test::assert_ok!(tokio_test::block_on(runner.run("x")));
        assert_eq!(out.as_text(), Some("café"));
    }

    #[tokio::test]
    async fn test_spawn_failure_propagates() {
        let executor = Arc::new(MockCommandExecutor::new(MockBehavior::SpawnFail(
            "no shell".to_string(),
        )));
        let runner = runner(RunnerOptions::default(), executor);

        let err = runner.run("x").await.unwrap_err();
        assert!(matches!(
            err,
            ShellError::Execution(ExecutionError::SpawnFailed(_))
        ));
    }
}
