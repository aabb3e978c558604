// Default runner and configuration entry point

use std::sync::{Arc, OnceLock};

use shtag_core::domain::{RunnerConfig, RunnerOptions};
use shtag_core::{Result, ShellRunner};

use crate::shell_executor::ShellExecutor;

static DEFAULT_RUNNER: OnceLock<ShellRunner> = OnceLock::new();

/// Build a runner over `/bin/sh` from an options record
///
/// # Errors
/// - ShellError::Configuration for invalid options (checked here, once)
pub fn configure(options: &RunnerOptions) -> Result<ShellRunner> {
    ShellRunner::configure(options, Arc::new(ShellExecutor::default()))
}

/// Process-wide runner with default options, built on first use
///
/// Defaults: exit codes enforced, UTF-8 decoding, output trimmed, `/bin/sh`.
pub fn default_runner() -> &'static ShellRunner {
    DEFAULT_RUNNER.get_or_init(|| {
        ShellRunner::new(RunnerConfig::default(), Arc::new(ShellExecutor::default()))
    })
}
