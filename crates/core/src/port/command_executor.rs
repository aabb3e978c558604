// Command Executor Port
// Abstraction over "run this command string in a shell"

use crate::domain::CommandInvocation;
use async_trait::async_trait;
use thiserror::Error;

/// Raw outcome of one subprocess run (no exit-code policy applied)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessOutput {
    /// Exit code; `128 + signal` for signal-terminated children
    pub exit_code: i32,
    pub stdout: Vec<u8>,
    pub stderr: Vec<u8>,
    pub duration_ms: i64,
}

impl ProcessOutput {
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }
}

/// Execution errors (the process could not be run to completion)
#[derive(Error, Debug)]
pub enum ExecutionError {
    #[error("Spawn failed: {0}")]
    SpawnFailed(String),

    #[error("IO error: {0}")]
    IoError(String),
}

/// Command Executor trait
///
/// Implementations:
/// - ShellExecutor (infra-system): `sh -c <command>` with piped stdio
/// - mocks::MockCommandExecutor: canned outputs for tests
#[async_trait]
pub trait CommandExecutor: Send + Sync {
    /// Run one invocation to completion and collect its streams
    ///
    /// All process resources (pipes, child handle) are released before
    /// this returns, on success and on error.
    ///
    /// # Errors
    /// - ExecutionError::SpawnFailed if the shell cannot be started
    /// - ExecutionError::IoError if a stream cannot be written or read
    async fn execute(&self, invocation: &CommandInvocation)
        -> Result<ProcessOutput, ExecutionError>;
}

// ============================================================================
// Mock Implementations for Testing
// ============================================================================

pub mod mocks {
    use super::*;
    use std::sync::{Arc, Mutex};

    /// Mock executor behavior
    #[derive(Debug, Clone)]
    pub enum MockBehavior {
        /// Exit with code and canned streams
        Exit {
            code: i32,
            stdout: Vec<u8>,
            stderr: Vec<u8>,
        },
        /// Echo the stdin payload back as stdout
        EchoInput,
        /// Fail to spawn
        SpawnFail(String),
    }

    /// Mock Command Executor for testing
    pub struct MockCommandExecutor {
        behavior: Arc<Mutex<MockBehavior>>,
        calls: Arc<Mutex<Vec<CommandInvocation>>>,
    }

    impl MockCommandExecutor {
        pub fn new(behavior: MockBehavior) -> Self {
            Self {
                behavior: Arc::new(Mutex::new(behavior)),
                calls: Arc::new(Mutex::new(Vec::new())),
            }
        }
        pub fn new_success(stdout: impl Into<Vec<u8>>) -> Self {
            Self::new_exit(0, stdout, Vec::<u8>::new())
        }
        pub fn new_exit(code: i32, stdout: impl Into<Vec<u8>>, stderr: impl Into<Vec<u8>>) -> Self {
            Self::new(MockBehavior::Exit {
                code,
                stdout: stdout.into(),
                stderr: stderr.into(),
            })
        }
        pub fn new_echo() -> Self {
            Self::new(MockBehavior::EchoInput)
        }
        pub fn call_count(&self) -> usize {
            self.calls.lock().unwrap().len()
        }
        pub fn calls(&self) -> Vec<CommandInvocation> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl CommandExecutor for MockCommandExecutor {
        async fn execute(
            &self,
            invocation: &CommandInvocation,
        ) -> Result<ProcessOutput, ExecutionError> {
            self.calls.lock().unwrap().push(invocation.clone());

            let behavior = self.behavior.lock().unwrap().clone();

            match behavior {
                MockBehavior::Exit {
                    code,
                    stdout,
                    stderr,
                } => Ok(ProcessOutput {
                    exit_code: code,
                    stdout,
                    stderr,
                    duration_ms: 1,
                }),
                MockBehavior::EchoInput => Ok(ProcessOutput {
                    exit_code: 0,
                    stdout: invocation
                        .input
                        .as_ref()
                        .map(|p| p.as_bytes().to_vec())
                        .unwrap_or_default(),
                    stderr: Vec::new(),
                    duration_ms: 1,
                }),
                MockBehavior::SpawnFail(msg) => Err(ExecutionError::SpawnFailed(msg)),
            }
        }
    }
}
