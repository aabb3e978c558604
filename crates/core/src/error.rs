// Central Error Type for callers of a runner

use thiserror::Error;

use crate::domain::DomainError;
use crate::port::ExecutionError;

/// Caller-facing error type
#[derive(Error, Debug)]
pub enum ShellError {
    /// Invalid options; raised while building a runner, never by a run
    #[error("Configuration error: {0}")]
    Configuration(DomainError),

    /// Child exited non-zero and the runner does not ignore exit codes
    #[error("Non-zero exit code: {code} {stderr}")]
    NonZeroExit { code: i32, stderr: String },

    #[error("Decode error: {0}")]
    Decode(DomainError),

    #[error("Template error: {0}")]
    Template(DomainError),

    #[error("Execution error: {0}")]
    Execution(#[from] ExecutionError),
}

impl ShellError {
    /// Exit code of a failed child, if that is what went wrong
    pub fn exit_code(&self) -> Option<i32> {
        match self {
            ShellError::NonZeroExit { code, .. } => Some(*code),
            _ => None,
        }
    }
}

impl From<DomainError> for ShellError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::Decode { .. } => ShellError::Decode(err),
            DomainError::TemplateArity { .. } => ShellError::Template(err),
            _ => ShellError::Configuration(err),
        }
    }
}

/// Result type alias using ShellError
pub type Result<T> = std::result::Result<T, ShellError>;
