// Domain Error Types

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Must specify an encoding if trim is enabled")]
    TrimWithoutEncoding,

    #[error("Unsupported encoding: {0}")]
    UnsupportedEncoding(String),

    #[error("Invalid {encoding} output at byte {offset}")]
    Decode { encoding: String, offset: usize },

    #[error("Template arity mismatch: {segments} segments need {expected} values, got {actual}")]
    TemplateArity {
        segments: usize,
        expected: usize,
        actual: usize,
    },

    #[error("Invalid options record: {0}")]
    InvalidOptions(String),
}

impl DomainError {
    /// True for errors raised while building a runner
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            DomainError::TrimWithoutEncoding
                | DomainError::UnsupportedEncoding(_)
                | DomainError::InvalidOptions(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, DomainError>;
