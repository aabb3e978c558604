// Domain Layer - Pure values and rules (no I/O)

pub mod encoding;
pub mod error;
pub mod invocation;
pub mod options;
pub mod output;
pub mod template;

// Re-exports
pub use encoding::TextEncoding;
pub use error::DomainError;
pub use invocation::{CommandInvocation, Payload};
pub use options::{OutputMode, RunnerConfig, RunnerOptions, DEFAULT_ENCODING};
pub use output::{decode_output, CommandOutput};
pub use template::Template;
