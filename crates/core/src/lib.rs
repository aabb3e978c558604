// Shtag Core - Domain Logic & Ports
// NO process spawning here; see shtag-infra-system for the shell adapter

pub mod application;
pub mod domain;
pub mod error;
pub mod port;

pub use application::{InputRunner, ShellRunner};
pub use domain::{CommandOutput, Payload, RunnerConfig, RunnerOptions, Template};
pub use error::{Result, ShellError};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
