// Shtag Infrastructure - System Adapters
// Implements: CommandExecutor over a POSIX shell

pub mod defaults;
pub mod shell_executor;

pub use defaults::{configure, default_runner};
pub use shell_executor::{ShellExecutor, DEFAULT_SHELL};
