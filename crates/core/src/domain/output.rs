// Command Output (decoded result of one run)

use super::error::Result;
use super::options::OutputMode;

/// Result value of a successful run
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandOutput {
    /// Decoded (and possibly trimmed) stdout
    Text(String),
    /// Raw stdout bytes (no encoding configured)
    Bytes(Vec<u8>),
}

impl CommandOutput {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            CommandOutput::Text(text) => Some(text),
            CommandOutput::Bytes(_) => None,
        }
    }

    pub fn into_text(self) -> Option<String> {
        match self {
            CommandOutput::Text(text) => Some(text),
            CommandOutput::Bytes(_) => None,
        }
    }

    pub fn as_bytes(&self) -> &[u8] {
        match self {
            CommandOutput::Text(text) => text.as_bytes(),
            CommandOutput::Bytes(bytes) => bytes,
        }
    }

    pub fn into_bytes(self) -> Vec<u8> {
        match self {
            CommandOutput::Text(text) => text.into_bytes(),
            CommandOutput::Bytes(bytes) => bytes,
        }
    }
}

/// Turn stdout bytes into the configured result
///
/// Trimming removes leading/trailing Unicode whitespace (space, tab, `\n`, `\r`, ...).
///
/// # Errors
/// - DomainError::Decode if the bytes are invalid for the configured encoding
pub fn decode_output(stdout: Vec<u8>, mode: OutputMode) -> Result<CommandOutput> {
    match mode {
        OutputMode::Raw => Ok(CommandOutput::Bytes(stdout)),
        OutputMode::Text { encoding, trim } => {
            let text = encoding.decode(&stdout)?;
            let text = if trim {
                text.trim().to_string()
            } else {
                text
            };
            Ok(CommandOutput::Text(text))
        }
    }
}
