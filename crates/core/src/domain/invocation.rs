// Command Invocation (one subprocess run)

use super::template::Template;

/// Data written to the child's stdin before it is closed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Payload {
    Text(String),
    Bytes(Vec<u8>),
}

impl Payload {
    pub fn as_bytes(&self) -> &[u8] {
        match self {
            Payload::Text(text) => text.as_bytes(),
            Payload::Bytes(bytes) => bytes,
        }
    }

    pub fn len(&self) -> usize {
        self.as_bytes().len()
    }

    pub fn is_empty(&self) -> bool {
        self.as_bytes().is_empty()
    }
}

impl From<String> for Payload {
    fn from(text: String) -> Self {
        Payload::Text(text)
    }
}

impl From<&str> for Payload {
    fn from(text: &str) -> Self {
        Payload::Text(text.to_string())
    }
}

impl From<Vec<u8>> for Payload {
    fn from(bytes: Vec<u8>) -> Self {
        Payload::Bytes(bytes)
    }
}

impl From<&[u8]> for Payload {
    fn from(bytes: &[u8]) -> Self {
        Payload::Bytes(bytes.to_vec())
    }
}

/// Assembled command string plus optional stdin payload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandInvocation {
    pub command: String,
    pub input: Option<Payload>,
}

impl CommandInvocation {
    pub fn new(template: &Template, input: Option<Payload>) -> Self {
        Self {
            command: template.assemble(),
            input,
        }
    }

    /// Invocation whose stdin is closed without a write
    pub fn without_input(template: &Template) -> Self {
        Self::new(template, None)
    }

    pub fn input_len(&self) -> usize {
        self.input.as_ref().map_or(0, Payload::len)
    }
}
