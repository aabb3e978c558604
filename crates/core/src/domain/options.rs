// Runner Options & Configuration
//
// `RunnerOptions` is the loose record callers fill in; `RunnerConfig` is the
// validated, immutable form a runner is bound to. Validation happens once,
// in `RunnerConfig::new`.

use serde::{Deserialize, Serialize};

use super::encoding::TextEncoding;
use super::error::{DomainError, Result};

/// Default decoder label
pub const DEFAULT_ENCODING: &str = "utf-8";

/// Options record (all fields optional when deserialized)
///
/// `encoding: None` means "return raw bytes"; it is only valid together
/// with `trim: false`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RunnerOptions {
    /// Do not fail on a non-zero exit code
    pub ignore_exit_code: bool,
    /// Decoder label, or None for raw bytes
    pub encoding: Option<String>,
    /// Trim leading/trailing whitespace from decoded text
    pub trim: bool,
}

impl Default for RunnerOptions {
    fn default() -> Self {
        Self {
            ignore_exit_code: false,
            encoding: Some(DEFAULT_ENCODING.to_string()),
            trim: true,
        }
    }
}

impl RunnerOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Raw-bytes options: no decoding, no trimming
    pub fn raw() -> Self {
        Self {
            encoding: None,
            trim: false,
            ..Self::default()
        }
    }

    /// Parse an options record from JSON (missing keys take defaults)
    ///
    /// # Example
    /// ```text
    /// let opts = RunnerOptions::from_json(r#"{"ignoreExitCode": true}"#)?;
    /// ```
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| DomainError::InvalidOptions(e.to_string()))
    }

    pub fn with_ignore_exit_code(mut self, ignore: bool) -> Self {
        self.ignore_exit_code = ignore;
        self
    }

    pub fn with_encoding(mut self, label: impl Into<String>) -> Self {
        self.encoding = Some(label.into());
        self
    }

    pub fn without_encoding(mut self) -> Self {
        self.encoding = None;
        self
    }

    pub fn with_trim(mut self, trim: bool) -> Self {
        self.trim = trim;
        self
    }
}

/// How stdout is turned into a result
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    /// Return stdout bytes unchanged
    Raw,
    /// Decode stdout, optionally trimming
    Text { encoding: TextEncoding, trim: bool },
}

/// Validated runner configuration (immutable once built)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunnerConfig {
    ignore_exit_code: bool,
    output: OutputMode,
}

impl RunnerConfig {
    /// Validate an options record
    ///
    /// # Errors
    /// - DomainError::TrimWithoutEncoding if `encoding` is None and `trim` is set
    /// - DomainError::UnsupportedEncoding for unknown decoder labels
    pub fn new(options: &RunnerOptions) -> Result<Self> {
        let output = match (&options.encoding, options.trim) {
            (None, true) => return Err(DomainError::TrimWithoutEncoding),
            (None, false) => OutputMode::Raw,
            (Some(label), trim) => OutputMode::Text {
                encoding: TextEncoding::from_label(label)?,
                trim,
            },
        };

        Ok(Self {
            ignore_exit_code: options.ignore_exit_code,
            output,
        })
    }

    pub fn ignore_exit_code(&self) -> bool {
        self.ignore_exit_code
    }

    pub fn output(&self) -> OutputMode {
        self.output
    }
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            ignore_exit_code: false,
            output: OutputMode::Text {
                encoding: TextEncoding::utf8(),
                trim: true,
            },
        }
    }
}

impl TryFrom<RunnerOptions> for RunnerConfig {
    type Error = DomainError;

    fn try_from(options: RunnerOptions) -> Result<Self> {
        Self::new(&options)
    }
}
