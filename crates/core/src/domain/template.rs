// Command Template
//
// A template is an ordered list of literal segments with one stringified
// value between each adjacent pair. Assembly is plain concatenation: values
// are NOT escaped or quoted, so shell expansion (globs, `$VAR`, `;`) applies
// to them exactly as if they had been typed into the command.

use std::fmt::{self, Display};

use super::error::{DomainError, Result};

/// Placeholder recognized by `Template::from_pattern`
pub const PLACEHOLDER: &str = "{}";

/// Literal segments plus interpolated values (`values.len() == segments.len() - 1`)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    segments: Vec<String>,
    values: Vec<String>,
}

impl Template {
    /// Build from segments and values, stringifying each value with `Display`
    ///
    /// # Errors
    /// - DomainError::TemplateArity unless there is exactly one value fewer than segments
    ///
    /// # Example
    /// ```text
    /// let t = Template::new(["echo ", ""], &[&42])?;
    /// assert_eq!(t.assemble(), "echo 42");
    /// ```
    pub fn new<S: Into<String>>(
        segments: impl IntoIterator<Item = S>,
        values: &[&dyn Display],
    ) -> Result<Self> {
        Self::from_parts(
            segments.into_iter().map(Into::into).collect(),
            values.iter().map(|v| v.to_string()).collect(),
        )
    }

    /// Build from already-stringified parts
    pub fn from_parts(segments: Vec<String>, values: Vec<String>) -> Result<Self> {
        if segments.len() != values.len() + 1 {
            return Err(DomainError::TemplateArity {
                segments: segments.len(),
                expected: segments.len().saturating_sub(1),
                actual: values.len(),
            });
        }

        Ok(Self { segments, values })
    }

    /// A template with no interpolations
    pub fn literal(command: impl Into<String>) -> Self {
        Self {
            segments: vec![command.into()],
            values: Vec::new(),
        }
    }

    /// Split `pattern` at each `{}` and interpolate `values` in order
    ///
    /// # Errors
    /// - DomainError::TemplateArity if the placeholder count differs from `values.len()`
    pub fn from_pattern(pattern: &str, values: &[&dyn Display]) -> Result<Self> {
        Self::new(pattern.split(PLACEHOLDER), values)
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    pub fn values(&self) -> &[String] {
        &self.values
    }

    /// Concatenate segment[0], value[0], segment[1], ... segment[n]
    pub fn assemble(&self) -> String {
        let capacity = self.segments.iter().chain(&self.values).map(String::len).sum();
        let mut command = String::with_capacity(capacity);

        let mut segments = self.segments.iter();
        if let Some(first) = segments.next() {
            command.push_str(first);
        }
        for (value, segment) in self.values.iter().zip(segments) {
            command.push_str(value);
            command.push_str(segment);
        }

        command
    }
}

impl Display for Template {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.assemble())
    }
}

impl From<&str> for Template {
    fn from(command: &str) -> Self {
        Template::literal(command)
    }
}

impl From<String> for Template {
    fn from(command: String) -> Self {
        Template::literal(command)
    }
}

/// Build a `Template` from a `{}` pattern and values
///
/// Values are inserted verbatim, without shell quoting.
///
/// ```text
/// let t = template!("ls {} | wc -l", dir)?;
/// ```
#[macro_export]
macro_rules! template {
    ($pattern:expr $(, $value:expr)* $(,)?) => {
        $crate::domain::Template::from_pattern(
            $pattern,
            &[$(&$value as &dyn ::std::fmt::Display),*],
        )
    };
}
