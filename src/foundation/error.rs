use std::fmt;
use std::path::PathBuf;

/// Convenience result type used across olive.
pub type OliveResult<T> = Result<T, OliveError>;

/// Top-level error taxonomy for the generation pipeline.
#[derive(thiserror::Error, Debug)]
pub enum OliveError {
    /// One or more option fields failed validation.
    #[error("validation error:\n{0}")]
    Validation(ValidationErrors),

    /// A color string is neither a known name nor a hex code.
    #[error("invalid color: {0}")]
    InvalidColor(String),

    /// The requested font family or font file cannot be used.
    #[error("font error: {0}")]
    FontResolution(String),

    /// Errors while drawing the pixel surface.
    #[error("render error: {0}")]
    Render(String),

    /// Errors while serializing the pixel surface.
    #[error("encode error: {0}")]
    Encode(String),

    /// One or more output files could not be written.
    #[error("write error: {0}")]
    Write(WriteFailures),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl OliveError {
    /// Build an [`OliveError::InvalidColor`] value.
    pub fn invalid_color(msg: impl Into<String>) -> Self {
        Self::InvalidColor(msg.into())
    }

    /// Build an [`OliveError::FontResolution`] value.
    pub fn font(msg: impl Into<String>) -> Self {
        Self::FontResolution(msg.into())
    }

    /// Build an [`OliveError::Render`] value.
    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }

    /// Build an [`OliveError::Encode`] value.
    pub fn encode(msg: impl Into<String>) -> Self {
        Self::Encode(msg.into())
    }
}

/// A single rejected option field.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FieldViolation {
    /// Option name, as spelled on the command line (without leading dashes).
    pub field: String,
    /// Human readable reason.
    pub message: String,
}

/// Every violation found while validating one option bag.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ValidationErrors {
    violations: Vec<FieldViolation>,
}

impl ValidationErrors {
    /// Record a violation for `field`.
    pub fn push(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.violations.push(FieldViolation {
            field: field.into(),
            message: message.into(),
        });
    }

    /// `true` when nothing has been recorded.
    pub fn is_empty(&self) -> bool {
        self.violations.is_empty()
    }

    /// Recorded violations in the order they were found.
    pub fn violations(&self) -> &[FieldViolation] {
        &self.violations
    }

    /// `true` if any violation was recorded for `field`.
    pub fn has_field(&self, field: &str) -> bool {
        self.violations.iter().any(|v| v.field == field)
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, v) in self.violations.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{}: {}", v.field, v.message)?;
        }
        Ok(())
    }
}

/// A write task that did not produce its file.
#[derive(Debug)]
pub struct FailedWrite {
    /// Target path of the task.
    pub path: PathBuf,
    /// Underlying IO error.
    pub source: std::io::Error,
}

/// Outcome of a write batch in which at least one task failed.
#[derive(Debug)]
pub struct WriteFailures {
    /// Number of files that were written successfully and left in place.
    pub written: usize,
    /// Failed tasks, ordered by task index.
    pub failed: Vec<FailedWrite>,
}

impl fmt::Display for WriteFailures {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} of {} file(s) failed ({} written)",
            self.failed.len(),
            self.failed.len() + self.written,
            self.written
        )?;
        for failure in &self.failed {
            write!(f, "\n  {}: {}", failure.path.display(), failure.source)?;
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
