use thiserror::Error;

/// Source location information for error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SourceLocation {
    /// Line number (1-indexed)
    pub line: usize,
    /// Column number (1-indexed)
    pub column: usize,
}

impl SourceLocation {
    /// Create a new source location
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

impl Default for SourceLocation {
    fn default() -> Self {
        Self::new(1, 1)
    }
}

impl std::fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// Errors surfaced by the pipeline and configuration layers.
///
/// Rendering itself never fails; see the `mdvtree-render` crate.
#[derive(Debug, Error)]
pub enum MdvtreeError {
    /// markdown-rs parser error surfaced through the pipeline.
    #[error("Parse error at {location}: {message}")]
    Parse {
        /// Error message
        message: String,
        /// Source location
        location: SourceLocation,
    },
    /// Invalid options or registry configuration.
    #[error("Config error: {0}")]
    Config(String),
    /// Internal logic error (unexpected state).
    #[error("Internal error: {0}")]
    Internal(String),
}

impl MdvtreeError {
    /// Create a parse error with location
    pub fn parse_error(message: impl Into<String>, line: usize, column: usize) -> Self {
        Self::Parse {
            message: message.into(),
            location: SourceLocation::new(line, column),
        }
    }
}

impl From<serde_json::Error> for MdvtreeError {
    fn from(err: serde_json::Error) -> Self {
        Self::Config(err.to_string())
    }
}
