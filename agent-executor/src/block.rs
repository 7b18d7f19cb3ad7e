//! Code blocks submitted for execution and the aggregate batch result.

use serde::{Deserialize, Serialize};

/// One fenced code fragment with its language tag.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodeBlock {
    /// Lowercased language tag, or [`crate::UNKNOWN_LANGUAGE`].
    pub language: String,
    /// Source text of the fragment.
    pub code: String,
}

impl CodeBlock {
    /// Creates a block from a language tag and source text.
    #[must_use]
    pub fn new(language: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            language: language.into(),
            code: code.into(),
        }
    }
}

/// Outcome of a batch: exit code of the last processed block and the combined log.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodeResult {
    /// `0` when every processed block succeeded, `1` otherwise.
    pub exit_code: i32,
    /// Captured stdout, stderr, display values, and fault text, in order.
    pub output: String,
}

impl CodeResult {
    /// Creates a result.
    #[must_use]
    pub fn new(exit_code: i32, output: impl Into<String>) -> Self {
        Self {
            exit_code,
            output: output.into(),
        }
    }

    /// Returns `true` when the exit code is zero.
    #[must_use]
    pub const fn succeeded(&self) -> bool {
        self.exit_code == 0
    }
}
