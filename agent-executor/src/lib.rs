//! Notebook-style code execution for agents.
//!
//! Code blocks extracted from agent messages run one after another against a
//! single persistent [`InteractiveSession`]. Output, errors, and display
//! values are folded into one [`CodeResult`]; the first failing block stops
//! the batch.

#![warn(missing_docs, clippy::pedantic)]

pub mod batch;
pub mod block;
pub mod executor;
pub mod extractor;
pub mod python;
pub mod session;

pub use batch::{BatchError, BatchEvent, BatchProgress, BatchResult, BatchState};
pub use block::{CodeBlock, CodeResult};
pub use executor::{CodeExecutor, ExecutorError, ExecutorResult, NotebookExecutor};
pub use extractor::{CodeExtractor, MarkdownCodeExtractor, UNKNOWN_LANGUAGE};
pub use python::{PythonSession, PythonSessionConfig};
pub use session::{ExecutionFault, FragmentOutcome, InteractiveSession, SessionError, SessionResult};
