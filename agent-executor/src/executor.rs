//! Notebook executor: fail-fast batches over one persistent session.

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::{debug, warn};

use crate::batch::{BatchEvent, BatchProgress, BatchState};
use crate::block::{CodeBlock, CodeResult};
use crate::extractor::{CodeExtractor, MarkdownCodeExtractor};
use crate::session::{InteractiveSession, SessionError};

/// Errors surfaced by executor maintenance operations.
///
/// Code execution itself never fails; faults are folded into [`CodeResult`].
#[derive(Debug, Error)]
pub enum ExecutorError {
    /// The underlying session could not be restarted.
    #[error(transparent)]
    Session(#[from] SessionError),
}

/// Result alias for executor operations.
pub type ExecutorResult<T> = Result<T, ExecutorError>;

/// Runs extracted code blocks and reports a single aggregate result.
#[async_trait]
pub trait CodeExecutor: Send + Sync {
    /// Extractor used to pull code blocks out of agent messages.
    fn code_extractor(&self) -> &dyn CodeExtractor;

    /// Runs the blocks in order, stopping after the first failure.
    async fn execute_code_blocks(&self, code_blocks: &[CodeBlock]) -> CodeResult;

    /// Resets execution state.
    async fn restart(&self) -> ExecutorResult<()>;
}

/// Executes blocks against one interactive session, notebook style.
///
/// Variables and imports defined by one block are visible to later blocks,
/// including blocks of later batches. Concurrent callers are serialised so
/// that batches never interleave on the session.
#[derive(Debug)]
pub struct NotebookExecutor<S> {
    session: Mutex<S>,
    extractor: MarkdownCodeExtractor,
}

impl<S> NotebookExecutor<S>
where
    S: InteractiveSession,
{
    /// Wraps a live session.
    #[must_use]
    pub fn new(session: S) -> Self {
        Self {
            session: Mutex::new(session),
            extractor: MarkdownCodeExtractor::new(),
        }
    }

    /// Extracts fenced blocks from `text` and executes them.
    pub async fn execute_markdown(&self, text: &str) -> CodeResult {
        let blocks = self.extractor.extract(text);
        self.run_batch(&blocks).await
    }

    /// Returns the wrapped session.
    #[must_use]
    pub fn into_session(self) -> S {
        self.session.into_inner()
    }

    async fn run_batch(&self, code_blocks: &[CodeBlock]) -> CodeResult {
        let mut session = self.session.lock().await;
        let mut progress = BatchProgress::new(code_blocks.len());
        let mut log = String::new();
        let mut exit_code = 0;

        let mut state = match progress.transition(BatchEvent::Start) {
            Ok(state) => state,
            Err(err) => return CodeResult::new(1, err.to_string()),
        };

        while let BatchState::Running { index } = state {
            let block = &code_blocks[index];
            match session.submit(&block.code).await {
                Ok(outcome) => {
                    outcome.append_to(&mut log);
                    exit_code = outcome.exit_code();
                    if let Some(fault) = &outcome.fault {
                        warn!(index, language = %block.language, fault = fault.message(), "code block failed");
                    }
                }
                Err(err) => {
                    warn!(index, error = %err, "session failed while running code block");
                    log.push('\n');
                    log.push_str(&err.to_string());
                    exit_code = 1;
                }
            }

            let event = if exit_code == 0 {
                BatchEvent::FragmentSucceeded
            } else {
                BatchEvent::FragmentFailed
            };
            state = match progress.transition(event) {
                Ok(next) => next,
                Err(err) => {
                    warn!(error = %err, "batch aborted");
                    exit_code = 1;
                    break;
                }
            };
        }

        debug!(
            blocks = code_blocks.len(),
            exit_code,
            final_state = ?progress.state(),
            "batch finished"
        );
        CodeResult::new(exit_code, log)
    }
}

#[async_trait]
impl<S> CodeExecutor for NotebookExecutor<S>
where
    S: InteractiveSession + 'static,
{
    fn code_extractor(&self) -> &dyn CodeExtractor {
        &self.extractor
    }

    async fn execute_code_blocks(&self, code_blocks: &[CodeBlock]) -> CodeResult {
        self.run_batch(code_blocks).await
    }

    async fn restart(&self) -> ExecutorResult<()> {
        self.session.lock().await.restart().await?;
        Ok(())
    }
}
