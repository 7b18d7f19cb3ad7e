//! Fail-fast state machine for one batch of code blocks.

use thiserror::Error;
use tracing::debug;

/// States a batch can occupy while its blocks run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatchState {
    /// Batch constructed, nothing submitted yet.
    Idle,
    /// The block at `index` is the next one to run.
    Running {
        /// Zero-based position of the block.
        index: usize,
    },
    /// Every block ran successfully.
    Completed,
    /// The block at `index` failed; later blocks never run.
    Stopped {
        /// Zero-based position of the failed block.
        index: usize,
    },
}

impl BatchState {
    /// Returns `true` once no further blocks will run.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Stopped { .. })
    }
}

/// Events that drive the batch forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatchEvent {
    /// Begin running the batch.
    Start,
    /// The current block finished without a fault.
    FragmentSucceeded,
    /// The current block reported a fault or the session failed.
    FragmentFailed,
}

/// Tracks progress through a batch of `total` blocks.
#[derive(Debug, Clone, Copy)]
pub struct BatchProgress {
    total: usize,
    state: BatchState,
}

impl BatchProgress {
    /// Creates a tracker for a batch of `total` blocks.
    #[must_use]
    pub const fn new(total: usize) -> Self {
        Self {
            total,
            state: BatchState::Idle,
        }
    }

    /// Returns the number of blocks in the batch.
    #[must_use]
    pub const fn total(&self) -> usize {
        self.total
    }

    /// Returns the current state.
    #[must_use]
    pub const fn state(&self) -> BatchState {
        self.state
    }

    /// Applies an event, returning the resulting state.
    ///
    /// # Errors
    ///
    /// Returns [`BatchError::InvalidTransition`] when the event is not allowed
    /// from the current state.
    pub fn transition(&mut self, event: BatchEvent) -> BatchResult<BatchState> {
        let next = match (self.state, event) {
            (BatchState::Idle, BatchEvent::Start) if self.total == 0 => Some(BatchState::Completed),
            (BatchState::Idle, BatchEvent::Start) => Some(BatchState::Running { index: 0 }),
            (BatchState::Running { index }, BatchEvent::FragmentSucceeded) => {
                if index + 1 < self.total {
                    Some(BatchState::Running { index: index + 1 })
                } else {
                    Some(BatchState::Completed)
                }
            }
            (BatchState::Running { index }, BatchEvent::FragmentFailed) => {
                Some(BatchState::Stopped { index })
            }
            _ => None,
        };

        let Some(next_state) = next else {
            return Err(BatchError::InvalidTransition {
                from: self.state,
                event,
            });
        };

        debug!(?self.state, ?next_state, ?event, total = self.total, "batch transition");
        self.state = next_state;
        Ok(next_state)
    }
}

/// Errors emitted by the batch tracker.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum BatchError {
    /// Transition was not permitted from the current state.
    #[error("invalid batch transition from {from:?} via {event:?}")]
    InvalidTransition {
        /// State prior to the attempted transition.
        from: BatchState,
        /// Event that triggered the failure.
        event: BatchEvent,
    },
}

/// Result alias used for batch transitions.
pub type BatchResult<T> = Result<T, BatchError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn runs_every_block_then_completes() {
        let mut progress = BatchProgress::new(2);
        assert_eq!(progress.state(), BatchState::Idle);
        assert_eq!(
            progress.transition(BatchEvent::Start).unwrap(),
            BatchState::Running { index: 0 }
        );
        assert_eq!(
            progress.transition(BatchEvent::FragmentSucceeded).unwrap(),
            BatchState::Running { index: 1 }
        );
        assert_eq!(
            progress.transition(BatchEvent::FragmentSucceeded).unwrap(),
            BatchState::Completed
        );
        assert!(progress.state().is_terminal());
    }

    #[test]
    fn failure_stops_the_batch() {
        let mut progress = BatchProgress::new(4);
        progress.transition(BatchEvent::Start).unwrap();
        progress.transition(BatchEvent::FragmentSucceeded).unwrap();
        let state = progress.transition(BatchEvent::FragmentFailed).unwrap();
        assert_eq!(state, BatchState::Stopped { index: 1 });

        let err = progress
            .transition(BatchEvent::FragmentSucceeded)
            .expect_err("stopped batch cannot resume");
        assert_eq!(
            err,
            BatchError::InvalidTransition {
                from: BatchState::Stopped { index: 1 },
                event: BatchEvent::FragmentSucceeded,
            }
        );
    }

    #[test]
    fn empty_batch_completes_immediately() {
        let mut progress = BatchProgress::new(0);
        assert_eq!(
            progress.transition(BatchEvent::Start).unwrap(),
            BatchState::Completed
        );
    }

    #[test]
    fn invalid_transitions_error() {
        let mut progress = BatchProgress::new(1);
        assert!(progress.transition(BatchEvent::FragmentSucceeded).is_err());
        progress.transition(BatchEvent::Start).unwrap();
        assert!(progress.transition(BatchEvent::Start).is_err());
    }
}
