//! Retry outcomes and failure history

use std::time::Duration;
use thiserror::Error;

/// One failed attempt, as recorded in the history
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Failure<E> {
    /// The operation itself reported an error
    #[error("attempt rejected: {0:?}")]
    Rejected(E),

    /// The attempt did not settle within the per-attempt timeout
    #[error("attempt timed out after {0:?}")]
    TimedOut(Duration),
}

impl<E> Failure<E> {
    /// The operation's error, if this was not a timeout
    pub fn rejection(&self) -> Option<&E> {
        match self {
            Failure::Rejected(err) => Some(err),
            Failure::TimedOut(_) => None,
        }
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, Failure::TimedOut(_))
    }
}

/// How a retry ended. History is chronological and complete.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RetryOutcome<T, E> {
    Succeeded {
        value: T,
        attempts: u32,
        history: Vec<Failure<E>>,
    },
    /// The retry budget ran out
    Exhausted {
        attempts: u32,
        history: Vec<Failure<E>>,
    },
    Cancelled {
        attempts: u32,
        history: Vec<Failure<E>>,
    },
}

impl<T, E> RetryOutcome<T, E> {
    pub fn is_success(&self) -> bool {
        matches!(self, RetryOutcome::Succeeded { .. })
    }

    /// Attempts started, the first one included
    pub fn attempts(&self) -> u32 {
        match self {
            RetryOutcome::Succeeded { attempts, .. }
            | RetryOutcome::Exhausted { attempts, .. }
            | RetryOutcome::Cancelled { attempts, .. } => *attempts,
        }
    }

    pub fn history(&self) -> &[Failure<E>] {
        match self {
            RetryOutcome::Succeeded { history, .. }
            | RetryOutcome::Exhausted { history, .. }
            | RetryOutcome::Cancelled { history, .. } => history,
        }
    }

    /// Drop the bookkeeping of a success, keep it for failures
    pub fn into_result(self) -> Result<T, RetryError<E>> {
        match self {
            RetryOutcome::Succeeded { value, .. } => Ok(value),
            RetryOutcome::Exhausted { attempts, history } => {
                Err(RetryError::Exhausted { attempts, history })
            }
            RetryOutcome::Cancelled { attempts, history } => {
                Err(RetryError::Cancelled { attempts, history })
            }
        }
    }
}

/// Terminal failure of a retry
#[derive(Debug, Error)]
pub enum RetryError<E> {
    #[error("amount of retry passed: budget exhausted after {attempts} attempts")]
    Exhausted {
        attempts: u32,
        history: Vec<Failure<E>>,
    },

    #[error("retry cancelled after {attempts} attempts")]
    Cancelled {
        attempts: u32,
        history: Vec<Failure<E>>,
    },
}

impl<E> RetryError<E> {
    pub fn history(&self) -> &[Failure<E>] {
        match self {
            RetryError::Exhausted { history, .. } | RetryError::Cancelled { history, .. } => {
                history
            }
        }
    }

    pub fn is_exhausted(&self) -> bool {
        matches!(self, RetryError::Exhausted { .. })
    }
}
