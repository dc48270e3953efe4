//! Retry combinator
//!
//! Attempt → (wait) → attempt, one attempt in flight at a time, until the
//! operation succeeds, the budget runs out, or the cancel token fires.
//!
//! The wait is a timer inside a loop, so a long unbounded run keeps a flat
//! stack. History and the attempt counter belong to the single run; nothing
//! here needs a lock.

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::{JoinError, JoinHandle};
use uuid::Uuid;

use crate::cancel::CancelToken;
use crate::events::{EventBus, RetryEvent, RetryState};
use crate::operation::Operation;
use crate::outcome::{Failure, RetryOutcome};
use crate::policy::RetryPolicy;

/// Outcome type of retrying `O`
pub type OutcomeOf<O> = RetryOutcome<<O as Operation>::Output, <O as Operation>::Error>;

/// One retry run: an operation, its policy, and how to stop it
pub struct Retry<O: Operation> {
    run_id: Uuid,
    operation: O,
    policy: RetryPolicy,
    cancel: CancelToken,
    events: Option<Arc<EventBus>>,
    state: watch::Sender<RetryState>,
}

impl<O: Operation> Retry<O> {
    pub fn new(operation: O, policy: RetryPolicy) -> Self {
        let (state, _) = watch::channel(RetryState::Idle);
        Self {
            run_id: Uuid::now_v7(),
            operation,
            policy,
            cancel: CancelToken::new(),
            events: None,
            state,
        }
    }

    /// Use an externally owned cancel token
    #[must_use]
    pub fn with_cancel(mut self, cancel: CancelToken) -> Self {
        self.cancel = cancel;
        self
    }

    /// Publish every state transition on `bus`
    #[must_use]
    pub fn with_events(mut self, bus: Arc<EventBus>) -> Self {
        self.events = Some(bus);
        self
    }

    pub fn run_id(&self) -> Uuid {
        self.run_id
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    /// Token that cancels this run
    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    /// Follow the current state of this run
    pub fn watch_state(&self) -> watch::Receiver<RetryState> {
        self.state.subscribe()
    }

    /// Drive the run to completion on the current task
    pub async fn run(mut self) -> OutcomeOf<O> {
        let interval = self.policy.interval();
        let mut history = Vec::new();
        let mut attempts: u32 = 0;

        loop {
            if self.cancel.is_cancelled() {
                return self.cancelled(attempts, history);
            }

            attempts = attempts.saturating_add(1);
            self.transition(attempts, RetryState::Attempting);
            tracing::debug!("[Retry {}] Attempt {}", self.run_id, attempts);

            let cancel = self.cancel.clone();
            let timeout = self.policy.attempt_timeout();
            let result = tokio::select! {
                biased;
                () = cancel.cancelled() => return self.cancelled(attempts, history),
                result = attempt(&mut self.operation, attempts, timeout) => result,
            };

            let failure = match result {
                Ok(value) => {
                    self.transition(attempts, RetryState::Succeeded);
                    tracing::debug!(
                        "[Retry {}] Succeeded after {} attempts",
                        self.run_id,
                        attempts
                    );
                    return RetryOutcome::Succeeded {
                        value,
                        attempts,
                        history,
                    };
                }
                Err(failure) => failure,
            };

            if failure.is_timeout() {
                tracing::debug!("[Retry {}] Attempt {} timed out", self.run_id, attempts);
            }
            history.push(failure);

            if self.policy.is_exhausted(attempts) {
                self.transition(attempts, RetryState::Exhausted);
                tracing::warn!(
                    "[Retry {}] Amount of retry passed ({}), giving up",
                    self.run_id,
                    attempts
                );
                return RetryOutcome::Exhausted { attempts, history };
            }

            self.transition(attempts, RetryState::Scheduled { delay: interval });
            tracing::debug!(
                "[Retry {}] Attempt {} failed, retrying in {:?}",
                self.run_id,
                attempts,
                interval
            );

            tokio::select! {
                biased;
                () = cancel.cancelled() => return self.cancelled(attempts, history),
                () = tokio::time::sleep(interval) => {}
            }
        }
    }

    /// Run on its own tokio task
    pub fn spawn(self) -> RetryHandle<O::Output, O::Error>
    where
        O: 'static,
        O::Output: 'static,
        O::Error: 'static,
    {
        let run_id = self.run_id;
        let cancel = self.cancel.clone();
        let state = self.watch_state();
        let task = tokio::spawn(self.run());

        RetryHandle::from_parts(run_id, cancel, state, task)
    }

    fn cancelled(&self, attempts: u32, history: Vec<Failure<O::Error>>) -> OutcomeOf<O> {
        self.transition(attempts, RetryState::Cancelled);
        tracing::info!(
            "[Retry {}] Cancelled after {} attempts",
            self.run_id,
            attempts
        );
        RetryOutcome::Cancelled { attempts, history }
    }

    fn transition(&self, attempt: u32, state: RetryState) {
        self.state.send_replace(state.clone());
        if let Some(bus) = &self.events {
            bus.publish(RetryEvent {
                run_id: self.run_id,
                attempt,
                state,
            });
        }
    }
}

/// One attempt, with the optional deadline turned into a synthetic failure
async fn attempt<O: Operation>(
    operation: &mut O,
    number: u32,
    timeout: Option<Duration>,
) -> Result<O::Output, Failure<O::Error>> {
    match timeout {
        Some(limit) => match tokio::time::timeout(limit, operation.attempt(number)).await {
            Ok(result) => result.map_err(Failure::Rejected),
            Err(_) => Err(Failure::TimedOut(limit)),
        },
        None => operation.attempt(number).await.map_err(Failure::Rejected),
    }
}

/// Retry `operation` under `policy` until it succeeds or the budget runs out
pub async fn retry<O: Operation>(operation: O, policy: RetryPolicy) -> OutcomeOf<O> {
    Retry::new(operation, policy).run().await
}

/// Handle to a spawned retry
#[derive(Debug)]
pub struct RetryHandle<T, E> {
    run_id: Uuid,
    cancel: CancelToken,
    state: watch::Receiver<RetryState>,
    task: JoinHandle<RetryOutcome<T, E>>,
}

impl<T, E> RetryHandle<T, E> {
    pub(crate) fn from_parts(
        run_id: Uuid,
        cancel: CancelToken,
        state: watch::Receiver<RetryState>,
        task: JoinHandle<RetryOutcome<T, E>>,
    ) -> Self {
        Self {
            run_id,
            cancel,
            state,
            task,
        }
    }

    pub fn run_id(&self) -> Uuid {
        self.run_id
    }

    /// Stop scheduling attempts; the run resolves as `Cancelled`
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    /// Latest state of the run
    pub fn state(&self) -> RetryState {
        self.state.borrow().clone()
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    /// Wait for the outcome. Errors only if the task panicked or was aborted.
    pub async fn join(self) -> Result<RetryOutcome<T, E>, JoinError> {
        self.task.await
    }
}
