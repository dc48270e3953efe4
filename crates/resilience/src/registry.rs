//! Retry registry - tracks spawned retries so a host can stop them
//!
//! An unbounded retry only ends when someone cancels it. The registry keeps
//! one cancel token per running retry; entries remove themselves when the
//! run finishes, so `cancel_all` at shutdown reaches exactly what is live.

use dashmap::DashMap;
use std::sync::Arc;
use uuid::Uuid;

use crate::cancel::CancelToken;
use crate::operation::Operation;
use crate::retry::{Retry, RetryHandle};

#[derive(Debug, Default)]
pub struct RetryRegistry {
    /// Running retries
    /// Key: run id, Value: that run's cancel token
    active: Arc<DashMap<Uuid, CancelToken>>,
}

impl RetryRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Spawn `retry` and track it until it finishes
    pub fn spawn<O>(&self, retry: Retry<O>) -> RetryHandle<O::Output, O::Error>
    where
        O: Operation + 'static,
        O::Output: 'static,
        O::Error: 'static,
    {
        let run_id = retry.run_id();
        self.active.insert(run_id, retry.cancel_token());
        tracing::debug!("[RetryRegistry] Tracking retry {}", run_id);

        let cancel = retry.cancel_token();
        let state = retry.watch_state();
        let untrack = Untrack {
            active: self.active.clone(),
            run_id,
        };
        let task = tokio::spawn(async move {
            let _untrack = untrack;
            retry.run().await
        });

        RetryHandle::from_parts(run_id, cancel, state, task)
    }

    /// Cancel one running retry. Returns false if it is not (or no longer) tracked.
    pub fn cancel(&self, run_id: &Uuid) -> bool {
        match self.active.get(run_id) {
            Some(token) => {
                token.cancel();
                true
            }
            None => false,
        }
    }

    /// Cancel every running retry, e.g. at shutdown
    pub fn cancel_all(&self) -> usize {
        let mut count = 0;
        for entry in self.active.iter() {
            entry.value().cancel();
            count += 1;
        }
        tracing::info!("[RetryRegistry] Cancelled {} running retries", count);
        count
    }

    pub fn is_tracked(&self, run_id: &Uuid) -> bool {
        self.active.contains_key(run_id)
    }

    pub fn len(&self) -> usize {
        self.active.len()
    }

    pub fn is_empty(&self) -> bool {
        self.active.is_empty()
    }
}

/// Removes a run from the registry when its task ends, aborted or not
struct Untrack {
    active: Arc<DashMap<Uuid, CancelToken>>,
    run_id: Uuid,
}

impl Drop for Untrack {
    fn drop(&mut self) {
        self.active.remove(&self.run_id);
        tracing::debug!("[RetryRegistry] Retry {} finished", self.run_id);
    }
}
