//! Operation seam - what a retry attempts
//!
//! Two ways in:
//! - any `FnMut(u32) -> Future<Output = Result<T, E>>` closure
//! - the continuation style: a factory handed a [`Settle`] that it resolves
//!   or rejects, synchronously or from another task
//!
//! `Settle` is consumed by `resolve`/`reject`, so an attempt settles at most
//! once by construction.

use async_trait::async_trait;
use std::future::Future;
use std::marker::PhantomData;
use thiserror::Error;
use tokio::sync::oneshot;

/// A retryable unit of work.
///
/// `attempt` receives the 1-based attempt number.
#[async_trait]
pub trait Operation: Send {
    type Output: Send;
    type Error: Send;

    async fn attempt(&mut self, attempt: u32) -> Result<Self::Output, Self::Error>;
}

#[async_trait]
impl<F, Fut, T, E> Operation for F
where
    F: FnMut(u32) -> Fut + Send,
    Fut: Future<Output = Result<T, E>> + Send + 'static,
    T: Send + 'static,
    E: Send + 'static,
{
    type Output = T;
    type Error = E;

    async fn attempt(&mut self, attempt: u32) -> Result<T, E> {
        (self)(attempt).await
    }
}

/// Why a continuation-style attempt failed
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ContinuationError<E> {
    #[error("attempt rejected: {0:?}")]
    Rejected(E),

    #[error("attempt dropped its continuations without settling")]
    Dropped,
}

/// Success/failure continuations for one attempt
#[derive(Debug)]
pub struct Settle<T, E> {
    tx: oneshot::Sender<Result<T, E>>,
}

impl<T, E> Settle<T, E> {
    pub fn resolve(self, value: T) {
        let _ = self.tx.send(Ok(value)); // Retry gone (cancelled): nothing to tell
    }

    pub fn reject(self, err: E) {
        let _ = self.tx.send(Err(err));
    }
}

/// Operation built from a continuation-style factory
pub struct Continuations<F, T, E> {
    factory: F,
    _settles: PhantomData<fn() -> (T, E)>,
}

/// Adapt a factory that settles through a [`Settle`] handle.
///
/// ```
/// use resilience::operation::{from_continuations, Settle};
///
/// let op = from_continuations(|settle: Settle<u32, String>| {
///     tokio::spawn(async move { settle.resolve(42) });
/// });
/// # let _ = op;
/// ```
pub fn from_continuations<F, T, E>(factory: F) -> Continuations<F, T, E>
where
    F: FnMut(Settle<T, E>) + Send,
{
    Continuations {
        factory,
        _settles: PhantomData,
    }
}

#[async_trait]
impl<F, T, E> Operation for Continuations<F, T, E>
where
    F: FnMut(Settle<T, E>) + Send,
    T: Send + 'static,
    E: Send + 'static,
{
    type Output = T;
    type Error = ContinuationError<E>;

    async fn attempt(&mut self, _attempt: u32) -> Result<T, ContinuationError<E>> {
        let (tx, rx) = oneshot::channel();
        (self.factory)(Settle { tx });

        match rx.await {
            Ok(Ok(value)) => Ok(value),
            Ok(Err(err)) => Err(ContinuationError::Rejected(err)),
            Err(_) => Err(ContinuationError::Dropped),
        }
    }
}
