//! Retry combinator for async operations
//!
//! Keep attempting an operation until it succeeds, the retry budget is
//! spent, or someone cancels it. Every failure is kept, in order.
//!
//! # Architecture
//!
//! 1. **One attempt in flight**: attempt → wait → attempt, never overlapping
//! 2. **Timers, not recursion**: the wait is a scheduled sleep inside a loop
//! 3. **Always stoppable**: a cancel token is threaded through every run, and
//!    a per-attempt timeout turns a hung attempt into a recorded failure
//! 4. **Outcomes, not panics**: success, exhaustion and cancellation all come
//!    back as a [`RetryOutcome`]
//!
//! ```text
//! Idle → Attempting ─ok─→ Succeeded
//!            │ err
//!            ├─ budget left ─→ Scheduled ─(interval)─→ Attempting
//!            └─ budget spent ─→ Exhausted
//! any non-terminal state ─cancel─→ Cancelled
//! ```
//!
//! Leaving `max_attempts` unset retries forever. Pair such runs with a
//! [`CancelToken`] or a [`RetryRegistry`] you cancel at shutdown.

pub mod cancel;
pub mod events;
pub mod operation;
pub mod outcome;
pub mod policy;
pub mod registry;
pub mod retry;

pub use cancel::CancelToken;
pub use events::{EventBus, RetryEvent, RetryState};
pub use operation::{from_continuations, ContinuationError, Operation, Settle};
pub use outcome::{Failure, RetryError, RetryOutcome};
pub use policy::RetryPolicy;
pub use registry::RetryRegistry;
pub use retry::{retry, Retry, RetryHandle};
