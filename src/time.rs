//! Time-related traits for async operations.
//!
//! A promise needs exactly two things from a runtime's clock: one-shot
//! sleeping (the timeout watcher's wait) and racing a future against a
//! deadline. Both live here.

use crate::utils::Cancellable;
use std::future::Future;
use std::time::Duration;

/// Trait for async time-related operations.
pub trait AsyncTime {
    /// Sleep for the specified duration.
    ///
    /// This method returns a future that completes after the specified
    /// duration has elapsed.
    fn sleep(d: Duration) -> impl Future + Send;

    /// Apply a timeout to a future.
    ///
    /// Completes with `Ok` holding the future's output if it finishes before
    /// the deadline, or `Err(())` once the deadline elapses. The timeout
    /// watcher of every promise is this race, run against the promise's own
    /// terminal wait.
    #[inline]
    fn timeout<F>(d: Duration, func: F) -> impl Future<Output = Result<F::Output, ()>> + Send
    where
        F: Future + Send,
    {
        Cancellable::new(func, Self::sleep(d))
    }
}

impl<F: std::ops::Deref<Target = T>, T: AsyncTime> AsyncTime for F {
    #[inline(always)]
    fn sleep(d: Duration) -> impl Future + Send {
        T::sleep(d)
    }
}
