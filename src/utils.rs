//! Utility types and functions for async operations.

use pin_project_lite::pin_project;
use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

pin_project! {
    /// A cancellable future that is aborted when another future completes.
    ///
    /// Races two futures and resolves with whichever finishes first, always
    /// polling the main future before the cancel future so that a completed
    /// result is preferred over a simultaneous cancellation. This is the
    /// race behind [`AsyncTime::timeout`](crate::time::AsyncTime::timeout)
    /// and behind a promise's wait for either of its terminal signals.
    ///
    /// # Type Parameters
    ///
    /// * `F` - The main future that provides the primary result
    /// * `C` - The cancellation future that, when completed, aborts the main future
    pub struct Cancellable<F, C> {
        #[pin]
        future: F,
        #[pin]
        cancel_future: C,
    }
}

impl<F: Future + Send, C: Future + Send> Cancellable<F, C> {
    /// Create a new cancellable future.
    ///
    /// # Parameters
    ///
    /// * `future` - The main future to execute
    /// * `cancel_future` - The future that, when completed, cancels the main future
    pub fn new(future: F, cancel_future: C) -> Self {
        Self { future, cancel_future }
    }
}

impl<F: Future + Send, C: Future + Send> Future for Cancellable<F, C> {
    type Output = Result<F::Output, ()>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let _self = self.project();
        if let Poll::Ready(output) = _self.future.poll(cx) {
            return Poll::Ready(Ok(output));
        }
        if _self.cancel_future.poll(cx).is_ready() {
            return Poll::Ready(Err(()));
        }
        Poll::Pending
    }
}
