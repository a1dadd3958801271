//! One-shot broadcast events.
//!
//! Two of these back every promise: the completion signal (fired by the
//! handler executor when its write wins) and the cancellation token (shared
//! by every promise of a chain, fired by `cancel()` or a timeout watcher).

use slab::Slab;
use std::future::Future;
use std::mem;
use std::pin::Pin;
use std::sync::Mutex;
use std::task::{Context, Poll, Waker};

use crate::error::CancelKind;

/// Completion signal: per-promise, carries no payload.
pub(crate) type DoneSignal = Event<()>;

/// Cancellation token: shared across a chain, records which trigger won.
pub(crate) type CancelToken = Event<CancelKind>;

/// A one-shot broadcast event carrying a small copyable value.
///
/// Firing is idempotent and first-wins: the value recorded by the first
/// `fire()` is the one every observer sees, no matter how many triggers
/// race. All current waiters are woken on fire; waiters subscribing after
/// the fact resolve immediately.
pub(crate) struct Event<T: Copy> {
    inner: Mutex<EventInner<T>>,
}

struct EventInner<T: Copy> {
    fired: Option<T>,
    wakers: Slab<Waker>,
}

impl<T: Copy> Event<T> {
    pub(crate) fn new() -> Self {
        Self { inner: Mutex::new(EventInner { fired: None, wakers: Slab::new() }) }
    }

    /// Fire the event. Only the first call records a value; the rest are
    /// no-ops. Wakers are drained before waking so a woken task re-polling
    /// immediately sees the fired state without re-registering.
    pub(crate) fn fire(&self, value: T) {
        let wakers = {
            let mut inner = self.inner.lock().unwrap();
            if inner.fired.is_some() {
                return;
            }
            inner.fired = Some(value);
            mem::take(&mut inner.wakers)
        };
        for (_, waker) in wakers {
            waker.wake();
        }
    }

    pub(crate) fn is_fired(&self) -> bool {
        self.inner.lock().unwrap().fired.is_some()
    }

    /// Suspend until the event fires, yielding the recorded value.
    pub(crate) fn wait(&self) -> EventWait<'_, T> {
        EventWait { event: self, key: None }
    }
}

/// Future returned by [`Event::wait`].
pub(crate) struct EventWait<'a, T: Copy> {
    event: &'a Event<T>,
    key: Option<usize>,
}

impl<T: Copy> Future for EventWait<'_, T> {
    type Output = T;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<T> {
        let _self = self.get_mut();
        let mut inner = _self.event.inner.lock().unwrap();
        if let Some(value) = inner.fired {
            return Poll::Ready(value);
        }
        match _self.key {
            // Keep one registration per waiter, refreshed on re-poll
            Some(key) => inner.wakers[key] = cx.waker().clone(),
            None => _self.key = Some(inner.wakers.insert(cx.waker().clone())),
        }
        Poll::Pending
    }
}

impl<T: Copy> Drop for EventWait<'_, T> {
    fn drop(&mut self) {
        if let Some(key) = self.key {
            // Registry is drained on fire, so the slot may already be gone
            let mut inner = self.event.inner.lock().unwrap();
            let _ = inner.wakers.try_remove(key);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures_lite::future::block_on;
    use std::sync::Arc;
    use std::thread;
    use std::time::Duration;

    #[test]
    fn test_fire_is_first_wins() {
        let event: Event<u32> = Event::new();
        assert!(!event.is_fired());
        event.fire(1);
        event.fire(2);
        assert!(event.is_fired());
        assert_eq!(block_on(event.wait()), 1);
    }

    #[test]
    fn test_late_waiter_resolves_immediately() {
        let event: DoneSignal = Event::new();
        event.fire(());
        block_on(event.wait());
        // and again, waiting never consumes the event
        block_on(event.wait());
    }

    #[test]
    fn test_wait_across_threads() {
        let event: Arc<Event<u8>> = Arc::new(Event::new());
        let mut joins = Vec::new();
        for _ in 0..4 {
            let event = event.clone();
            joins.push(thread::spawn(move || block_on(event.wait())));
        }
        thread::sleep(Duration::from_millis(50));
        event.fire(7);
        for join in joins {
            assert_eq!(join.join().unwrap(), 7);
        }
    }

    #[test]
    fn test_dropped_waiter_unregisters() {
        let event: Event<u8> = Event::new();
        {
            // poll once to register, then drop before firing
            let mut wait = event.wait();
            block_on(std::future::poll_fn(|cx| {
                assert!(Pin::new(&mut wait).poll(cx).is_pending());
                Poll::Ready(())
            }));
        }
        assert_eq!(event.inner.lock().unwrap().wakers.len(), 0);
        event.fire(1);
    }

    #[test]
    fn test_concurrent_fire_single_value() {
        let event: Arc<Event<u8>> = Arc::new(Event::new());
        let mut joins = Vec::new();
        for i in 0..8u8 {
            let event = event.clone();
            joins.push(thread::spawn(move || event.fire(i)));
        }
        for join in joins {
            join.join().unwrap();
        }
        let first = block_on(event.wait());
        assert_eq!(block_on(event.wait()), first);
    }
}
