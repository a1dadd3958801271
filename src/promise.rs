//! The promise state machine: spawn a computation with an optional deadline,
//! observe or await its outcome, cancel it, chain follow-ups onto it.
//!
//! Every promise runs two detached tasks on the adapted runtime: the handler
//! executor (awaits the user computation, then tries to commit its outcome)
//! and, when a deadline is configured, a timeout watcher. Whichever of
//! {handler outcome, user cancel, timeout} commits first under the result
//! slot's lock decides the terminal state; the losers observe that and
//! discard their own write. Cancellation is advisory: a computation already
//! in flight keeps running in the background and its late outcome is
//! discarded.

use std::fmt;
use std::future::Future;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::error::{BoxError, CancelKind, PromiseError};
use crate::runtime::AsyncExec;
use crate::signal::{CancelToken, DoneSignal};
use crate::time::AsyncTime;
use crate::utils::Cancellable;

/// Terminal outcome of a promise, shared verbatim with every observer.
pub type Outcome<T> = Result<T, PromiseError>;

/// Observable lifecycle of a promise.
///
/// Monotone: `Running` transitions into exactly one of `Done` or
/// `Cancelled` and never leaves it. `Cancelled` takes priority in state
/// reporting: a promise whose completion committed first stays `Done`, but
/// one that was cancelled reports `Cancelled` even while its handler is
/// still running in the background.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    Running,
    Done,
    Cancelled,
}

/// A handle to an asynchronous computation's eventual value or failure.
///
/// Cloning is cheap and shares the same underlying promise; any number of
/// tasks may hold handles and await [`result`](Promise::result)
/// concurrently, and all of them observe the identical outcome.
pub struct Promise<T> {
    shared: Arc<Shared<T>>,
}

impl<T> Clone for Promise<T> {
    fn clone(&self) -> Self {
        Self { shared: self.shared.clone() }
    }
}

impl<T> fmt::Debug for Promise<T> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Promise({:?})", self.shared.state())
    }
}

struct Shared<T> {
    /// Result slot: written exactly once, under the lock, before either
    /// signal broadcasts.
    slot: Mutex<Option<Outcome<T>>>,
    /// Completion signal: fired only when the handler's write wins.
    done: DoneSignal,
    /// Cancellation token: shared by every promise chained off this one.
    cancel: Arc<CancelToken>,
}

impl<T> Shared<T> {
    fn new(cancel: Arc<CancelToken>) -> Arc<Self> {
        Arc::new(Self { slot: Mutex::new(None), done: DoneSignal::new(), cancel })
    }

    /// Handler path of the terminal-write arbitration. Commits `out` and
    /// fires the completion signal unless a cancel path decided first.
    fn settle(&self, out: Outcome<T>) {
        {
            let mut slot = self.slot.lock().unwrap();
            if slot.is_some() || self.cancel.is_fired() {
                return;
            }
            *slot = Some(out);
        }
        self.done.fire(());
    }

    /// Cancel path of the terminal-write arbitration. A slot already
    /// committed by the handler makes this a no-op and the token never
    /// fires; otherwise the cancellation error is recorded first and the
    /// token broadcast after, so woken waiters always read a final slot.
    fn cancel_with(&self, kind: CancelKind) {
        {
            let mut slot = self.slot.lock().unwrap();
            if slot.is_some() || self.cancel.is_fired() {
                return;
            }
            *slot = Some(Err(kind.into_error()));
        }
        self.cancel.fire(kind);
    }

    /// Suspend until either terminal signal fires.
    async fn terminal(&self) {
        let _ = Cancellable::new(self.done.wait(), self.cancel.wait()).await;
    }

    fn is_done(&self) -> bool {
        self.cancel.is_fired() || self.done.is_fired()
    }

    fn state(&self) -> State {
        if self.cancel.is_fired() {
            State::Cancelled
        } else if self.done.is_fired() {
            State::Done
        } else {
            State::Running
        }
    }
}

impl<T: Clone + Send + 'static> Promise<T> {
    /// Spawn `handler` on the runtime and return a handle immediately.
    ///
    /// When `timeout` is non-zero a watcher task is armed alongside the
    /// handler; once it elapses the promise is cancelled with
    /// [`PromiseError::TimedOut`]. A zero `timeout` means unbounded: no
    /// watcher runs, and a handler that never returns leaves
    /// [`result`](Promise::result) blocked until [`cancel`](Promise::cancel)
    /// is called. That is the documented contract, not a defect: callers
    /// needing a bound must supply the timeout at construction time.
    pub fn spawn<RT, F>(rt: &RT, timeout: Duration, handler: F) -> Self
    where
        RT: AsyncExec + AsyncTime,
        F: Future<Output = Result<T, BoxError>> + Send + 'static,
    {
        let shared = Shared::new(Arc::new(CancelToken::new()));
        Self::start(rt, timeout, shared.clone(), async move {
            handler.await.map_err(PromiseError::handler)
        });
        Self { shared }
    }

    /// Arm the timeout watcher and the handler executor.
    fn start<RT>(
        rt: &RT,
        timeout: Duration,
        shared: Arc<Shared<T>>,
        body: impl Future<Output = Outcome<T>> + Send + 'static,
    ) where
        RT: AsyncExec + AsyncTime,
    {
        if !timeout.is_zero() {
            let shared = shared.clone();
            rt.spawn_detach(async move {
                // The sleep races the promise becoming terminal, so the
                // watcher exits early instead of lingering for the full
                // duration after completion or an explicit cancel.
                if RT::timeout(timeout, shared.terminal()).await.is_err() {
                    shared.cancel_with(CancelKind::Timeout);
                }
            });
        }
        rt.spawn_detach(async move {
            let out = body.await;
            shared.settle(out);
        });
    }

    /// Cancel the promise (and everything sharing its token).
    ///
    /// Non-blocking and idempotent: on an already terminal promise this is a
    /// no-op, otherwise it records [`PromiseError::Cancelled`] as the
    /// terminal error and unblocks every waiter, including timeout watchers
    /// and chained promises observing the same token. The handler task
    /// itself is not interrupted.
    pub fn cancel(&self) {
        self.shared.cancel_with(CancelKind::User);
    }

    /// Whether the cancellation token has fired. Non-blocking, no side
    /// effects.
    pub fn cancelled(&self) -> bool {
        self.shared.cancel.is_fired()
    }

    /// Whether neither terminal signal has fired yet. Non-blocking.
    pub fn running(&self) -> bool {
        !self.is_done()
    }

    /// Whether the promise reached a terminal state. Non-blocking.
    pub fn is_done(&self) -> bool {
        self.shared.is_done()
    }

    /// Derived state: `Cancelled` wins over `Done`, else `Running`.
    pub fn state(&self) -> State {
        self.shared.state()
    }

    /// Await the terminal outcome.
    ///
    /// Suspends until either the completion signal or the cancellation
    /// token fires, then returns the committed outcome. Once terminal it
    /// returns immediately on every subsequent call, with the identical
    /// value or error, for any number of concurrent observers.
    pub async fn result(&self) -> Outcome<T> {
        self.shared.terminal().await;
        if let Some(out) = self.shared.slot.lock().unwrap().as_ref() {
            return out.clone();
        }
        // Cancelled through the shared token without a local terminal
        // write (a chain member): report the kind the token recorded.
        Err(self.shared.cancel.wait().await.into_error())
    }

    /// Chain a continuation onto this promise, returning the dependent
    /// promise.
    ///
    /// The new promise's handler first awaits this one's result. A parent
    /// error or cancellation short-circuits: the child settles with the
    /// identical error and `continuation` is never invoked. Otherwise the
    /// continuation runs on the parent's value and its outcome becomes the
    /// child's own.
    ///
    /// The child shares this promise's cancellation token, so cancelling
    /// either side cancels the whole chain. `timeout` arms a fresh watcher
    /// for the child, independent of the parent's deadline.
    pub fn then<RT, U, F, Fut>(&self, rt: &RT, timeout: Duration, continuation: F) -> Promise<U>
    where
        RT: AsyncExec + AsyncTime,
        U: Clone + Send + 'static,
        F: FnOnce(T) -> Fut + Send + 'static,
        Fut: Future<Output = Result<U, BoxError>> + Send + 'static,
    {
        let parent = self.clone();
        let shared = Shared::new(self.shared.cancel.clone());
        Promise::start(rt, timeout, shared.clone(), async move {
            match parent.result().await {
                Err(err) => Err(err),
                // The token can fire between the parent completing and the
                // chain observing it; the write below is discarded then,
                // but the continuation must not run.
                Ok(_) if parent.cancelled() => {
                    Err(parent.shared.cancel.wait().await.into_error())
                }
                Ok(value) => continuation(value).await.map_err(PromiseError::handler),
            }
        });
        Promise { shared }
    }
}
