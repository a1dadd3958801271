//! # Vow Tokio Runtime
//!
//! This crate provides a Tokio-based implementation of the Vow async runtime traits,
//! letting promises spawn their handler executors and timeout watchers on Tokio.
//!
//! The main type provided is [`TokioRT`], which implements the core runtime functionality.
//!
//! See the [main Vow documentation](https://github.com/NaturalIO/vow) for more information.
//!
//! ## Usage
//!
//! ```rust
//! use vow_tokio::TokioRT;
//!
//! let rt = TokioRT::new_multi_thread(4);
//! ```

pub use vow::runtime::{AsyncExec, AsyncJoinHandle};
use vow::time::AsyncTime;
use std::fmt;
use std::future::Future;
use std::time::Duration;
use tokio::runtime::{Builder, Handle, Runtime};

/// The main struct for the tokio runtime, assign this type to the runtime
/// traits when used.
pub enum TokioRT {
    Runtime(Runtime),
    Handle(Handle),
}

impl fmt::Debug for TokioRT {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Runtime(_) => write!(f, "tokio(rt)"),
            Self::Handle(_) => write!(f, "tokio(handle)"),
        }
    }
}

impl TokioRT {
    /// Capture a runtime
    #[inline]
    pub fn new_with_runtime(rt: Runtime) -> Self {
        Self::Runtime(rt)
    }

    #[inline]
    pub fn new_multi_thread(workers: usize) -> Self {
        let mut builder = Builder::new_multi_thread();
        if workers > 0 {
            builder.worker_threads(workers);
        }
        Self::Runtime(builder.enable_all().build().unwrap())
    }

    #[inline]
    pub fn new_current_thread() -> Self {
        let mut builder = Builder::new_current_thread();
        Self::Runtime(builder.enable_all().build().unwrap())
    }

    /// Only capture a runtime handle. Should acquire with
    /// `async { Handle::current() }`
    #[inline]
    pub fn new_with_handle(handle: Handle) -> Self {
        Self::Handle(handle)
    }
}

impl vow::AsyncRuntime for TokioRT {}

impl AsyncTime for TokioRT {
    #[inline(always)]
    fn sleep(d: Duration) -> impl Future + Send {
        tokio::time::sleep(d)
    }
}

impl AsyncExec for TokioRT {
    /// Spawn a task in the background, returning a handle to await its result
    #[inline]
    fn spawn<F, R>(&self, f: F) -> impl AsyncJoinHandle<R>
    where
        F: Future<Output = R> + Send + 'static,
        R: Send + 'static,
    {
        match self {
            Self::Runtime(s) => {
                return TokioJoinHandle(s.spawn(f));
            }
            Self::Handle(s) => {
                return TokioJoinHandle(s.spawn(f));
            }
        }
    }

    /// Spawn a task and detach it (no handle returned)
    #[inline]
    fn spawn_detach<F, R>(&self, f: F)
    where
        F: Future<Output = R> + Send + 'static,
        R: Send + 'static,
    {
        match self {
            Self::Runtime(s) => {
                s.spawn(f);
            }
            Self::Handle(s) => {
                s.spawn(f);
            }
        }
    }

    /// Run a future to completion on the runtime
    #[inline]
    fn block_on<F, R>(&self, f: F) -> R
    where
        F: Future<Output = R> + Send,
        R: Send + 'static,
    {
        match self {
            Self::Runtime(s) => {
                return s.block_on(f);
            }
            Self::Handle(s) => {
                return s.block_on(f);
            }
        }
    }
}

/// A wrapper around tokio's JoinHandle that implements AsyncJoinHandle
pub struct TokioJoinHandle<T>(tokio::task::JoinHandle<T>);

impl<T: Send + 'static> AsyncJoinHandle<T> for TokioJoinHandle<T> {
    #[inline]
    async fn join(self) -> Result<T, ()> {
        match self.0.await {
            Ok(r) => Ok(r),
            Err(_) => Err(()),
        }
    }

    #[inline]
    fn detach(self) {
        // Tokio's JoinHandle doesn't need explicit detach, it will run in background
        // when the handle is dropped
    }
}
