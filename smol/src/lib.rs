//! # Smol Runtime adapter for Vow
//!
//! This crate provides a Smol-based implementation of the Vow async runtime traits,
//! letting promises spawn their handler executors and timeout watchers on the
//! smol ecology.
//!
//! The main type provided is [`SmolRT`], which implements the core runtime functionality.
//!
//! See the [Vow crate](https://docs.rs/vow) for more information.
//!
//! ## Features
//!
//! - `global`: Enables the global executor feature, which allows using a global executor
//!   instead of providing your own executor instance.
//!
//! ## Usage
//!
//! With a custom executor:
//!
//! ```rust
//! use vow_smol::SmolRT;
//! use std::sync::Arc;
//! use async_executor::Executor;
//!
//! let executor = Arc::new(Executor::new());
//! let rt = SmolRT::new(executor);
//! ```
//!
//! With the global executor (requires the `global` feature):
//!
//! ```rust
//! use vow_smol::SmolRT;
//!
//! #[cfg(feature = "global")]
//! let rt = SmolRT::new_global();
//! ```

use async_executor::Executor;
use async_io::Timer;
use futures_lite::future::block_on;
use std::fmt;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use vow::runtime::{AsyncExec, AsyncJoinHandle};
use vow::time::AsyncTime;

/// The SmolRT implements the runtime traits
#[derive(Clone)]
pub struct SmolRT(Option<Arc<Executor<'static>>>);

impl fmt::Debug for SmolRT {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.0.is_some() { write!(f, "smol") } else { write!(f, "smol(global)") }
    }
}

impl SmolRT {
    #[cfg(feature = "global")]
    #[inline]
    pub fn new_global() -> Self {
        Self(None)
    }

    /// spawn coroutine with specified Executor
    #[inline]
    pub fn new(executor: Arc<Executor<'static>>) -> Self {
        Self(Some(executor))
    }
}

impl vow::AsyncRuntime for SmolRT {}

impl AsyncTime for SmolRT {
    #[inline(always)]
    fn sleep(d: Duration) -> impl Future + Send {
        Timer::after(d)
    }
}

/// AsyncJoinHandle implementation for smol
pub struct SmolJoinHandle<T>(async_executor::Task<T>);

impl<T: Send + 'static> AsyncJoinHandle<T> for SmolJoinHandle<T> {
    #[inline]
    async fn join(self) -> Result<T, ()> {
        Ok(self.0.await)
    }

    #[inline]
    fn detach(self) {
        self.0.detach();
    }
}

impl AsyncExec for SmolRT {
    /// Spawn a task in the background
    fn spawn<F, R>(&self, f: F) -> impl AsyncJoinHandle<R>
    where
        F: Future<Output = R> + Send + 'static,
        R: Send + 'static,
    {
        let handle = match &self.0 {
            Some(exec) => exec.spawn(f),
            None => {
                #[cfg(feature = "global")]
                {
                    smol::spawn(f)
                }
                #[cfg(not(feature = "global"))]
                unreachable!();
            }
        };
        SmolJoinHandle(handle)
    }

    /// Depends on how you initialize SmolRT, spawn with executor or globally
    #[inline]
    fn spawn_detach<F, R>(&self, f: F)
    where
        F: Future<Output = R> + Send + 'static,
        R: Send + 'static,
    {
        self.spawn(f).detach();
    }

    /// Run a future to completion on the runtime
    ///
    /// NOTE: when initialized  with an executor,  will block current thread until the future
    /// returns
    #[inline]
    fn block_on<F, R>(&self, f: F) -> R
    where
        F: Future<Output = R> + Send,
        R: Send + 'static,
    {
        if let Some(exec) = &self.0 {
            block_on(exec.run(f))
        } else {
            #[cfg(feature = "global")]
            {
                smol::block_on(f)
            }
            #[cfg(not(feature = "global"))]
            unreachable!();
        }
    }
}
