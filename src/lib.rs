#![cfg_attr(docsrs, feature(doc_cfg))]
#![cfg_attr(docsrs, allow(unused_attributes))]
#![doc = include_str!("../README.md")]

//! ## Modules
//!
//! - [`promise`] - The promise state machine: spawn, query state, cancel, await, chain.
//! - [`error`] - Terminal error kinds and the boxed handler error type.
//! - [`runtime`] - Traits for task spawn, join and block_on.
//! - [`time`] - Traits for sleeping and deadline races.
//! - [`utils`] - Utility types and functions
//!
//! At top level the [AsyncRuntime] trait combines the capabilities a promise
//! needs from a runtime, [`AsyncExec`] and [`AsyncTime`].
//!
//! ## Runtime Varieties Note
//!
//! ### Task Detach
//!
//! A promise's handler executor and timeout watcher are always detached
//! tasks; dropping every handle of a promise does not stop them, they settle
//! or expire on their own.
//!
//! ### Panic
//!
//! There is no panic channel through a promise: a handler that panics never
//! settles its result slot.
//!
//! - tokio will issolate panic between tasks, so the promise just stays
//!   unresolved until its timeout or an explicit cancel fires.
//! - smol will not issolate panic, the program might panic if the handler
//!   task panic. Return an error from the handler instead.
//!
//! ## Inherence
//!
//! You can write your own trait by inheriting AsyncRuntime or any other trait, to provide extra
//! functions along with the runtime object.
//! There's an blanket trait to auto impl AsyncRuntime on anything that is `Deref<Target>` to an AsyncRuntime.
//!
//! ``` no_compile
//! pub trait AsyncRuntime: AsyncExec + AsyncTime {}
//!
//! impl<F: std::ops::Deref<Target = T> + Send + Sync + 'static, T: AsyncRuntime> AsyncRuntime for F {}
//! ```

pub mod error;
pub mod promise;
pub mod runtime;
mod signal;
pub mod time;
pub mod utils;

/// Re-export all the traits and types you need
///
/// This module contains the essential items needed to work with Vow.
/// Importing this prelude is the recommended way to use Vow in your code.
pub mod prelude {
    pub use crate::AsyncRuntime;
    pub use crate::error::{BoxError, PromiseError};
    pub use crate::promise::{Outcome, Promise, State};
    pub use crate::runtime::{AsyncExec, AsyncJoinHandle};
    pub use crate::time::AsyncTime;
}

use prelude::*;

/// A marker trait that combines the async runtime capabilities a promise
/// rides on, [`AsyncExec`] and [`AsyncTime`]. It serves as a convenient way
/// to specify that a type provides all the functionality the promise state
/// machine and its test suites need.
///
/// You can write your own trait by inheriting AsyncRuntime or any other trait, to provide extra
/// functions along with the runtime object.
/// There's an blanket trait to auto impl AsyncRuntime on anything that is `Deref<Target>` to an AsyncRuntime.
pub trait AsyncRuntime: AsyncExec + AsyncTime {}

impl<F: std::ops::Deref<Target = T> + Send + Sync + 'static, T: AsyncRuntime> AsyncRuntime for F {}
