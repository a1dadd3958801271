//! Error kinds reported by a promise.

use std::sync::Arc;
use thiserror::Error;

/// Boxed error returned by handlers and continuations.
///
/// Whatever a handler returns in here is carried verbatim into
/// [`PromiseError::Handler`] and surfaced unchanged by every
/// `result()` call on the promise and on anything chained from it.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Which trigger fired a cancellation token first.
///
/// Recorded by the token so that every promise sharing it reports the same
/// error kind, even a chain member that never performed a terminal write of
/// its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum CancelKind {
    /// `cancel()` was invoked on some handle of the chain.
    User,
    /// A timeout watcher elapsed.
    Timeout,
}

impl CancelKind {
    pub(crate) fn into_error(self) -> PromiseError {
        match self {
            CancelKind::User => PromiseError::Cancelled,
            CancelKind::Timeout => PromiseError::TimedOut,
        }
    }
}

/// The terminal error of a promise.
///
/// Cloneable so that any number of observers can read the same outcome; the
/// handler's own error is shared behind an [`Arc`] rather than re-wrapped.
#[derive(Debug, Clone, Error)]
pub enum PromiseError {
    /// `cancel()` was invoked before the handler completed.
    #[error("cancelled by user")]
    Cancelled,
    /// The deadline configured at construction elapsed before the handler
    /// completed.
    #[error("future timed out")]
    TimedOut,
    /// The handler (or a chained continuation) returned an error on its own
    /// terms.
    #[error("{0}")]
    Handler(Arc<dyn std::error::Error + Send + Sync + 'static>),
}

impl PromiseError {
    pub(crate) fn handler(err: BoxError) -> Self {
        PromiseError::Handler(Arc::from(err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        assert_eq!(PromiseError::Cancelled.to_string(), "cancelled by user");
        assert_eq!(PromiseError::TimedOut.to_string(), "future timed out");
        let err = PromiseError::handler("negative input".into());
        assert_eq!(err.to_string(), "negative input");
    }

    #[test]
    fn test_handler_error_shared_verbatim() {
        let err = PromiseError::handler("boom".into());
        let cloned = err.clone();
        match (&err, &cloned) {
            (PromiseError::Handler(a), PromiseError::Handler(b)) => {
                assert!(Arc::ptr_eq(a, b));
            }
            _ => panic!("expected handler errors"),
        }
    }

    #[test]
    fn test_cancel_kind_mapping() {
        assert!(matches!(CancelKind::User.into_error(), PromiseError::Cancelled));
        assert!(matches!(CancelKind::Timeout.into_error(), PromiseError::TimedOut));
    }
}
