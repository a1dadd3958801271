use captains_log::logfn;
use futures_lite::future::zip;
use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};
use std::time::{Duration, Instant};
use vow::prelude::*;

use crate::find_fibonacci;

/// The handler completes well before the deadline: the value stands and the
/// promise reports Done.
#[logfn]
pub fn test_complete_before_timeout<RT>(rt: &RT)
where
    RT: AsyncRuntime + std::fmt::Debug,
{
    let p = Promise::spawn(
        rt,
        Duration::from_secs(2),
        find_fibonacci::<RT>(Duration::from_millis(100), 5),
    );
    assert_eq!(p.state(), State::Running);
    assert!(p.running());
    assert!(!p.is_done());

    let result = rt.block_on(async { p.result().await });
    assert_eq!(result.unwrap(), 8);
    assert_eq!(p.state(), State::Done);
    assert!(p.is_done());
    assert!(!p.running());
    assert!(!p.cancelled());

    // result() never blocks again once terminal, and repeats identically
    assert_eq!(rt.block_on(async { p.result().await }).unwrap(), 8);
}

/// The deadline elapses first: waiters are unblocked by the watcher and the
/// late handler outcome is discarded.
#[logfn]
pub fn test_timeout<RT>(rt: &RT)
where
    RT: AsyncRuntime + std::fmt::Debug,
{
    let p = Promise::spawn(
        rt,
        Duration::from_millis(100),
        find_fibonacci::<RT>(Duration::from_secs(1), 5),
    );
    let start = Instant::now();
    let result = rt.block_on(async { p.result().await });
    let elapsed = start.elapsed();
    assert!(elapsed < Duration::from_millis(800), "{:?}", elapsed);
    assert!(matches!(result, Err(PromiseError::TimedOut)));
    assert_eq!(p.state(), State::Cancelled);
    assert!(p.cancelled());
    assert!(p.is_done());

    // let the handler finish in the background, nothing changes
    rt.block_on(async { RT::sleep(Duration::from_millis(1200)).await; });
    assert!(matches!(rt.block_on(async { p.result().await }), Err(PromiseError::TimedOut)));
    assert_eq!(p.state(), State::Cancelled);
}

/// The handler returns an error on its own terms: carried verbatim, and the
/// promise is Done, not Cancelled.
#[logfn]
pub fn test_handler_error<RT>(rt: &RT)
where
    RT: AsyncRuntime + std::fmt::Debug,
{
    let p = Promise::spawn(
        rt,
        Duration::from_secs(2),
        find_fibonacci::<RT>(Duration::from_millis(50), -1),
    );
    let err = rt.block_on(async { p.result().await }).unwrap_err();
    match err {
        PromiseError::Handler(e) => {
            assert_eq!(e.to_string(), "fibonacci undefined for negative input")
        }
        other => panic!("expected handler error, got {:?}", other),
    }
    assert_eq!(p.state(), State::Done);
    assert!(!p.cancelled());
}

/// cancel() while running pins the outcome, without preempting the handler
/// task.
#[logfn]
pub fn test_cancel<RT>(rt: &RT)
where
    RT: AsyncRuntime + std::fmt::Debug,
{
    let finished = Arc::new(AtomicBool::new(false));
    let _finished = finished.clone();
    let p = Promise::spawn(rt, Duration::from_secs(2), async move {
        RT::sleep(Duration::from_millis(200)).await;
        _finished.store(true, Ordering::SeqCst);
        Ok::<i64, BoxError>(8)
    });
    p.cancel();
    assert_eq!(p.state(), State::Cancelled);
    assert!(p.cancelled());
    assert!(matches!(rt.block_on(async { p.result().await }), Err(PromiseError::Cancelled)));

    // repeated cancel is a no-op
    p.cancel();
    assert_eq!(p.state(), State::Cancelled);

    // the computation was not interrupted, it completed in the background
    // and its result was discarded
    rt.block_on(async { RT::sleep(Duration::from_millis(500)).await; });
    assert!(finished.load(Ordering::SeqCst));
    assert!(matches!(rt.block_on(async { p.result().await }), Err(PromiseError::Cancelled)));
    assert_eq!(p.state(), State::Cancelled);
}

/// cancel() after natural completion is a no-op, and a zero timeout means
/// unbounded: no watcher ever fires.
#[logfn]
pub fn test_cancel_noop_after_done<RT>(rt: &RT)
where
    RT: AsyncRuntime + std::fmt::Debug,
{
    let p = Promise::spawn(
        rt,
        Duration::ZERO,
        find_fibonacci::<RT>(Duration::from_millis(100), 5),
    );
    assert_eq!(rt.block_on(async { p.result().await }).unwrap(), 8);
    p.cancel();
    assert_eq!(p.state(), State::Done);
    assert!(!p.cancelled());
    assert_eq!(rt.block_on(async { p.result().await }).unwrap(), 8);
    p.cancel();
    assert_eq!(p.state(), State::Done);
}

/// A timeout elapsing after completion never flips state, token or result.
#[logfn]
pub fn test_late_timeout_is_noop<RT>(rt: &RT)
where
    RT: AsyncRuntime + std::fmt::Debug,
{
    let p = Promise::spawn(
        rt,
        Duration::from_millis(200),
        find_fibonacci::<RT>(Duration::from_millis(50), 5),
    );
    assert_eq!(rt.block_on(async { p.result().await }).unwrap(), 8);
    rt.block_on(async { RT::sleep(Duration::from_millis(400)).await; });
    assert_eq!(p.state(), State::Done);
    assert!(!p.cancelled());
    assert_eq!(rt.block_on(async { p.result().await }).unwrap(), 8);
}

/// Concurrent observers on distinct tasks all see the identical outcome.
#[logfn]
pub fn test_concurrent_observers<RT>(rt: &RT)
where
    RT: AsyncRuntime + std::fmt::Debug,
{
    let p = Promise::spawn(
        rt,
        Duration::from_secs(2),
        find_fibonacci::<RT>(Duration::from_millis(200), 5),
    );
    let p1 = p.clone();
    let p2 = p.clone();
    let o1 = rt.spawn(async move { p1.result().await });
    let o2 = rt.spawn(async move { p2.result().await });
    let (r1, r2) = rt.block_on(async { zip(o1.join(), o2.join()).await });
    let v1 = r1.unwrap().unwrap();
    let v2 = r2.unwrap().unwrap();
    log::info!("observers saw {} and {}", v1, v2);
    assert_eq!(v1, 8);
    assert_eq!(v2, 8);
    assert_eq!(rt.block_on(async { p.result().await }).unwrap(), 8);
}
