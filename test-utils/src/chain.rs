use captains_log::logfn;
use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc,
};
use std::time::Duration;
use vow::prelude::*;

use crate::find_fibonacci;

/// The chained promise resolves only after its parent, on the parent's
/// value.
#[logfn]
pub fn test_chain_success<RT>(rt: &RT)
where
    RT: AsyncRuntime + std::fmt::Debug,
{
    let parent = Promise::spawn(
        rt,
        Duration::from_secs(5),
        find_fibonacci::<RT>(Duration::from_millis(200), 2),
    );
    let child = parent.then(rt, Duration::from_secs(5), |v| async move {
        assert_eq!(v, 2);
        find_fibonacci::<RT>(Duration::from_millis(100), 5).await
    });
    assert_eq!(child.state(), State::Running);

    let value = rt.block_on(async { child.result().await }).unwrap();
    assert_eq!(value, 8);
    // the parent resolved first, with its own value
    assert_eq!(parent.state(), State::Done);
    assert_eq!(rt.block_on(async { parent.result().await }).unwrap(), 2);
    assert_eq!(child.state(), State::Done);
}

/// Chains compose to arbitrary depth, each link on its predecessor's value.
#[logfn]
pub fn test_chain_depth<RT>(rt: &RT)
where
    RT: AsyncRuntime + std::fmt::Debug,
{
    let p0 = Promise::spawn(rt, Duration::ZERO, async { Ok::<i64, BoxError>(1) });
    let p1 = p0.then(rt, Duration::ZERO, |v| async move { Ok::<i64, BoxError>(v + 1) });
    let p2 = p1.then(rt, Duration::ZERO, |v| async move { Ok::<i64, BoxError>(v * 10) });
    assert_eq!(rt.block_on(async { p2.result().await }).unwrap(), 20);
    assert_eq!(p0.state(), State::Done);
    assert_eq!(p1.state(), State::Done);
    assert_eq!(p2.state(), State::Done);
}

/// Cancelling the parent poisons the child with the identical error and the
/// continuation never runs.
#[logfn]
pub fn test_chain_cancel_propagation<RT>(rt: &RT)
where
    RT: AsyncRuntime + std::fmt::Debug,
{
    let invoked = Arc::new(AtomicUsize::new(0));
    let _invoked = invoked.clone();
    let parent = Promise::spawn(
        rt,
        Duration::from_secs(5),
        find_fibonacci::<RT>(Duration::from_millis(500), 5),
    );
    let child = parent.then(rt, Duration::from_secs(5), move |_| {
        _invoked.fetch_add(1, Ordering::SeqCst);
        async move { Ok::<i64, BoxError>(0) }
    });

    parent.cancel();
    assert!(matches!(rt.block_on(async { child.result().await }), Err(PromiseError::Cancelled)));
    assert_eq!(child.state(), State::Cancelled);
    assert!(child.cancelled());
    assert_eq!(parent.state(), State::Cancelled);

    // give the chain's executor time to observe the short-circuit
    rt.block_on(async { RT::sleep(Duration::from_millis(300)).await; });
    assert_eq!(invoked.load(Ordering::SeqCst), 0);
    assert!(matches!(rt.block_on(async { child.result().await }), Err(PromiseError::Cancelled)));
}

/// The token is shared both ways: cancelling the child cancels the parent.
#[logfn]
pub fn test_chain_cancel_from_child<RT>(rt: &RT)
where
    RT: AsyncRuntime + std::fmt::Debug,
{
    let invoked = Arc::new(AtomicUsize::new(0));
    let _invoked = invoked.clone();
    let parent = Promise::spawn(
        rt,
        Duration::from_secs(5),
        find_fibonacci::<RT>(Duration::from_millis(500), 5),
    );
    let child = parent.then(rt, Duration::from_secs(5), move |_| {
        _invoked.fetch_add(1, Ordering::SeqCst);
        async move { Ok::<i64, BoxError>(0) }
    });

    child.cancel();
    assert!(parent.cancelled());
    assert_eq!(parent.state(), State::Cancelled);
    assert!(matches!(rt.block_on(async { parent.result().await }), Err(PromiseError::Cancelled)));
    assert!(matches!(rt.block_on(async { child.result().await }), Err(PromiseError::Cancelled)));
    rt.block_on(async { RT::sleep(Duration::from_millis(300)).await; });
    assert_eq!(invoked.load(Ordering::SeqCst), 0);
}

/// A parent's handler error short-circuits the chain verbatim.
#[logfn]
pub fn test_chain_error_propagation<RT>(rt: &RT)
where
    RT: AsyncRuntime + std::fmt::Debug,
{
    let invoked = Arc::new(AtomicUsize::new(0));
    let _invoked = invoked.clone();
    let parent = Promise::spawn(
        rt,
        Duration::from_secs(2),
        find_fibonacci::<RT>(Duration::from_millis(50), -1),
    );
    let child = parent.then(rt, Duration::from_secs(2), move |_| {
        _invoked.fetch_add(1, Ordering::SeqCst);
        async move { Ok::<i64, BoxError>(0) }
    });

    let parent_err = rt.block_on(async { parent.result().await }).unwrap_err();
    let child_err = rt.block_on(async { child.result().await }).unwrap_err();
    match (&parent_err, &child_err) {
        (PromiseError::Handler(a), PromiseError::Handler(b)) => {
            assert_eq!(a.to_string(), b.to_string());
            assert_eq!(a.to_string(), "fibonacci undefined for negative input");
        }
        other => panic!("expected handler errors, got {:?}", other),
    }
    // an errored parent is Done, not Cancelled, and so is its child
    assert_eq!(parent.state(), State::Done);
    assert_eq!(child.state(), State::Done);
    assert!(!child.cancelled());
    assert_eq!(invoked.load(Ordering::SeqCst), 0);
}

/// The child's own watcher is independent of the parent's deadline, and a
/// child timing out cancels the whole chain through the shared token.
#[logfn]
pub fn test_chain_child_timeout<RT>(rt: &RT)
where
    RT: AsyncRuntime + std::fmt::Debug,
{
    let invoked = Arc::new(AtomicUsize::new(0));
    let _invoked = invoked.clone();
    let parent = Promise::spawn(
        rt,
        Duration::ZERO,
        find_fibonacci::<RT>(Duration::from_millis(800), 5),
    );
    let child = parent.then(rt, Duration::from_millis(100), move |_| {
        _invoked.fetch_add(1, Ordering::SeqCst);
        async move { Ok::<i64, BoxError>(0) }
    });

    assert!(matches!(rt.block_on(async { child.result().await }), Err(PromiseError::TimedOut)));
    assert_eq!(child.state(), State::Cancelled);
    assert!(parent.cancelled());
    assert!(matches!(rt.block_on(async { parent.result().await }), Err(PromiseError::TimedOut)));
    rt.block_on(async { RT::sleep(Duration::from_millis(900)).await; });
    assert_eq!(invoked.load(Ordering::SeqCst), 0);
}
