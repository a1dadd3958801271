use async_executor::Executor;
use rstest::*;
use std::sync::Arc;
use vow_smol::SmolRT;
use vow_test_utils::{promise::*, *};

#[fixture]
fn setup() {
    init_logger();
}

#[cfg(feature = "global")]
#[rstest]
fn test_smol_global(setup: ()) {
    let _ = setup; // Explicitly ignore the fixture value
    let rt = SmolRT::new_global();
    test_complete_before_timeout(&rt);
    test_timeout(&rt);
    test_handler_error(&rt);
    test_cancel(&rt);
    test_cancel_noop_after_done(&rt);
    test_late_timeout_is_noop(&rt);
    test_concurrent_observers(&rt);
}

#[rstest]
fn test_smol_rt_with_executor(setup: ()) {
    let _ = setup; // Explicitly ignore the fixture value
    let rt = SmolRT::new(Arc::new(Executor::new()));
    test_complete_before_timeout(&rt);
    test_timeout(&rt);
    test_handler_error(&rt);
    test_cancel(&rt);
    test_cancel_noop_after_done(&rt);
    test_late_timeout_is_noop(&rt);
    test_concurrent_observers(&rt);
}
