use rstest::*;
use vow_test_utils::{promise::*, *};
use vow_tokio::TokioRT;

#[fixture]
fn setup() {
    init_logger();
}

#[rstest]
#[case(TokioRT::new_multi_thread(2))]
#[case(TokioRT::new_current_thread())]
fn test_tokio_rt(setup: (), #[case] rt: TokioRT) {
    let _ = setup; // Explicitly ignore the fixture value
    test_complete_before_timeout(&rt);
    test_timeout(&rt);
    test_handler_error(&rt);
    test_cancel(&rt);
    test_cancel_noop_after_done(&rt);
    test_late_timeout_is_noop(&rt);
    test_concurrent_observers(&rt);
}
