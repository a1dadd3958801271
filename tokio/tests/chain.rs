use rstest::*;
use vow_test_utils::{chain::*, *};
use vow_tokio::TokioRT;

#[fixture]
fn setup() {
    init_logger();
}

#[rstest]
#[case(TokioRT::new_multi_thread(2))]
#[case(TokioRT::new_current_thread())]
fn test_tokio_chain(setup: (), #[case] rt: TokioRT) {
    let _ = setup; // Explicitly ignore the fixture value
    test_chain_success(&rt);
    test_chain_depth(&rt);
    test_chain_cancel_propagation(&rt);
    test_chain_cancel_from_child(&rt);
    test_chain_error_propagation(&rt);
    test_chain_child_timeout(&rt);
}
