use async_executor::Executor;
use rstest::*;
use std::sync::Arc;
use vow_smol::SmolRT;
use vow_test_utils::{chain::*, *};

#[fixture]
fn setup() {
    init_logger();
}

#[cfg(feature = "global")]
#[rstest]
fn test_smol_global_chain(setup: ()) {
    let _ = setup; // Explicitly ignore the fixture value
    let rt = SmolRT::new_global();
    test_chain_success(&rt);
    test_chain_depth(&rt);
    test_chain_cancel_propagation(&rt);
    test_chain_cancel_from_child(&rt);
    test_chain_error_propagation(&rt);
    test_chain_child_timeout(&rt);
}

#[rstest]
fn test_smol_chain_with_executor(setup: ()) {
    let _ = setup; // Explicitly ignore the fixture value
    let rt = SmolRT::new(Arc::new(Executor::new()));
    test_chain_success(&rt);
    test_chain_depth(&rt);
    test_chain_cancel_propagation(&rt);
    test_chain_cancel_from_child(&rt);
    test_chain_error_propagation(&rt);
    test_chain_child_timeout(&rt);
}
