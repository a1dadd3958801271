use captains_log::{recipe, ConsoleTarget, Level};
use std::time::Duration;
use vow::prelude::*;

pub mod chain;
pub mod promise;

// Initialize logging in the test utility crate
pub fn init_logger() {
    recipe::console_logger(ConsoleTarget::Stdout, Level::Debug)
        .test()
        .build()
        .expect("Failed to initialize logger");
}

/// The standing demo handler: compute a fibonacci number after an artificial
/// delay. `fib(0) == fib(1) == 1`; negative input is a handler error.
pub async fn find_fibonacci<RT: AsyncTime>(delay: Duration, n: i64) -> Result<i64, BoxError> {
    RT::sleep(delay).await;
    if n < 0 {
        return Err("fibonacci undefined for negative input".into());
    }
    let (mut a, mut b) = (1i64, 1i64);
    for _ in 1..n {
        let next = a + b;
        a = b;
        b = next;
    }
    Ok(b)
}
