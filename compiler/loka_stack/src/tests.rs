use std::future::Future;
use std::pin::Pin;

use super::*;

#[test]
fn test_shallow_recursion() {
    fn factorial(n: u64) -> u64 {
        ensure_sufficient_stack(|| if n <= 1 { 1 } else { n * factorial(n - 1) })
    }

    assert_eq!(factorial(10), 3_628_800);
}

#[test]
fn test_deep_recursion() {
    fn deep_recurse(n: u64) -> u64 {
        ensure_sufficient_stack(|| if n == 0 { 0 } else { deep_recurse(n - 1) + 1 })
    }

    assert_eq!(deep_recurse(100_000), 100_000);
}

#[test]
fn test_works_with_result_type() {
    let result: Result<i32, &str> = ensure_sufficient_stack(|| Ok(123));
    assert_eq!(result, Ok(123));
}

#[test]
fn test_grow_on_poll_passes_output_through() {
    let value = futures::executor::block_on(grow_on_poll(async { 7 }));
    assert_eq!(value, 7);
}

#[test]
fn test_deep_async_recursion() {
    fn depth(n: u64) -> Pin<Box<dyn Future<Output = u64>>> {
        Box::pin(grow_on_poll(async move {
            if n == 0 {
                0
            } else {
                depth(n - 1).await + 1
            }
        }))
    }

    assert_eq!(futures::executor::block_on(depth(20_000)), 20_000);
}
