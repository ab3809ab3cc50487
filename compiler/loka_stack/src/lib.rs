//! Stack safety utilities for deep recursion.
//!
//! Expression trees produced by the parser can nest arbitrarily deep
//! (`a + (b + (c + ...))`, nested object literals, long possessive chains).
//! The evaluator recurses once per node, so deep trees need the stack to grow
//! on demand.
//!
//! # Platform Support
//!
//! - **Native targets**: Uses the `stacker` crate to grow the stack on demand.
//! - **WASM targets**: No-op passthrough (WASM has its own stack management).
//!
//! # Synchronous and asynchronous recursion
//!
//! [`ensure_sufficient_stack`] guards a plain recursive call. Evaluation in the
//! runtime is asynchronous, and a nested future recurses when it is *polled*,
//! not when it is created, so [`grow_on_poll`] wraps a future and runs each of
//! its polls under [`ensure_sufficient_stack`]:
//!
//! ```text
//! fn evaluate<'a>(&'a self, node: &'a Node, ctx: &'a mut Ctx) -> LocalBoxFuture<'a, EvalResult> {
//!     grow_on_poll(self.eval_inner(node, ctx)).boxed_local()
//! }
//! ```
//!
//! # Configuration
//!
//! - **Red zone**: 100KB - If less than this remains, we grow the stack
//! - **Growth size**: 1MB - Each growth allocates this much additional space

use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

use pin_project::pin_project;

/// Minimum stack space to keep available (100KB red zone).
const RED_ZONE: usize = 100 * 1024;

/// Stack space to allocate when growing (1MB).
const STACK_PER_RECURSION: usize = 1024 * 1024;

/// Ensure sufficient stack space is available before executing `f`.
///
/// If the remaining stack is below the red zone threshold, this will
/// allocate additional stack space before calling `f`.
#[inline]
#[cfg(not(target_arch = "wasm32"))]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    stacker::maybe_grow(RED_ZONE, STACK_PER_RECURSION, f)
}

/// WASM version - just call directly (WASM has its own stack management).
#[inline]
#[cfg(target_arch = "wasm32")]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    f()
}

/// Future adapter that polls its inner future with [`ensure_sufficient_stack`].
#[pin_project]
#[must_use = "futures do nothing unless polled"]
pub struct GrowOnPoll<F> {
    #[pin]
    inner: F,
}

/// Wrap `future` so every poll runs with enough stack headroom.
#[inline]
pub fn grow_on_poll<F: Future>(future: F) -> GrowOnPoll<F> {
    GrowOnPoll { inner: future }
}

impl<F: Future> Future for GrowOnPoll<F> {
    type Output = F::Output;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let this = self.project();
        ensure_sufficient_stack(|| this.inner.poll(cx))
    }
}

#[cfg(test)]
mod tests;
