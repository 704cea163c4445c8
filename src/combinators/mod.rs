//! The combinator library: the bulk of the crate.
//!
//! Every combinator follows the same shape: create a `Running` downstream
//! Future `D`, install a completion callback on the upstream Future(s) that
//! drives `D`, and wire `D`'s cancellation to hop back upstream where that
//! makes sense for the combinator. Submodules are grouped by the kind of
//! thing they do: transformation, timing, aggregation, production.

mod aggregation;
mod production;
mod timing;
mod transformation;

pub use aggregation::{all, race};
pub use production::{resolve, resolve_until, resolve_when, DEFAULT_POLL_INTERVAL};

// `map`, `fmap_on_success`, `chain`, `fallback`, `replace`, `delay`,
// `timeout_only`, and `timeout_and_cancel` are inherent methods on
// `Future<T>` defined in `transformation` and `timing`; they need no
// re-export here since method-call syntax finds them directly.

use crate::context::{inline, ExecutionContext};
use crate::future::Future;
use crate::resolvable::pair;
use crate::state::FutureState;
use std::sync::Arc;

/// Builds a downstream Future that mirrors `source`'s terminal state
/// exactly, with no transformation. Used as the returned handle from
/// `respond_to_cancellation`, and as the base every transformation
/// combinator specializes.
pub(crate) fn mirror<T>(source: Future<T>) -> Future<T>
where
    T: Clone + Send + 'static,
{
    let (downstream, resolvable) = pair::<T>();
    let upstream = source.clone();
    downstream.set_cancel_forward(move || {
        upstream.cancel();
    });
    source.on_context(inline()).notify_on_completion(move |u| match u.state() {
        FutureState::Done => resolvable.resolve_with_value(u.value().expect("Done carries a value")),
        FutureState::Failed => {
            resolvable.resolve_with_error(u.error().expect("Failed carries an error"))
        }
        FutureState::Cancelled => {
            resolvable.cancel();
        }
        FutureState::Running => unreachable!("callbacks only fire on terminal states"),
    });
    downstream
}

/// Shared helper: install `downstream`'s cancel-forwarding hop onto
/// `upstream`, using a shared inline context (cancellation forwarding is
/// internal plumbing, not user-observable dispatch timing).
pub(crate) fn forward_cancel_to<T, U>(downstream: &Future<U>, upstream: Future<T>)
where
    T: Send + 'static,
{
    downstream.set_cancel_forward(move || {
        upstream.cancel();
    });
}

/// Returns the crate's zero-sized `Inline` context as a trait object, for
/// combinators' internal bridging callbacks.
pub(crate) fn internal_context() -> Arc<dyn ExecutionContext> {
    inline()
}
