use std::sync::Arc;
use std::time::Duration;

use crate::combinators::internal_context;
use crate::context::ExecutionContext;
use crate::future::Future;
use crate::resolvable::{pair, Resolvable};
use crate::state::FutureState;

/// Default polling interval for [`resolve_when`] when the caller doesn't
/// need a tighter bound.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Schedules `producer` on `context` and adopts the terminal state of the
/// Future it returns. Cancelling the result cancels the produced Future (if
/// `producer` has already run) or is a no-op otherwise.
pub fn resolve<T, F>(context: Arc<dyn ExecutionContext>, producer: F) -> Future<T>
where
    T: Clone + Send + 'static,
    F: FnOnce() -> Future<T> + Send + 'static,
{
    let (downstream, resolvable) = pair::<T>();
    let downstream_for_job = downstream.clone();
    context.execute(Box::new(move || {
        let produced = producer();
        if downstream_for_job.completed() {
            produced.cancel();
            return;
        }
        downstream_for_job.set_cancel_forward({
            let produced = produced.clone();
            move || produced.cancel()
        });
        produced.on_context(internal_context()).notify_on_completion(move |inner| match inner.state() {
            FutureState::Done => resolvable.resolve_with_value(inner.value().expect("Done carries a value")),
            FutureState::Failed => {
                resolvable.resolve_with_error(inner.error().expect("Failed carries an error"))
            }
            FutureState::Cancelled => {
                resolvable.cancel();
            }
            FutureState::Running => unreachable!(),
        });
    }));
    downstream
}

/// Polls `predicate` on `context` at `interval`, resolving `Done(true)` the
/// first time it returns `true`. Cancelling the result stops polling.
pub fn resolve_when<F>(context: Arc<dyn ExecutionContext>, interval: Duration, predicate: F) -> Future<bool>
where
    F: Fn() -> bool + Send + 'static,
{
    let (downstream, resolvable) = pair::<bool>();
    poll_tick(context, interval, Arc::new(predicate), downstream.clone(), resolvable);
    downstream
}

fn poll_tick<F>(
    context: Arc<dyn ExecutionContext>,
    interval: Duration,
    predicate: Arc<F>,
    downstream: Future<bool>,
    resolvable: Resolvable<bool>,
) where
    F: Fn() -> bool + Send + 'static,
{
    if downstream.completed() {
        return;
    }
    let ctx = Arc::clone(&context);
    context.execute(Box::new(move || {
        if downstream.completed() {
            return;
        }
        if predicate() {
            resolvable.resolve_with_value(true);
            return;
        }
        std::thread::sleep(interval);
        poll_tick(ctx, interval, predicate, downstream, resolvable);
    }));
}

/// Repeatedly invokes `producer` on `context` until it produces a `Done`
/// Future, which the result then adopts. A `Failed` attempt is logged and
/// retried with a fresh call to `producer`. A `Cancelled` attempt cancels
/// the result outright (no retry). Cancelling the result cancels whichever
/// attempt is currently in flight.
pub fn resolve_until<T, F>(context: Arc<dyn ExecutionContext>, producer: F) -> Future<T>
where
    T: Clone + Send + 'static,
    F: Fn() -> Future<T> + Send + Sync + 'static,
{
    let (downstream, resolvable) = pair::<T>();
    attempt(context, Arc::new(producer), downstream.clone(), resolvable);
    downstream
}

fn attempt<T, F>(
    context: Arc<dyn ExecutionContext>,
    producer: Arc<F>,
    downstream: Future<T>,
    resolvable: Resolvable<T>,
) where
    T: Clone + Send + 'static,
    F: Fn() -> Future<T> + Send + Sync + 'static,
{
    if downstream.completed() {
        return;
    }
    let ctx = Arc::clone(&context);
    context.execute(Box::new(move || {
        let inner = producer();
        if downstream.completed() {
            inner.cancel();
            return;
        }
        downstream.set_cancel_forward({
            let inner = inner.clone();
            move || inner.cancel()
        });

        let downstream_for_retry = downstream.clone();
        let producer_for_retry = Arc::clone(&producer);
        inner.on_context(internal_context()).notify_on_completion(move |result| match result.state() {
            FutureState::Done => {
                resolvable.resolve_with_value(result.value().expect("Done carries a value"));
            }
            FutureState::Failed => {
                log::debug!("resolve_until: attempt failed, retrying: {:?}", result.error());
                attempt(ctx, producer_for_retry, downstream_for_retry, resolvable);
            }
            FutureState::Cancelled => {
                resolvable.cancel();
            }
            FutureState::Running => unreachable!(),
        });
    }));
}
