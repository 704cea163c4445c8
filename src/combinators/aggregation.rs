use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;

use crate::context::ExecutionContext;
use crate::future::Future;
use crate::resolvable::{pair, value, Resolvable};
use crate::state::FutureState;

/// Resolves `Done([v0, ..., vn])` once every input resolves `Done`,
/// preserving input order. If any input fails, the result fails
/// immediately with that error (other inputs are left untouched, with no
/// auto-cancel). If any input is cancelled, the result is cancelled.
/// `all(context, [])` resolves immediately `Done([])`.
pub fn all<T>(context: Arc<dyn ExecutionContext>, futures: Vec<Future<T>>) -> Future<Vec<T>>
where
    T: Clone + Send + 'static,
{
    if futures.is_empty() {
        return value(Vec::new());
    }

    let (downstream, resolvable) = pair::<Vec<T>>();
    let total = futures.len();
    let results: Arc<Mutex<Vec<Option<T>>>> = Arc::new(Mutex::new((0..total).map(|_| None).collect()));
    let remaining = Arc::new(AtomicUsize::new(total));

    downstream.set_cancel_forward({
        let futures = futures.clone();
        move || {
            for f in &futures {
                f.cancel();
            }
        }
    });

    for (index, future) in futures.into_iter().enumerate() {
        let results = Arc::clone(&results);
        let remaining = Arc::clone(&remaining);
        let resolvable = resolvable.clone();
        future.on_context(Arc::clone(&context)).notify_on_completion(move |f| match f.state() {
            FutureState::Done => {
                results.lock()[index] = Some(f.value().expect("Done carries a value"));
                if remaining.fetch_sub(1, Ordering::AcqRel) == 1 {
                    let collected = results.lock().iter_mut().map(|slot| slot.take().unwrap()).collect();
                    resolvable.resolve_with_value(collected);
                }
            }
            FutureState::Failed => {
                resolvable.resolve_with_error(f.error().expect("Failed carries an error"));
            }
            FutureState::Cancelled => {
                resolvable.cancel();
            }
            FutureState::Running => unreachable!(),
        });
    }

    downstream
}

/// Resolves with the first terminal state among `futures`, in observation
/// order, and cancels every other input once it does.
///
/// Synchronous precedence: if the list contains already-terminal inputs,
/// they are checked left-to-right *before* any callback is installed, so
/// the leftmost already-terminal input always wins regardless of dispatch
/// timing on the other inputs.
pub fn race<T>(context: Arc<dyn ExecutionContext>, futures: Vec<Future<T>>) -> Future<T>
where
    T: Clone + Send + 'static,
{
    let (downstream, resolvable) = pair::<T>();

    for candidate in &futures {
        if candidate.completed() {
            settle_from(&resolvable, candidate);
            cancel_all_except(&futures, candidate);
            return downstream;
        }
    }

    downstream.set_cancel_forward({
        let futures = futures.clone();
        move || {
            for f in &futures {
                f.cancel();
            }
        }
    });

    for future in futures.clone() {
        let resolvable = resolvable.clone();
        let others = futures.clone();
        future.on_context(Arc::clone(&context)).notify_on_completion(move |f| {
            settle_from(&resolvable, &f);
            cancel_all_except(&others, &f);
        });
    }

    downstream
}

fn settle_from<T: Clone>(resolvable: &Resolvable<T>, winner: &Future<T>) {
    match winner.state() {
        FutureState::Done => resolvable.resolve_with_value(winner.value().expect("Done carries a value")),
        FutureState::Failed => {
            resolvable.resolve_with_error(winner.error().expect("Failed carries an error"))
        }
        FutureState::Cancelled => {
            resolvable.cancel();
        }
        FutureState::Running => unreachable!(),
    }
}

fn cancel_all_except<T>(all: &[Future<T>], winner: &Future<T>)
where
    T: Send + 'static,
{
    for f in all {
        if !f.ptr_eq(winner) {
            f.cancel();
        }
    }
}
