use std::sync::Arc;

use crate::combinators::forward_cancel_to;
use crate::context::ExecutionContext;
use crate::future::Future;
use crate::resolvable::pair;
use crate::state::FutureState;

impl<T> Future<T> {
    /// If this Future resolves `Done(v)`, the returned Future resolves
    /// `Done(f(v))` dispatched on `context`. A failure or cancellation is
    /// mirrored without calling `f`.
    pub fn map<U, F>(&self, context: Arc<dyn ExecutionContext>, f: F) -> Future<U>
    where
        T: Clone + Send + 'static,
        U: Send + 'static,
        F: FnOnce(T) -> U + Send + 'static,
    {
        let (downstream, resolvable) = pair::<U>();
        forward_cancel_to(&downstream, self.clone());
        self.on_context(context).notify_on_completion(move |upstream| match upstream.state() {
            FutureState::Done => {
                let value = upstream.value().expect("Done carries a value");
                resolvable.resolve_with_value(f(value));
            }
            FutureState::Failed => {
                resolvable.resolve_with_error(upstream.error().expect("Failed carries an error"))
            }
            FutureState::Cancelled => {
                resolvable.cancel();
            }
            FutureState::Running => unreachable!(),
        });
        downstream
    }

    /// Monadic bind over success: if this Future resolves `Done(v)`,
    /// `f(v)` is invoked to produce a new Future whose terminal state the
    /// result adopts. A failure or cancellation is mirrored without
    /// calling `f`.
    pub fn fmap_on_success<U, F>(&self, context: Arc<dyn ExecutionContext>, f: F) -> Future<U>
    where
        T: Clone + Send + 'static,
        U: Clone + Send + 'static,
        F: FnOnce(T) -> Future<U> + Send + 'static,
    {
        let (downstream, resolvable) = pair::<U>();
        forward_cancel_to(&downstream, self.clone());
        self.on_context(context).notify_on_completion(move |upstream| match upstream.state() {
            FutureState::Done => {
                let value = upstream.value().expect("Done carries a value");
                let produced = f(value);
                downstream.set_cancel_forward({
                    let produced = produced.clone();
                    move || {
                        produced.cancel();
                    }
                });
                produced.on_context(crate::combinators::internal_context()).notify_on_completion(
                    move |inner| match inner.state() {
                        FutureState::Done => {
                            resolvable.resolve_with_value(inner.value().expect("Done carries a value"))
                        }
                        FutureState::Failed => {
                            resolvable.resolve_with_error(inner.error().expect("Failed carries an error"))
                        }
                        FutureState::Cancelled => {
                            resolvable.cancel();
                        }
                        FutureState::Running => unreachable!(),
                    },
                );
            }
            FutureState::Failed => {
                resolvable.resolve_with_error(upstream.error().expect("Failed carries an error"))
            }
            FutureState::Cancelled => {
                resolvable.cancel();
            }
            FutureState::Running => unreachable!(),
        });
        downstream
    }

    /// Like `fmap_on_success`, but `g` receives the upstream Future in any
    /// terminal state (success, failure, *or* translated to a new outcome)
    /// and may recover. If this Future is *cancelled*, `g` is never called
    /// and the result is simply cancelled.
    pub fn chain<U, F>(&self, context: Arc<dyn ExecutionContext>, g: F) -> Future<U>
    where
        T: Clone + Send + 'static,
        U: Clone + Send + 'static,
        F: FnOnce(Future<T>) -> Future<U> + Send + 'static,
    {
        let (downstream, resolvable) = pair::<U>();
        forward_cancel_to(&downstream, self.clone());
        self.on_context(context).notify_on_completion(move |upstream| {
            if upstream.state() == FutureState::Cancelled {
                resolvable.cancel();
                return;
            }
            let produced = g(upstream);
            downstream.set_cancel_forward({
                let produced = produced.clone();
                move || {
                    produced.cancel();
                }
            });
            produced.on_context(crate::combinators::internal_context()).notify_on_completion(
                move |inner| match inner.state() {
                    FutureState::Done => {
                        resolvable.resolve_with_value(inner.value().expect("Done carries a value"))
                    }
                    FutureState::Failed => {
                        resolvable.resolve_with_error(inner.error().expect("Failed carries an error"))
                    }
                    FutureState::Cancelled => {
                        resolvable.cancel();
                    }
                    FutureState::Running => unreachable!(),
                },
            );
        });
        downstream
    }

    /// If this Future fails, the returned Future resolves `Done(value)`;
    /// otherwise it mirrors this Future (including cancellation).
    pub fn fallback(&self, context: Arc<dyn ExecutionContext>, value: T) -> Future<T>
    where
        T: Clone + Send + 'static,
    {
        let (downstream, resolvable) = pair::<T>();
        forward_cancel_to(&downstream, self.clone());
        self.on_context(context).notify_on_completion(move |upstream| match upstream.state() {
            FutureState::Done => {
                resolvable.resolve_with_value(upstream.value().expect("Done carries a value"))
            }
            FutureState::Failed => resolvable.resolve_with_value(value),
            FutureState::Cancelled => {
                resolvable.cancel();
            }
            FutureState::Running => unreachable!(),
        });
        downstream
    }

    /// On successful completion of this Future, the returned Future adopts
    /// the terminal state of `other` (which may still be running at that
    /// moment). A failure or cancellation of `self` is mirrored without
    /// touching `other`.
    pub fn replace<U>(&self, context: Arc<dyn ExecutionContext>, other: Future<U>) -> Future<U>
    where
        T: Clone + Send + 'static,
        U: Clone + Send + 'static,
    {
        let (downstream, resolvable) = pair::<U>();
        forward_cancel_to(&downstream, self.clone());
        self.on_context(context).notify_on_completion(move |upstream| match upstream.state() {
            FutureState::Done => {
                downstream.set_cancel_forward({
                    let other = other.clone();
                    move || {
                        other.cancel();
                    }
                });
                other.on_context(crate::combinators::internal_context()).notify_on_completion(
                    move |inner| match inner.state() {
                        FutureState::Done => {
                            resolvable.resolve_with_value(inner.value().expect("Done carries a value"))
                        }
                        FutureState::Failed => {
                            resolvable.resolve_with_error(inner.error().expect("Failed carries an error"))
                        }
                        FutureState::Cancelled => {
                            resolvable.cancel();
                        }
                        FutureState::Running => unreachable!(),
                    },
                );
            }
            FutureState::Failed => {
                resolvable.resolve_with_error(upstream.error().expect("Failed carries an error"))
            }
            FutureState::Cancelled => {
                resolvable.cancel();
            }
            FutureState::Running => unreachable!(),
        });
        downstream
    }
}
