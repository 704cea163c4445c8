//! The read-only `Future` handle: state queries, callback installation, and
//! cancellation.

use std::sync::Arc;
use std::time::Duration;

use crate::context::{inline, ExecutionContext};
use crate::error::ErrorInfo;
use crate::resolvable::pair;
use crate::state::{Callback, FutureState, Inner, Resolution};

/// A single-resolution asynchronous result.
///
/// Cloning a `Future` is cheap (an `Arc` bump) and yields a handle to the
/// *same* underlying state record, which is what lets `cancel()` return an
/// identical handle across repeated calls and lets many callbacks observe
/// the same completion.
///
/// `T` is generally expected to implement `Clone`: several methods
/// (`value`, the transformation combinators) hand a copy of the resolved
/// value to every interested callback, the same way `futures::future::Shared`
/// requires `Output: Clone` for an analogous reason.
pub struct Future<T> {
    pub(crate) inner: Arc<Inner<T>>,
}

impl<T> Clone for Future<T> {
    fn clone(&self) -> Self {
        Future { inner: Arc::clone(&self.inner) }
    }
}

impl<T> Future<T> {
    pub(crate) fn from_inner(inner: Arc<Inner<T>>) -> Self {
        Future { inner }
    }

    /// Two handles refer to the same state record iff their `Arc`s are the
    /// same allocation. Used to assert `cancel()`'s identity guarantee.
    pub fn ptr_eq(&self, other: &Future<T>) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    pub fn state(&self) -> FutureState {
        self.inner.shared.lock().resolution.state()
    }

    pub fn completed(&self) -> bool {
        self.state().is_terminal()
    }

    /// The resolved value, if `state() == Done`. Requires `T: Clone` since
    /// every installed callback (and every caller of this method) may read
    /// it independently (see the struct-level docs).
    pub fn value(&self) -> Option<T>
    where
        T: Clone,
    {
        match &self.inner.shared.lock().resolution {
            Resolution::Done(v) => Some(v.clone()),
            _ => None,
        }
    }

    /// The failure, if `state() == Failed`.
    pub fn error(&self) -> Option<ErrorInfo> {
        match &self.inner.shared.lock().resolution {
            Resolution::Failed(e) => Some(e.clone()),
            _ => None,
        }
    }

    /// Starts building a callback installation: `future.on_context(ctx).notify_on_completion(cb)`.
    pub fn on_context(&self, context: Arc<dyn ExecutionContext>) -> ContextBuilder<'_, T> {
        ContextBuilder { future: self, context }
    }

    pub(crate) fn install_callback(&self, context: Arc<dyn ExecutionContext>, callback: Callback<T>)
    where
        T: Send + 'static,
    {
        let mut guard = self.inner.shared.lock();
        if matches!(guard.resolution, Resolution::Running) {
            guard.callbacks.push((context, callback));
        } else {
            drop(guard);
            // Always hop through the context, even though the Future is
            // already complete, so installing on a completed Future never
            // reenters the installing thread as a surprise (see DESIGN.md).
            let future = self.clone();
            context.execute(Box::new(move || callback(future)));
        }
    }

    /// Sets the closure that will be fired, best-effort and exactly once,
    /// the first time this Future transitions to `Cancelled`. Combinators
    /// use this to hop `cancel()` calls backward to their upstream; calling
    /// it again simply retargets the hop (used by `chain`/`resolve_until`
    /// as the "current producer" in a pipeline changes).
    pub(crate) fn set_cancel_forward<F>(&self, forward: F)
    where
        F: FnOnce() + Send + 'static,
    {
        *self.inner.cancel_forward.lock() = Some(Box::new(forward));
    }

    pub(crate) fn clear_cancel_forward(&self) {
        self.inner.cancel_forward.lock().take();
    }

    /// Attempts `Running -> Done(value)`. A no-op on a terminal Future.
    pub(crate) fn complete(&self, resolution: Resolution<T>) -> bool
    where
        T: Send + 'static,
    {
        let mut guard = self.inner.shared.lock();
        if !matches!(guard.resolution, Resolution::Running) {
            return false;
        }
        guard.resolution = resolution;
        let callbacks = std::mem::take(&mut guard.callbacks);
        // A responder only ever fires on the Cancelled path (see `cancel`);
        // on ordinary completion it is simply dropped, never invoked.
        guard.responder = None;
        drop(guard);

        log::trace!("future resolved: {:?}", self.state());
        self.inner.condvar.notify_all();
        self.clear_cancel_forward();
        dispatch(self.clone(), callbacks);
        true
    }

    /// Cancels this Future. Idempotent: repeated calls return the exact
    /// same `Future<()>` handle, and calling `cancel` on an already-terminal
    /// Future never re-invokes a responder.
    pub fn cancel(&self) -> Future<()>
    where
        T: Send + 'static,
    {
        let mut guard = self.inner.shared.lock();
        if let Some(existing) = &guard.cancellation {
            return existing.clone();
        }

        let (cancel_future, cancel_resolvable) = pair::<()>();
        guard.cancellation = Some(cancel_future.clone());

        let was_running = matches!(guard.resolution, Resolution::Running);
        if was_running {
            guard.resolution = Resolution::Cancelled;
        }
        let callbacks = if was_running { std::mem::take(&mut guard.callbacks) } else { Vec::new() };
        let responder = if was_running { guard.responder.take() } else { None };
        drop(guard);

        if !was_running {
            // Invariant 5: no-op on a terminal Future, cancellation Future
            // resolves Done immediately, responder is not touched.
            cancel_resolvable.resolve_with_value(());
            return cancel_future;
        }

        log::trace!("future cancelled");
        self.inner.condvar.notify_all();
        dispatch(self.clone(), callbacks);

        if let Some(forward) = self.inner.cancel_forward.lock().take() {
            forward();
        }

        match responder {
            Some(responder) => {
                let handler_future = responder();
                handler_future.on_context(inline()).notify_on_completion(move |h| {
                    match h.state() {
                        FutureState::Done => cancel_resolvable.resolve_with_value(()),
                        FutureState::Failed => {
                            let err = h.error().expect("Failed state carries an error");
                            log::warn!("cancellation responder failed: {}", err);
                            let wrapped = crate::error::FutureError::Responder(Box::new(err));
                            cancel_resolvable.resolve_with_error(wrapped.into());
                        }
                        FutureState::Cancelled | FutureState::Running => {
                            cancel_resolvable.resolve_with_value(())
                        }
                    }
                });
            }
            None => cancel_resolvable.resolve_with_value(()),
        }

        cancel_future
    }

    /// Installs `handler` to run exactly when this Future transitions to
    /// `Cancelled`. Only the first `respond_to_cancellation` on a given
    /// Future is wired; later calls are silently discarded (Invariant 6).
    /// Returns a Future that mirrors this Future's terminal state.
    pub fn respond_to_cancellation<F>(&self, context: Arc<dyn ExecutionContext>, handler: F) -> Future<T>
    where
        T: Clone + Send + 'static,
        F: FnOnce() -> Future<()> + Send + 'static,
    {
        {
            let mut guard = self.inner.shared.lock();
            if matches!(guard.resolution, Resolution::Running) && guard.responder.is_none() {
                let context = Arc::clone(&context);
                guard.responder = Some(Box::new(move || {
                    let (marker, resolvable) = pair::<()>();
                    context.execute(Box::new(move || {
                        let outcome = handler();
                        let resolvable = resolvable;
                        outcome.on_context(inline()).notify_on_completion(move |o| {
                            match o.state() {
                                FutureState::Done => resolvable.resolve_with_value(()),
                                FutureState::Failed => resolvable.resolve_with_error(
                                    o.error().expect("Failed carries an error"),
                                ),
                                FutureState::Cancelled | FutureState::Running => {
                                    resolvable.resolve_with_value(())
                                }
                            }
                        });
                    }));
                    marker
                }));
            }
        }
        crate::combinators::mirror(self.clone())
    }

    /// Blocks the calling thread until this Future is terminal or `timeout`
    /// elapses. See `crate::await_result` for the public entry point that
    /// surfaces `AwaitError`.
    pub(crate) fn wait(&self, timeout: Duration) -> FutureState {
        let mut guard = self.inner.shared.lock();
        let deadline = std::time::Instant::now() + timeout;
        while matches!(guard.resolution, Resolution::Running) {
            let remaining = deadline.saturating_duration_since(std::time::Instant::now());
            if remaining.is_zero() {
                break;
            }
            let result = self.inner.condvar.wait_for(&mut guard, remaining);
            if result.timed_out() {
                break;
            }
        }
        guard.resolution.state()
    }
}

/// Returned by [`Future::on_context`]; call `notify_on_completion` to finish
/// installing the callback.
pub struct ContextBuilder<'f, T> {
    future: &'f Future<T>,
    context: Arc<dyn ExecutionContext>,
}

impl<'f, T> ContextBuilder<'f, T> {
    /// Installs `callback` and returns the Future again for chaining.
    pub fn notify_on_completion<F>(self, callback: F) -> Future<T>
    where
        F: FnOnce(Future<T>) + Send + 'static,
        T: Send + 'static,
    {
        self.future.install_callback(self.context, Box::new(callback));
        self.future.clone()
    }
}

pub(crate) fn dispatch<T>(future: Future<T>, callbacks: Vec<(Arc<dyn ExecutionContext>, Callback<T>)>)
where
    T: Send + 'static,
{
    for (context, callback) in callbacks {
        let future = future.clone();
        context.execute(Box::new(move || callback(future)));
    }
}
