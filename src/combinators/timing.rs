use std::sync::Arc;
use std::time::Duration;

use crate::combinators::forward_cancel_to;
use crate::context::{DedicatedThread, ExecutionContext};
use crate::error::{ErrorInfo, FutureError};
use crate::future::Future;
use crate::resolvable::pair;
use crate::state::FutureState;

impl<T> Future<T> {
    /// Resolves with this Future's terminal state, but only after at least
    /// `duration` has elapsed since this Future itself completed.
    ///
    /// The delay is served off a dedicated thread (`std::thread::sleep`)
    /// rather than the supplied `context`, since `context` is where the
    /// *mirrored completion* is dispatched, not where the waiting happens.
    pub fn delay(&self, context: Arc<dyn ExecutionContext>, duration: Duration) -> Future<T>
    where
        T: Clone + Send + 'static,
    {
        let (downstream, resolvable) = pair::<T>();
        forward_cancel_to(&downstream, self.clone());
        let sleeper = Arc::new(DedicatedThread::new("vow-delay"));
        self.on_context(context).notify_on_completion(move |upstream| {
            let state = upstream.state();
            sleeper.execute(Box::new(move || {
                std::thread::sleep(duration);
                match state {
                    FutureState::Done => {
                        resolvable.resolve_with_value(upstream.value().expect("Done carries a value"))
                    }
                    FutureState::Failed => resolvable
                        .resolve_with_error(upstream.error().expect("Failed carries an error")),
                    FutureState::Cancelled => {
                        resolvable.cancel();
                    }
                    FutureState::Running => unreachable!(),
                }
            }));
        });
        downstream
    }

    /// Resolves with this Future's terminal state if it completes within
    /// `duration`; otherwise fails with a `Timeout` error carrying
    /// `description`. The upstream Future is left running past the
    /// deadline (see `timeout_and_cancel` for the cancelling variant).
    pub fn timeout_only(
        &self,
        context: Arc<dyn ExecutionContext>,
        duration: Duration,
        description: impl Into<String>,
    ) -> Future<T>
    where
        T: Clone + Send + 'static,
    {
        timeout_impl(self.clone(), context, duration, description.into(), false)
    }

    /// Identical to `timeout_only`, except on expiry it also calls
    /// `cancel()` on the upstream Future (fire-and-forget: the
    /// cancellation Future's own completion is not awaited).
    ///
    /// This is the crate's recommended default for new call sites: a timed
    /// out upstream that silently keeps running is the more common source
    /// of leaks (see DESIGN.md).
    pub fn timeout_and_cancel(
        &self,
        context: Arc<dyn ExecutionContext>,
        duration: Duration,
        description: impl Into<String>,
    ) -> Future<T>
    where
        T: Clone + Send + 'static,
    {
        timeout_impl(self.clone(), context, duration, description.into(), true)
    }
}

fn timeout_impl<T>(
    upstream: Future<T>,
    context: Arc<dyn ExecutionContext>,
    duration: Duration,
    description: String,
    cancel_upstream_on_expiry: bool,
) -> Future<T>
where
    T: Clone + Send + 'static,
{
    let (downstream, resolvable) = pair::<T>();
    forward_cancel_to(&downstream, upstream.clone());

    // First writer to `complete` wins, so the timer and the upstream
    // completion callback race harmlessly: only one of them will actually
    // flip the downstream's state.
    let timer_resolvable = resolvable.clone();
    let timer = Arc::new(DedicatedThread::new("vow-timeout"));
    let upstream_for_timer = upstream.clone();
    timer.execute(Box::new(move || {
        std::thread::sleep(duration);
        timer_resolvable
            .resolve_with_error(ErrorInfo::from(FutureError::Timeout { description }));
        if cancel_upstream_on_expiry {
            upstream_for_timer.cancel();
        }
    }));

    upstream.on_context(context).notify_on_completion(move |upstream| match upstream.state() {
        FutureState::Done => {
            resolvable.resolve_with_value(upstream.value().expect("Done carries a value"))
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
