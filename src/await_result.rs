//! The blocking bridge out of the callback world, for call sites (tests,
//! `main`, FFI boundaries) that have no execution context of their own to
//! hand the library and just need a plain `Result`.

use std::time::Duration;

use crate::error::AwaitError;
use crate::future::Future;
use crate::state::FutureState;

/// Blocks the calling thread until `future` is terminal or `timeout`
/// elapses, translating the terminal state into a `Result`.
///
/// This does not install a callback and does not require an
/// [`ExecutionContext`](crate::context::ExecutionContext): it parks the
/// calling thread on the Future's internal condvar. Prefer
/// `on_context`/`notify_on_completion` in any code that must not block a
/// thread (an event loop, an async runtime's worker).
pub fn await_result<T>(future: &Future<T>, timeout: Duration) -> Result<T, AwaitError>
where
    T: Clone,
{
    match future.wait(timeout) {
        FutureState::Done => Ok(future.value().expect("Done carries a value")),
        FutureState::Failed => Err(AwaitError::Failed(future.error().expect("Failed carries an error"))),
        FutureState::Cancelled => Err(AwaitError::Cancelled),
        FutureState::Running => Err(AwaitError::TimedOut),
    }
}
