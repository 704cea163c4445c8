//! The writable `Resolvable` handle exposed to producers.

use crate::error::ErrorInfo;
use crate::future::Future;
use crate::state::{Inner, Resolution};

/// The write view of a [`Future`]. Every `Future` is implemented atop a
/// resolvable record; combinators hand out only the read (`Future`) half of
/// the pair they build, keeping `resolve_with_value`/`resolve_with_error`/
/// `cancel` private to whoever produces the result.
pub struct Resolvable<T> {
    future: Future<T>,
}

impl<T> Clone for Resolvable<T> {
    fn clone(&self) -> Self {
        Resolvable { future: self.future.clone() }
    }
}

impl<T> Resolvable<T> {
    /// Attempts `Running -> Done(value)`. Silently ignored if the Future is
    /// already terminal.
    pub fn resolve_with_value(&self, value: T)
    where
        T: Send + 'static,
    {
        self.future.complete(Resolution::Done(value));
    }

    /// Attempts `Running -> Failed(error)`. Silently ignored if the Future
    /// is already terminal.
    pub fn resolve_with_error(&self, error: ErrorInfo)
    where
        T: Send + 'static,
    {
        self.future.complete(Resolution::Failed(error));
    }

    /// Cancels the Future this handle resolves. Equivalent to calling
    /// `cancel()` on the paired `Future` handle.
    pub fn cancel(&self) -> Future<()>
    where
        T: Send + 'static,
    {
        self.future.cancel()
    }

    /// Returns a new handle to the `Future` half of this pair.
    pub fn future(&self) -> Future<T> {
        self.future.clone()
    }
}

/// Creates a new `Running` Future together with the `Resolvable` handle that
/// resolves it.
pub fn pair<T>() -> (Future<T>, Resolvable<T>) {
    let inner = Inner::new(Resolution::Running);
    let future = Future::from_inner(inner);
    let resolvable = Resolvable { future: future.clone() };
    (future, resolvable)
}

/// A terminal `Future` already holding `value`.
pub fn value<T>(value: T) -> Future<T>
where
    T: Send + 'static,
{
    Future::from_inner(Inner::new(Resolution::Done(value)))
}

/// A terminal `Future` already holding `error`.
pub fn error<T>(error: ErrorInfo) -> Future<T>
where
    T: Send + 'static,
{
    Future::from_inner(Inner::new(Resolution::Failed(error)))
}
