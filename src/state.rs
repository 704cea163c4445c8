//! The state record: the atomic holder of a Future's resolution, its
//! installed callbacks, and its cancellation machinery.

use parking_lot::{Condvar, Mutex};
use std::sync::Arc;

use crate::context::ExecutionContext;
use crate::error::ErrorInfo;
use crate::future::Future;

/// A snapshot of a Future's state, with no payload attached.
///
/// Monotonic: once a Future leaves `Running`, it never transitions out of
/// whatever terminal state it landed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FutureState {
    Running,
    Done,
    Failed,
    Cancelled,
}

impl FutureState {
    pub fn is_terminal(self) -> bool {
        !matches!(self, FutureState::Running)
    }
}

/// The resolution payload, combined into one enum rather than three nullable
/// fields (`value`, `error`, `completed`) so "present iff state = X" is
/// enforced by the type rather than by convention.
pub(crate) enum Resolution<T> {
    Running,
    Done(T),
    Failed(ErrorInfo),
    Cancelled,
}

impl<T> Resolution<T> {
    pub(crate) fn state(&self) -> FutureState {
        match self {
            Resolution::Running => FutureState::Running,
            Resolution::Done(_) => FutureState::Done,
            Resolution::Failed(_) => FutureState::Failed,
            Resolution::Cancelled => FutureState::Cancelled,
        }
    }
}

pub(crate) type Callback<T> = Box<dyn FnOnce(Future<T>) + Send>;
pub(crate) type Responder = Box<dyn FnOnce() -> Future<()> + Send>;
pub(crate) type ForwardCancel = Box<dyn FnOnce() + Send>;

pub(crate) struct Shared<T> {
    pub(crate) resolution: Resolution<T>,
    pub(crate) callbacks: Vec<(Arc<dyn ExecutionContext>, Callback<T>)>,
    pub(crate) responder: Option<Responder>,
    pub(crate) cancellation: Option<Future<()>>,
}

/// The state record proper: a single mutex guarding the payload, plus a
/// condvar for the blocking await adapter, plus a separate slot for the
/// backward cancellation hop a combinator wires to its upstream.
///
/// `cancel_forward` is kept in its own mutex rather than inside `Shared`
/// because it is fired *after* `Shared`'s lock has already been released
/// (see `Future::cancel`) and may itself call back into this or another
/// Future's `cancel`, which would deadlock if nested under the same guard.
pub(crate) struct Inner<T> {
    pub(crate) shared: Mutex<Shared<T>>,
    pub(crate) condvar: Condvar,
    pub(crate) cancel_forward: Mutex<Option<ForwardCancel>>,
}

impl<T> Inner<T> {
    pub(crate) fn new(resolution: Resolution<T>) -> Arc<Self> {
        Arc::new(Inner {
            shared: Mutex::new(Shared {
                resolution,
                callbacks: Vec::new(),
                responder: None,
                cancellation: None,
            }),
            condvar: Condvar::new(),
            cancel_forward: Mutex::new(None),
        })
    }
}
