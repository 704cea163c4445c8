//! A single-resolution asynchronous result type with a cancellation-aware
//! combinator algebra and caller-supplied execution contexts.
//!
//! A [`Future`] starts `Running` and moves exactly once to `Done(value)`,
//! `Failed(error)`, or `Cancelled`. Unlike `std::future::Future`, nothing
//! here is polled: producers push a result in through a [`Resolvable`]
//! handle, and interested parties register callbacks that are dispatched on
//! an [`ExecutionContext`] of their choosing.
//!
//! # Example
//! ```
//! use std::time::Duration;
//! use vow::context::inline;
//! use vow::{await_result, pair};
//!
//! let (future, resolvable) = pair::<i32>();
//! resolvable.resolve_with_value(41);
//! let doubled = future.map(inline(), |v| v + 1);
//! assert_eq!(await_result(&doubled, Duration::from_millis(10)).unwrap(), 42);
//! ```

pub mod await_result;
pub mod combinators;
pub mod context;
pub mod error;
pub mod event_gated;
pub mod resolvable;
mod state;

mod future;

pub use await_result::await_result;
pub use combinators::{all, race, resolve, resolve_until, resolve_when, DEFAULT_POLL_INTERVAL};
pub use context::ExecutionContext;
pub use error::{AwaitError, ErrorInfo, FutureError};
pub use event_gated::EventGated;
pub use future::{ContextBuilder, Future};
pub use resolvable::{error, pair, value, Resolvable};
pub use state::FutureState;
