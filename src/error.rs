//! Structured errors carried by a [`Future`](crate::future::Future) and raised
//! by the combinator library itself.

use std::collections::BTreeMap;
use std::fmt;

/// The opaque structured error carried by a `Future` in the `Failed` state.
///
/// Modeled as a small, cheap-to-clone, cheap-to-log struct rather than a boxed
/// `dyn Error` so it can be read non-destructively from multiple installed
/// callbacks (see [`crate::future::Future::error`]).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorInfo {
    domain: String,
    code: i64,
    payload: BTreeMap<String, String>,
}

impl ErrorInfo {
    /// Builds a new `ErrorInfo` with an empty payload.
    pub fn new(domain: impl Into<String>, code: i64) -> Self {
        ErrorInfo { domain: domain.into(), code, payload: BTreeMap::new() }
    }

    /// Attaches a key/value pair to the error's payload, builder-style.
    pub fn with_detail(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.payload.insert(key.into(), value.into());
        self
    }

    pub fn domain(&self) -> &str {
        &self.domain
    }

    pub fn code(&self) -> i64 {
        self.code
    }

    pub fn payload(&self) -> &BTreeMap<String, String> {
        &self.payload
    }
}

impl fmt::Display for ErrorInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.domain, self.code)?;
        if !self.payload.is_empty() {
            write!(f, " {:?}", self.payload)?;
        }
        Ok(())
    }
}

impl std::error::Error for ErrorInfo {}

/// The well-known error domain used by errors the library itself raises
/// (as opposed to ones passed in through `resolve_with_error`).
pub const LIBRARY_ERROR_DOMAIN: &str = "vow";

/// Errors the combinator library raises on behalf of the caller, distinct
/// from arbitrary `User` errors passed to `resolve_with_error`.
#[derive(Debug, thiserror::Error, Clone)]
pub enum FutureError {
    /// Raised by `timeout_only`/`timeout_and_cancel` and by `await_result`
    /// when the deadline elapses before the upstream Future completes.
    #[error("future timed out: {description}")]
    Timeout { description: String },

    /// Raised on the cancellation-future when a `respond_to_cancellation`
    /// handler itself fails; never surfaces on the primary Future, which
    /// remains `Cancelled`.
    #[error("cancellation responder failed: {0}")]
    Responder(#[source] Box<ErrorInfo>),
}

impl From<FutureError> for ErrorInfo {
    fn from(err: FutureError) -> Self {
        match err {
            FutureError::Timeout { description } => {
                ErrorInfo::new(LIBRARY_ERROR_DOMAIN, 1).with_detail("description", description)
            }
            FutureError::Responder(inner) => ErrorInfo::new(LIBRARY_ERROR_DOMAIN, 2)
                .with_detail("cause", inner.to_string()),
        }
    }
}

/// The outcome of [`crate::await_result::await_result`]: a terminal `Future`
/// state translated into a blocking-friendly `Result`.
#[derive(Debug, thiserror::Error, Clone)]
pub enum AwaitError {
    #[error("future was cancelled")]
    Cancelled,

    #[error("future failed: {0}")]
    Failed(ErrorInfo),

    #[error("timed out waiting for future")]
    TimedOut,
}
