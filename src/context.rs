//! The execution-context abstraction used to deliver completion callbacks.
//!
//! The library does not provide an execution engine or thread pool of its
//! own (see the crate-level Non-goals); it dispatches onto whatever context
//! the caller supplies. A handful of reference contexts are shipped for
//! tests and for simple programs that don't already own a runtime.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;

/// A unit of work scheduled on an [`ExecutionContext`].
pub type Job = Box<dyn FnOnce() + Send>;

/// An opaque target accepting "run this unit of work".
///
/// Implementations may wrap thread pools, serial queues, a single dedicated
/// thread, or (as below) a runtime handle. `execute` must not block
/// indefinitely on behalf of unrelated callers; it only needs to arrange for
/// `job` to run eventually.
pub trait ExecutionContext: Send + Sync {
    fn execute(&self, job: Job);
}

/// Returns a fresh handle to the [`Inline`] context.
///
/// `Inline` is zero-sized, so this is just a pointer-sized allocation; it
/// exists so call sites don't need to construct `Arc::new(Inline)` by hand.
pub fn inline() -> Arc<dyn ExecutionContext> {
    Arc::new(Inline)
}

/// Runs the job synchronously on the calling thread.
///
/// This is the one context the crate recommends for tests: it makes
/// callback ordering trivially observable and never introduces the
/// surprise reentrancy that installing a callback on an already-complete
/// Future would otherwise avoid (see `Future::on_context`'s documentation).
#[derive(Debug, Default, Clone, Copy)]
pub struct Inline;

impl ExecutionContext for Inline {
    fn execute(&self, job: Job) {
        job();
    }
}

/// Spawns one short-lived OS thread per scheduled job.
///
/// Useful for blocking producers (`resolve`'s `producer` closures, the
/// dedicated-thread half of `EventGated`) where a full thread pool would be
/// overkill. Threads are named `"{prefix}-{n}"` for easier debugging.
pub struct DedicatedThread {
    name_prefix: &'static str,
    counter: AtomicUsize,
}

impl DedicatedThread {
    pub fn new(name_prefix: &'static str) -> Self {
        DedicatedThread { name_prefix, counter: AtomicUsize::new(0) }
    }
}

impl ExecutionContext for DedicatedThread {
    fn execute(&self, job: Job) {
        let id = self.counter.fetch_add(1, Ordering::Relaxed);
        let name = format!("{}-{}", self.name_prefix, id);
        let spawned = thread::Builder::new().name(name).spawn(move || job());
        if let Err(err) = spawned {
            log::warn!("vow: failed to spawn dedicated thread for callback dispatch: {}", err);
        }
    }
}

/// Adapts a `tokio::runtime::Handle` into an [`ExecutionContext`].
///
/// Jobs are run via `spawn_blocking` since `Job` is a synchronous closure,
/// not a `Future`; this keeps the core library independent of any
/// particular async runtime while still letting Tokio-based programs reuse
/// their existing thread pool instead of spinning up dedicated threads.
#[cfg(feature = "tokio-context")]
pub struct TokioHandleContext {
    handle: tokio::runtime::Handle,
}

#[cfg(feature = "tokio-context")]
impl TokioHandleContext {
    pub fn new(handle: tokio::runtime::Handle) -> Self {
        TokioHandleContext { handle }
    }
}

#[cfg(feature = "tokio-context")]
impl ExecutionContext for TokioHandleContext {
    fn execute(&self, job: Job) {
        // Fire-and-forget: ExecutionContext::execute has no return channel,
        // so the JoinHandle is intentionally dropped.
        let _ = self.handle.spawn_blocking(job);
    }
}
