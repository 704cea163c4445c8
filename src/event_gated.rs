//! A reference implementation of the "wait for the next event matching a
//! predicate" contract, in the style of a crash-log notifier: call
//! `start_listening()` once, then hand out any number of `next_event`
//! Futures, each of which resolves with the first event (after it was
//! created) that satisfies its own predicate.
//!
//! This is a demonstration of the contract, not a production event source:
//! events are fed in locally via [`EventGated::emit`] rather than tailed
//! from a real log.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc;
use std::thread;

use parking_lot::Mutex;

use crate::future::Future;
use crate::resolvable::{pair, Resolvable};

struct Waiter<T> {
    predicate: Box<dyn Fn(&T) -> bool + Send>,
    resolvable: Resolvable<T>,
}

/// Event-gated Future source, backed by an `mpsc`-fed background thread.
///
/// `start_listening` is idempotent: only the first call spawns the
/// dispatcher thread. Calling `emit` before `start_listening` is fine,
/// events simply queue in the channel until the thread starts draining it.
pub struct EventGated<T> {
    sender: mpsc::Sender<T>,
    receiver: Mutex<Option<mpsc::Receiver<T>>>,
    waiters: std::sync::Arc<Mutex<Vec<Waiter<T>>>>,
    started: AtomicBool,
}

impl<T> EventGated<T>
where
    T: Clone + Send + 'static,
{
    pub fn new() -> Self {
        let (sender, receiver) = mpsc::channel();
        EventGated {
            sender,
            receiver: Mutex::new(Some(receiver)),
            waiters: std::sync::Arc::new(Mutex::new(Vec::new())),
            started: AtomicBool::new(false),
        }
    }

    /// Feeds an event into the stream. Events emitted before
    /// `start_listening` simply queue.
    pub fn emit(&self, event: T) {
        // A closed receiver (listener thread gone) means there is nothing
        // left to notify; dropping the event is the right call here.
        let _ = self.sender.send(event);
    }

    /// Begins observing the event stream on a dedicated background thread.
    /// Idempotent: calls after the first are no-ops.
    pub fn start_listening(&self) {
        if self.started.swap(true, Ordering::AcqRel) {
            return;
        }
        let receiver = match self.receiver.lock().take() {
            Some(receiver) => receiver,
            None => return,
        };
        let waiters = std::sync::Arc::clone(&self.waiters);
        let spawned = thread::Builder::new().name("vow-event-gated".into()).spawn(move || {
            for event in receiver.iter() {
                dispatch(&event, &waiters);
            }
        });
        if let Err(err) = spawned {
            log::warn!("vow: failed to spawn event-gated listener thread: {}", err);
        }
    }

    /// Returns a Future resolving with the first event, observed after this
    /// call, for which `predicate` returns `true`. Matches are evaluated in
    /// event-arrival order; this Future matches at most one event.
    pub fn next_event<F>(&self, predicate: F) -> Future<T>
    where
        F: Fn(&T) -> bool + Send + 'static,
    {
        let (future, resolvable) = pair::<T>();
        self.waiters.lock().push(Waiter { predicate: Box::new(predicate), resolvable });
        future
    }
}

impl<T> Default for EventGated<T>
where
    T: Clone + Send + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

fn dispatch<T>(event: &T, waiters: &Mutex<Vec<Waiter<T>>>)
where
    T: Clone,
{
    let mut guard = waiters.lock();
    let pending = std::mem::take(&mut *guard);
    let mut remaining = Vec::with_capacity(pending.len());
    for waiter in pending {
        if (waiter.predicate)(event) {
            waiter.resolvable.resolve_with_value(event.clone());
        } else {
            remaining.push(waiter);
        }
    }
    *guard = remaining;
}
