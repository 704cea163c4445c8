//! Debounce: each call to `trigger` cancels any previously pending delay and
//! starts a fresh one. The wrapped action only runs once `window` has
//! elapsed without a new trigger.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use vow::context::{inline, DedicatedThread};
use vow::{value, Future};

struct Debouncer {
    window: Duration,
    timer: Arc<dyn vow::ExecutionContext>,
    pending: Mutex<Option<Future<()>>>,
}

impl Debouncer {
    fn new(window: Duration) -> Self {
        Debouncer { window, timer: Arc::new(DedicatedThread::new("debounce")), pending: Mutex::new(None) }
    }

    fn trigger(&self, action: impl FnOnce() + Send + 'static) {
        if let Some(previous) = self.pending.lock().take() {
            previous.cancel();
        }
        let delayed = value(()).delay(Arc::clone(&self.timer), self.window);
        *self.pending.lock() = Some(delayed.clone());
        delayed.on_context(inline()).notify_on_completion(move |f| {
            if f.state() == vow::FutureState::Done {
                action();
            }
        });
    }
}

fn main() {
    env_logger::init();
    let debouncer = Debouncer::new(Duration::from_millis(50));

    debouncer.trigger(|| println!("first (should be cancelled)"));
    std::thread::sleep(Duration::from_millis(10));
    debouncer.trigger(|| println!("second (should be cancelled)"));
    std::thread::sleep(Duration::from_millis(10));
    debouncer.trigger(|| println!("third (fires after the window)"));

    std::thread::sleep(Duration::from_millis(200));
}
