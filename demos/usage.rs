//! Basic pipeline: resolve a value off a dedicated thread, transform it,
//! and block the main thread for the result.

use std::sync::Arc;
use std::time::Duration;

use vow::context::{inline, DedicatedThread};
use vow::{await_result, resolve};

fn main() {
    env_logger::init();

    let worker: Arc<dyn vow::ExecutionContext> = Arc::new(DedicatedThread::new("usage-worker"));

    let computed = resolve(Arc::clone(&worker), || {
        std::thread::sleep(Duration::from_millis(20));
        vow::value(21)
    });

    let doubled = computed.map(inline(), |v| v * 2);

    match await_result(&doubled, Duration::from_secs(1)) {
        Ok(value) => println!("result: {}", value),
        Err(err) => println!("pipeline did not complete: {}", err),
    }
}
