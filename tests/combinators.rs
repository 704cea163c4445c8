//! Focused tests for individual combinators, the blocking await adapter, and
//! the event-gated Future contract.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use vow::context::{inline, DedicatedThread, ExecutionContext};
use vow::{await_result, error, pair, resolve_when, value, AwaitError, ErrorInfo, EventGated, FutureState};

#[test]
fn map_transforms_a_successful_value() {
    let mapped = value(2).map(inline(), |v| v * 10);
    assert_eq!(mapped.value(), Some(20));
}

#[test]
fn fallback_recovers_from_a_failure() {
    let failed = error::<i32>(ErrorInfo::new("combinators", 1));
    let recovered = failed.fallback(inline(), 99);
    assert_eq!(recovered.value(), Some(99));
}

#[test]
fn fallback_leaves_a_success_untouched() {
    let recovered = value(5).fallback(inline(), 99);
    assert_eq!(recovered.value(), Some(5));
}

#[test]
fn replace_adopts_the_other_futures_terminal_state() {
    let base = value(());
    let (other, other_resolvable) = pair::<i32>();
    other_resolvable.resolve_with_value(7);

    let replaced = base.replace(inline(), other);
    assert_eq!(replaced.value(), Some(7));
}

#[test]
fn replace_mirrors_a_failure_without_touching_other() {
    let base = error::<()>(ErrorInfo::new("combinators", 2));
    let (other, _other_resolvable) = pair::<i32>();

    let replaced = base.replace(inline(), other.clone());
    assert_eq!(replaced.state(), FutureState::Failed);
    assert_eq!(other.state(), FutureState::Running);
}

#[test]
fn timeout_only_fails_without_touching_upstream() {
    let (pending, _resolvable) = pair::<i32>();
    let timed = pending.timeout_only(inline(), Duration::from_millis(30), "slow op");

    let outcome = await_result(&timed, Duration::from_secs(1));
    match outcome {
        Err(AwaitError::Failed(e)) => assert_eq!(e.domain(), vow::error::LIBRARY_ERROR_DOMAIN),
        other => panic!("expected a Failed timeout error, got {:?}", other),
    }
    assert_eq!(pending.state(), FutureState::Running);
}

#[test]
fn timeout_and_cancel_also_cancels_upstream() {
    let (pending, _resolvable) = pair::<i32>();
    let timed = pending.timeout_and_cancel(inline(), Duration::from_millis(30), "slow op");

    let _ = await_result(&timed, Duration::from_secs(1));
    // the forwarded cancel fires off the timeout's own dedicated thread.
    for _ in 0..20 {
        if pending.state() == FutureState::Cancelled {
            break;
        }
        std::thread::sleep(Duration::from_millis(10));
    }
    assert_eq!(pending.state(), FutureState::Cancelled);
}

#[test]
fn delay_postpones_resolution_by_roughly_the_requested_duration() {
    let start = Instant::now();
    let delayed = value(5).delay(inline(), Duration::from_millis(40));
    let v = await_result(&delayed, Duration::from_secs(1)).unwrap();
    assert_eq!(v, 5);
    assert!(start.elapsed() >= Duration::from_millis(35));
}

#[test]
fn resolve_when_resolves_once_the_predicate_turns_true() {
    let flag = Arc::new(AtomicBool::new(false));
    let flag_job = Arc::clone(&flag);
    let ctx: Arc<dyn ExecutionContext> = Arc::new(DedicatedThread::new("resolve-when-test"));

    let done = resolve_when(ctx, Duration::from_millis(10), move || flag_job.load(Ordering::SeqCst));

    std::thread::sleep(Duration::from_millis(25));
    flag.store(true, Ordering::SeqCst);

    let result = await_result(&done, Duration::from_secs(2)).unwrap();
    assert!(result);
}

#[test]
fn respond_to_cancellation_runs_exactly_once_on_cancel() {
    let (f, _resolvable) = pair::<i32>();
    let ran = Arc::new(AtomicBool::new(false));
    let ran_job = Arc::clone(&ran);

    let guarded = f.respond_to_cancellation(inline(), move || {
        ran_job.store(true, Ordering::SeqCst);
        value(())
    });

    f.cancel();

    assert!(ran.load(Ordering::SeqCst));
    assert_eq!(guarded.state(), FutureState::Cancelled);
}

#[test]
fn event_gated_matches_in_arrival_order_and_at_most_once() {
    let gated: EventGated<i32> = EventGated::new();
    gated.start_listening();

    let first_even = gated.next_event(|v: &i32| v % 2 == 0);

    gated.emit(1);
    gated.emit(3);
    gated.emit(4);
    gated.emit(6);

    let matched = await_result(&first_even, Duration::from_secs(1)).unwrap();
    assert_eq!(matched, 4);
}
