//! End-to-end scenarios exercising the combinator algebra's terminal-state
//! and cancellation-propagation guarantees.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use vow::context::inline;
use vow::{all, error, pair, race, resolve_until, value, ErrorInfo, FutureState};

#[derive(Debug, Clone, PartialEq)]
enum Payload {
    Int(i32),
    Bool(bool),
}

#[test]
fn composite_success_resolves_in_order() {
    let (f1, r1) = pair::<Payload>();
    let (f2, r2) = pair::<Payload>();
    let (f3, r3) = pair::<Payload>();
    r1.resolve_with_value(Payload::Int(1));
    r2.resolve_with_value(Payload::Bool(false));
    r3.resolve_with_value(Payload::Int(10));

    let combined = all(inline(), vec![f1, f2, f3]);

    assert_eq!(combined.state(), FutureState::Done);
    assert_eq!(
        combined.value().unwrap(),
        vec![Payload::Int(1), Payload::Bool(false), Payload::Int(10)]
    );
}

#[test]
fn fmap_pipeline_short_circuits_on_error() {
    let (base, resolvable) = pair::<i32>();
    resolvable.resolve_with_value(1);

    let ran_third = Arc::new(AtomicBool::new(false));
    let ran_third_check = Arc::clone(&ran_third);

    let pipeline = base
        .map(inline(), |v| v + 1)
        .fmap_on_success(inline(), |_| error(ErrorInfo::new("scenario", 1)))
        .map(inline(), move |v: i32| {
            ran_third_check.store(true, Ordering::SeqCst);
            v
        });

    assert_eq!(pipeline.state(), FutureState::Failed);
    assert!(!ran_third.load(Ordering::SeqCst), "third map must not run once the pipeline failed");
}

#[test]
fn chain_skips_its_closure_when_upstream_is_cancelled() {
    let (base, _resolvable) = pair::<i32>();
    base.cancel();

    let ran = Arc::new(AtomicBool::new(false));
    let ran_check = Arc::clone(&ran);
    let pipeline = base.chain(inline(), move |_upstream| {
        ran_check.store(true, Ordering::SeqCst);
        value(0)
    });

    assert_eq!(pipeline.state(), FutureState::Cancelled);
    assert!(!ran.load(Ordering::SeqCst));
}

#[test]
fn race_cancels_the_losers() {
    let (p1, _r1) = pair::<i32>();
    let (p2, _r2) = pair::<i32>();
    let immediate = value(1);

    let winner = race(inline(), vec![p1.clone(), p2.clone(), immediate]);

    assert_eq!(winner.value(), Some(1));
    assert_eq!(p1.state(), FutureState::Cancelled);
    assert_eq!(p2.state(), FutureState::Cancelled);
}

#[test]
fn race_among_all_cancelled_inputs_is_cancelled() {
    let (f1, _r1) = pair::<i32>();
    f1.cancel();
    let (f2, _r2) = pair::<i32>();
    f2.cancel();
    let (f3, _r3) = pair::<i32>();
    f3.cancel();

    let raced = race(inline(), vec![f1, f2, f3]);

    assert_eq!(raced.state(), FutureState::Cancelled);
}

#[test]
fn resolve_until_retries_past_failures_then_succeeds() {
    let attempts = Arc::new(AtomicUsize::new(0));
    let attempts_job = Arc::clone(&attempts);

    let outer = resolve_until(inline(), move || {
        let n = attempts_job.fetch_add(1, Ordering::SeqCst);
        if n < 3 {
            error(ErrorInfo::new("scenario", n as i64))
        } else {
            value(true)
        }
    });

    assert_eq!(outer.state(), FutureState::Done);
    assert_eq!(outer.value(), Some(true));
    assert_eq!(attempts.load(Ordering::SeqCst), 4);
}

#[test]
fn resolve_until_stops_and_does_not_retry_after_a_cancelled_attempt() {
    let attempts = Arc::new(AtomicUsize::new(0));
    let attempts_job = Arc::clone(&attempts);

    let outer = resolve_until(inline(), move || {
        let n = attempts_job.fetch_add(1, Ordering::SeqCst);
        if n == 0 {
            error(ErrorInfo::new("scenario", 0))
        } else {
            let (attempt, attempt_resolvable) = pair::<bool>();
            attempt_resolvable.cancel();
            attempt
        }
    });

    assert_eq!(outer.state(), FutureState::Cancelled);
    assert_eq!(attempts.load(Ordering::SeqCst), 2);
}

#[test]
fn repeated_cancel_returns_the_identical_handle() {
    let (f, _resolvable) = pair::<i32>();
    let first = f.cancel();
    let second = f.cancel();
    assert!(first.ptr_eq(&second));
}
