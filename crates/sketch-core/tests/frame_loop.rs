//! Integration tests: frame loop lifecycle (register / cancel / reset).

mod support;

use pretty_assertions::assert_eq;
use sketch_core::SketchError;
use std::cell::RefCell;
use std::rc::Rc;
use support::*;

fn recorder() -> Rc<RefCell<Vec<&'static str>>> {
    Rc::new(RefCell::new(Vec::new()))
}

// ─── Activation ─────────────────────────────────────────────────────────

#[test]
fn loop_is_inactive_until_first_registration() {
    let (session, scheduler, _) = make_session();
    assert!(!session.is_running());
    assert_eq!(scheduler.pending(), 0);

    session.register(|_| {}).unwrap();
    assert!(session.is_running());
    assert_eq!(scheduler.pending(), 1);
}

#[test]
fn many_registrations_share_one_loop() {
    let (session, scheduler, _) = make_session();
    let log = recorder();

    for name in ["a", "b", "c"] {
        let log = Rc::clone(&log);
        session.register(move |_| log.borrow_mut().push(name)).unwrap();
    }
    assert_eq!(scheduler.pending(), 1, "only one frame request outstanding");

    assert_eq!(scheduler.tick(), 1);
    assert_eq!(*log.borrow(), vec!["a", "b", "c"]);

    assert_eq!(scheduler.tick(), 1);
    assert_eq!(*log.borrow(), vec!["a", "b", "c", "a", "b", "c"]);
}

#[test]
fn loop_rearms_itself_every_tick() {
    let (session, scheduler, _) = make_session();
    let count = Rc::new(RefCell::new(0));
    let c = Rc::clone(&count);
    session.register(move |_| *c.borrow_mut() += 1).unwrap();

    for _ in 0..100 {
        assert_eq!(scheduler.tick(), 1);
    }
    assert_eq!(*count.borrow(), 100);
    assert_eq!(scheduler.pending(), 1);
    assert!(session.is_running());
}

// ─── Cancellation ───────────────────────────────────────────────────────

#[test]
fn cancel_keeps_callbacks_and_stops_ticks() {
    let (session, scheduler, _) = make_session();
    session.register(|_| {}).unwrap();
    session.cancel_loop();

    assert!(!session.is_running());
    assert_eq!(scheduler.pending(), 0);
    assert_eq!(session.callback_count(), 1);
}

#[test]
fn cancel_when_inactive_is_noop() {
    let (session, scheduler, _) = make_session();
    session.cancel_loop();
    session.cancel_loop();
    assert!(!session.is_running());
    assert_eq!(scheduler.pending(), 0);
}

#[test]
fn cancel_then_register_restarts_exactly_one_loop() {
    let (session, scheduler, _) = make_session();
    let log = recorder();
    let l = Rc::clone(&log);
    session.register(move |_| l.borrow_mut().push("first")).unwrap();
    session.cancel_loop();

    let l = Rc::clone(&log);
    session.register(move |_| l.borrow_mut().push("second")).unwrap();
    assert_eq!(scheduler.pending(), 1);

    scheduler.tick();
    assert_eq!(*log.borrow(), vec!["first", "second"]);
    assert_eq!(scheduler.pending(), 1);
}

#[test]
fn stale_frame_from_cancelled_loop_is_ignored() {
    let (session, scheduler, _) = make_session();
    scheduler.ignore_cancel.set(true);

    let log = recorder();
    let l = Rc::clone(&log);
    session.register(move |_| l.borrow_mut().push("tick")).unwrap();
    session.cancel_loop();
    session.register(|_| {}).unwrap();

    // Host still delivers the cancelled request alongside the new one.
    assert_eq!(scheduler.pending(), 2);
    scheduler.tick();
    assert_eq!(*log.borrow(), vec!["tick"]);
    assert_eq!(scheduler.pending(), 1, "no duplicate loop survives");
}

#[test]
fn cancel_inside_callback_stops_after_current_tick() {
    let (session, scheduler, _) = make_session();
    let log = recorder();

    let handle = session.clone();
    let l = Rc::clone(&log);
    session
        .register(move |_| {
            l.borrow_mut().push("one");
            handle.cancel_loop();
        })
        .unwrap();
    let l = Rc::clone(&log);
    session.register(move |_| l.borrow_mut().push("two")).unwrap();

    scheduler.tick();
    // Tick in flight completes.
    assert_eq!(*log.borrow(), vec!["one", "two"]);
    assert!(!session.is_running());
    assert_eq!(scheduler.pending(), 0);
    assert_eq!(scheduler.tick(), 0);
}

#[test]
fn registration_inside_callback_runs_from_next_tick() {
    let (session, scheduler, _) = make_session();
    let log = recorder();

    let handle = session.clone();
    let l = Rc::clone(&log);
    let mut added = false;
    session
        .register(move |_| {
            l.borrow_mut().push("outer");
            if !added {
                added = true;
                let l = Rc::clone(&l);
                handle.register(move |_| l.borrow_mut().push("inner")).unwrap();
            }
        })
        .unwrap();

    scheduler.tick();
    assert_eq!(*log.borrow(), vec!["outer"]);
    assert_eq!(scheduler.pending(), 1);

    scheduler.tick();
    assert_eq!(*log.borrow(), vec!["outer", "outer", "inner"]);
}

// ─── Reset ──────────────────────────────────────────────────────────────

#[test]
fn reset_clears_callbacks_and_ticks() {
    let (session, scheduler, created) = make_session();
    session.register(|_| {}).unwrap();
    session.register(|_| {}).unwrap();
    scheduler.tick();

    session.reset();
    assert_eq!(session.callback_count(), 0);
    assert!(!session.is_running());
    assert_eq!(scheduler.tick(), 0);
    // Surface survives a reset.
    assert_eq!(created.get(), 1);
}

#[test]
fn run_frame_after_reset_invokes_nothing() {
    let (session, _, _) = make_session();
    let log = recorder();
    let l = Rc::clone(&log);
    session.register(move |_| l.borrow_mut().push("x")).unwrap();
    session.reset();

    session.run_frame().unwrap();
    assert!(log.borrow().is_empty());
}

#[test]
fn register_after_reset_starts_fresh() {
    let (session, scheduler, _) = make_session();
    session.register(|_| {}).unwrap();
    session.reset();

    let log = recorder();
    let l = Rc::clone(&log);
    session.register(move |_| l.borrow_mut().push("new")).unwrap();
    scheduler.tick();
    assert_eq!(*log.borrow(), vec!["new"]);
    assert_eq!(session.callback_count(), 1);
}

// ─── Failures ───────────────────────────────────────────────────────────

#[test]
fn rejected_frame_request_surfaces_error() {
    let (session, scheduler, _) = make_session();
    scheduler.reject.set(true);

    let err = session.register(|_| {}).unwrap_err();
    assert!(matches!(err, SketchError::Scheduler(_)));
    assert!(!session.is_running());
    // The callback is kept; a later registration can still start the loop.
    scheduler.reject.set(false);
    session.register(|_| {}).unwrap();
    assert!(session.is_running());
    assert_eq!(session.callback_count(), 2);
}

#[test]
fn dropping_session_cancels_pending_frame() {
    let (session, scheduler, _) = make_session();
    session.register(|_| {}).unwrap();
    drop(session);
    assert_eq!(scheduler.pending(), 0);
}
