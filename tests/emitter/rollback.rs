//! Tests for `rollback_scope`.

use evented::{rollback_scope, Emitter, EmitterError, MetaEvent};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

#[derive(Debug, thiserror::Error, PartialEq)]
enum ConnectError {
    #[error("refused")]
    Refused,
    #[error("registration failed: {0}")]
    Registration(String),
}

impl From<EmitterError> for ConnectError {
    fn from(e: EmitterError) -> Self {
        Self::Registration(e.to_string())
    }
}

#[test]
fn failed_action_removes_listener_and_returns_error_unchanged() {
    let emitter: Emitter<&'static str> = Emitter::new();
    assert_eq!(emitter.listener_count(&"connect"), 0);

    let result: Result<(), ConnectError> = rollback_scope(
        &emitter,
        "connect",
        |_: ()| Ok(()),
        false,
        || Err(ConnectError::Refused),
    );

    assert_eq!(result, Err(ConnectError::Refused));
    assert_eq!(emitter.listener_count(&"connect"), 0);
}

#[test]
fn successful_action_keeps_listener_and_returns_value() {
    let emitter: Emitter<&'static str> = Emitter::new();
    let calls = Arc::new(AtomicUsize::new(0));
    let calls_clone = Arc::clone(&calls);

    let port = emitter
        .rollback_scope(
            "connect",
            move |_: ()| {
                calls_clone.fetch_add(1, Ordering::SeqCst);
                Ok(())
            },
            false,
            || Ok::<_, ConnectError>(8080_u16),
        )
        .unwrap();

    assert_eq!(port, 8080);
    assert_eq!(emitter.listener_count(&"connect"), 1);
    emitter.emit(&"connect", ()).unwrap();
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[test]
fn action_sees_the_listener_registered() {
    let emitter: Emitter<&'static str> = Emitter::new();

    let seen = emitter
        .rollback_scope("connect", |_: ()| Ok(()), true, || {
            Ok::<_, ConnectError>(emitter.listener_count(&"connect"))
        })
        .unwrap();

    assert_eq!(seen, 1);
}

#[test]
fn rejected_registration_skips_action() {
    let emitter: Emitter<&'static str> = Emitter::new();
    emitter.set_max_listeners(1);
    emitter.on("connect", |_: ()| Ok(())).unwrap();
    let ran = Arc::new(AtomicUsize::new(0));
    let ran_clone = Arc::clone(&ran);

    let result = emitter.rollback_scope("connect", |_: ()| Ok(()), false, move || {
        ran_clone.fetch_add(1, Ordering::SeqCst);
        Ok::<_, ConnectError>(())
    });

    assert!(matches!(result, Err(ConnectError::Registration(_))));
    assert_eq!(ran.load(Ordering::SeqCst), 0);
    assert_eq!(emitter.listener_count(&"connect"), 1);
}

#[test]
fn panicking_action_still_rolls_back() {
    let emitter: Emitter<&'static str> = Emitter::new();

    let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
        let _: Result<(), ConnectError> =
            emitter.rollback_scope("connect", |_: ()| Ok(()), false, || panic!("action panicked"));
    }));

    assert!(result.is_err());
    assert_eq!(emitter.listener_count(&"connect"), 0);
}

#[test]
fn rollback_fires_remove_listener_meta_event() {
    let emitter: Emitter<&'static str> = Emitter::new();
    let removed = Arc::new(Mutex::new(Vec::new()));
    {
        let removed = Arc::clone(&removed);
        emitter
            .on_remove_listener(move |(event, callback): MetaEvent<&'static str>| {
                removed.lock().unwrap().push((event, callback.id()));
                Ok(())
            })
            .unwrap();
    }

    let _ = emitter.rollback_scope("connect", |_: ()| Ok(()), false, || {
        Err::<(), _>(ConnectError::Refused)
    });

    let removed = removed.lock().unwrap();
    assert_eq!(removed.len(), 1);
    assert_eq!(removed[0].0, "connect");
}

#[test]
fn rollback_leaves_other_listeners_untouched() {
    let emitter: Emitter<&'static str> = Emitter::new();
    let kept = emitter.on("connect", |_: ()| Ok(())).unwrap();

    let _ = emitter.rollback_scope("connect", |_: ()| Ok(()), true, || {
        Err::<(), _>(ConnectError::Refused)
    });

    let ids: Vec<_> = emitter.listeners(&"connect").iter().map(|c| c.id()).collect();
    assert_eq!(ids, vec![kept]);
}
