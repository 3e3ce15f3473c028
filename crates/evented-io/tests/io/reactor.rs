//! Tests for `Reactor` submission and completion delivery.

use evented::{EmitError, Emitter};
use evented_io::{Reactor, ReactorConfig, ReactorError};
use std::sync::{Arc, Mutex};
use std::thread;

fn make_reactor(name: &str) -> Reactor {
    Reactor::new(ReactorConfig {
        name: name.to_string(),
    })
    .unwrap()
}

#[test]
fn new_outside_runtime_fails() {
    let err = Reactor::new(ReactorConfig::default()).err().unwrap();
    assert!(matches!(err, ReactorError::NoRuntime));
}

#[test]
fn config_defaults_and_parses_from_json() {
    assert_eq!(ReactorConfig::default().name, "reactor");
    let config: ReactorConfig = serde_json::from_str(r#"{"name": "dns"}"#).unwrap();
    assert_eq!(config.name, "dns");
    let config: ReactorConfig = serde_json::from_str("{}").unwrap();
    assert_eq!(config, ReactorConfig::default());
}

#[tokio::test]
async fn completion_runs_once_on_driving_thread() {
    let reactor = make_reactor("fs");
    let home = thread::current().id();
    let seen = Arc::new(Mutex::new(Vec::new()));

    {
        let seen = Arc::clone(&seen);
        reactor
            .submit(
                || Ok::<_, String>(21 * 2),
                move |result| {
                    seen.lock().unwrap().push((result, thread::current().id()));
                    Ok(())
                },
            )
            .unwrap();
    }
    assert_eq!(reactor.pending(), 1);

    assert_eq!(reactor.run_until_idle().await.unwrap(), 1);

    assert_eq!(*seen.lock().unwrap(), vec![(Ok(42), home)]);
    assert_eq!(reactor.pending(), 0);
    // Nothing left: a second drive is a no-op.
    assert_eq!(reactor.run_until_idle().await.unwrap(), 0);
}

#[tokio::test]
async fn error_payload_reaches_completion() {
    let reactor = make_reactor("fs");
    let seen = Arc::new(Mutex::new(None));

    {
        let seen = Arc::clone(&seen);
        reactor
            .submit(
                || Err::<u32, _>("ENOENT".to_string()),
                move |result| {
                    *seen.lock().unwrap() = Some(result);
                    Ok(())
                },
            )
            .unwrap();
    }
    reactor.run_until_idle().await.unwrap();

    assert_eq!(*seen.lock().unwrap(), Some(Err("ENOENT".to_string())));
}

#[tokio::test]
async fn completions_emit_on_an_emitter() {
    let reactor = make_reactor("work");
    let emitter: Arc<Emitter<&'static str>> = Arc::new(Emitter::new());
    let total = Arc::new(Mutex::new(0_u64));
    {
        let total = Arc::clone(&total);
        emitter
            .on("done", move |n: u64| {
                *total.lock().unwrap() += n;
                Ok(())
            })
            .unwrap();
    }

    for n in 1..=4_u64 {
        let emitter = Arc::clone(&emitter);
        reactor
            .submit(
                move || Ok::<_, ()>(n),
                move |result| {
                    if let Ok(n) = result {
                        emitter.emit(&"done", n)?;
                    }
                    Ok(())
                },
            )
            .unwrap();
    }

    assert_eq!(reactor.run_until_idle().await.unwrap(), 4);
    assert_eq!(*total.lock().unwrap(), 10);
}

#[tokio::test]
async fn listener_error_surfaces_from_run_until_idle() {
    let reactor = make_reactor("work");
    let emitter: Arc<Emitter<&'static str>> = Arc::new(Emitter::new());
    emitter
        .on("done", |_: ()| Err("listener rejected result".into()))
        .unwrap();

    let emitter_clone = Arc::clone(&emitter);
    reactor
        .submit(
            || Ok::<_, ()>(()),
            move |_| emitter_clone.emit(&"done", ()).map(|_| ()),
        )
        .unwrap();

    let err = reactor.run_until_idle().await.unwrap_err();
    match err {
        ReactorError::Dispatch(EmitError::Listener(e)) => {
            assert_eq!(e.to_string(), "listener rejected result");
        }
        other => panic!("expected listener error, got {other:?}"),
    }
    assert_eq!(reactor.pending(), 0);
}

#[tokio::test]
async fn panicking_task_skips_completion_and_does_not_hang() {
    let reactor = make_reactor("work");
    let ran = Arc::new(Mutex::new(false));

    {
        let ran = Arc::clone(&ran);
        reactor
            .submit(
                || -> Result<(), ()> { panic!("task blew up") },
                move |_| {
                    *ran.lock().unwrap() = true;
                    Ok(())
                },
            )
            .unwrap();
    }

    assert_eq!(reactor.run_until_idle().await.unwrap(), 0);
    assert!(!*ran.lock().unwrap());
    assert_eq!(reactor.pending(), 0);
}

#[tokio::test]
async fn disposed_reactor_rejects_submissions_but_finishes_pending() {
    let reactor = make_reactor("dns");
    let count = Arc::new(Mutex::new(0));
    {
        let count = Arc::clone(&count);
        reactor
            .submit(
                || Ok::<_, ()>(()),
                move |_| {
                    *count.lock().unwrap() += 1;
                    Ok(())
                },
            )
            .unwrap();
    }

    reactor.dispose();
    assert!(reactor.is_disposed());

    let err = reactor
        .submit(|| Ok::<_, ()>(()), |_| Ok(()))
        .unwrap_err();
    assert_eq!(err.to_string(), "Reactor \"dns\" is disposed");

    assert_eq!(reactor.run_until_idle().await.unwrap(), 1);
    assert_eq!(*count.lock().unwrap(), 1);
}
