//! Chain lock behavior under concurrent and failing traversals.

use std::panic;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use fed_integration_tests::{
    chain_of, init_tracing, processor, sp_config, Journal, Script, ScriptedHandler,
};
use fed_protocol_saml::ProcessError;
use fed_spi::{HandlerError, SimpleHttpContext};

/// Tests that concurrent `process` calls run the chain one at a time.
#[test]
fn concurrent_traversals_are_serialized() -> anyhow::Result<()> {
    init_tracing();
    let journal = Journal::default();
    let active = Arc::new(AtomicUsize::new(0));
    let overlaps = Arc::new(AtomicUsize::new(0));

    let chain = Arc::new(chain_of(vec![
        ScriptedHandler::new("first", Script::Busy(Duration::from_millis(2)), &journal)
            .with_counters(&active, &overlaps),
        ScriptedHandler::new("second", Script::Busy(Duration::from_millis(2)), &journal)
            .with_counters(&active, &overlaps),
    ]));
    let processor = Arc::new(processor(sp_config()));

    let workers: Vec<_> = (0..8)
        .map(|_| {
            let chain = Arc::clone(&chain);
            let processor = Arc::clone(&processor);
            thread::spawn(move || -> Result<(), ProcessError> {
                for _ in 0..5 {
                    let context = SimpleHttpContext::new("/app");
                    processor.process(&context, &chain)?;
                }
                Ok(())
            })
        })
        .collect();

    for worker in workers {
        worker.join().expect("worker panicked")?;
    }

    assert_eq!(overlaps.load(Ordering::SeqCst), 0);

    // Each traversal is reset/generate for both handlers, never interleaved.
    let entries = journal.entries();
    assert_eq!(entries.len(), 8 * 5 * 4);
    for run in entries.chunks(4) {
        assert_eq!(
            run,
            [
                "first:reset",
                "first:generate:Authentication",
                "second:reset",
                "second:generate:Authentication"
            ]
        );
    }
    Ok(())
}

/// Tests that a failing handler leaves the chain usable by another thread.
#[test]
fn lock_is_released_after_handler_failure() -> anyhow::Result<()> {
    init_tracing();
    let journal = Journal::default();
    let chain = Arc::new(chain_of(vec![
        ScriptedHandler::new("failing", Script::Fail, &journal),
        ScriptedHandler::new("after", Script::Noop, &journal),
    ]));
    let processor = Arc::new(processor(sp_config()));

    let result = processor.process(&SimpleHttpContext::new("/app"), &chain);
    assert!(matches!(
        result,
        Err(ProcessError::ChainProcessing { ref handler, source: HandlerError::Processing(_) })
            if handler == "failing"
    ));
    assert!(chain.try_lock().is_some(), "lock must be free after failure");

    let second = {
        let chain = Arc::clone(&chain);
        let processor = Arc::clone(&processor);
        thread::spawn(move || processor.process(&SimpleHttpContext::new("/app"), &chain))
    };
    let second = second.join().expect("second caller panicked");
    assert!(matches!(second, Err(ProcessError::ChainProcessing { .. })));

    // The handler after the failing one never ran.
    assert!(!journal.entries().iter().any(|e| e.starts_with("after:")));
    Ok(())
}

/// Tests that a panicking handler does not poison or hold the chain.
#[test]
fn panicking_handler_releases_lock() -> anyhow::Result<()> {
    init_tracing();
    let journal = Journal::default();
    let chain = Arc::new(chain_of(vec![ScriptedHandler::new(
        "panicking",
        Script::Panic,
        &journal,
    )]));
    let processor = Arc::new(processor(sp_config()));

    let outcome = {
        let chain = Arc::clone(&chain);
        let processor = Arc::clone(&processor);
        thread::spawn(move || {
            let _ = processor.process(&SimpleHttpContext::new("/app"), &chain);
        })
        .join()
    };
    assert!(outcome.is_err(), "handler panic propagates to its caller");

    let guard = chain.try_lock();
    assert!(guard.is_some(), "lock must be free after unwinding");
    drop(guard);

    let rerun = panic::catch_unwind(panic::AssertUnwindSafe(|| {
        processor.process(&SimpleHttpContext::new("/app"), &chain)
    }));
    assert!(rerun.is_err(), "chain still runs and reaches the handler again");
    assert_eq!(
        journal.entries(),
        vec![
            "panicking:reset",
            "panicking:generate:Authentication",
            "panicking:reset",
            "panicking:generate:Authentication"
        ]
    );
    Ok(())
}

/// Tests that a blocked caller proceeds once the holder releases the lock.
#[test]
fn waiting_caller_acquires_lock_after_release() -> anyhow::Result<()> {
    init_tracing();
    let journal = Journal::default();
    let chain = Arc::new(chain_of(vec![ScriptedHandler::new(
        "only",
        Script::Noop,
        &journal,
    )]));
    let processor = Arc::new(processor(sp_config()));

    let guard = chain.lock();
    let waiter = {
        let chain = Arc::clone(&chain);
        let processor = Arc::clone(&processor);
        thread::spawn(move || processor.process(&SimpleHttpContext::new("/app"), &chain))
    };

    thread::sleep(Duration::from_millis(20));
    assert!(journal.entries().is_empty(), "waiter must block on the lock");
    drop(guard);

    let response = waiter.join().expect("waiter panicked")?;
    assert!(!response.is_in_error());
    assert_eq!(journal.entries(), vec!["only:reset", "only:generate:Authentication"]);
    Ok(())
}
