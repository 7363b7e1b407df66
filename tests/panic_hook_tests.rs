// Kept in its own test binary: the panic hook is process-wide.

use std::io;
use std::panic;
use std::sync::atomic::{AtomicUsize, Ordering};
use zy::error::ErrorKind;
use zy::{Config, Evaluator, Value};

static HOOK_CALLS: AtomicUsize = AtomicUsize::new(0);

#[test]
fn evaluation_faults_are_reported_once() {
    panic::set_hook(Box::new(|_| {
        HOOK_CALLS.fetch_add(1, Ordering::SeqCst);
    }));

    let mut evaluator = Evaluator::with_io(Config::quiet(), Box::new(io::empty()), Box::new(io::sink()));
    evaluator
        .globals()
        .define("boom", Value::native("boom", |_, _| panic!("kaboom")));

    let error = evaluator.run_source("boom(1)").unwrap_err();
    assert_eq!(error.kind, ErrorKind::Internal("kaboom".to_string()));
    assert_eq!(evaluator.diagnostics().len(), 1);
    assert_eq!(HOOK_CALLS.load(Ordering::SeqCst), 0);

    // Panics outside an evaluation still reach the installed hook.
    let outside = panic::catch_unwind(|| panic!("elsewhere"));
    assert!(outside.is_err());
    assert_eq!(HOOK_CALLS.load(Ordering::SeqCst), 1);

    drop(panic::take_hook());
}
