//! Panic reporting
//!
//! Installs a panic hook that captures the panic as a fatal crash event,
//! flushes the reporter, and then hands over to the previously installed
//! hook so the default stderr output is preserved.
//!
//! Panics raised inside a [`fail_open`] scope are neither reported nor
//! printed: the caller catches them and accounts for them itself.

use std::cell::Cell;
use std::sync::Arc;
use std::time::Duration;

use trailmark_core::domain::{CrashEvent, Severity};
use trailmark_core::ports::CrashReporter;

use crate::analytics::panic_message;

/// How long the hook waits for the reporter to deliver the panic event
pub const PANIC_FLUSH_TIMEOUT: Duration = Duration::from_secs(2);

thread_local! {
    static FAIL_OPEN_DEPTH: Cell<u32> = const { Cell::new(0) };
}

/// Runs `f` with panic reporting suppressed on the current thread.
pub(crate) fn fail_open<R>(f: impl FnOnce() -> R) -> R {
    struct Scope;

    impl Drop for Scope {
        fn drop(&mut self) {
            FAIL_OPEN_DEPTH.with(|depth| depth.set(depth.get().saturating_sub(1)));
        }
    }

    FAIL_OPEN_DEPTH.with(|depth| depth.set(depth.get() + 1));
    let _scope = Scope;
    f()
}

fn in_fail_open_scope() -> bool {
    FAIL_OPEN_DEPTH.with(|depth| depth.get() > 0)
}

/// Builds the crash event describing a panic.
pub fn panic_event(message: &str, location: &str) -> CrashEvent {
    let mut event = CrashEvent::new(format!("panic: {message}"), Severity::Fatal)
        .with_tag("mechanism", "panic");
    if !location.is_empty() {
        event = event.with_tag("location", location);
    }
    event
}

/// Installs a panic hook reporting to `reporter`.
///
/// Chains with the existing panic hook.
pub fn install_panic_hook(reporter: Arc<dyn CrashReporter>) {
    let previous_hook = std::panic::take_hook();

    std::panic::set_hook(Box::new(move |panic_info| {
        if in_fail_open_scope() {
            return;
        }

        let message = panic_message(panic_info.payload());
        let location = panic_info
            .location()
            .map(|l| format!("{}:{}:{}", l.file(), l.line(), l.column()))
            .unwrap_or_default();

        if let Err(e) = reporter.capture_event(panic_event(&message, &location)) {
            eprintln!("Failed to report panic: {e}");
        }
        reporter.flush(PANIC_FLUSH_TIMEOUT);

        previous_hook(panic_info);
    }));
}
