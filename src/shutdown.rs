//! Process-wide interrupt flag.
//! Set by the ctrlc handler on SIGINT/SIGTERM; the batch loop polls it between
//! targets and before each relocation so an interrupt never lands mid-move.
//!
//! Notes:
//! - Relaxed atomics are sufficient for a one-way "stop" flag.
//! - `request()` is safe to call from signal handlers.

use std::sync::atomic::{AtomicBool, Ordering};

static SHUTDOWN: AtomicBool = AtomicBool::new(false);

/// Request that the current batch stop at the next checkpoint (idempotent).
#[inline]
pub fn request() {
    SHUTDOWN.store(true, Ordering::Relaxed);
}

#[inline]
pub fn is_requested() -> bool {
    SHUTDOWN.load(Ordering::Relaxed)
}

/// Clear the flag so a later batch in the same process can run.
#[inline]
pub fn reset() {
    SHUTDOWN.store(false, Ordering::Relaxed);
}
