//! Stale-result guarding for asynchronous operations.
//!
//! There is no true cancellation of an in-flight read or network call here:
//! a consumer that goes away while an operation is outstanding flips its
//! [`CancelHandle`], and the operation checks the flag before committing any
//! result. A completion observed after cancellation is discarded - no file is
//! written, no state is mutated - and the operation reports
//! [`crate::ClientError::Cancelled`].

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Shared cancellation flag for one asynchronous operation.
///
/// Cloning yields another handle to the same flag, so the owner keeps one
/// clone and hands another to the operation.
#[derive(Debug, Clone, Default)]
pub struct CancelHandle(Arc<AtomicBool>);

impl CancelHandle {
    /// Create a fresh, un-cancelled handle.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark the operation as abandoned by its owner.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Release);
    }

    /// Whether the owner has gone away.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_uncancelled() {
        assert!(!CancelHandle::new().is_cancelled());
    }

    #[test]
    fn test_cancel_is_visible_through_clones() {
        let handle = CancelHandle::new();
        let observer = handle.clone();
        handle.cancel();
        assert!(observer.is_cancelled());
    }
}
