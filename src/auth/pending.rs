//! Per-form in-flight flag. While a submission is pending, a second submission of
//! the same form is rejected instead of racing the first.

use crate::api::ClientError;
use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

#[derive(Clone, Debug, Default)]
pub struct PendingFlag {
    pending: Arc<AtomicBool>,
}

/// Clears the flag when dropped, including on early return or cancellation.
#[derive(Debug)]
pub struct PendingGuard {
    pending: Arc<AtomicBool>,
}

impl PendingFlag {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.pending.load(Ordering::Acquire)
    }

    /// Marks the form as pending.
    ///
    /// # Errors
    /// Returns `ClientError::Busy` if a submission is already in flight.
    pub fn begin(&self) -> Result<PendingGuard, ClientError> {
        self.pending
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map_err(|_| ClientError::Busy)?;

        Ok(PendingGuard {
            pending: Arc::clone(&self.pending),
        })
    }
}

impl Drop for PendingGuard {
    fn drop(&mut self) {
        self.pending.store(false, Ordering::Release);
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn second_begin_is_busy_until_guard_drops() {
        let flag = PendingFlag::new();
        let guard = flag.begin().unwrap();
        assert!(flag.is_pending());
        assert_eq!(flag.begin().unwrap_err(), ClientError::Busy);

        drop(guard);
        assert!(!flag.is_pending());
        assert!(flag.begin().is_ok());
    }

    #[test]
    fn clones_share_state() {
        let flag = PendingFlag::new();
        let other = flag.clone();
        let _guard = flag.begin().unwrap();
        assert!(other.is_pending());
    }
}
