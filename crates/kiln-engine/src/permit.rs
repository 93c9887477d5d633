//! Non-blocking counting permits.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// A lock-free counting semaphore that never blocks.
///
/// The count stays within `0..=max`: releasing a full set is a no-op.
#[derive(Debug)]
pub struct Permits {
    available: AtomicUsize,
    max: usize,
}

impl Permits {
    /// `max` permits, all available.
    pub fn new(max: usize) -> Self {
        Self {
            available: AtomicUsize::new(max),
            max,
        }
    }

    /// `max` permits, none available.
    pub fn empty(max: usize) -> Self {
        Self {
            available: AtomicUsize::new(0),
            max,
        }
    }

    /// Take a permit if one is free.
    pub fn try_acquire(&self) -> bool {
        self.available
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |n| n.checked_sub(1))
            .is_ok()
    }

    /// Take a permit that returns itself when dropped.
    pub fn try_acquire_owned(self: &Arc<Self>) -> Option<Permit> {
        self.try_acquire().then(|| Permit {
            permits: Arc::clone(self),
        })
    }

    /// Return a permit.
    pub fn release(&self) {
        let _ = self
            .available
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |n| {
                (n < self.max).then_some(n + 1)
            });
    }

    /// Take every free permit, returning how many there were.
    pub fn drain(&self) -> usize {
        self.available.swap(0, Ordering::AcqRel)
    }

    /// Permits currently free.
    pub fn available(&self) -> usize {
        self.available.load(Ordering::Acquire)
    }
}

/// A held permit, released on drop.
#[derive(Debug)]
pub struct Permit {
    permits: Arc<Permits>,
}

impl Drop for Permit {
    fn drop(&mut self) {
        self.permits.release();
    }
}
