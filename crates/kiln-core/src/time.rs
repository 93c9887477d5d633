//! Millisecond wall-clock time.

use std::time::{SystemTime, UNIX_EPOCH};

/// Source of the current time in milliseconds.
///
/// The engine stamps animation samples and scheduler ticks with this; tests
/// substitute a manually advanced clock.
pub trait Clock: Send + Sync {
    /// Milliseconds since an arbitrary, fixed epoch.
    fn now_millis(&self) -> u64;
}

/// Milliseconds since the Unix epoch.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_millis(&self) -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn system_clock_moves_forward() {
        let a = SystemClock.now_millis();
        let b = SystemClock.now_millis();
        assert!(a > 0);
        assert!(b >= a);
    }
}
