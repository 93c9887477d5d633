//! Engine configuration.

use crate::error::ConfigError;

/// Fewest render or save permits accepted.
///
/// With one permit, a state arriving while the only job is already past
/// reading the latest state would be turned away and never picked up. A
/// second permit keeps a job queued behind the running one.
pub const MIN_PERMITS: usize = 2;

/// Knobs for [`Engine::start`](crate::Engine::start).
///
/// Every subsystem runs on its own named worker thread; the names are
/// `<thread_name_prefix>-<role>`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EngineConfig {
    /// Renders admitted at once. Default and minimum: 2.
    pub render_permits: usize,
    /// Saves admitted at once. Default and minimum: 2.
    pub save_permits: usize,
    /// Scheduler tick cadence in milliseconds. Default: 16 (60 Hz).
    pub tick_interval_ms: u64,
    /// Prefix for worker thread names. Default: `"kiln"`.
    pub thread_name_prefix: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            render_permits: 2,
            save_permits: 2,
            tick_interval_ms: 1000 / 60,
            thread_name_prefix: "kiln".to_string(),
        }
    }
}

impl EngineConfig {
    /// Check every field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.render_permits < MIN_PERMITS {
            return Err(ConfigError::TooFewRenderPermits {
                permits: self.render_permits,
            });
        }
        if self.save_permits < MIN_PERMITS {
            return Err(ConfigError::TooFewSavePermits {
                permits: self.save_permits,
            });
        }
        if self.tick_interval_ms == 0 {
            return Err(ConfigError::ZeroTickInterval);
        }
        if self.thread_name_prefix.is_empty() {
            return Err(ConfigError::EmptyThreadPrefix);
        }
        Ok(())
    }

    /// The thread name for `role`.
    pub fn thread_name(&self, role: &str) -> String {
        format!("{}-{role}", self.thread_name_prefix)
    }
}
