//! Error types for the engine subsystems.

use kiln_core::EventError;
use kiln_scene::SceneError;
use thiserror::Error;

/// Errors returned by engine entry points and carried out of worker tasks.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum EngineError {
    /// Work was submitted to a subsystem that has been stopped.
    #[error("{module} has shut down")]
    ShutDown {
        /// The stopped subsystem.
        module: &'static str,
    },
    /// Admission control turned the request away; the latest state is
    /// still picked up by work already in flight.
    #[error("{module} is saturated")]
    Saturated {
        /// The saturated subsystem.
        module: &'static str,
    },
    /// A state failed to render.
    #[error("render failed: {0}")]
    Render(#[from] SceneError),
    /// An event could not be built.
    #[error("invalid event: {0}")]
    Event(#[from] EventError),
}

/// Errors detected by [`EngineConfig::validate()`](crate::EngineConfig::validate)
/// or while starting worker threads.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// `render_permits` was below [`MIN_PERMITS`](crate::config::MIN_PERMITS).
    #[error("render_permits must be at least 2, got {permits}")]
    TooFewRenderPermits {
        /// The configured value.
        permits: usize,
    },
    /// `save_permits` was below [`MIN_PERMITS`](crate::config::MIN_PERMITS).
    #[error("save_permits must be at least 2, got {permits}")]
    TooFewSavePermits {
        /// The configured value.
        permits: usize,
    },
    /// `tick_interval_ms` was zero.
    #[error("tick_interval_ms must be at least 1")]
    ZeroTickInterval,
    /// `thread_name_prefix` was empty.
    #[error("thread_name_prefix must be non-empty")]
    EmptyThreadPrefix,
    /// A worker thread could not be spawned.
    #[error("failed to spawn thread: {reason}")]
    ThreadSpawnFailed {
        /// Which thread, and why.
        reason: String,
    },
}
