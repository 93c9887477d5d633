//! Error types for events, actions and saves.

use std::io;

use thiserror::Error;

/// Invalid arguments to an [`Event`](crate::Event) constructor.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum EventError {
    /// A view event with a zero dimension.
    #[error("view must be non-empty, got {width}x{height}")]
    EmptyView {
        /// Requested width.
        width: u32,
        /// Requested height.
        height: u32,
    },
    /// An action event with an empty name.
    #[error("action event name must be non-empty")]
    EmptyName,
    /// A touch event at a NaN or infinite coordinate.
    #[error("touch coordinates must be finite, got ({x}, {y})")]
    NonFiniteTouch {
        /// Horizontal coordinate.
        x: f32,
        /// Vertical coordinate.
        y: f32,
    },
}

/// Invalid arguments to an [`Action`](crate::Action) constructor.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ActionError {
    /// The action name was empty.
    #[error("action name must be non-empty")]
    EmptyName,
}

/// A failed [`Savable::save`](crate::Savable::save).
#[derive(Debug, Error)]
pub enum SaveError {
    /// Writing the save failed.
    #[error("save i/o failed: {0}")]
    Io(#[from] io::Error),
    /// Any other failure.
    #[error("save failed: {reason}")]
    Failed {
        /// Human-readable description of the failure.
        reason: String,
    },
}
