//! Timestamped input to the state loop.

use std::sync::Arc;

use crate::error::EventError;

/// Key transition.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Key {
    /// Pressed.
    Down,
    /// Released.
    Up,
}

/// Pointer transition.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Touch {
    /// Contact started.
    Down,
    /// Contact moved.
    Move,
    /// Contact ended.
    Up,
}

/// What happened.
#[derive(Clone, Debug, PartialEq)]
pub enum EventKind {
    /// The display surface changed size.
    View {
        /// New width in pixels.
        width: u32,
        /// New height in pixels.
        height: u32,
    },
    /// A key changed state.
    Key {
        /// Platform key code.
        code: i32,
        /// Press or release.
        input: Key,
    },
    /// A pointer changed state.
    Touch {
        /// Horizontal position.
        x: f32,
        /// Vertical position.
        y: f32,
        /// Which transition.
        input: Touch,
    },
    /// The graphics pipeline finished animating a frame.
    Animation,
    /// A scheduled action fired.
    Action {
        /// The action's name.
        name: Arc<str>,
    },
}

/// An [`EventKind`] stamped with the millisecond it happened at.
///
/// Events are built through validating constructors so a state never sees
/// an empty view, a nameless action or a NaN touch.
#[derive(Clone, Debug, PartialEq)]
pub struct Event {
    time: u64,
    kind: EventKind,
}

impl Event {
    /// The display surface is now `width` x `height`.
    pub fn view(time: u64, width: u32, height: u32) -> Result<Self, EventError> {
        if width == 0 || height == 0 {
            return Err(EventError::EmptyView { width, height });
        }
        Ok(Self {
            time,
            kind: EventKind::View { width, height },
        })
    }

    /// Key `code` went `input`.
    pub fn key(time: u64, code: i32, input: Key) -> Self {
        Self {
            time,
            kind: EventKind::Key { code, input },
        }
    }

    /// A pointer at (`x`, `y`) went `input`.
    pub fn touch(time: u64, x: f32, y: f32, input: Touch) -> Result<Self, EventError> {
        if !x.is_finite() || !y.is_finite() {
            return Err(EventError::NonFiniteTouch { x, y });
        }
        Ok(Self {
            time,
            kind: EventKind::Touch { x, y, input },
        })
    }

    /// A frame finished animating.
    pub fn animation(time: u64) -> Self {
        Self {
            time,
            kind: EventKind::Animation,
        }
    }

    /// The action `name` fired.
    pub fn action(time: u64, name: &str) -> Result<Self, EventError> {
        if name.is_empty() {
            return Err(EventError::EmptyName);
        }
        Ok(Self::fired(time, Arc::from(name)))
    }

    pub(crate) fn fired(time: u64, name: Arc<str>) -> Self {
        Self {
            time,
            kind: EventKind::Action { name },
        }
    }

    /// When it happened, in milliseconds.
    pub fn time(&self) -> u64 {
        self.time
    }

    /// What happened.
    pub fn kind(&self) -> &EventKind {
        &self.kind
    }
}
