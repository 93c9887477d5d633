//! Test utilities and mock types for Kiln development.
//!
//! Provides a [`ManualClock`], a [`RecordingCanvas`] that logs draw calls,
//! and mock application states in [`states`].

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod states;

use std::sync::atomic::{AtomicU64, Ordering};

use kiln_core::Clock;
use kiln_scene::{Camera, Canvas, Color, Material, Model, Viewport};

pub use states::{FailingState, Gate, GatedState, LogState, SlideState};

/// A clock that only moves when told to.
#[derive(Debug, Default)]
pub struct ManualClock {
    now: AtomicU64,
}

impl ManualClock {
    pub fn new(start: u64) -> Self {
        Self {
            now: AtomicU64::new(start),
        }
    }

    pub fn set(&self, millis: u64) {
        self.now.store(millis, Ordering::Release);
    }

    /// Move forward by `millis`, returning the new time.
    pub fn advance(&self, millis: u64) -> u64 {
        self.now.fetch_add(millis, Ordering::AcqRel) + millis
    }
}

impl Clock for ManualClock {
    fn now_millis(&self) -> u64 {
        self.now.load(Ordering::Acquire)
    }
}

/// One call received by a [`RecordingCanvas`].
#[derive(Clone, Debug, PartialEq)]
pub enum DrawCall {
    Begin {
        viewport: Viewport,
        background: Color,
    },
    Batch {
        material: String,
        models: usize,
        indices: Vec<u32>,
    },
}

/// A canvas that records every call instead of drawing.
#[derive(Debug, Default)]
pub struct RecordingCanvas {
    pub calls: Vec<DrawCall>,
}

impl RecordingCanvas {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of frames begun.
    pub fn frames(&self) -> usize {
        self.calls
            .iter()
            .filter(|c| matches!(c, DrawCall::Begin { .. }))
            .count()
    }

    /// Material names of every batch drawn, in order.
    pub fn materials(&self) -> Vec<&str> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                DrawCall::Batch { material, .. } => Some(material.as_str()),
                DrawCall::Begin { .. } => None,
            })
            .collect()
    }

    pub fn clear(&mut self) {
        self.calls.clear();
    }
}

impl Canvas for RecordingCanvas {
    fn begin(&mut self, viewport: Viewport, background: Color) {
        self.calls.push(DrawCall::Begin {
            viewport,
            background,
        });
    }

    fn draw_batch(
        &mut self,
        material: &Material,
        _camera: &Camera,
        models: &[Model],
        indices: &[u32],
    ) {
        self.calls.push(DrawCall::Batch {
            material: material.name().to_string(),
            models: models.len(),
            indices: indices.to_vec(),
        });
    }
}
