//! Error types for scene-graph construction and rendering.

use thiserror::Error;

/// Errors raised while building or rendering scene-graph values.
///
/// All of these are invalid-argument conditions: they are reported to the
/// caller of the failing constructor and never silently corrected.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum SceneError {
    /// A frame was given a zero width or height.
    #[error("frame viewport must be non-empty, got {width}x{height}")]
    EmptyViewport {
        /// The requested width in pixels.
        width: u32,
        /// The requested height in pixels.
        height: u32,
    },
    /// A mesh index list is not a whole number of triangles.
    #[error("mesh index count {count} is not a multiple of 3")]
    PartialTriangle {
        /// Number of indices supplied.
        count: usize,
    },
    /// A mesh index points past the end of the position list.
    #[error("mesh index {index} out of range for {positions} positions")]
    IndexOutOfRange {
        /// The offending index.
        index: u32,
        /// Number of positions in the mesh.
        positions: usize,
    },
    /// Texture coordinates were supplied but do not match the positions.
    #[error("mesh has {coordinates} texture coordinates for {positions} positions")]
    CoordinateMismatch {
        /// Number of texture coordinates supplied.
        coordinates: usize,
        /// Number of positions supplied.
        positions: usize,
    },
    /// A texture region boundary lies outside `[0, 1]` or is not finite.
    #[error("texture region boundary {value} outside [0, 1]")]
    RegionOutOfRange {
        /// The offending boundary.
        value: f32,
    },
    /// A color component lies outside `[0, 1]` or is not finite.
    #[error("color component {value} outside [0, 1]")]
    ColorOutOfRange {
        /// The offending component.
        value: f32,
    },
    /// A material or property was given an empty name.
    #[error("{what} name must be non-empty")]
    EmptyName {
        /// What was being named.
        what: &'static str,
    },
    /// A renderable state could not produce a frame.
    #[error("render failed: {reason}")]
    RenderFailed {
        /// Human-readable description of the failure.
        reason: String,
    },
}
