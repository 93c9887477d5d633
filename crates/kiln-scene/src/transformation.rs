//! Interpolated affine transformations.

use glam::{Mat4, Vec3};

use crate::interpolation::Interpolation;
use crate::math;

/// Which affine operation a dynamic transformation performs.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TransformKind {
    /// Euler rotation; the magnitude holds degrees about X, Y and Z.
    Rotate,
    /// Non-uniform scale; the magnitude holds the per-axis factors.
    Scale,
    /// Translation; the magnitude holds the offset.
    Translate,
}

impl TransformKind {
    fn matrix(self, magnitude: Vec3) -> Mat4 {
        match self {
            Self::Rotate => math::rotate(magnitude),
            Self::Scale => math::scale(magnitude),
            Self::Translate => math::translate(magnitude),
        }
    }
}

/// A magnitude driven by an [`Interpolation`], producing an affine matrix.
///
/// The matrix is the transform of `magnitude * progress`. A dynamic
/// transformation whose interpolation completes is replaced by
/// [`Complete`](Self::Complete) holding the final matrix; it is never kept
/// around as a dynamic value that has stopped moving.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Transformation {
    /// Fixed matrix.
    Complete(Mat4),
    /// Matrix still being interpolated.
    Dynamic {
        /// The operation.
        kind: TransformKind,
        /// Full-progress magnitude.
        magnitude: Vec3,
        /// Progress driver.
        interpolation: Interpolation,
    },
}

impl Transformation {
    /// Build a transformation of `kind`, collapsing immediately when the
    /// interpolation is already complete.
    pub fn new(kind: TransformKind, magnitude: Vec3, interpolation: Interpolation) -> Self {
        if interpolation.is_dynamic() {
            Self::Dynamic {
                kind,
                magnitude,
                interpolation,
            }
        } else {
            Self::Complete(kind.matrix(magnitude))
        }
    }

    /// Rotation by Euler `degrees`.
    pub fn rotate(degrees: Vec3, interpolation: Interpolation) -> Self {
        Self::new(TransformKind::Rotate, degrees, interpolation)
    }

    /// Scale by `factors`.
    pub fn scale(factors: Vec3, interpolation: Interpolation) -> Self {
        Self::new(TransformKind::Scale, factors, interpolation)
    }

    /// Translation by `offset`.
    pub fn translate(offset: Vec3, interpolation: Interpolation) -> Self {
        Self::new(TransformKind::Translate, offset, interpolation)
    }

    /// The matrix at the current progress.
    pub fn matrix(&self) -> Mat4 {
        match *self {
            Self::Complete(matrix) => matrix,
            Self::Dynamic {
                kind,
                magnitude,
                interpolation,
            } => kind.matrix(magnitude * interpolation.value()),
        }
    }

    /// Whether the matrix can still change.
    pub fn is_dynamic(&self) -> bool {
        matches!(self, Self::Dynamic { .. })
    }

    /// Advance to `time`.
    pub fn update(&self, time: u64) -> Self {
        match *self {
            Self::Complete(_) => *self,
            Self::Dynamic {
                kind,
                magnitude,
                interpolation,
            } => Self::new(kind, magnitude, interpolation.update(time)),
        }
    }

    /// Jump to full progress.
    pub fn finish(&self) -> Self {
        match *self {
            Self::Complete(_) => *self,
            Self::Dynamic { kind, magnitude, .. } => Self::Complete(kind.matrix(magnitude)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn complete_interpolation_collapses_on_construction() {
        let t = Transformation::translate(Vec3::X, Interpolation::Complete);
        assert_eq!(t, Transformation::Complete(math::translate(Vec3::X)));
        assert!(!t.is_dynamic());
    }

    #[test]
    fn scale_follows_progress() {
        let t = Transformation::scale(Vec3::splat(2.0), Interpolation::linear(0, 100));
        let half = t.update(50);
        assert!(half.is_dynamic());
        assert_eq!(half.matrix(), math::scale(Vec3::splat(1.0)));
    }

    #[test]
    fn completion_collapses_to_final_matrix() {
        let t = Transformation::translate(Vec3::new(4.0, 0.0, 0.0), Interpolation::linear(10, 10));
        let done = t.update(20);
        assert_eq!(done, Transformation::Complete(math::translate(Vec3::new(4.0, 0.0, 0.0))));
        assert_eq!(done.update(0), done);
    }

    #[test]
    fn finish_matches_full_progress() {
        let t = Transformation::rotate(Vec3::new(0.0, 0.0, 90.0), Interpolation::linear(0, 1000));
        assert_eq!(t.finish().matrix(), math::rotate(Vec3::new(0.0, 0.0, 90.0)));
    }
}
