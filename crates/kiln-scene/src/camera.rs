//! Projection and view.

use glam::{Mat4, Vec3};

use crate::animation::Animation;
use crate::math;

/// A projection paired with a view, either fixed or produced by animating
/// an eye/center/up triple.
///
/// The dynamic view is the look-at of the animated eye and center points and
/// the animated up direction. A dynamic camera becomes static as soon as its
/// animation does.
#[derive(Clone, Debug, PartialEq)]
pub enum Camera {
    /// Fixed view.
    Static {
        /// Projection matrix.
        projection: Mat4,
        /// View matrix.
        view: Mat4,
    },
    /// View derived from animated vectors.
    Dynamic {
        /// Projection matrix.
        projection: Mat4,
        /// Eye position before animation.
        eye: Vec3,
        /// Look-at target before animation.
        center: Vec3,
        /// Up direction before animation.
        up: Vec3,
        /// Applied to the three vectors.
        animation: Animation,
    },
}

impl Default for Camera {
    fn default() -> Self {
        Self::Static {
            projection: Mat4::IDENTITY,
            view: Mat4::IDENTITY,
        }
    }
}

impl Camera {
    /// A fixed camera.
    pub fn new_static(projection: Mat4, view: Mat4) -> Self {
        Self::Static { projection, view }
    }

    /// A fixed camera looking from `eye` at `center`.
    pub fn look_at(projection: Mat4, eye: Vec3, center: Vec3, up: Vec3) -> Self {
        Self::Static {
            projection,
            view: math::view(eye, center, up),
        }
    }

    /// A camera whose eye, center and up are moved by `animation`.
    pub fn dynamic(
        projection: Mat4,
        eye: Vec3,
        center: Vec3,
        up: Vec3,
        animation: Animation,
    ) -> Self {
        Self::settle(projection, eye, center, up, animation)
    }

    /// Projection matrix.
    pub fn projection(&self) -> Mat4 {
        match self {
            Self::Static { projection, .. } | Self::Dynamic { projection, .. } => *projection,
        }
    }

    /// Current view matrix.
    pub fn view(&self) -> Mat4 {
        match self {
            Self::Static { view, .. } => *view,
            Self::Dynamic {
                eye,
                center,
                up,
                animation,
                ..
            } => animated_view(*eye, *center, *up, &animation.matrix()),
        }
    }

    /// Whether the view can still change.
    pub fn is_dynamic(&self) -> bool {
        matches!(self, Self::Dynamic { .. })
    }

    /// Advance to `time`.
    pub fn update(&self, time: u64) -> Self {
        match self {
            Self::Static { .. } => self.clone(),
            Self::Dynamic {
                projection,
                eye,
                center,
                up,
                animation,
            } => Self::settle(*projection, *eye, *center, *up, animation.update(time)),
        }
    }

    /// Jump to the terminal view.
    pub fn finish(&self) -> Self {
        match self {
            Self::Static { .. } => self.clone(),
            Self::Dynamic {
                projection,
                eye,
                center,
                up,
                animation,
            } => Self::settle(*projection, *eye, *center, *up, animation.finish()),
        }
    }

    fn settle(projection: Mat4, eye: Vec3, center: Vec3, up: Vec3, animation: Animation) -> Self {
        match animation {
            Animation::Static(matrix) => Self::Static {
                projection,
                view: animated_view(eye, center, up, &matrix),
            },
            animation => Self::Dynamic {
                projection,
                eye,
                center,
                up,
                animation,
            },
        }
    }
}

fn animated_view(eye: Vec3, center: Vec3, up: Vec3, matrix: &Mat4) -> Mat4 {
    math::view(
        matrix.transform_point3(eye),
        matrix.transform_point3(center),
        matrix.transform_vector3(up),
    )
}
