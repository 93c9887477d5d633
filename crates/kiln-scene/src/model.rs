//! Meshes placed in the world.

use std::sync::Arc;

use glam::Mat4;

use crate::animation::Animation;
use crate::mesh::{Mesh, Region};

/// A shared mesh and texture region, placed by a fixed matrix or by an
/// [`Animation`].
///
/// A dynamic model becomes static as soon as its animation does.
#[derive(Clone, Debug, PartialEq)]
pub enum Model {
    /// Placed by a fixed matrix.
    Static {
        /// Geometry, shared between models.
        mesh: Arc<Mesh>,
        /// Texture region sampled by the mesh coordinates.
        region: Region,
        /// Model matrix.
        matrix: Mat4,
    },
    /// Placed by a running animation.
    Dynamic {
        /// Geometry, shared between models.
        mesh: Arc<Mesh>,
        /// Texture region sampled by the mesh coordinates.
        region: Region,
        /// Source of the model matrix.
        animation: Animation,
    },
}

impl Model {
    /// A static model over the whole texture.
    pub fn new_static(mesh: Arc<Mesh>, matrix: Mat4) -> Self {
        Self::Static {
            mesh,
            region: Region::default(),
            matrix,
        }
    }

    /// A model driven by `animation` over the whole texture; static straight
    /// away if the animation already is.
    pub fn dynamic(mesh: Arc<Mesh>, animation: Animation) -> Self {
        Self::settle(mesh, Region::default(), animation)
    }

    /// The same model sampling `region` instead.
    pub fn with_region(self, region: Region) -> Self {
        match self {
            Self::Static { mesh, matrix, .. } => Self::Static {
                mesh,
                region,
                matrix,
            },
            Self::Dynamic {
                mesh, animation, ..
            } => Self::Dynamic {
                mesh,
                region,
                animation,
            },
        }
    }

    /// The geometry.
    pub fn mesh(&self) -> &Arc<Mesh> {
        match self {
            Self::Static { mesh, .. } | Self::Dynamic { mesh, .. } => mesh,
        }
    }

    /// The texture region.
    pub fn region(&self) -> Region {
        match self {
            Self::Static { region, .. } | Self::Dynamic { region, .. } => *region,
        }
    }

    /// The current model matrix.
    pub fn matrix(&self) -> Mat4 {
        match self {
            Self::Static { matrix, .. } => *matrix,
            Self::Dynamic { animation, .. } => animation.matrix(),
        }
    }

    /// Whether the matrix can still change.
    pub fn is_dynamic(&self) -> bool {
        matches!(self, Self::Dynamic { .. })
    }

    /// Advance to `time`.
    pub fn update(&self, time: u64) -> Self {
        match self {
            Self::Static { .. } => self.clone(),
            Self::Dynamic {
                mesh,
                region,
                animation,
            } => Self::settle(Arc::clone(mesh), *region, animation.update(time)),
        }
    }

    /// Jump to the terminal placement.
    pub fn finish(&self) -> Self {
        match self {
            Self::Static { .. } => self.clone(),
            Self::Dynamic {
                mesh,
                region,
                animation,
            } => Self::settle(Arc::clone(mesh), *region, animation.finish()),
        }
    }

    fn settle(mesh: Arc<Mesh>, region: Region, animation: Animation) -> Self {
        match animation {
            Animation::Static(matrix) => Self::Static {
                mesh,
                region,
                matrix,
            },
            animation => Self::Dynamic {
                mesh,
                region,
                animation,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interpolation::Interpolation;
    use crate::math;
    use crate::transformation::Transformation;
    use glam::Vec3;

    fn slide() -> Animation {
        Animation::dynamic(Transformation::translate(
            Vec3::new(10.0, 0.0, 0.0),
            Interpolation::linear(0, 100),
        ))
    }

    #[test]
    fn dynamic_model_collapses_with_its_animation() {
        let mesh = Arc::new(Mesh::quad(Region::default()));
        let model = Model::dynamic(Arc::clone(&mesh), slide());
        assert!(model.is_dynamic());
        assert_eq!(
            model.update(50).matrix(),
            math::translate(Vec3::new(5.0, 0.0, 0.0))
        );

        let done = model.update(100);
        assert!(!done.is_dynamic());
        assert!(Arc::ptr_eq(done.mesh(), &mesh));
        assert_eq!(done.matrix(), math::translate(Vec3::new(10.0, 0.0, 0.0)));
    }

    #[test]
    fn static_animation_yields_static_model() {
        let mesh = Arc::new(Mesh::default());
        let model = Model::dynamic(mesh, Animation::Static(Mat4::IDENTITY));
        assert!(!model.is_dynamic());
    }

    #[test]
    fn region_survives_updates() {
        let region = Region::new(0.0, 0.5, 0.5, 1.0).unwrap();
        let model = Model::dynamic(Arc::new(Mesh::default()), slide()).with_region(region);
        assert_eq!(model.update(500).region(), region);
        assert_eq!(model.finish().region(), region);
        let fixed = Model::new_static(Arc::new(Mesh::default()), Mat4::IDENTITY);
        assert_eq!(fixed.region(), Region::default());
    }
}
