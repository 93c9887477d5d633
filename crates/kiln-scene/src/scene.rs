//! Scenes: a camera over an ordered list of batches.

use std::sync::Arc;

use crate::batch::Batch;
use crate::camera::Camera;
use crate::canvas::Canvas;

/// A camera and the batches it looks at, drawn in order.
///
/// A scene is dynamic iff its camera or any of its batches is.
#[derive(Clone, Debug, PartialEq)]
pub enum Scene {
    /// Nothing left to update.
    Static {
        /// The camera.
        camera: Camera,
        /// Batches in draw order.
        batches: Arc<[Batch]>,
    },
    /// Camera or some batch still changing.
    Dynamic {
        /// The camera.
        camera: Camera,
        /// Batches in draw order.
        batches: Arc<[Batch]>,
    },
}

impl Scene {
    /// A scene, classified by its contents.
    pub fn new(camera: Camera, batches: Vec<Batch>) -> Self {
        let batches: Arc<[Batch]> = batches.into();
        if camera.is_dynamic() || batches.iter().any(Batch::is_dynamic) {
            Self::Dynamic { camera, batches }
        } else {
            Self::Static { camera, batches }
        }
    }

    /// The camera.
    pub fn camera(&self) -> &Camera {
        match self {
            Self::Static { camera, .. } | Self::Dynamic { camera, .. } => camera,
        }
    }

    /// Batches in draw order.
    pub fn batches(&self) -> &[Batch] {
        match self {
            Self::Static { batches, .. } | Self::Dynamic { batches, .. } => batches,
        }
    }

    /// Whether `update` can still change the scene.
    pub fn is_dynamic(&self) -> bool {
        matches!(self, Self::Dynamic { .. })
    }

    /// Advance to `time`.
    pub fn update(&self, time: u64) -> Self {
        match self {
            Self::Static { .. } => self.clone(),
            Self::Dynamic { camera, batches } => Self::new(
                camera.update(time),
                batches.iter().map(|b| b.update(time)).collect::<Vec<_>>(),
            ),
        }
    }

    /// Jump to the terminal state.
    pub fn finish(&self) -> Self {
        match self {
            Self::Static { .. } => self.clone(),
            Self::Dynamic { camera, batches } => Self::new(
                camera.finish(),
                batches.iter().map(Batch::finish).collect::<Vec<_>>(),
            ),
        }
    }

    /// Draw every batch with this scene's camera.
    pub fn draw(&self, canvas: &mut dyn Canvas) {
        let camera = self.camera();
        for batch in self.batches() {
            batch.draw(canvas, camera);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animation::Animation;
    use crate::interpolation::Interpolation;
    use crate::material::Material;
    use crate::mesh::{Mesh, Region};
    use crate::model::Model;
    use crate::transformation::Transformation;
    use glam::{Mat4, Vec3};

    fn still_batch() -> Batch {
        Batch::new(
            Arc::new(Material::new("flat", vec![]).unwrap()),
            vec![Model::new_static(Arc::new(Mesh::quad(Region::default())), Mat4::IDENTITY)],
        )
    }

    #[test]
    fn moving_camera_makes_scene_dynamic() {
        let camera = Camera::dynamic(
            Mat4::IDENTITY,
            Vec3::Z,
            Vec3::ZERO,
            Vec3::Y,
            Animation::dynamic(Transformation::rotate(
                Vec3::new(0.0, 45.0, 0.0),
                Interpolation::linear(0, 100),
            )),
        );
        let scene = Scene::new(camera, vec![still_batch()]);
        assert!(scene.is_dynamic());
        assert!(!scene.update(100).is_dynamic());
    }

    #[test]
    fn expiring_batch_keeps_scene_dynamic_until_terminal() {
        let scene = Scene::new(Camera::default(), vec![still_batch().transient(50)]);
        assert!(scene.update(49).is_dynamic());
        let settled = scene.update(50);
        assert!(!settled.is_dynamic());
        assert!(settled.batches()[0].is_terminal());
    }

    #[test]
    fn all_static_is_static() {
        let scene = Scene::new(Camera::default(), vec![still_batch(), still_batch()]);
        assert!(!scene.is_dynamic());
        assert_eq!(scene.update(7), scene);
    }
}
