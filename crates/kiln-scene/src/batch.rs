//! Batches: models sharing a material, plus the time-window decorators.

use std::sync::Arc;

use crate::camera::Camera;
use crate::canvas::Canvas;
use crate::material::Material;
use crate::model::Model;

/// Models drawn together with one material.
///
/// `Delayed`, `Transient` and `Terminal` wrap another batch to control when
/// it is visible. A transient batch turns terminal once its end time is
/// reached and a terminal batch never draws again: no later `update`,
/// whatever its time argument, brings it back.
#[derive(Clone, Debug, PartialEq)]
pub enum Batch {
    /// Every model is static.
    Static {
        /// Shared material.
        material: Arc<Material>,
        /// Models in draw order.
        models: Arc<[Model]>,
    },
    /// At least one model is dynamic.
    Dynamic {
        /// Shared material.
        material: Arc<Material>,
        /// Models in draw order.
        models: Arc<[Model]>,
    },
    /// Hidden until `start`, then replaced by the wrapped batch.
    Delayed {
        /// The batch that appears.
        batch: Arc<Batch>,
        /// First instant the batch is visible.
        start: u64,
    },
    /// Visible until `end`, then terminal.
    Transient {
        /// The visible batch.
        batch: Arc<Batch>,
        /// First instant the batch is gone.
        end: u64,
    },
    /// Gone for good.
    Terminal {
        /// The batch as it was when it expired.
        batch: Arc<Batch>,
    },
}

impl Batch {
    /// A batch of `models`; dynamic iff any model is.
    pub fn new(material: Arc<Material>, models: Vec<Model>) -> Self {
        let models: Arc<[Model]> = models.into();
        if models.iter().any(Model::is_dynamic) {
            Self::Dynamic { material, models }
        } else {
            Self::Static { material, models }
        }
    }

    /// This batch, hidden until `start`.
    pub fn delayed(self, start: u64) -> Self {
        Self::Delayed {
            batch: Arc::new(self),
            start,
        }
    }

    /// This batch, gone from `end` onwards.
    pub fn transient(self, end: u64) -> Self {
        Self::Transient {
            batch: Arc::new(self),
            end,
        }
    }

    /// Whether `update` can still change the batch.
    pub fn is_dynamic(&self) -> bool {
        match self {
            Self::Static { .. } | Self::Terminal { .. } => false,
            Self::Dynamic { .. } | Self::Delayed { .. } | Self::Transient { .. } => true,
        }
    }

    /// Whether the batch has expired.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Terminal { .. })
    }

    /// Advance to `time`.
    pub fn update(&self, time: u64) -> Self {
        match self {
            Self::Static { .. } | Self::Terminal { .. } => self.clone(),
            Self::Dynamic { material, models } => Self::new(
                Arc::clone(material),
                models.iter().map(|m| m.update(time)).collect::<Vec<_>>(),
            ),
            Self::Delayed { batch, start } => {
                if time >= *start {
                    batch.update(time)
                } else {
                    self.clone()
                }
            }
            Self::Transient { batch, end } => {
                if time < *end {
                    Self::Transient {
                        batch: Arc::new(batch.update(time)),
                        end: *end,
                    }
                } else {
                    Self::Terminal {
                        batch: Arc::new(batch.update(*end)),
                    }
                }
            }
        }
    }

    /// Jump to the terminal state.
    pub fn finish(&self) -> Self {
        match self {
            Self::Static { .. } | Self::Terminal { .. } => self.clone(),
            Self::Dynamic { material, models } => Self::new(
                Arc::clone(material),
                models.iter().map(Model::finish).collect::<Vec<_>>(),
            ),
            Self::Delayed { batch, .. } => batch.finish(),
            Self::Transient { batch, .. } => Self::Terminal {
                batch: Arc::new(batch.finish()),
            },
        }
    }

    /// Issue the draw call for whatever is visible.
    pub fn draw(&self, canvas: &mut dyn Canvas, camera: &Camera) {
        match self {
            Self::Static { material, models } | Self::Dynamic { material, models } => {
                if models.is_empty() {
                    return;
                }
                let indices = pack_indices(models);
                canvas.draw_batch(material, camera, models, &indices);
            }
            Self::Transient { batch, .. } => batch.draw(canvas, camera),
            Self::Delayed { .. } | Self::Terminal { .. } => {}
        }
    }
}

/// Concatenate every model's mesh indices, offsetting each by the number of
/// positions in the meshes before it.
pub fn pack_indices(models: &[Model]) -> Vec<u32> {
    let total = models.iter().map(|m| m.mesh().indices().len()).sum();
    let mut packed = Vec::with_capacity(total);
    let mut offset = 0u32;
    for model in models {
        let mesh = model.mesh();
        packed.extend(mesh.indices().iter().map(|i| i + offset));
        offset += mesh.positions().len() as u32;
    }
    packed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animation::Animation;
    use crate::canvas::Viewport;
    use crate::color::Color;
    use crate::interpolation::Interpolation;
    use crate::mesh::{Mesh, Region};
    use crate::transformation::Transformation;
    use glam::{Mat4, Vec3};
    use proptest::prelude::*;

    #[derive(Default)]
    struct Tally {
        draws: Vec<(usize, Vec<u32>)>,
    }

    impl Canvas for Tally {
        fn begin(&mut self, _viewport: Viewport, _background: Color) {}

        fn draw_batch(&mut self, _: &Material, _: &Camera, models: &[Model], indices: &[u32]) {
            self.draws.push((models.len(), indices.to_vec()));
        }
    }

    fn material() -> Arc<Material> {
        Arc::new(Material::new("flat", vec![]).unwrap())
    }

    fn quad() -> Arc<Mesh> {
        Arc::new(Mesh::quad(Region::default()))
    }

    fn sliding(start: u64, duration: u64) -> Model {
        Model::dynamic(
            quad(),
            Animation::dynamic(Transformation::translate(
                Vec3::X,
                Interpolation::linear(start, duration),
            )),
        )
    }

    fn draws_at(batch: &Batch) -> usize {
        let mut canvas = Tally::default();
        batch.draw(&mut canvas, &Camera::default());
        canvas.draws.len()
    }

    #[test]
    fn batch_is_static_once_models_settle() {
        let batch = Batch::new(
            material(),
            vec![sliding(0, 100), Model::new_static(quad(), Mat4::IDENTITY)],
        );
        assert!(batch.is_dynamic());
        assert!(batch.update(50).is_dynamic());
        let settled = batch.update(100);
        assert!(matches!(settled, Batch::Static { .. }));
        assert_eq!(settled.update(0), settled);
    }

    #[test]
    fn transient_batch_expires_for_good() {
        let batch =
            Batch::new(material(), vec![Model::new_static(quad(), Mat4::IDENTITY)]).transient(200);
        let during = batch.update(150);
        assert_eq!(draws_at(&during), 1);

        let gone = during.update(250);
        assert!(gone.is_terminal());
        assert!(!gone.is_dynamic());
        assert_eq!(draws_at(&gone), 0);
        // An earlier time does not resurrect it.
        assert!(gone.update(100).is_terminal());
        assert_eq!(draws_at(&gone.update(100)), 0);
    }

    #[test]
    fn delayed_batch_appears_at_start() {
        let inner = Batch::new(material(), vec![sliding(0, 1_000)]);
        let batch = inner.clone().delayed(300);
        assert_eq!(draws_at(&batch), 0);
        assert_eq!(draws_at(&batch.update(299)), 0);

        let shown = batch.update(300);
        assert_eq!(shown, inner.update(300));
        assert_eq!(draws_at(&shown), 1);
    }

    #[test]
    fn empty_batch_issues_no_draw() {
        let batch = Batch::new(material(), Vec::new());
        assert_eq!(draws_at(&batch), 0);
    }

    #[test]
    fn indices_are_offset_per_model() {
        let models = vec![
            Model::new_static(quad(), Mat4::IDENTITY),
            Model::new_static(quad(), Mat4::IDENTITY),
        ];
        assert_eq!(pack_indices(&models), vec![0, 1, 2, 0, 2, 3, 4, 5, 6, 4, 6, 7]);

        let mut canvas = Tally::default();
        Batch::new(material(), models).draw(&mut canvas, &Camera::default());
        assert_eq!(canvas.draws[0].0, 2);
        assert_eq!(canvas.draws[0].1.len(), 12);
    }

    #[test]
    fn finish_expires_transient() {
        let batch = Batch::new(material(), vec![sliding(0, 100)]).transient(1_000);
        let finished = batch.finish();
        assert!(finished.is_terminal());
    }

    fn arb_batch() -> impl Strategy<Value = Batch> {
        (0u64..400, 0u64..400, 0u8..3, 0u64..600).prop_map(|(start, duration, wrap, at)| {
            let batch = Batch::new(material(), vec![sliding(start, duration)]);
            match wrap {
                0 => batch,
                1 => batch.delayed(at),
                _ => batch.transient(at),
            }
        })
    }

    proptest! {
        #[test]
        fn chained_updates_converge(
            batch in arb_batch(),
            mut times in proptest::collection::vec(0u64..1_000, 3),
        ) {
            times.sort_unstable();
            let direct = batch.update(times[2]);
            let chained = batch.update(times[0]).update(times[1]).update(times[2]);
            prop_assert_eq!(direct, chained);
        }

        #[test]
        fn settled_batch_is_a_fixed_point(batch in arb_batch(), later in 0u64..10_000) {
            let settled = batch.update(1_000);
            prop_assert!(!settled.is_dynamic());
            prop_assert_eq!(settled.update(later), settled);
        }
    }
}
