//! Matrix animations and their collapsing composite.

use std::sync::Arc;

use glam::Mat4;
use smallvec::SmallVec;

use crate::transformation::Transformation;

/// A transformation-matrix producer over time.
///
/// A [`Composite`](Self::Composite) multiplies its children left to right.
/// Updating it folds every run of adjacent static children into one
/// pre-multiplied [`Static`](Self::Static) child, so the number of live
/// children is bounded by the number of children still in motion; when
/// none are left the composite itself becomes a single static animation.
///
/// Cloning is cheap: composite children are shared.
#[derive(Clone, Debug, PartialEq)]
pub enum Animation {
    /// Fixed matrix; `update` is the identity.
    Static(Mat4),
    /// One transformation in motion.
    Dynamic(Transformation),
    /// Ordered product of child animations.
    Composite(Arc<[Animation]>),
}

impl Default for Animation {
    fn default() -> Self {
        Self::Static(Mat4::IDENTITY)
    }
}

impl From<Transformation> for Animation {
    fn from(transformation: Transformation) -> Self {
        Self::settle(transformation)
    }
}

impl Animation {
    /// An animation wrapping `transformation`; static straight away if the
    /// transformation already is.
    pub fn dynamic(transformation: Transformation) -> Self {
        Self::settle(transformation)
    }

    /// The ordered product of `animations`.
    pub fn composite(animations: impl IntoIterator<Item = Animation>) -> Self {
        Self::Composite(animations.into_iter().collect())
    }

    /// The current matrix.
    pub fn matrix(&self) -> Mat4 {
        match self {
            Self::Static(matrix) => *matrix,
            Self::Dynamic(transformation) => transformation.matrix(),
            Self::Composite(children) => children
                .iter()
                .fold(Mat4::IDENTITY, |acc, child| acc * child.matrix()),
        }
    }

    /// Whether the matrix can still change.
    pub fn is_dynamic(&self) -> bool {
        !matches!(self, Self::Static(_))
    }

    /// Advance to `time`, collapsing whatever has come to rest.
    pub fn update(&self, time: u64) -> Self {
        match self {
            Self::Static(_) => self.clone(),
            Self::Dynamic(transformation) => Self::settle(transformation.update(time)),
            Self::Composite(children) => {
                Self::collapse(children.iter().map(|child| child.update(time)))
            }
        }
    }

    /// Jump every child to its terminal state and collapse.
    pub fn finish(&self) -> Self {
        match self {
            Self::Static(_) => self.clone(),
            Self::Dynamic(transformation) => Self::settle(transformation.finish()),
            Self::Composite(children) => Self::Static(
                children
                    .iter()
                    .fold(Mat4::IDENTITY, |acc, child| acc * child.finish().matrix()),
            ),
        }
    }

    /// Number of children a composite still tracks; 1 for anything else.
    pub fn live_children(&self) -> usize {
        match self {
            Self::Composite(children) => children.len(),
            _ => 1,
        }
    }

    fn settle(transformation: Transformation) -> Self {
        if transformation.is_dynamic() {
            Self::Dynamic(transformation)
        } else {
            Self::Static(transformation.matrix())
        }
    }

    fn collapse(updated: impl Iterator<Item = Animation>) -> Self {
        let mut live: SmallVec<[Animation; 4]> = SmallVec::new();
        let mut run: Option<Mat4> = None;

        for child in updated {
            if child.is_dynamic() {
                if let Some(matrix) = run.take() {
                    live.push(Self::Static(matrix));
                }
                live.push(child);
            } else {
                let matrix = child.matrix();
                run = Some(match run {
                    Some(acc) => acc * matrix,
                    None => matrix,
                });
            }
        }

        if live.is_empty() {
            return Self::Static(run.unwrap_or(Mat4::IDENTITY));
        }
        if let Some(matrix) = run {
            live.push(Self::Static(matrix));
        }
        Self::Composite(live.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interpolation::Interpolation;
    use crate::math;
    use glam::Vec3;
    use proptest::prelude::*;

    fn spin(start: u64, duration: u64) -> Animation {
        Animation::dynamic(Transformation::rotate(
            Vec3::new(0.0, 0.0, 90.0),
            Interpolation::linear(start, duration),
        ))
    }

    #[test]
    fn static_update_is_identity() {
        let a = Animation::Static(math::translate(Vec3::ONE));
        assert_eq!(a.update(1_000), a);
        assert_eq!(a.finish(), a);
    }

    #[test]
    fn dynamic_collapses_when_transformation_completes() {
        let a = spin(0, 100);
        assert!(a.update(50).is_dynamic());
        let done = a.update(100);
        assert_eq!(done, Animation::Static(math::rotate(Vec3::new(0.0, 0.0, 90.0))));
    }

    #[test]
    fn composite_collapses_rotate_then_scale() {
        let rotate = Animation::Static(math::rotate(Vec3::new(0.0, 0.0, 45.0)));
        let scale = Animation::dynamic(Transformation::scale(
            Vec3::new(2.0, 3.0, 1.0),
            Interpolation::linear(0, 100),
        ));
        let composite = Animation::composite([rotate, scale]);
        assert!(composite.is_dynamic());

        let settled = composite.update(150);
        let expected =
            math::rotate(Vec3::new(0.0, 0.0, 45.0)) * math::scale(Vec3::new(2.0, 3.0, 1.0));
        match settled {
            Animation::Static(matrix) => assert!(math::approx_eq(&matrix, &expected, 1e-6)),
            other => panic!("expected a static animation, got {other:?}"),
        }
    }

    #[test]
    fn adjacent_static_children_fold_into_one() {
        let composite = Animation::composite([
            Animation::Static(math::translate(Vec3::X)),
            Animation::Static(math::translate(Vec3::Y)),
            spin(0, 1_000),
            Animation::Static(math::translate(Vec3::Z)),
            spin(0, 100),
        ]);
        let updated = composite.update(10);
        assert_eq!(updated.live_children(), 4);
        let Animation::Composite(children) = &updated else {
            panic!("expected composite");
        };
        assert_eq!(children[0], Animation::Static(math::translate(Vec3::X + Vec3::Y)));

        // The short spin finishes: its static matrix merges with its neighbour.
        let later = updated.update(200);
        assert_eq!(later.live_children(), 3);
        assert!(math::approx_eq(&later.matrix(), &composite.update(200).matrix(), 1e-5));
    }

    #[test]
    fn empty_composite_is_identity() {
        let composite = Animation::composite([]);
        assert_eq!(composite.matrix(), Mat4::IDENTITY);
        assert_eq!(composite.update(0), Animation::Static(Mat4::IDENTITY));
    }

    #[test]
    fn finish_collapses_everything() {
        let composite = Animation::composite([spin(0, 100), spin(50, 100)]);
        let quarter = math::rotate(Vec3::new(0.0, 0.0, 90.0));
        let expected = quarter * quarter;
        match composite.finish() {
            Animation::Static(matrix) => assert!(math::approx_eq(&matrix, &expected, 1e-6)),
            other => panic!("expected a static animation, got {other:?}"),
        }
    }

    fn arb_leaf() -> impl Strategy<Value = Animation> {
        (0u8..3, -5.0f32..5.0, 0u64..500, 0u64..500).prop_map(|(kind, m, start, duration)| {
            let magnitude = Vec3::new(m, m * 0.5, 1.0);
            let interpolation = Interpolation::linear(start, duration);
            match kind {
                0 => Animation::dynamic(Transformation::scale(magnitude, interpolation)),
                1 => Animation::dynamic(Transformation::translate(magnitude, interpolation)),
                _ => Animation::Static(math::translate(magnitude)),
            }
        })
    }

    proptest! {
        #[test]
        fn chained_updates_converge(
            leaves in proptest::collection::vec(arb_leaf(), 0..6),
            mut times in proptest::collection::vec(0u64..1_200, 3),
        ) {
            times.sort_unstable();
            let composite = Animation::composite(leaves);
            let direct = composite.update(times[2]);
            let chained = composite.update(times[0]).update(times[1]).update(times[2]);
            prop_assert_eq!(direct.is_dynamic(), chained.is_dynamic());
            prop_assert!(math::approx_eq(&direct.matrix(), &chained.matrix(), 1e-3));
        }

        #[test]
        fn settled_animation_is_a_fixed_point(
            leaves in proptest::collection::vec(arb_leaf(), 0..6),
            later in 0u64..10_000,
        ) {
            let settled = Animation::composite(leaves).update(1_000);
            prop_assert!(!settled.is_dynamic());
            prop_assert_eq!(settled.update(later), settled);
        }
    }
}
