//! Frames: the unit the graphics pipeline renders, animates and draws.

use std::sync::Arc;

use crate::canvas::{Canvas, Viewport};
use crate::color::Color;
use crate::error::SceneError;
use crate::scene::Scene;

/// Scenes plus a background color and viewport.
///
/// A dynamic frame also carries the key-frame duration: how long after a
/// sample the next one is due. Updating a dynamic frame whose scenes have
/// all come to rest yields a static frame.
///
/// # Examples
///
/// ```
/// use kiln_scene::{Color, Frame};
///
/// let frame = Frame::new_static(Vec::new(), Color::BLACK, 640, 480).unwrap();
/// assert!(!frame.is_dynamic());
/// assert_eq!(frame.duration(), 0);
/// assert!(Frame::new_static(Vec::new(), Color::BLACK, 0, 480).is_err());
/// ```
#[derive(Clone, Debug, PartialEq)]
pub enum Frame {
    /// Nothing left to animate.
    Static {
        /// Scenes in draw order.
        scenes: Arc<[Scene]>,
        /// Clear color.
        background: Color,
        /// Target dimensions.
        viewport: Viewport,
    },
    /// Still animating.
    Dynamic {
        /// Scenes in draw order.
        scenes: Arc<[Scene]>,
        /// Clear color.
        background: Color,
        /// Target dimensions.
        viewport: Viewport,
        /// Milliseconds between samples.
        duration: u64,
    },
}

impl Frame {
    /// A static frame; `width` and `height` must be positive.
    pub fn new_static(
        scenes: Vec<Scene>,
        background: Color,
        width: u32,
        height: u32,
    ) -> Result<Self, SceneError> {
        Ok(Self::Static {
            scenes: scenes.into(),
            background,
            viewport: viewport(width, height)?,
        })
    }

    /// A dynamic frame sampled every `duration` ms; `width` and `height`
    /// must be positive.
    pub fn dynamic(
        scenes: Vec<Scene>,
        background: Color,
        width: u32,
        height: u32,
        duration: u64,
    ) -> Result<Self, SceneError> {
        Ok(Self::Dynamic {
            scenes: scenes.into(),
            background,
            viewport: viewport(width, height)?,
            duration,
        })
    }

    /// Scenes in draw order.
    pub fn scenes(&self) -> &[Scene] {
        match self {
            Self::Static { scenes, .. } | Self::Dynamic { scenes, .. } => scenes,
        }
    }

    /// Clear color.
    pub fn background(&self) -> Color {
        match self {
            Self::Static { background, .. } | Self::Dynamic { background, .. } => *background,
        }
    }

    /// Target dimensions.
    pub fn viewport(&self) -> Viewport {
        match self {
            Self::Static { viewport, .. } | Self::Dynamic { viewport, .. } => *viewport,
        }
    }

    /// Milliseconds between samples; 0 for a static frame.
    pub fn duration(&self) -> u64 {
        match self {
            Self::Static { .. } => 0,
            Self::Dynamic { duration, .. } => *duration,
        }
    }

    /// Whether `update` can still change the frame.
    pub fn is_dynamic(&self) -> bool {
        matches!(self, Self::Dynamic { .. })
    }

    /// Sample at `time`.
    pub fn update(&self, time: u64) -> Self {
        self.advance(|scene| scene.update(time))
    }

    /// Jump every scene to its terminal state.
    pub fn finish(&self) -> Self {
        self.advance(Scene::finish)
    }

    /// Clear the canvas, then draw every scene in order.
    pub fn draw(&self, canvas: &mut dyn Canvas) {
        canvas.begin(self.viewport(), self.background());
        for scene in self.scenes() {
            scene.draw(canvas);
        }
    }

    fn advance(&self, step: impl Fn(&Scene) -> Scene) -> Self {
        match self {
            Self::Static { .. } => self.clone(),
            Self::Dynamic {
                scenes,
                background,
                viewport,
                duration,
            } => {
                let scenes: Arc<[Scene]> = scenes.iter().map(step).collect();
                if scenes.iter().any(Scene::is_dynamic) {
                    Self::Dynamic {
                        scenes,
                        background: *background,
                        viewport: *viewport,
                        duration: *duration,
                    }
                } else {
                    Self::Static {
                        scenes,
                        background: *background,
                        viewport: *viewport,
                    }
                }
            }
        }
    }
}

fn viewport(width: u32, height: u32) -> Result<Viewport, SceneError> {
    if width == 0 || height == 0 {
        return Err(SceneError::EmptyViewport { width, height });
    }
    Ok(Viewport { width, height })
}

/// A state that can be snapshotted into a [`Frame`].
pub trait Renderable {
    /// Build the frame showing this state.
    fn render(&self) -> Result<Frame, SceneError>;
}
