//! The draw seam between frames and a graphics backend.

use crate::camera::Camera;
use crate::color::Color;
use crate::material::Material;
use crate::model::Model;

/// Pixel dimensions of the target a frame is drawn into.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Viewport {
    /// Width in pixels, always positive.
    pub width: u32,
    /// Height in pixels, always positive.
    pub height: u32,
}

impl Viewport {
    /// Width over height.
    pub fn aspect(&self) -> f32 {
        self.width as f32 / self.height as f32
    }
}

/// A graphics backend frames are drawn onto.
///
/// Calls arrive on the display thread only, one [`begin`](Self::begin) per
/// frame followed by one [`draw_batch`](Self::draw_batch) per visible,
/// non-empty batch in scene order.
pub trait Canvas {
    /// Start a frame: set the viewport and clear to `background`.
    fn begin(&mut self, viewport: Viewport, background: Color);

    /// Draw `models` with `material` as seen by `camera`.
    ///
    /// `indices` holds every model's triangle indices concatenated, each
    /// model's offset by the number of positions of the models before it.
    fn draw_batch(
        &mut self,
        material: &Material,
        camera: &Camera,
        models: &[Model],
        indices: &[u32],
    );
}
