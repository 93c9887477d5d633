//! Benchmark profiles for the Kiln scene graph.
//!
//! Provides pre-built frames for benchmarking:
//!
//! - [`grid_frame`]: `side * side` quads, each spinning over its own window
//! - [`layered_frame`]: the same grid split over several transient batches
//!
//! Every model animates between `0` and [`PROFILE_END`], so sampling a
//! profile at or after that instant collapses it to a static frame.

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use std::sync::Arc;

use kiln_scene::{
    Animation, Batch, Camera, Color, Frame, Interpolation, Mat4, Material, Mesh, Model, Region,
    Scene, SceneError, Transformation, Vec3,
};

/// Instant by which every profile animation has finished.
pub const PROFILE_END: u64 = 2_000;

/// Milliseconds between samples of a profile frame.
pub const PROFILE_STEP: u64 = 16;

fn model(mesh: &Arc<Mesh>, index: u64, x: f32, y: f32) -> Model {
    let start = (index * 37) % (PROFILE_END / 2);
    let spin = Transformation::rotate(
        Vec3::new(0.0, 0.0, 360.0),
        Interpolation::linear(start, PROFILE_END - start),
    );
    let place = Animation::Static(Mat4::from_translation(Vec3::new(x, y, 0.0)));
    Model::dynamic(
        Arc::clone(mesh),
        Animation::composite([place, Animation::dynamic(spin)]),
    )
}

fn grid(mesh: &Arc<Mesh>, side: u32) -> Vec<Model> {
    (0..side * side)
        .map(|i| {
            let (x, y) = ((i % side) as f32, (i / side) as f32);
            model(mesh, u64::from(i), x, y)
        })
        .collect()
}

/// One batch of `side * side` spinning quads.
pub fn grid_frame(side: u32) -> Result<Frame, SceneError> {
    let mesh = Arc::new(Mesh::quad(Region::default()));
    let material = Arc::new(Material::new("grid", Vec::new())?);
    let scene = Scene::new(Camera::default(), vec![Batch::new(material, grid(&mesh, side))]);
    Frame::dynamic(vec![scene], Color::BLACK, 1280, 720, PROFILE_STEP)
}

/// `layers` transient batches of `side * side` quads each, expiring one
/// after another before [`PROFILE_END`].
pub fn layered_frame(side: u32, layers: u32) -> Result<Frame, SceneError> {
    let mesh = Arc::new(Mesh::quad(Region::default()));
    let material = Arc::new(Material::new("layer", Vec::new())?);
    let batches = (0..layers)
        .map(|layer| {
            let end = PROFILE_END * u64::from(layer + 1) / u64::from(layers + 1);
            Batch::new(Arc::clone(&material), grid(&mesh, side)).transient(end)
        })
        .collect();
    let scene = Scene::new(Camera::default(), batches);
    Frame::dynamic(vec![scene], Color::BLACK, 1280, 720, PROFILE_STEP)
}
