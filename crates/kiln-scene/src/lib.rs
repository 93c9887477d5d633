//! Immutable scene-graph values for the Kiln engine.
//!
//! This is the leaf crate of the workspace. Every type here follows the
//! same protocol: it is immutable, reports whether it still changes with
//! time through `is_dynamic()`, and advances through a pure
//! `update(time)` that returns a new value. Once a subtree stops moving it
//! collapses into its cheapest static form, after which `update` is an
//! identity operation.
//!
//! The hierarchy, leaf first:
//!
//! ```text
//! Interpolation -> Transformation -> Animation -> Model -> Batch -> Scene -> Frame
//!                                        \-> Camera --------------/
//! ```

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod animation;
pub mod batch;
pub mod camera;
pub mod canvas;
pub mod color;
pub mod error;
pub mod frame;
pub mod interpolation;
pub mod material;
pub mod math;
pub mod mesh;
pub mod model;
pub mod scene;
pub mod transformation;

pub use animation::Animation;
pub use batch::{pack_indices, Batch};
pub use camera::Camera;
pub use canvas::{Canvas, Viewport};
pub use color::Color;
pub use error::SceneError;
pub use frame::{Frame, Renderable};
pub use interpolation::Interpolation;
pub use material::{Blend, Material, Property};
pub use mesh::{Mesh, Region};
pub use model::Model;
pub use scene::Scene;
pub use transformation::{TransformKind, Transformation};

pub use glam::{Mat4, Vec2, Vec3};
