//! Materials: the shader inputs a batch is drawn with.

use std::sync::Arc;

use glam::Mat4;

use crate::camera::Camera;
use crate::color::Color;
use crate::error::SceneError;
use crate::model::Model;

/// How fragments combine with what is already in the target.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Blend {
    /// Overwrite.
    #[default]
    Opaque,
    /// Source-over with straight alpha.
    Alpha,
    /// Add source to destination.
    Additive,
}

/// One input a material feeds to its program.
///
/// Matrix properties name the uniform they are bound to; the canvas asks
/// [`Property::matrix`] for the value per model.
#[derive(Clone, Debug, PartialEq)]
pub enum Property {
    /// Vertex positions bound to an attribute.
    Position(Arc<str>),
    /// Model matrix uniform.
    Model(Arc<str>),
    /// View matrix uniform.
    View(Arc<str>),
    /// Projection matrix uniform.
    Projection(Arc<str>),
    /// View times model.
    ModelView(Arc<str>),
    /// Projection times view times model.
    ModelViewProjection(Arc<str>),
    /// Sampler uniform and the texture it samples.
    Texture {
        /// Sampler uniform.
        uniform: Arc<str>,
        /// Texture identifier understood by the canvas.
        texture: Arc<str>,
    },
    /// Constant color uniform.
    Color {
        /// Color uniform.
        uniform: Arc<str>,
        /// The color.
        color: Color,
    },
    /// Blend state.
    Blend(Blend),
    /// Depth testing on.
    Depth,
}

impl Property {
    /// A property bound to `uniform`, built by `make` once the name is
    /// known to be non-empty.
    pub fn named(
        uniform: &str,
        make: impl FnOnce(Arc<str>) -> Property,
    ) -> Result<Self, SceneError> {
        Ok(make(non_empty(uniform, "property")?))
    }

    /// A texture sampler property.
    pub fn texture(uniform: &str, texture: &str) -> Result<Self, SceneError> {
        Ok(Self::Texture {
            uniform: non_empty(uniform, "property")?,
            texture: non_empty(texture, "texture")?,
        })
    }

    /// A constant color property.
    pub fn color(uniform: &str, color: Color) -> Result<Self, SceneError> {
        Ok(Self::Color {
            uniform: non_empty(uniform, "property")?,
            color,
        })
    }

    /// The uniform or attribute this property is bound to, if any.
    pub fn binding(&self) -> Option<&str> {
        match self {
            Self::Position(name)
            | Self::Model(name)
            | Self::View(name)
            | Self::Projection(name)
            | Self::ModelView(name)
            | Self::ModelViewProjection(name) => Some(name.as_ref()),
            Self::Texture { uniform, .. } | Self::Color { uniform, .. } => Some(uniform.as_ref()),
            Self::Blend(_) | Self::Depth => None,
        }
    }

    /// The matrix value of a matrix property for `model` seen by `camera`.
    pub fn matrix(&self, camera: &Camera, model: &Model) -> Option<Mat4> {
        match self {
            Self::Model(_) => Some(model.matrix()),
            Self::View(_) => Some(camera.view()),
            Self::Projection(_) => Some(camera.projection()),
            Self::ModelView(_) => Some(camera.view() * model.matrix()),
            Self::ModelViewProjection(_) => {
                Some(camera.projection() * camera.view() * model.matrix())
            }
            _ => None,
        }
    }
}

/// A named, immutable list of [`Property`] values.
#[derive(Clone, Debug, PartialEq)]
pub struct Material {
    name: Arc<str>,
    properties: Vec<Property>,
}

impl Material {
    /// A validated material.
    pub fn new(name: &str, properties: Vec<Property>) -> Result<Self, SceneError> {
        Ok(Self {
            name: non_empty(name, "material")?,
            properties,
        })
    }

    /// The program name the canvas resolves.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Properties in binding order.
    pub fn properties(&self) -> &[Property] {
        &self.properties
    }

    /// The blend state, [`Blend::Opaque`] unless a property says otherwise.
    pub fn blend(&self) -> Blend {
        self.properties
            .iter()
            .find_map(|p| match p {
                Property::Blend(blend) => Some(*blend),
                _ => None,
            })
            .unwrap_or_default()
    }

    /// Whether depth testing is requested.
    pub fn depth(&self) -> bool {
        self.properties.iter().any(|p| matches!(p, Property::Depth))
    }
}

fn non_empty(name: &str, what: &'static str) -> Result<Arc<str>, SceneError> {
    if name.is_empty() {
        return Err(SceneError::EmptyName { what });
    }
    Ok(Arc::from(name))
}
