//! Triangle meshes and texture regions.

use glam::{Mat4, Vec2, Vec3};

use crate::error::SceneError;

// ── Region ─────────────────────────────────────────────────────

/// A rectangle of texture space, every boundary in `[0, 1]`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Region {
    bottom: f32,
    top: f32,
    left: f32,
    right: f32,
}

impl Default for Region {
    /// The whole texture.
    fn default() -> Self {
        Self {
            bottom: 0.0,
            top: 1.0,
            left: 0.0,
            right: 1.0,
        }
    }
}

impl Region {
    /// A validated region.
    pub fn new(bottom: f32, top: f32, left: f32, right: f32) -> Result<Self, SceneError> {
        for value in [bottom, top, left, right] {
            if !(0.0..=1.0).contains(&value) {
                return Err(SceneError::RegionOutOfRange { value });
            }
        }
        Ok(Self {
            bottom,
            top,
            left,
            right,
        })
    }

    /// Lower boundary.
    pub fn bottom(&self) -> f32 {
        self.bottom
    }

    /// Upper boundary.
    pub fn top(&self) -> f32 {
        self.top
    }

    /// Left boundary.
    pub fn left(&self) -> f32 {
        self.left
    }

    /// Right boundary.
    pub fn right(&self) -> f32 {
        self.right
    }

    /// `right - left`.
    pub fn width(&self) -> f32 {
        self.right - self.left
    }

    /// `top - bottom`.
    pub fn height(&self) -> f32 {
        self.top - self.bottom
    }
}

// ── Mesh ───────────────────────────────────────────────────────

/// Indexed triangle geometry.
///
/// Texture coordinates are optional: a mesh carries either none or exactly
/// one per position. Every index addresses an existing position and the
/// index list is a whole number of triangles.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Mesh {
    positions: Vec<Vec3>,
    coordinates: Vec<Vec2>,
    indices: Vec<u32>,
}

impl Mesh {
    /// A validated mesh.
    pub fn new(
        positions: Vec<Vec3>,
        coordinates: Vec<Vec2>,
        indices: Vec<u32>,
    ) -> Result<Self, SceneError> {
        if !coordinates.is_empty() && coordinates.len() != positions.len() {
            return Err(SceneError::CoordinateMismatch {
                coordinates: coordinates.len(),
                positions: positions.len(),
            });
        }
        if indices.len() % 3 != 0 {
            return Err(SceneError::PartialTriangle {
                count: indices.len(),
            });
        }
        if let Some(&index) = indices.iter().find(|&&i| i as usize >= positions.len()) {
            return Err(SceneError::IndexOutOfRange {
                index,
                positions: positions.len(),
            });
        }
        Ok(Self {
            positions,
            coordinates,
            indices,
        })
    }

    /// A unit quad in the XY plane centred on the origin, textured over the
    /// whole of `region`.
    pub fn quad(region: Region) -> Self {
        Self {
            positions: vec![
                Vec3::new(-0.5, -0.5, 0.0),
                Vec3::new(0.5, -0.5, 0.0),
                Vec3::new(0.5, 0.5, 0.0),
                Vec3::new(-0.5, 0.5, 0.0),
            ],
            coordinates: vec![
                Vec2::new(region.left(), region.bottom()),
                Vec2::new(region.right(), region.bottom()),
                Vec2::new(region.right(), region.top()),
                Vec2::new(region.left(), region.top()),
            ],
            indices: vec![0, 1, 2, 0, 2, 3],
        }
    }

    /// Concatenate `meshes`, re-basing each mesh's indices onto the merged
    /// position list.
    pub fn merge<'a>(meshes: impl IntoIterator<Item = &'a Mesh>) -> Result<Self, SceneError> {
        let mut positions = Vec::new();
        let mut coordinates = Vec::new();
        let mut indices = Vec::new();
        for mesh in meshes {
            let base = positions.len() as u32;
            indices.extend(mesh.indices.iter().map(|i| i + base));
            positions.extend_from_slice(&mesh.positions);
            coordinates.extend_from_slice(&mesh.coordinates);
        }
        Self::new(positions, coordinates, indices)
    }

    /// Vertex positions.
    pub fn positions(&self) -> &[Vec3] {
        &self.positions
    }

    /// Per-vertex texture coordinates; empty for an untextured mesh.
    pub fn coordinates(&self) -> &[Vec2] {
        &self.coordinates
    }

    /// Triangle indices into [`positions`](Self::positions).
    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    /// A copy with every position transformed by `matrix`.
    pub fn transform(&self, matrix: &Mat4) -> Self {
        Self {
            positions: self
                .positions
                .iter()
                .map(|p| matrix.transform_point3(*p))
                .collect(),
            coordinates: self.coordinates.clone(),
            indices: self.indices.clone(),
        }
    }
}
