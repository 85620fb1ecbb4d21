use std::cell::OnceCell;

use glam::Vec3;
use marionette_core::BoundingBox;

/// CPU-side vertex positions with a lazily computed local bounding box.
#[derive(Debug, Clone, Default)]
pub struct Geometry {
    positions: Vec<Vec3>,
    bounding_box: OnceCell<Option<BoundingBox>>,
}

impl Geometry {
    #[must_use]
    pub fn from_positions(positions: Vec<Vec3>) -> Self {
        Self {
            positions,
            bounding_box: OnceCell::new(),
        }
    }

    /// Eight-corner box geometry spanning `min..max`.
    #[must_use]
    pub fn from_bounds(min: Vec3, max: Vec3) -> Self {
        let mut corners = Vec::with_capacity(8);
        for &x in &[min.x, max.x] {
            for &y in &[min.y, max.y] {
                for &z in &[min.z, max.z] {
                    corners.push(Vec3::new(x, y, z));
                }
            }
        }
        Self::from_positions(corners)
    }

    #[inline]
    #[must_use]
    pub fn positions(&self) -> &[Vec3] {
        &self.positions
    }

    /// Local-space bounds, computed on first access and cached afterwards.
    ///
    /// `None` when the geometry has no vertices or any vertex is not finite.
    #[must_use]
    pub fn bounding_box(&self) -> Option<BoundingBox> {
        *self.bounding_box.get_or_init(|| {
            BoundingBox::from_points(self.positions.iter().copied()).filter(BoundingBox::is_valid)
        })
    }
}

/// Renderable component referenced by a [`crate::Node`].
#[derive(Debug, Clone)]
pub struct Mesh {
    pub geometry: Geometry,
    pub visible: bool,
}

impl Mesh {
    #[must_use]
    pub fn new(geometry: Geometry) -> Self {
        Self {
            geometry,
            visible: true,
        }
    }
}
