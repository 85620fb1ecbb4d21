//! Sliding-axis extraction
//!
//! Derives a bounded translation axis from a reference mesh's local bounds:
//! the longer of the two horizontal extents becomes the axis, the box ends
//! become origin and tip, and a margin is kept clear at each end.

use glam::Vec3;
use log::info;
use marionette_core::{BoundingBox, Result, RigError};
use marionette_scene::{NodeHandle, Scene};

/// A bounded line segment, in the reference node's local space, along which
/// a joint may translate.
///
/// `min <= max` always holds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxisSpec {
    origin: Vec3,
    direction: Vec3,
    length: f32,
    min: f32,
    max: f32,
}

impl AxisSpec {
    /// Builds the axis spanning the dominant horizontal extent of `bounds`.
    ///
    /// X wins ties with Z. The range is `[margin, max(margin, length - margin)]`,
    /// so it collapses to a single point instead of inverting when the extent
    /// is shorter than twice the margin.
    #[must_use]
    pub fn from_bounds(bounds: &BoundingBox, margin: f32) -> Self {
        let size = bounds.size();
        let (direction, length) = if size.z > size.x {
            (Vec3::Z, size.z)
        } else {
            (Vec3::X, size.x)
        };

        let origin = bounds.center() - direction * (length * 0.5);

        Self {
            origin,
            direction,
            length,
            min: margin,
            max: margin.max(length - margin),
        }
    }

    #[inline]
    #[must_use]
    pub fn origin(&self) -> Vec3 {
        self.origin
    }

    /// Unit direction from origin to tip.
    #[inline]
    #[must_use]
    pub fn direction(&self) -> Vec3 {
        self.direction
    }

    #[inline]
    #[must_use]
    pub fn tip(&self) -> Vec3 {
        self.origin + self.direction * self.length
    }

    #[inline]
    #[must_use]
    pub fn length(&self) -> f32 {
        self.length
    }

    #[inline]
    #[must_use]
    pub fn min(&self) -> f32 {
        self.min
    }

    #[inline]
    #[must_use]
    pub fn max(&self) -> f32 {
        self.max
    }

    /// Parks `s` at the nearest reachable position.
    #[must_use]
    pub fn clamp(&self, s: f32) -> f32 {
        if s.is_nan() {
            return self.min;
        }
        s.clamp(self.min, self.max)
    }

    /// Splits `point - origin` into the scalar along the axis and the
    /// perpendicular residual.
    #[must_use]
    pub fn decompose(&self, point: Vec3) -> (f32, Vec3) {
        let to_point = point - self.origin;
        let s = to_point.dot(self.direction);
        (s, to_point - self.direction * s)
    }

    /// Inverse of [`AxisSpec::decompose`].
    #[must_use]
    pub fn compose(&self, s: f32, offset: Vec3) -> Vec3 {
        self.origin + self.direction * s + offset
    }
}

/// Position of a sliding joint along its [`AxisSpec`].
///
/// The perpendicular offset is captured once and never changes afterwards,
/// so repeated solves cannot make the assembly drift sideways.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SlideState {
    scalar: f32,
    offset: Vec3,
}

impl SlideState {
    /// Captures the current position of an assembly, clamping its scalar.
    #[must_use]
    pub fn capture(axis: &AxisSpec, point: Vec3) -> Self {
        let (s, offset) = axis.decompose(point);
        Self {
            scalar: axis.clamp(s),
            offset,
        }
    }

    #[inline]
    #[must_use]
    pub fn scalar(&self) -> f32 {
        self.scalar
    }

    #[inline]
    #[must_use]
    pub fn offset(&self) -> Vec3 {
        self.offset
    }

    pub fn set_scalar(&mut self, axis: &AxisSpec, s: f32) {
        self.scalar = axis.clamp(s);
    }

    /// Local position of the assembly in the reference node's space.
    #[must_use]
    pub fn position(&self, axis: &AxisSpec) -> Vec3 {
        axis.compose(self.scalar, self.offset)
    }
}

/// Reads (and caches) the local bounds of `reference`'s mesh and derives its
/// sliding axis.
pub fn extract_axis(scene: &Scene, reference: NodeHandle, margin: f32) -> Result<AxisSpec> {
    let name = scene.get_name(reference).unwrap_or("<unnamed>");

    let mesh = scene
        .mesh_of(reference)
        .ok_or_else(|| RigError::DegenerateGeometry(format!("'{name}' has no mesh")))?;
    let bounds = mesh
        .geometry
        .bounding_box()
        .ok_or_else(|| RigError::DegenerateGeometry(format!("'{name}' has no usable bounds")))?;

    let axis = AxisSpec::from_bounds(&bounds, margin);
    info!(
        "Axis for '{name}': direction {:?}, range [{:.3}, {:.3}]",
        axis.direction(),
        axis.min(),
        axis.max()
    );
    Ok(axis)
}
