// Copyright 2026 the Lamina Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Layout properties and cached render state.

use kurbo::{Size, Vec2};

use crate::transform::Transform3d;

/// Layout properties of a layer, all set by the caller.
///
/// Pixel quantities use a top-left origin with Y pointing down.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LayerProperties {
    /// Point in the parent, normalized to the parent's size, that
    /// [`position`](Self::position) is measured from.
    pub anchor: Vec2,
    /// Point in this layer, normalized to its size, that it is positioned,
    /// scaled and rotated around.
    pub origin: Vec2,
    /// Pixel offset of the origin from the anchor.
    pub position: Vec2,
    /// Pixel extent.
    pub size: Size,
    /// Scale factors around the origin.
    pub scale: Vec2,
    /// Shear factors.
    pub shear: Vec2,
    /// Rotation around the origin in degrees, clockwise on screen.
    pub rotation: f64,
}

impl LayerProperties {
    /// Creates properties for an untransformed layer of `size` placed at the
    /// parent's top-left corner.
    #[must_use]
    pub const fn with_size(size: Size) -> Self {
        Self {
            anchor: Vec2::ZERO,
            origin: Vec2::ZERO,
            position: Vec2::ZERO,
            size,
            scale: Vec2::new(1.0, 1.0),
            shear: Vec2::ZERO,
            rotation: 0.0,
        }
    }

    /// Computes the transform from this layer's pixel space into its
    /// parent's, for a parent of `parent_size`.
    ///
    /// The result is
    /// `T(anchor · parent_size) · Rz(rotation) · T(position) · S(scale) · T(−origin · size) · Sh(shear)`,
    /// applied right to left.
    #[must_use]
    pub fn local_transform(&self, parent_size: Size) -> Transform3d {
        let anchor = Transform3d::from_translation(
            self.anchor.x * parent_size.width,
            self.anchor.y * parent_size.height,
            0.0,
        );
        let rotation = Transform3d::from_rotation_z(self.rotation.to_radians());
        let position = Transform3d::from_translation(self.position.x, self.position.y, 0.0);
        let scale = Transform3d::from_scale(self.scale.x, self.scale.y, 1.0);
        let origin = Transform3d::from_translation(
            -self.origin.x * self.size.width,
            -self.origin.y * self.size.height,
            0.0,
        );
        let shear = Transform3d::from_shear(self.shear.x, self.shear.y, 0.0);
        anchor * rotation * position * scale * origin * shear
    }
}

impl Default for LayerProperties {
    fn default() -> Self {
        Self::with_size(Size::ZERO)
    }
}

/// State a layer caches between render passes.
///
/// `parent_size` and `parent_transform_world` are copies taken from the
/// parent during the last pass that touched this layer; a root keeps the
/// defaults (zero size, identity).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RenderState {
    /// The parent's size.
    pub parent_size: Size,
    /// The parent's world transform.
    pub parent_transform_world: Transform3d,
    /// This layer's world transform.
    pub transform_world: Transform3d,
}

impl Default for RenderState {
    fn default() -> Self {
        Self {
            parent_size: Size::ZERO,
            parent_transform_world: Transform3d::IDENTITY,
            transform_world: Transform3d::IDENTITY,
        }
    }
}
