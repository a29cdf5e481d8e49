// Copyright 2026 the Lamina Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Colour and texture-coordinate values carried by attachments.

/// A straight-alpha RGBA colour with components normalized to `0..=1`.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Rgba {
    /// Red.
    pub r: f32,
    /// Green.
    pub g: f32,
    /// Blue.
    pub b: f32,
    /// Alpha.
    pub a: f32,
}

impl Rgba {
    /// Opaque white.
    pub const WHITE: Self = Self::new(1.0, 1.0, 1.0, 1.0);
    /// Opaque black.
    pub const BLACK: Self = Self::new(0.0, 0.0, 0.0, 1.0);
    /// Fully transparent black.
    pub const TRANSPARENT: Self = Self::new(0.0, 0.0, 0.0, 0.0);

    /// Creates a colour from its components.
    #[inline]
    #[must_use]
    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Returns `[r, g, b, a]`, the layout used in vertex data.
    #[inline]
    #[must_use]
    pub const fn to_array(self) -> [f32; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

/// A texture coordinate normalized to `0..=1`, with a bottom-left origin.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Uv {
    /// Horizontal coordinate.
    pub u: f32,
    /// Vertical coordinate, increasing upwards.
    pub v: f32,
}

impl Uv {
    /// The bottom-left corner of a texture.
    pub const BOTTOM_LEFT: Self = Self::new(0.0, 0.0);
    /// The top-right corner of a texture.
    pub const TOP_RIGHT: Self = Self::new(1.0, 1.0);

    /// Creates a texture coordinate.
    #[inline]
    #[must_use]
    pub const fn new(u: f32, v: f32) -> Self {
        Self { u, v }
    }
}
