//! Color tint for sprite rendering.
//!
//! The [`Tint`] modulates the texture color of every quad a sprite submits.
//! Components are normalized floats so animation blending can interpolate
//! them directly.

use glam::Vec4;

/// RGBA color modulation, each channel nominally in `0.0..=1.0`.
#[derive(Clone, Debug, Copy, PartialEq)]
pub struct Tint {
    pub color: Vec4,
}

impl Tint {
    pub const WHITE: Tint = Tint { color: Vec4::ONE };

    /// Create a new Tint with the specified RGBA values.
    pub fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self {
            color: Vec4::new(r, g, b, a),
        }
    }

    /// Create a Tint from 8-bit channels.
    pub fn from_rgba8(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self::new(
            r as f32 / 255.0,
            g as f32 / 255.0,
            b as f32 / 255.0,
            a as f32 / 255.0,
        )
    }
}

impl Default for Tint {
    fn default() -> Self {
        Self::WHITE
    }
}

impl From<Vec4> for Tint {
    fn from(color: Vec4) -> Self {
        Self { color }
    }
}
