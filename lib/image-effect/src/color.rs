//! Normalized floating point RGBA color used by the per-pixel programs.

use crate::math::saturate;
use image::Rgba as PixelRgba;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rgba {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Rgba {
    pub const TRANSPARENT: Rgba = Rgba::new(0.0, 0.0, 0.0, 0.0);

    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    pub const fn opaque(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    pub fn rgb(&self) -> [f32; 3] {
        [self.r, self.g, self.b]
    }

    pub fn saturate(self) -> Self {
        Self::new(
            saturate(self.r),
            saturate(self.g),
            saturate(self.b),
            saturate(self.a),
        )
    }

    pub fn scale(self, factor: f32) -> Self {
        Self::new(
            self.r * factor,
            self.g * factor,
            self.b * factor,
            self.a * factor,
        )
    }

    pub fn channels(&self) -> [f32; 4] {
        [self.r, self.g, self.b, self.a]
    }

    pub fn is_normalized(&self) -> bool {
        self.channels().iter().all(|c| (0.0..=1.0).contains(c))
    }
}

impl From<PixelRgba<u8>> for Rgba {
    fn from(pixel: PixelRgba<u8>) -> Self {
        Self::new(
            pixel[0] as f32 / 255.0,
            pixel[1] as f32 / 255.0,
            pixel[2] as f32 / 255.0,
            pixel[3] as f32 / 255.0,
        )
    }
}

impl From<Rgba> for PixelRgba<u8> {
    fn from(color: Rgba) -> Self {
        let c = color.saturate();
        PixelRgba([
            (c.r * 255.0).round() as u8,
            (c.g * 255.0).round() as u8,
            (c.b * 255.0).round() as u8,
            (c.a * 255.0).round() as u8,
        ])
    }
}
