//! Source surfaces the per-pixel programs read from.

use crate::{color::Rgba, math::Vec2};
use image::RgbaImage;

pub trait Sampler {
    fn size(&self) -> (u32, u32);

    /// Color at `coord`, in pixel space of the surface.
    fn sample(&self, coord: Vec2) -> Rgba;
}

/// Nearest neighbour lookup, coordinates outside the surface clamp to its edge.
impl Sampler for RgbaImage {
    fn size(&self) -> (u32, u32) {
        self.dimensions()
    }

    fn sample(&self, coord: Vec2) -> Rgba {
        let (width, height) = self.dimensions();
        if width == 0 || height == 0 {
            return Rgba::TRANSPARENT;
        }

        let x = clamp_texel(coord.x, width);
        let y = clamp_texel(coord.y, height);
        Rgba::from(*self.get_pixel(x, y))
    }
}

fn clamp_texel(v: f32, extent: u32) -> u32 {
    if v.is_nan() || v < 0.0 {
        return 0;
    }

    (v.floor() as u32).min(extent - 1)
}

/// Single color surface, handy for tests and for probing an effect.
#[derive(Debug, Clone, Copy)]
pub struct SolidSampler {
    pub color: Rgba,
    pub size: (u32, u32),
}

impl Sampler for SolidSampler {
    fn size(&self) -> (u32, u32) {
        self.size
    }

    fn sample(&self, _coord: Vec2) -> Rgba {
        self.color
    }
}
