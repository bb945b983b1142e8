pub mod color;
pub mod color_blindness_effect;
pub mod crt_effect;
pub mod math;
pub mod matrix_table;
pub mod pipeline;
pub mod realtime;
pub mod sampler;
pub mod uniform;

use color::Rgba;
use image::RgbaImage;
use math::Vec2;
use sampler::Sampler;
use uniform::{UniformDecl, UniformKind, UniformValue};

pub type ImageEffectResult<T> = Result<T, ImageEffectError>;

#[derive(thiserror::Error, Debug)]
pub enum ImageEffectError {
    #[error("Effect unavailable: {0}")]
    Unavailable(String),
    #[error("Unknown uniform: {0}")]
    UnknownUniform(String),
    #[error("Uniform type mismatch for {name}: expected {expected:?}, got {actual:?}")]
    UniformType {
        name: String,
        expected: UniformKind,
        actual: UniformKind,
    },
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),
}

/// A per-pixel program: a set of declared uniforms plus a function from
/// (source surface, output coordinate) to color.
pub trait Effect {
    fn name(&self) -> &'static str;

    fn uniforms(&self) -> &'static [UniformDecl];

    fn set_uniform(&mut self, name: &str, value: UniformValue) -> ImageEffectResult<()>;

    fn eval(&self, source: &dyn Sampler, coord: Vec2) -> Rgba;

    /// Whether the program can be evaluated with its current uniforms.
    fn is_ready(&self) -> bool {
        true
    }

    /// A bypassed program shows its source unmodified.
    fn is_bypassed(&self) -> bool {
        false
    }

    /// Evaluates the program once per pixel of `source`, at pixel centers.
    fn apply(&self, source: &RgbaImage) -> RgbaImage {
        let (width, height) = source.dimensions();
        RgbaImage::from_fn(width, height, |x, y| {
            let coord = Vec2::new(x as f32 + 0.5, y as f32 + 0.5);
            self.eval(source, coord).into()
        })
    }
}

#[derive(Debug, Clone)]
pub enum ImageEffect {
    ColorBlindness(color_blindness_effect::ColorBlindnessEffect),
    Crt(crt_effect::CrtEffect),
}

impl Effect for ImageEffect {
    fn name(&self) -> &'static str {
        match self {
            ImageEffect::ColorBlindness(effect) => effect.name(),
            ImageEffect::Crt(effect) => effect.name(),
        }
    }

    fn uniforms(&self) -> &'static [UniformDecl] {
        match self {
            ImageEffect::ColorBlindness(effect) => effect.uniforms(),
            ImageEffect::Crt(effect) => effect.uniforms(),
        }
    }

    fn set_uniform(&mut self, name: &str, value: UniformValue) -> ImageEffectResult<()> {
        match self {
            ImageEffect::ColorBlindness(effect) => effect.set_uniform(name, value),
            ImageEffect::Crt(effect) => effect.set_uniform(name, value),
        }
    }

    fn eval(&self, source: &dyn Sampler, coord: Vec2) -> Rgba {
        match self {
            ImageEffect::ColorBlindness(effect) => effect.eval(source, coord),
            ImageEffect::Crt(effect) => effect.eval(source, coord),
        }
    }

    fn is_ready(&self) -> bool {
        match self {
            ImageEffect::ColorBlindness(effect) => effect.is_ready(),
            ImageEffect::Crt(effect) => effect.is_ready(),
        }
    }

    fn is_bypassed(&self) -> bool {
        match self {
            ImageEffect::ColorBlindness(effect) => effect.is_bypassed(),
            ImageEffect::Crt(effect) => effect.is_bypassed(),
        }
    }
}

/// Clamps a live parameter into its domain, NaN resolving to the lower bound.
pub(crate) fn clamp_param(name: &str, value: f32, min: f32, max: f32) -> f32 {
    let clamped = if value.is_nan() {
        min
    } else {
        value.clamp(min, max)
    };

    if clamped != value {
        log::trace!("{name} {value} out of [{min}, {max}], clamped to {clamped}");
    }

    clamped
}
