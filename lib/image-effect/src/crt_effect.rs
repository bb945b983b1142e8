//! CRT monitor look: barrel warp of the sampling coordinates, a black bezel
//! outside the warped picture, an edge vignette and scanline color fringing.

use crate::{
    Effect, ImageEffectError, ImageEffectResult, clamp_param,
    color::Rgba,
    math::{Vec2, saturate, smoothstep2},
    sampler::Sampler,
    uniform::{UniformDecl, UniformKind, UniformValue},
};
use derivative::Derivative;
use derive_setters::Setters;

pub const SIZE_UNIFORM: &str = "size";
pub const PIXEL_DENSITY_UNIFORM: &str = "pixelDensity";
pub const CURVATURE_UNIFORM: &str = "curvature";
pub const VIGNETTE_WIDTH_UNIFORM: &str = "vignetteWidth";

static UNIFORMS: &[UniformDecl] = &[
    UniformDecl::new(SIZE_UNIFORM, UniformKind::Float2),
    UniformDecl::new(PIXEL_DENSITY_UNIFORM, UniformKind::Float),
    UniformDecl::new(CURVATURE_UNIFORM, UniformKind::Float),
    UniformDecl::new(VIGNETTE_WIDTH_UNIFORM, UniformKind::Float),
];

pub const CURVATURE_RANGE: (f32, f32) = (1.0, 10.0);
pub const VIGNETTE_WIDTH_RANGE: (f32, f32) = (1.0, 100.0);
pub const MIN_PIXEL_DENSITY: f32 = 0.01;

const GREEN_FRINGE: f32 = 0.15;
const RED_BLUE_FRINGE: f32 = 0.135;

#[derive(Debug, Clone, Copy, PartialEq, Derivative, Setters)]
#[derivative(Default)]
#[setters(prefix = "with_")]
#[non_exhaustive]
pub struct CrtParams {
    /// Higher is flatter.
    #[derivative(Default(value = "10.0"))]
    #[setters(skip)]
    curvature: f32,

    /// Vignette falloff width in pixels.
    #[derivative(Default(value = "30.0"))]
    #[setters(skip)]
    vignette_width: f32,

    /// Device scale factor, spaces the scanlines.
    #[derivative(Default(value = "1.0"))]
    #[setters(skip)]
    pixel_density: f32,

    /// Measured size of the rendered surface, zero until the first layout.
    #[derivative(Default(value = "Vec2::ZERO"))]
    #[setters(skip)]
    viewport: Vec2,

    #[derivative(Default(value = "true"))]
    pub enabled: bool,
}

impl CrtParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn curvature(&self) -> f32 {
        self.curvature
    }

    pub fn vignette_width(&self) -> f32 {
        self.vignette_width
    }

    pub fn pixel_density(&self) -> f32 {
        self.pixel_density
    }

    pub fn viewport(&self) -> Vec2 {
        self.viewport
    }

    pub fn enabled(&self) -> bool {
        self.enabled
    }

    pub fn with_curvature(mut self, curvature: f32) -> Self {
        self.set_curvature(curvature);
        self
    }

    pub fn with_vignette_width(mut self, width: f32) -> Self {
        self.set_vignette_width(width);
        self
    }

    pub fn with_pixel_density(mut self, density: f32) -> Self {
        self.set_pixel_density(density);
        self
    }

    pub fn with_viewport(mut self, width: f32, height: f32) -> Self {
        self.set_viewport(width, height);
        self
    }

    pub fn set_curvature(&mut self, curvature: f32) {
        let (min, max) = CURVATURE_RANGE;
        self.curvature = clamp_param(CURVATURE_UNIFORM, curvature, min, max);
    }

    pub fn set_vignette_width(&mut self, width: f32) {
        let (min, max) = VIGNETTE_WIDTH_RANGE;
        self.vignette_width = clamp_param(VIGNETTE_WIDTH_UNIFORM, width, min, max);
    }

    pub fn set_pixel_density(&mut self, density: f32) {
        self.pixel_density = clamp_param(PIXEL_DENSITY_UNIFORM, density, MIN_PIXEL_DENSITY, f32::MAX);
    }

    pub fn set_viewport(&mut self, width: f32, height: f32) {
        self.viewport = Vec2::new(
            clamp_param("viewport width", width, 0.0, f32::MAX),
            clamp_param("viewport height", height, 0.0, f32::MAX),
        );
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    pub fn has_viewport(&self) -> bool {
        self.viewport.x > 0.0 && self.viewport.y > 0.0
    }
}

/// How far the barrel warp pushes `uv` (in `[-1, 1]` space).
pub fn warp_displacement(uv: Vec2, curvature: f32) -> Vec2 {
    let offset = uv.yx() / curvature;
    uv * offset * offset
}

pub fn warp(uv: Vec2, curvature: f32) -> Vec2 {
    uv + warp_displacement(uv, curvature)
}

/// The picture is the open unit square, its edges already belong to the bezel.
pub fn inside_bezel(uv: Vec2) -> bool {
    0.0 < uv.x && uv.x < 1.0 && 0.0 < uv.y && uv.y < 1.0
}

/// Per axis vignette factor for `uv` in `[-1, 1]` space.
pub fn vignette(uv: Vec2, vignette_width: f32, viewport: Vec2) -> Vec2 {
    let edge = Vec2::splat(vignette_width) / viewport;
    smoothstep2(Vec2::ZERO, edge, Vec2::splat(1.0) - uv.abs()).map(saturate)
}

/// Green and red/blue gains of the scanline pattern at surface row `y`.
pub fn scanline_gain(y: f32, pixel_density: f32) -> (f32, f32) {
    let phase = y * 2.0 / pixel_density;
    let green = (phase.sin() + 1.0) * GREEN_FRINGE + 1.0;
    let red_blue = (phase.cos() + 1.0) * RED_BLUE_FRINGE + 1.0;
    (green, red_blue)
}

/// Output color at surface coordinate `coord`.
pub fn crt_apply(source: &dyn Sampler, coord: Vec2, params: &CrtParams) -> Rgba {
    if !params.enabled || !params.has_viewport() {
        return source.sample(coord);
    }

    let size = params.viewport;
    let composable_uv = coord / size;
    let uv = warp(composable_uv * 2.0 - Vec2::splat(1.0), params.curvature);
    let uv = uv * 0.5 + Vec2::splat(0.5);

    let mut color = if inside_bezel(uv) {
        source.sample(uv * size)
    } else {
        Rgba::TRANSPARENT
    };

    let vignette = vignette(uv * 2.0 - Vec2::splat(1.0), params.vignette_width, size);

    let (green, red_blue) = scanline_gain(composable_uv.y * size.y, params.pixel_density);
    color.g *= green;
    color.r *= red_blue;
    color.b *= red_blue;

    color.saturate().scale(vignette.x * vignette.y)
}

#[derive(Debug, Clone, Default)]
pub struct CrtEffect {
    params: CrtParams,
}

impl CrtEffect {
    pub fn new(params: CrtParams) -> Self {
        Self { params }
    }

    pub fn params(&self) -> &CrtParams {
        &self.params
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.params.set_enabled(enabled);
    }
}

impl Effect for CrtEffect {
    fn name(&self) -> &'static str {
        "CRT"
    }

    fn uniforms(&self) -> &'static [UniformDecl] {
        UNIFORMS
    }

    fn set_uniform(&mut self, name: &str, value: UniformValue) -> ImageEffectResult<()> {
        match (name, value) {
            (SIZE_UNIFORM, UniformValue::Float2([width, height])) => {
                self.params.set_viewport(width, height)
            }
            (PIXEL_DENSITY_UNIFORM, UniformValue::Float(v)) => self.params.set_pixel_density(v),
            (CURVATURE_UNIFORM, UniformValue::Float(v)) => self.params.set_curvature(v),
            (VIGNETTE_WIDTH_UNIFORM, UniformValue::Float(v)) => self.params.set_vignette_width(v),
            _ if UNIFORMS.iter().any(|decl| decl.name == name) => {
                return Err(ImageEffectError::InvalidParameter(format!(
                    "{name} does not accept {value:?}"
                )));
            }
            _ => return Err(ImageEffectError::UnknownUniform(name.to_string())),
        }

        Ok(())
    }

    fn eval(&self, source: &dyn Sampler, coord: Vec2) -> Rgba {
        crt_apply(source, coord, &self.params)
    }

    fn is_ready(&self) -> bool {
        self.params.has_viewport()
    }

    fn is_bypassed(&self) -> bool {
        !self.params.enabled
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sampler::SolidSampler;

    fn params_300() -> CrtParams {
        CrtParams::new()
            .with_curvature(10.0)
            .with_vignette_width(30.0)
            .with_viewport(300.0, 300.0)
    }

    #[test]
    fn test_params_clamp() {
        let params = CrtParams::new()
            .with_curvature(0.2)
            .with_vignette_width(250.0)
            .with_pixel_density(-1.0);
        assert_eq!(params.curvature(), 1.0);
        assert_eq!(params.vignette_width(), 100.0);
        assert_eq!(params.pixel_density(), MIN_PIXEL_DENSITY);
        assert!(params.enabled());
        assert!(!params.has_viewport());
    }

    #[test]
    fn test_bezel_is_open() {
        assert!(inside_bezel(Vec2::new(0.5, 0.5)));
        assert!(!inside_bezel(Vec2::new(0.0, 0.5)));
        assert!(!inside_bezel(Vec2::new(1.0, 0.5)));
        assert!(!inside_bezel(Vec2::new(0.5, 0.0)));
        assert!(!inside_bezel(Vec2::new(0.5, 1.0)));
    }

    #[test]
    fn test_center_is_not_warped() {
        assert_eq!(warp(Vec2::ZERO, 1.0), Vec2::ZERO);
        assert_eq!(warp_displacement(Vec2::ZERO, 10.0), Vec2::ZERO);
    }

    #[test]
    fn test_warp_is_barrel() {
        let uv = Vec2::new(0.8, 0.6);
        let warped = warp(uv, 2.0);
        assert!(warped.x > uv.x && warped.y > uv.y);

        let uv = Vec2::new(-0.8, -0.6);
        let warped = warp(uv, 2.0);
        assert!(warped.x < uv.x && warped.y < uv.y);
    }

    #[test]
    fn test_vignette_center_and_edges() {
        let viewport = Vec2::new(300.0, 300.0);
        for width in [1.0, 30.0, 100.0] {
            assert_eq!(vignette(Vec2::ZERO, width, viewport), Vec2::splat(1.0));
            assert_eq!(vignette(Vec2::new(1.0, 0.0), width, viewport).x, 0.0);
            assert_eq!(vignette(Vec2::new(0.0, -1.5), width, viewport).y, 0.0);
        }
    }

    #[test]
    fn test_scanline_gain_bounds() {
        for y in 0..200 {
            let (green, red_blue) = scanline_gain(y as f32 + 0.5, 2.625);
            assert!((1.0..=1.3 + 1e-6).contains(&green));
            assert!((1.0..=1.27 + 1e-6).contains(&red_blue));
        }
        let (green, red_blue) = scanline_gain(0.0, 1.0);
        assert!((green - 1.15).abs() < 1e-6);
        assert!((red_blue - 1.27).abs() < 1e-6);
    }

    #[test]
    fn test_corner_is_bezel() {
        let source = SolidSampler {
            color: Rgba::opaque(1.0, 1.0, 1.0),
            size: (300, 300),
        };
        let params = params_300().with_curvature(1.0);
        assert_eq!(crt_apply(&source, Vec2::new(0.5, 0.5), &params), Rgba::TRANSPARENT);
    }

    #[test]
    fn test_disabled_is_passthrough() {
        let color = Rgba::new(0.3, 0.2, 0.1, 0.5);
        let source = SolidSampler {
            color,
            size: (300, 300),
        };
        let params = params_300().with_enabled(false);
        assert_eq!(crt_apply(&source, Vec2::new(150.0, 10.0), &params), color);

        let effect = CrtEffect::new(params);
        assert!(effect.is_bypassed());
    }

    #[test]
    fn test_unmeasured_viewport_is_not_ready() {
        let mut effect = CrtEffect::default();
        assert!(!effect.is_ready());

        effect
            .set_uniform(SIZE_UNIFORM, UniformValue::Float2([320.0, 200.0]))
            .unwrap();
        assert!(effect.is_ready());
        assert_eq!(effect.params().viewport(), Vec2::new(320.0, 200.0));
    }
}
