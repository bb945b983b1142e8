//! Color vision deficiency simulation.
//!
//! The severity slider selects two neighbouring deciles of the matrix table and
//! blends them, so the simulated deficiency changes continuously between the
//! tabulated severities.

use crate::{
    Effect, ImageEffectError, ImageEffectResult, clamp_param,
    color::Rgba,
    math::{Vec2, fract, lerp, saturate},
    matrix_table::{self, DeficiencyType, MAX_DECILE, Mat3},
    sampler::Sampler,
    uniform::{UniformDecl, UniformKind, UniformValue},
};
use derivative::Derivative;
use derive_setters::Setters;

pub const SEVERITY_UNIFORM: &str = "severity";
pub const TYPE_UNIFORM: &str = "colorblindType";

static UNIFORMS: &[UniformDecl] = &[
    UniformDecl::new(SEVERITY_UNIFORM, UniformKind::Float),
    UniformDecl::new(TYPE_UNIFORM, UniformKind::Int),
];

// Scaled severities this close to a whole decile count as that decile.
const DECILE_SNAP: f32 = 1e-5;

#[derive(Debug, Clone, Copy, PartialEq, Derivative, Setters)]
#[derivative(Default)]
#[setters(prefix = "with_")]
#[non_exhaustive]
pub struct ColorBlindnessParams {
    #[derivative(Default(value = "0.5"))]
    #[setters(skip)]
    severity: f32,

    pub deficiency: DeficiencyType,
}

impl ColorBlindnessParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn severity(&self) -> f32 {
        self.severity
    }

    pub fn deficiency(&self) -> DeficiencyType {
        self.deficiency
    }

    /// Severity in `[0, 1]`; out of range values are clamped.
    pub fn with_severity(mut self, severity: f32) -> Self {
        self.set_severity(severity);
        self
    }

    pub fn set_severity(&mut self, severity: f32) {
        self.severity = clamp_param(SEVERITY_UNIFORM, severity, 0.0, 1.0);
    }

    pub fn set_deficiency(&mut self, deficiency: DeficiencyType) {
        self.deficiency = deficiency;
    }
}

/// The two deciles bracketing a severity and the blend weight between them.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DecileBlend {
    pub lower: usize,
    pub upper: usize,
    pub weight: f32,
}

impl DecileBlend {
    pub fn new(severity: f32) -> Self {
        let severity = clamp_param(SEVERITY_UNIFORM, severity, 0.0, 1.0);
        let scaled = snap(severity * 10.0);
        let lower = decile(scaled);
        let upper = decile(snap((severity + 0.1) * 10.0)).max(lower);

        let weight = if lower == MAX_DECILE { 0.0 } else { fract(scaled) };

        Self {
            lower,
            upper,
            weight,
        }
    }
}

fn snap(scaled: f32) -> f32 {
    let nearest = scaled.round();
    if (scaled - nearest).abs() <= DECILE_SNAP {
        nearest
    } else {
        scaled
    }
}

fn decile(scaled: f32) -> usize {
    (scaled.floor().max(0.0) as usize).min(MAX_DECILE)
}

/// Table matrix for `params`, interpolated row by row between the bracketing deciles.
pub fn interpolated_matrix(params: &ColorBlindnessParams) -> Mat3 {
    let blend = DecileBlend::new(params.severity);
    let low = matrix_table::matrix(params.deficiency, blend.lower);
    let high = matrix_table::matrix(params.deficiency, blend.upper);

    let mut out = [[0.0; 3]; 3];
    for (row, (a, b)) in out.iter_mut().zip(low.iter().zip(high.iter())) {
        for (v, (&a, &b)) in row.iter_mut().zip(a.iter().zip(b.iter())) {
            *v = lerp(a, b, blend.weight);
        }
    }
    out
}

pub fn transform(matrix: &Mat3, color: Rgba) -> Rgba {
    let rgb = color.rgb();
    let dot = |row: &[f32; 3]| saturate(row[0] * rgb[0] + row[1] * rgb[1] + row[2] * rgb[2]);

    Rgba::opaque(dot(&matrix[0]), dot(&matrix[1]), dot(&matrix[2]))
}

/// Simulated perception of `color`. Opaque, channels in `[0, 1]`.
pub fn simulate(color: Rgba, params: &ColorBlindnessParams) -> Rgba {
    transform(&interpolated_matrix(params), color)
}

#[derive(Debug, Clone)]
pub struct ColorBlindnessEffect {
    params: ColorBlindnessParams,
    matrix: Mat3,
}

impl Default for ColorBlindnessEffect {
    fn default() -> Self {
        Self::new(ColorBlindnessParams::default())
    }
}

impl ColorBlindnessEffect {
    pub fn new(params: ColorBlindnessParams) -> Self {
        Self {
            params,
            matrix: interpolated_matrix(&params),
        }
    }

    pub fn params(&self) -> &ColorBlindnessParams {
        &self.params
    }

    pub fn matrix(&self) -> &Mat3 {
        &self.matrix
    }

    fn update(&mut self, params: ColorBlindnessParams) {
        self.params = params;
        self.matrix = interpolated_matrix(&params);
    }
}

impl Effect for ColorBlindnessEffect {
    fn name(&self) -> &'static str {
        "Color Blindness"
    }

    fn uniforms(&self) -> &'static [UniformDecl] {
        UNIFORMS
    }

    fn set_uniform(&mut self, name: &str, value: UniformValue) -> ImageEffectResult<()> {
        let mut params = self.params;

        match (name, value) {
            (SEVERITY_UNIFORM, UniformValue::Float(severity)) => params.set_severity(severity),
            (TYPE_UNIFORM, UniformValue::Int(code)) => {
                params.set_deficiency(DeficiencyType::from_code_clamped(code))
            }
            (SEVERITY_UNIFORM | TYPE_UNIFORM, value) => {
                return Err(ImageEffectError::InvalidParameter(format!(
                    "{name} does not accept {value:?}"
                )));
            }
            _ => return Err(ImageEffectError::UnknownUniform(name.to_string())),
        }

        self.update(params);
        Ok(())
    }

    fn eval(&self, source: &dyn Sampler, coord: Vec2) -> Rgba {
        transform(&self.matrix, source.sample(coord))
    }
}
