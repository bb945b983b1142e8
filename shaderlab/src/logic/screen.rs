use super::input::{InputEvent, ViewportSize};
use crate::config::Preference;
use anyhow::Result;
use image::RgbaImage;
use image_effect::pipeline::Frame;
use std::time::Duration;
use ui_control::animation::{AnimationDriver, SpringSpec};

pub trait Screen {
    fn name(&self) -> &'static str;

    /// Applies one input event. Events a screen has no control for are ignored.
    fn handle_event(&mut self, event: &InputEvent) -> Result<()>;

    /// The rendered surface got a new size, visible to the next frame.
    fn on_viewport_changed(&mut self, size: ViewportSize);

    /// Steps animations by `dt` and pushes the current parameters to the
    /// effect. Returns whether any animation is still running.
    fn advance(&mut self, dt: Duration) -> bool;

    fn render(&mut self, source: &RgbaImage) -> Frame;

    /// Current text of the parameter labels.
    fn labels(&self) -> Vec<String>;
}

#[derive(Debug, Clone, Copy, Derivative)]
#[derivative(Default)]
pub struct ScreenSettings {
    pub animate_parameters: bool,

    #[derivative(Default(value = "360.0"))]
    pub selector_width: f32,

    #[derivative(Default(value = "40.0"))]
    pub selector_height: f32,
}

impl From<&Preference> for ScreenSettings {
    fn from(preference: &Preference) -> Self {
        Self {
            animate_parameters: preference.animate_parameters,
            selector_width: preference.selector_width,
            selector_height: preference.selector_height,
        }
    }
}

/// A continuous parameter control with an optional animated transition.
#[derive(Debug, Clone)]
pub struct ParamSlider {
    label: &'static str,
    range: (f32, f32),
    /// Multiplier applied before rounding the value for its label.
    label_scale: f32,
    target: f32,
    transition: Option<AnimationDriver<f32>>,
}

impl ParamSlider {
    pub fn new(label: &'static str, range: (f32, f32), value: f32, animate: bool) -> Self {
        let value = clamp_to(label, value, range);

        Self {
            label,
            range,
            label_scale: 1.0,
            target: value,
            transition: animate.then(|| AnimationDriver::new(label, value, SpringSpec::medium())),
        }
    }

    pub fn with_label_scale(mut self, scale: f32) -> Self {
        self.label_scale = scale;
        self
    }

    /// Returns whether the target changed.
    pub fn set(&mut self, value: f32) -> bool {
        let value = clamp_to(self.label, value, self.range);
        if value == self.target {
            return false;
        }

        self.target = value;
        if let Some(transition) = self.transition.as_mut() {
            transition.retarget(value);
        }

        log::info!("{}", self.label_text());
        true
    }

    pub fn step(&mut self, dt: Duration) -> bool {
        self.transition
            .as_mut()
            .is_some_and(|transition| transition.step(dt))
    }

    /// The value the effect sees this frame.
    pub fn value(&self) -> f32 {
        self.transition
            .as_ref()
            .map_or(self.target, AnimationDriver::value)
    }

    pub fn target(&self) -> f32 {
        self.target
    }

    pub fn label_text(&self) -> String {
        format!(
            "{}: {}",
            self.label,
            (self.target * self.label_scale).round() as i32
        )
    }
}

fn clamp_to(label: &str, value: f32, (min, max): (f32, f32)) -> f32 {
    let clamped = if value.is_nan() {
        min
    } else {
        value.clamp(min, max)
    };

    if clamped != value {
        log::trace!("{label}: {value} clamped to {clamped}");
    }

    clamped
}
