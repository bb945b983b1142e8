use super::{
    input::{InputEvent, ViewportSize},
    screen::{ParamSlider, Screen, ScreenSettings},
};
use anyhow::{Context, Result, anyhow};
use image::RgbaImage;
use image_effect::{
    color_blindness_effect::{
        ColorBlindnessEffect, ColorBlindnessParams, SEVERITY_UNIFORM, TYPE_UNIFORM,
    },
    matrix_table::DeficiencyType,
    pipeline::{EffectPipeline, Frame},
    uniform::UniformValue,
};
use std::time::Duration;
use ui_control::segmented_selector::{SegmentedSelector, SelectorLayout};

pub struct ColorBlindScreen {
    params: ColorBlindnessParams,
    severity: ParamSlider,
    selector: SegmentedSelector,
    settings: ScreenSettings,
    pipeline: EffectPipeline<ColorBlindnessEffect>,
}

impl ColorBlindScreen {
    pub fn new(params: ColorBlindnessParams, settings: ScreenSettings) -> Result<Self> {
        let options = DeficiencyType::all().iter().map(DeficiencyType::name);
        let selector = SegmentedSelector::new(options, params.deficiency().name())?;

        let severity = ParamSlider::new(
            "Severity",
            (0.0, 1.0),
            params.severity(),
            settings.animate_parameters,
        )
        .with_label_scale(10.0);

        Ok(Self {
            params,
            severity,
            selector,
            settings,
            pipeline: EffectPipeline::compile(ColorBlindnessEffect::new(params)),
        })
    }

    pub fn params(&self) -> &ColorBlindnessParams {
        &self.params
    }

    pub fn selector(&self) -> &SegmentedSelector {
        &self.selector
    }

    pub fn pipeline(&self) -> &EffectPipeline<ColorBlindnessEffect> {
        &self.pipeline
    }

    /// Where the selector draws this frame, on its configured track.
    pub fn selector_layout(&self) -> SelectorLayout<'_> {
        self.selector.layout(
            self.settings.selector_width,
            self.settings.selector_height,
        )
    }

    fn select(&mut self, option: &str) -> Result<()> {
        if !self.selector.select_option(option)? {
            return Ok(());
        }

        let deficiency = self
            .selector
            .selected_option()
            .parse::<DeficiencyType>()
            .map_err(|e| anyhow!(e))?;

        self.params.set_deficiency(deficiency);
        log::info!("Type: {deficiency}");
        Ok(())
    }
}

impl Screen for ColorBlindScreen {
    fn name(&self) -> &'static str {
        "Color Blindness"
    }

    fn handle_event(&mut self, event: &InputEvent) -> Result<()> {
        match event {
            InputEvent::Severity(severity) => {
                self.severity.set(*severity);
            }
            InputEvent::SelectType(option) => self
                .select(option)
                .with_context(|| format!("select [{option}] failed"))?,
            InputEvent::Tap(x) => {
                let hit = self
                    .selector
                    .hit_test(*x, self.settings.selector_width)
                    .map(str::to_string);

                match hit {
                    Some(option) => self.select(&option)?,
                    None => log::debug!("tap at {x} misses the selector"),
                }
            }
            InputEvent::Resize(size) => self.on_viewport_changed(*size),
            _ => log::warn!("{} ignores {event:?}", self.name()),
        }

        Ok(())
    }

    fn on_viewport_changed(&mut self, size: ViewportSize) {
        log::debug!("{}: viewport {size}", self.name());
    }

    fn advance(&mut self, dt: Duration) -> bool {
        let selector_animating = self.selector.step(dt);
        if selector_animating {
            let indicator = self.selector_layout().indicator;
            log::debug!(
                "indicator x {:.1}, radius {:.1}/{:.1}",
                indicator.bounds.x,
                indicator.start_radius,
                indicator.end_radius
            );
        }

        let mut animating = selector_animating;
        animating |= self.severity.step(dt);

        self.params.set_severity(self.severity.value());
        self.pipeline.set(
            SEVERITY_UNIFORM,
            UniformValue::Float(self.params.severity()),
        );
        self.pipeline.set(
            TYPE_UNIFORM,
            UniformValue::Int(self.params.deficiency().code()),
        );

        animating
    }

    fn render(&mut self, source: &RgbaImage) -> Frame {
        self.pipeline.render(source)
    }

    fn labels(&self) -> Vec<String> {
        vec![
            self.severity.label_text(),
            format!("Type: {}", self.selector.selected_option()),
        ]
    }
}
