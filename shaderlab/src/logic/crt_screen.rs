use super::{
    input::{InputEvent, ViewportSize},
    screen::{ParamSlider, Screen, ScreenSettings},
};
use anyhow::Result;
use image::{
    RgbaImage,
    imageops::{self, FilterType},
};
use image_effect::{
    crt_effect::{
        CURVATURE_RANGE, CURVATURE_UNIFORM, CrtEffect, CrtParams, PIXEL_DENSITY_UNIFORM,
        SIZE_UNIFORM, VIGNETTE_WIDTH_RANGE, VIGNETTE_WIDTH_UNIFORM,
    },
    pipeline::{EffectPipeline, Frame},
    uniform::UniformValue,
};
use std::time::Duration;

pub struct CrtScreen {
    params: CrtParams,
    curvature: ParamSlider,
    vignette_width: ParamSlider,
    viewport: ViewportSize,
    pipeline: EffectPipeline<CrtEffect>,
}

impl CrtScreen {
    /// The viewport stays unmeasured until [`Screen::on_viewport_changed`].
    pub fn new(params: CrtParams, settings: ScreenSettings) -> Self {
        let animate = settings.animate_parameters;
        let params = params.with_viewport(0.0, 0.0);

        Self {
            params,
            curvature: ParamSlider::new(
                "Curvature",
                CURVATURE_RANGE,
                params.curvature(),
                animate,
            ),
            vignette_width: ParamSlider::new(
                "Vignette Width",
                VIGNETTE_WIDTH_RANGE,
                params.vignette_width(),
                animate,
            ),
            viewport: ViewportSize::default(),
            pipeline: EffectPipeline::compile(CrtEffect::new(params)),
        }
    }

    /// Parameters of the frame being prepared, as of the last [`Screen::advance`].
    pub fn params(&self) -> &CrtParams {
        &self.params
    }

    pub fn pipeline(&self) -> &EffectPipeline<CrtEffect> {
        &self.pipeline
    }
}

impl Screen for CrtScreen {
    fn name(&self) -> &'static str {
        "CRT"
    }

    fn handle_event(&mut self, event: &InputEvent) -> Result<()> {
        match event {
            InputEvent::Curvature(curvature) => {
                self.curvature.set(*curvature);
            }
            InputEvent::VignetteWidth(width) => {
                self.vignette_width.set(*width);
            }
            InputEvent::Enabled(enabled) => {
                if self.params.enabled != *enabled {
                    self.params.set_enabled(*enabled);
                    log::info!("Enabled: {enabled}");
                }
            }
            InputEvent::Resize(size) => self.on_viewport_changed(*size),
            _ => log::warn!("{} ignores {event:?}", self.name()),
        }

        Ok(())
    }

    fn on_viewport_changed(&mut self, size: ViewportSize) {
        if self.viewport != size {
            log::debug!("{}: viewport {} -> {size}", self.name(), self.viewport);
            self.viewport = size;
        }
    }

    fn advance(&mut self, dt: Duration) -> bool {
        let mut animating = self.curvature.step(dt);
        animating |= self.vignette_width.step(dt);

        let params = &mut self.params;
        params.set_viewport(self.viewport.width as f32, self.viewport.height as f32);
        params.set_curvature(self.curvature.value());
        params.set_vignette_width(self.vignette_width.value());

        let viewport = params.viewport();
        self.pipeline
            .set(SIZE_UNIFORM, UniformValue::Float2([viewport.x, viewport.y]));
        self.pipeline.set(
            PIXEL_DENSITY_UNIFORM,
            UniformValue::Float(params.pixel_density()),
        );
        self.pipeline
            .set(CURVATURE_UNIFORM, UniformValue::Float(params.curvature()));
        self.pipeline.set(
            VIGNETTE_WIDTH_UNIFORM,
            UniformValue::Float(params.vignette_width()),
        );
        self.pipeline.effect_mut().set_enabled(params.enabled);

        animating
    }

    /// The frame covers the viewport; a source of another size is scaled to it.
    fn render(&mut self, source: &RgbaImage) -> Frame {
        let ViewportSize { width, height } = self.viewport;
        if width == 0 || height == 0 || source.dimensions() == (width, height) {
            return self.pipeline.render(source);
        }

        let scaled = imageops::resize(source, width, height, FilterType::Triangle);
        self.pipeline.render(&scaled)
    }

    fn labels(&self) -> Vec<String> {
        vec![
            self.curvature.label_text(),
            self.vignette_width.label_text(),
            format!("Enabled: {}", self.params.enabled),
        ]
    }
}
