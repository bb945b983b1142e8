use crate::{
    Effect, ImageEffect,
    color_blindness_effect::{ColorBlindnessEffect, ColorBlindnessParams},
    crt_effect::{CrtEffect, CrtParams},
    sampler::Sampler,
};
use image::RgbaImage;
use num_enum::{IntoPrimitive, TryFromPrimitive};

#[derive(Debug, Clone, Copy, PartialEq, Eq, TryFromPrimitive, IntoPrimitive)]
#[repr(u8)]
pub enum RealTimeImageEffect {
    None = 0,
    ColorBlindness,
    Crt,
}

impl RealTimeImageEffect {
    pub fn name(&self) -> &'static str {
        match self {
            RealTimeImageEffect::None => "None",
            RealTimeImageEffect::ColorBlindness => "Color Blindness",
            RealTimeImageEffect::Crt => "CRT",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            RealTimeImageEffect::None => "Source image, unmodified",
            RealTimeImageEffect::ColorBlindness => {
                "Simulated deuteranomaly, protanomaly or tritanomaly at a given severity"
            }
            RealTimeImageEffect::Crt => "Curved CRT screen with vignette and scanline fringing",
        }
    }

    /// The effect with its default parameters, sized for a `width` x `height` surface.
    pub fn effect(&self, width: u32, height: u32) -> Option<ImageEffect> {
        match self {
            RealTimeImageEffect::None => None,
            RealTimeImageEffect::ColorBlindness => Some(ImageEffect::ColorBlindness(
                ColorBlindnessEffect::new(ColorBlindnessParams::new()),
            )),
            RealTimeImageEffect::Crt => Some(ImageEffect::Crt(CrtEffect::new(
                CrtParams::new().with_viewport(width as f32, height as f32),
            ))),
        }
    }

    /// Renders over `image`, using the image itself as the viewport.
    pub fn apply(&self, image: &RgbaImage) -> Option<RgbaImage> {
        let (width, height) = Sampler::size(image);
        let effect = self.effect(width, height)?;
        Some(effect.apply(image))
    }

    pub fn all_effects() -> &'static [RealTimeImageEffect] {
        &[RealTimeImageEffect::ColorBlindness, RealTimeImageEffect::Crt]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    #[test]
    fn test_none_has_no_effect() {
        let image = RgbaImage::new(2, 2);
        assert!(RealTimeImageEffect::None.apply(&image).is_none());
    }

    #[test]
    fn test_all_effects_render() {
        let image = RgbaImage::from_pixel(16, 9, Rgba([90, 160, 40, 255]));
        for effect in RealTimeImageEffect::all_effects() {
            let output = effect.apply(&image).expect("effect output");
            assert_eq!(output.dimensions(), image.dimensions());
        }
    }

    #[test]
    fn test_codes() {
        assert_eq!(u8::from(RealTimeImageEffect::Crt), 2);
        assert_eq!(
            RealTimeImageEffect::try_from(1u8).ok(),
            Some(RealTimeImageEffect::ColorBlindness)
        );
    }

    #[test]
    fn test_crt_viewport_is_the_image() {
        let image = RgbaImage::from_pixel(16, 9, Rgba([90, 160, 40, 255]));
        let output = RealTimeImageEffect::Crt.apply(&image).expect("crt output");
        assert_eq!(output.get_pixel(0, 0), &Rgba([0, 0, 0, 0]));
        assert!(output.get_pixel(8, 4)[3] > 0);
    }
}
