//! Color blindness example
//! Renders every deficiency type at a few severities

use image::{ImageReader, Rgba, RgbaImage};
use image_effect::{
    Effect,
    color_blindness_effect::{ColorBlindnessEffect, ColorBlindnessParams},
    matrix_table::DeficiencyType,
};
use std::path::Path;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let output_dir = Path::new("tmp/color_blindness");
    std::fs::create_dir_all(output_dir)?;

    let img_path = Path::new("data/test.png");
    let img = if img_path.exists() {
        ImageReader::open(img_path)?.decode()?.to_rgba8()
    } else {
        test_card()
    };

    for ty in DeficiencyType::all() {
        for severity in [0.0, 0.35, 0.7, 1.0] {
            let effect = ColorBlindnessEffect::new(
                ColorBlindnessParams::new()
                    .with_deficiency(*ty)
                    .with_severity(severity),
            );

            let filename = format!("{}_{:.2}.png", ty.name().to_lowercase(), severity);
            effect.apply(&img).save(output_dir.join(&filename))?;
            println!("✓ Generated {}", filename);
        }
    }

    println!("\n✓ Images saved to: {}", output_dir.display());

    Ok(())
}

fn test_card() -> RgbaImage {
    RgbaImage::from_fn(400, 300, |x, y| {
        Rgba([
            (x * 255 / 400) as u8,
            (y * 255 / 300) as u8,
            ((x + y) * 255 / 700) as u8,
            255,
        ])
    })
}
