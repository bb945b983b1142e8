//! CRT example
//! Demonstrates different curvatures and vignette widths

use image::{ImageReader, Rgba, RgbaImage};
use image_effect::{
    Effect,
    crt_effect::{CrtEffect, CrtParams},
};
use std::path::Path;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let output_dir = Path::new("tmp/crt");
    std::fs::create_dir_all(output_dir)?;

    let img_path = Path::new("data/test.png");
    let img = if img_path.exists() {
        ImageReader::open(img_path)?.decode()?.to_rgba8()
    } else {
        test_card()
    };
    let (width, height) = img.dimensions();

    for curvature in [1.0, 3.0, 6.0, 10.0] {
        for vignette_width in [10.0, 30.0, 100.0] {
            let effect = CrtEffect::new(
                CrtParams::new()
                    .with_viewport(width as f32, height as f32)
                    .with_curvature(curvature)
                    .with_vignette_width(vignette_width)
                    .with_pixel_density(2.0),
            );

            let filename = format!("crt_c{curvature:.0}_v{vignette_width:.0}.png");
            effect.apply(&img).save(output_dir.join(&filename))?;
            println!("✓ Generated {}", filename);
        }
    }

    println!("\n✓ Images saved to: {}", output_dir.display());

    Ok(())
}

fn test_card() -> RgbaImage {
    RgbaImage::from_fn(400, 300, |x, y| {
        let checker = ((x / 20) + (y / 20)) % 2 == 0;
        let v = if checker { 220 } else { 60 };
        Rgba([v, (y * 255 / 300) as u8, (x * 255 / 400) as u8, 255])
    })
}
