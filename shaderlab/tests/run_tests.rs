use anyhow::Result;
use clap::Parser;
use image::{Rgba, RgbaImage};
use shaderlab::cli::Cli;
use std::path::{Path, PathBuf};

fn write_card(dir: &Path) -> Result<PathBuf> {
    let path = dir.join("card.png");
    RgbaImage::from_fn(24, 16, |x, y| Rgba([(x * 10) as u8, (y * 15) as u8, 200, 255]))
        .save(&path)?;
    Ok(path)
}

fn run(dir: &Path, args: &[&str]) -> Result<()> {
    let config = dir.join("shaderlab.toml");
    let mut argv = vec!["shaderlab", "--config", config.to_str().unwrap()];
    argv.extend_from_slice(args);
    shaderlab::run(Cli::try_parse_from(argv)?)
}

#[test]
fn test_list() -> Result<()> {
    let dir = tempfile::tempdir()?;
    run(dir.path(), &["list"])
}

#[test]
fn test_color_blind_output() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let input = write_card(dir.path())?;
    let output = dir.path().join("out.png");

    run(
        dir.path(),
        &[
            "color-blind",
            "-i",
            input.to_str().unwrap(),
            "-o",
            output.to_str().unwrap(),
            "--severity",
            "0",
            "-e",
            "@2:type=Tritanomaly",
        ],
    )?;

    // Severity 0 is the identity whatever the type.
    let source = image::open(&input)?.to_rgba8();
    let rendered = image::open(&output)?.to_rgba8();
    assert_eq!(rendered, source);
    Ok(())
}

#[test]
fn test_crt_disabled_from_config() -> Result<()> {
    let dir = tempfile::tempdir()?;
    std::fs::write(dir.path().join("shaderlab.toml"), "[crt]\nenabled = false\n")?;

    let input = write_card(dir.path())?;
    let output = dir.path().join("out.png");
    let frames = dir.path().join("frames");

    run(
        dir.path(),
        &[
            "crt",
            "-i",
            input.to_str().unwrap(),
            "-o",
            output.to_str().unwrap(),
            "--frames-dir",
            frames.to_str().unwrap(),
            "-e",
            "@1:curvature=2",
        ],
    )?;

    assert_eq!(
        image::open(&output)?.to_rgba8(),
        image::open(&input)?.to_rgba8()
    );
    assert_eq!(std::fs::read_dir(&frames)?.count(), 2);
    Ok(())
}

#[test]
fn test_crt_renders_bezel() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let input = write_card(dir.path())?;
    let output = dir.path().join("out.png");

    run(
        dir.path(),
        &[
            "crt",
            "-i",
            input.to_str().unwrap(),
            "-o",
            output.to_str().unwrap(),
            "--curvature",
            "1",
        ],
    )?;

    let rendered = image::open(&output)?.to_rgba8();
    assert_eq!(rendered.dimensions(), (24, 16));
    assert_eq!(rendered.get_pixel(0, 0), &Rgba([0, 0, 0, 0]));
    Ok(())
}

#[test]
fn test_errors() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let input = write_card(dir.path())?;

    assert!(run(dir.path(), &["crt", "-i", "missing.png"]).is_err());
    assert!(
        run(
            dir.path(),
            &["color-blind", "-i", input.to_str().unwrap(), "-e", "type=Nope"]
        )
        .is_err()
    );
    Ok(())
}

#[test]
fn test_crt_output_matches_viewport() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let input = write_card(dir.path())?;
    let output = dir.path().join("out.png");

    run(
        dir.path(),
        &[
            "crt",
            "-i",
            input.to_str().unwrap(),
            "-o",
            output.to_str().unwrap(),
            "--viewport",
            "48x32",
        ],
    )?;

    let rendered = image::open(&output)?.to_rgba8();
    assert_eq!(rendered.dimensions(), (48, 32));
    assert_eq!(rendered.get_pixel(0, 0), &Rgba([0, 0, 0, 0]));
    Ok(())
}
