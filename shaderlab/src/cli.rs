use crate::logic::input::{ScriptedEvent, ViewportSize};
use clap::{Args, Parser, Subcommand};
use image_effect::matrix_table::DeficiencyType;
use std::path::PathBuf;

/// Headless renderer for the color blindness and CRT effects.
///
/// Example:
///   shaderlab color-blind -i photo.png -o out.png -e severity=0.8 -e @10:type=Tritanomaly
///   shaderlab crt -i photo.png --frames-dir frames/ -e @5:curvature=3 -e @30:enabled=false
#[derive(Parser, Debug)]
#[command(name = "shaderlab", version, about)]
pub struct Cli {
    /// Log at debug level unless RUST_LOG says otherwise.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Configuration file. Defaults to shaderlab.toml in the platform config dir.
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Simulate a color vision deficiency.
    ColorBlind(ColorBlindArgs),

    /// Curved CRT screen with vignette and scanlines.
    Crt(CrtArgs),

    /// List the available effects.
    List,
}

#[derive(Args, Debug, Clone)]
pub struct RenderArgs {
    /// Source image (PNG).
    #[arg(short, long, value_name = "FILE")]
    pub input: PathBuf,

    /// Where to write the last rendered frame.
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Write every rendered frame here as frame_NNNN.png.
    #[arg(long, value_name = "DIR")]
    pub frames_dir: Option<PathBuf>,

    /// Size of the surface the effect renders to. Defaults to the image size.
    #[arg(long, value_name = "WxH")]
    pub viewport: Option<ViewportSize>,

    /// Upper bound on rendered frames. Defaults to preference.max_frames.
    #[arg(long, value_name = "N")]
    pub frames: Option<u32>,

    /// Input event delivered before a frame, e.g. `severity=0.3` or `@12:type=Protanomaly`.
    #[arg(short, long = "event", value_name = "[@FRAME:]NAME=VALUE")]
    pub events: Vec<ScriptedEvent>,
}

#[derive(Args, Debug, Clone)]
pub struct ColorBlindArgs {
    #[command(flatten)]
    pub render: RenderArgs,

    /// Initial severity in [0, 1].
    #[arg(long)]
    pub severity: Option<f32>,

    /// Initial deficiency: Deuteranomaly, Protanomaly or Tritanomaly.
    #[arg(long = "type", value_name = "TYPE", value_parser = parse_deficiency)]
    pub deficiency: Option<DeficiencyType>,
}

#[derive(Args, Debug, Clone)]
pub struct CrtArgs {
    #[command(flatten)]
    pub render: RenderArgs,

    /// Initial curvature in [1, 10], higher is flatter.
    #[arg(long)]
    pub curvature: Option<f32>,

    /// Initial vignette width in [1, 100] pixels.
    #[arg(long)]
    pub vignette_width: Option<f32>,

    #[arg(long)]
    pub pixel_density: Option<f32>,

    /// Start with the effect switched off.
    #[arg(long)]
    pub disabled: bool,
}

fn parse_deficiency(s: &str) -> Result<DeficiencyType, String> {
    s.parse()
}
