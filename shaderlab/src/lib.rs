//! Shaderlab
//!
//! Renders the color blindness and CRT effects over a source image frame by
//! frame, driven by a script of input events instead of a window.
//!
//! # Architecture
//! - `cli`: command line definition
//! - `config`: read-only `shaderlab.toml` settings
//! - `logic`: screens owning the effect parameters, the input events and the frame loop

#[macro_use]
extern crate derivative;

pub mod cli;
pub mod config;
pub mod logic;

use anyhow::{Context, Result};
use cli::{Cli, ColorBlindArgs, Command, CrtArgs, RenderArgs};
use image::RgbaImage;
use image_effect::{
    color_blindness_effect::ColorBlindnessParams, crt_effect::CrtParams,
    realtime::RealTimeImageEffect,
};
use logic::{
    color_blind_screen::ColorBlindScreen,
    crt_screen::CrtScreen,
    scheduler::{RenderPlan, Scheduler},
    screen::{Screen, ScreenSettings},
};
use std::path::Path;

/// Sets up a custom logger format with timestamp, log level, file name, line number,
/// and log message. `RUST_LOG` overrides the default level.
pub fn init_logger(verbose: bool) {
    use std::io::Write;

    let level = if verbose { "debug" } else { "info" };

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format(|buf, record| {
            let style = buf.default_level_style(record.level());
            let ts = chrono::Local::now().format("%H:%M:%S");

            writeln!(
                buf,
                "[{} {style}{}{style:#} {} {}] {}",
                ts,
                record.level(),
                record
                    .file()
                    .unwrap_or("None")
                    .split('/')
                    .next_back()
                    .unwrap_or("None"),
                record.line().unwrap_or(0),
                record.args()
            )
        })
        .init();
}

pub fn run(cli: Cli) -> Result<()> {
    let conf = config::init(cli.config.as_deref())?;

    match cli.command {
        Command::List => {
            for effect in RealTimeImageEffect::all_effects() {
                println!("{:<16} {}", effect.name(), effect.description());
            }
            Ok(())
        }
        Command::ColorBlind(args) => run_color_blind(args, &conf),
        Command::Crt(args) => run_crt(args, &conf),
    }
}

fn run_color_blind(args: ColorBlindArgs, conf: &config::Config) -> Result<()> {
    let section = &conf.color_blindness;
    let params = ColorBlindnessParams::new()
        .with_severity(args.severity.unwrap_or(section.severity))
        .with_deficiency(match args.deficiency {
            Some(deficiency) => deficiency,
            None => section.deficiency()?,
        });

    let screen = ColorBlindScreen::new(params, ScreenSettings::from(&conf.preference))?;
    render(screen, &args.render, conf)
}

fn run_crt(args: CrtArgs, conf: &config::Config) -> Result<()> {
    let section = &conf.crt;
    let params = CrtParams::new()
        .with_curvature(args.curvature.unwrap_or(section.curvature))
        .with_vignette_width(args.vignette_width.unwrap_or(section.vignette_width))
        .with_pixel_density(args.pixel_density.unwrap_or(section.pixel_density))
        .with_enabled(section.enabled && !args.disabled);

    let screen = CrtScreen::new(params, ScreenSettings::from(&conf.preference));
    render(screen, &args.render, conf)
}

fn render(screen: impl Screen, args: &RenderArgs, conf: &config::Config) -> Result<()> {
    let source = load_image(&args.input)?;
    let viewport = args
        .viewport
        .unwrap_or_else(|| (source.width(), source.height()).into());

    let plan = RenderPlan::new(&conf.preference)
        .with_frame_limit(args.frames)
        .with_viewport(viewport)
        .with_events(args.events.clone())
        .with_frames_dir(args.frames_dir.clone())
        .with_output(args.output.clone());

    let summary = Scheduler::new(screen, plan).run(&source)?;
    log::info!(
        "rendered {} frame(s), {} passthrough",
        summary.frames, summary.passthrough_frames
    );

    Ok(())
}

pub fn load_image(path: &Path) -> Result<RgbaImage> {
    let image = image::open(path)
        .with_context(|| format!("open image {} failed", path.display()))?
        .to_rgba8();

    log::debug!(
        "loaded {} ({}x{})",
        path.display(),
        image.width(),
        image.height()
    );

    Ok(image)
}
