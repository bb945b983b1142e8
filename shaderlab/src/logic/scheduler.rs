//! The frame loop.
//!
//! Frames are produced at a fixed simulated rate: frame `n` is stamped
//! `start + n / frame_rate` and its animation step is the time since the
//! previous frame. Events scripted for frame `n` are delivered before frame
//! `n` is rendered. The loop ends once every event is delivered and no
//! animation is running, or at the frame limit.

use super::{
    input::{ScriptedEvent, ViewportSize},
    screen::Screen,
};
use crate::config::Preference;
use anyhow::{Context, Result};
use derive_setters::Setters;
use image::RgbaImage;
use image_effect::pipeline::{Frame, FrameKind};
use std::{
    fs,
    path::PathBuf,
    time::{Duration, Instant},
};
use ui_control::animation::FrameClock;

#[derive(Debug, Clone, Derivative, Setters)]
#[derivative(Default)]
#[setters(prefix = "with_")]
pub struct RenderPlan {
    #[derivative(Default(value = "60"))]
    pub frame_rate: u32,

    #[derivative(Default(value = "240"))]
    pub max_frames: u32,

    /// Size reported to the screen before the first frame.
    pub viewport: ViewportSize,

    pub events: Vec<ScriptedEvent>,
    pub frames_dir: Option<PathBuf>,
    pub output: Option<PathBuf>,
}

impl RenderPlan {
    pub fn new(preference: &Preference) -> Self {
        Self::default()
            .with_frame_rate(preference.frame_rate)
            .with_max_frames(preference.max_frames)
    }

    /// Overrides `max_frames` when `limit` is set.
    pub fn with_frame_limit(mut self, limit: Option<u32>) -> Self {
        if let Some(limit) = limit {
            self.max_frames = limit;
        }
        self
    }

    fn frame_interval(&self) -> Duration {
        Duration::from_secs_f64(1.0 / self.frame_rate.max(1) as f64)
    }
}

#[derive(Debug, Clone)]
pub struct RunSummary {
    pub frames: u32,
    pub passthrough_frames: u32,
    pub last_frame: Frame,
}

pub struct Scheduler<S: Screen> {
    screen: S,
    plan: RenderPlan,
    clock: FrameClock,
}

impl<S: Screen> Scheduler<S> {
    pub fn new(screen: S, mut plan: RenderPlan) -> Self {
        plan.events.sort_by_key(|scripted| scripted.frame);

        Self {
            screen,
            plan,
            clock: FrameClock::new(),
        }
    }

    pub fn screen(&self) -> &S {
        &self.screen
    }

    pub fn run(&mut self, source: &RgbaImage) -> Result<RunSummary> {
        let frame_limit = self.plan.max_frames.max(1);
        let interval = self.plan.frame_interval();
        let last_event_frame = self.plan.events.last().map_or(0, |e| e.frame);

        if last_event_frame >= frame_limit {
            log::warn!("events after frame {} are dropped", frame_limit - 1);
        }

        if let Some(dir) = &self.plan.frames_dir {
            fs::create_dir_all(dir)
                .with_context(|| format!("create {} failed", dir.display()))?;
        }

        log::info!(
            "{}: {}x{} source, {} viewport",
            self.screen.name(),
            source.width(),
            source.height(),
            self.plan.viewport
        );

        self.screen.on_viewport_changed(self.plan.viewport);
        self.clock.reset();

        let start = Instant::now();
        let mut events = self.plan.events.iter().peekable();
        let (mut frames, mut passthrough_frames) = (0, 0);
        let mut last_frame = None;

        for index in 0..frame_limit {
            let dt = self.clock.tick(start + interval * index);

            while let Some(scripted) = events.next_if(|e| e.frame == index) {
                log::debug!("frame {index}: {:?}", scripted.event);
                self.screen
                    .handle_event(&scripted.event)
                    .with_context(|| format!("frame {index}: {:?} rejected", scripted.event))?;
            }

            let animating = self.screen.advance(dt);
            let frame = self.screen.render(source);

            frames += 1;
            if frame.kind == FrameKind::Passthrough {
                passthrough_frames += 1;
            }

            if let Some(dir) = &self.plan.frames_dir {
                let path = dir.join(format!("frame_{index:04}.png"));
                frame
                    .image
                    .save(&path)
                    .with_context(|| format!("save {} failed", path.display()))?;
            }

            last_frame = Some(frame);

            if index >= last_event_frame && !animating {
                break;
            }

            if index + 1 == frame_limit && animating {
                log::debug!("frame limit reached while animating");
            }
        }

        for label in self.screen.labels() {
            log::info!("{label}");
        }

        let last_frame = last_frame.with_context(|| "no frame rendered")?;
        if let Some(output) = &self.plan.output {
            last_frame
                .image
                .save(output)
                .with_context(|| format!("save {} failed", output.display()))?;
            log::info!("saved {}", output.display());
        }

        Ok(RunSummary {
            frames,
            passthrough_frames,
            last_frame,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::{
        color_blind_screen::ColorBlindScreen, crt_screen::CrtScreen, screen::ScreenSettings,
    };
    use image::Rgba;
    use image_effect::{
        color_blindness_effect::{ColorBlindnessParams, simulate},
        crt_effect::CrtParams,
        matrix_table::DeficiencyType,
    };

    fn source() -> RgbaImage {
        RgbaImage::from_fn(20, 20, |x, y| Rgba([(x * 12) as u8, 90, (y * 12) as u8, 255]))
    }

    fn events(specs: &[&str]) -> Vec<ScriptedEvent> {
        specs.iter().map(|s| s.parse().unwrap()).collect()
    }

    fn color_blind() -> ColorBlindScreen {
        ColorBlindScreen::new(ColorBlindnessParams::new(), ScreenSettings::default()).unwrap()
    }

    #[test]
    fn test_single_frame_without_events() -> Result<()> {
        let screen = CrtScreen::new(CrtParams::new(), ScreenSettings::default());
        let plan = RenderPlan::default().with_viewport(ViewportSize::new(20, 20));

        let summary = Scheduler::new(screen, plan).run(&source())?;
        assert_eq!(summary.frames, 1);
        assert_eq!(summary.passthrough_frames, 0);
        assert_eq!(summary.last_frame.kind, FrameKind::Effect);
        Ok(())
    }

    #[test]
    fn test_runs_until_animation_settles() -> Result<()> {
        let plan = RenderPlan::default()
            .with_events(events(&["@3:type=Protanomaly", "severity=1"]));

        let mut scheduler = Scheduler::new(color_blind(), plan);
        let summary = scheduler.run(&source())?;

        assert!(summary.frames > 4);
        assert!(summary.frames < 240);
        assert!(!scheduler.screen().selector().is_animating());

        let params = scheduler.screen().params();
        assert_eq!(params.deficiency(), DeficiencyType::Protanomaly);
        assert_eq!(params.severity(), 1.0);

        let pixel = *source().get_pixel(7, 3);
        let expected = simulate(pixel.into(), params);
        assert_eq!(
            summary.last_frame.image.get_pixel(7, 3),
            &Rgba::<u8>::from(expected)
        );
        Ok(())
    }

    #[test]
    fn test_frame_limit_drops_late_events() -> Result<()> {
        let plan = RenderPlan::default()
            .with_frame_limit(Some(2))
            .with_events(events(&["@5:severity=0"]));

        let mut scheduler = Scheduler::new(color_blind(), plan);
        let summary = scheduler.run(&source())?;
        assert_eq!(summary.frames, 2);
        assert_eq!(scheduler.screen().params().severity(), 0.5);
        Ok(())
    }

    #[test]
    fn test_unmeasured_viewport_passes_through() -> Result<()> {
        let screen = CrtScreen::new(CrtParams::new(), ScreenSettings::default());
        let plan = RenderPlan::default().with_events(events(&["@2:size=20x20"]));

        let summary = Scheduler::new(screen, plan).run(&source())?;
        assert_eq!(summary.frames, 3);
        assert_eq!(summary.passthrough_frames, 2);
        assert_eq!(summary.last_frame.kind, FrameKind::Effect);
        Ok(())
    }

    #[test]
    fn test_writes_frames_and_output() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let frames_dir = dir.path().join("frames");
        let output = dir.path().join("out.png");

        let plan = RenderPlan::default()
            .with_events(events(&["@1:severity=0.2"]))
            .with_frames_dir(Some(frames_dir.clone()))
            .with_output(Some(output.clone()));

        let summary = Scheduler::new(color_blind(), plan).run(&source())?;
        assert_eq!(summary.frames, 2);
        assert!(frames_dir.join("frame_0000.png").exists());
        assert!(frames_dir.join("frame_0001.png").exists());

        let saved = image::open(&output)?.to_rgba8();
        assert_eq!(saved, summary.last_frame.image);
        Ok(())
    }

    #[test]
    fn test_rejected_event_stops_run() {
        let plan = RenderPlan::default().with_events(events(&["type=Monochromacy"]));
        assert!(Scheduler::new(color_blind(), plan).run(&source()).is_err());
    }
}
