//! The boundary between the host and a per-pixel program.
//!
//! A pipeline owns one effect and its uniform table. Rendering never fails:
//! a program that cannot be compiled or bound is switched off for good and
//! every later frame shows the source image unmodified.

use crate::{
    Effect, ImageEffectError,
    uniform::{UniformBinding, UniformValue, validate_decls},
};
use image::RgbaImage;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProgramState {
    Ready,
    Unavailable(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameKind {
    /// The program ran over every pixel.
    Effect,
    /// The source was shown as is (bypassed, not ready or unavailable).
    Passthrough,
}

#[derive(Debug, Clone)]
pub struct Frame {
    pub image: RgbaImage,
    pub kind: FrameKind,
}

#[derive(Debug)]
pub struct EffectPipeline<E: Effect> {
    effect: E,
    binding: UniformBinding,
    state: ProgramState,
}

impl<E: Effect> EffectPipeline<E> {
    pub fn compile(effect: E) -> Self {
        let binding = UniformBinding::for_effect(&effect);
        let state = match validate_decls(effect.uniforms()) {
            Ok(_) => ProgramState::Ready,
            Err(e) => {
                log::warn!("{} falls back to passthrough: {e}", effect.name());
                ProgramState::Unavailable(e.to_string())
            }
        };

        Self {
            effect,
            binding,
            state,
        }
    }

    pub fn effect(&self) -> &E {
        &self.effect
    }

    pub fn effect_mut(&mut self) -> &mut E {
        &mut self.effect
    }

    pub fn binding(&self) -> &UniformBinding {
        &self.binding
    }

    pub fn state(&self) -> &ProgramState {
        &self.state
    }

    pub fn is_available(&self) -> bool {
        self.state == ProgramState::Ready
    }

    /// Visible to the next [`Self::render`]. Returns whether the value changed.
    pub fn set(&mut self, name: &str, value: UniformValue) -> bool {
        self.binding.set(name, value)
    }

    /// Switches the program off permanently.
    pub fn mark_unavailable(&mut self, err: ImageEffectError) {
        if self.is_available() {
            log::warn!("{} falls back to passthrough: {err}", self.effect.name());
            self.state = ProgramState::Unavailable(err.to_string());
        }
    }

    pub fn render(&mut self, source: &RgbaImage) -> Frame {
        if !self.is_available() {
            return passthrough(source);
        }

        match self.binding.flush(&mut self.effect) {
            Ok(0) => (),
            Ok(n) => log::trace!("{}: pushed {n} uniform(s)", self.effect.name()),
            Err(e) => {
                self.mark_unavailable(ImageEffectError::Unavailable(format!("bind failed: {e}")));
                return passthrough(source);
            }
        }

        if self.effect.is_bypassed() || !self.effect.is_ready() {
            return passthrough(source);
        }

        Frame {
            image: self.effect.apply(source),
            kind: FrameKind::Effect,
        }
    }
}

fn passthrough(source: &RgbaImage) -> Frame {
    Frame {
        image: source.clone(),
        kind: FrameKind::Passthrough,
    }
}
