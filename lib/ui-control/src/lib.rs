//! # UI Control - headless animated controls
//!
//! State, layout and animation of interactive controls, independent of any
//! rendering toolkit. The host forwards input, steps animations once per
//! frame and draws from the computed layout.
//!
//! - `animation`: critically damped spring values and the frame clock
//! - `segmented_selector`: a 2 to 5 option selector with an animated indicator

pub mod animation;
pub mod segmented_selector;

pub type ControlResult<T> = Result<T, ConfigurationError>;

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigurationError {
    #[error("This control requires at least {min} options, got {count}")]
    TooFewOptions { min: usize, count: usize },
    #[error("This control requires at most {max} options, got {count}")]
    TooManyOptions { max: usize, count: usize },
    #[error("Duplicate option [{0}]")]
    DuplicateOption(String),
    #[error("Invalid selected option [{0}]")]
    UnknownOption(String),
}

/// RGBA color with channels in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    pub fn from_rgb8(r: u8, g: u8, b: u8) -> Self {
        Self::new(r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0, 1.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn contains_x(&self, x: f32) -> bool {
        self.x <= x && x < self.x + self.width
    }
}
