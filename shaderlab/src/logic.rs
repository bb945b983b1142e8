//! Screen logic
//!
//! Each screen owns the parameters of one effect, the controls that edit them
//! and the pipeline that renders them. The scheduler drives a screen one frame
//! at a time: events, animation step, uniform push, render.

pub mod color_blind_screen;
pub mod crt_screen;
pub mod input;
pub mod scheduler;
pub mod screen;
