//! Frame stepped animations.
//!
//! An [`AnimationDriver`] follows a target with a critically damped spring:
//!   x(t) = target + (c1 + c2*t) * e^(-ω*t)
//! where ω = sqrt(stiffness), c1 = x0 - target and c2 = v0 + ω*c1.
//! Retargeting keeps the current value and velocity, so a moving value bends
//! toward the new target instead of jumping.

use crate::Color;
use std::{
    fmt::Debug,
    time::{Duration, Instant},
};

/// A value a spring can move: a small vector space over `f32`.
pub trait Animatable: Copy + Debug + PartialEq {
    fn zero() -> Self;
    fn add(self, rhs: Self) -> Self;
    fn sub(self, rhs: Self) -> Self;
    fn scale(self, factor: f32) -> Self;
    /// Largest absolute component.
    fn magnitude(self) -> f32;
}

impl Animatable for f32 {
    fn zero() -> Self {
        0.0
    }

    fn add(self, rhs: Self) -> Self {
        self + rhs
    }

    fn sub(self, rhs: Self) -> Self {
        self - rhs
    }

    fn scale(self, factor: f32) -> Self {
        self * factor
    }

    fn magnitude(self) -> f32 {
        self.abs()
    }
}

impl Animatable for Color {
    fn zero() -> Self {
        Color::default()
    }

    fn add(self, rhs: Self) -> Self {
        Color::new(self.r + rhs.r, self.g + rhs.g, self.b + rhs.b, self.a + rhs.a)
    }

    fn sub(self, rhs: Self) -> Self {
        Color::new(self.r - rhs.r, self.g - rhs.g, self.b - rhs.b, self.a - rhs.a)
    }

    fn scale(self, factor: f32) -> Self {
        Color::new(
            self.r * factor,
            self.g * factor,
            self.b * factor,
            self.a * factor,
        )
    }

    fn magnitude(self) -> f32 {
        self.r
            .abs()
            .max(self.g.abs())
            .max(self.b.abs())
            .max(self.a.abs())
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpringSpec {
    pub stiffness: f32,
    /// Distance to the target below which the animation is considered done.
    pub visibility_threshold: f32,
}

impl SpringSpec {
    pub const STIFFNESS_MEDIUM: f32 = 1500.0;
    pub const STIFFNESS_MEDIUM_LOW: f32 = 400.0;

    pub const fn new(stiffness: f32, visibility_threshold: f32) -> Self {
        Self {
            stiffness,
            visibility_threshold,
        }
    }

    pub const fn medium() -> Self {
        Self::new(Self::STIFFNESS_MEDIUM, 0.01)
    }

    pub const fn medium_low() -> Self {
        Self::new(Self::STIFFNESS_MEDIUM_LOW, 0.01)
    }

    pub fn omega(&self) -> f32 {
        self.stiffness.max(f32::EPSILON).sqrt()
    }
}

impl Default for SpringSpec {
    fn default() -> Self {
        Self::medium()
    }
}

#[derive(Debug, Clone)]
pub struct AnimationDriver<T: Animatable> {
    label: &'static str,
    value: T,
    velocity: T,
    target: T,
    spec: SpringSpec,
    running: bool,
}

impl<T: Animatable> AnimationDriver<T> {
    pub fn new(label: &'static str, initial: T, spec: SpringSpec) -> Self {
        Self {
            label,
            value: initial,
            velocity: T::zero(),
            target: initial,
            spec,
            running: false,
        }
    }

    pub fn label(&self) -> &'static str {
        self.label
    }

    pub fn value(&self) -> T {
        self.value
    }

    pub fn velocity(&self) -> T {
        self.velocity
    }

    pub fn target(&self) -> T {
        self.target
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Moves the target, leaving value and velocity untouched.
    /// Returns false when `target` already is the target.
    pub fn retarget(&mut self, target: T) -> bool {
        if self.target == target {
            return false;
        }

        log::trace!("{}: retarget {:?} -> {:?}", self.label, self.target, target);
        self.target = target;
        self.running = true;
        true
    }

    /// Jumps to `value` and stops.
    pub fn snap_to(&mut self, value: T) {
        self.value = value;
        self.target = value;
        self.velocity = T::zero();
        self.running = false;
    }

    /// Advances by `dt`. Returns whether the animation is still running.
    pub fn step(&mut self, dt: Duration) -> bool {
        if !self.running {
            return false;
        }

        let t = dt.as_secs_f32();
        let w = self.spec.omega();
        let exp = (-w * t).exp();

        let c1 = self.value.sub(self.target);
        let c2 = self.velocity.add(c1.scale(w));
        let decay = c1.add(c2.scale(t));

        self.value = self.target.add(decay.scale(exp));
        self.velocity = c2.sub(decay.scale(w)).scale(exp);

        let threshold = self.spec.visibility_threshold;
        if self.value.sub(self.target).magnitude() < threshold
            && self.velocity.magnitude() < threshold * 10.0
        {
            self.value = self.target;
            self.velocity = T::zero();
            self.running = false;
        }

        self.running
    }
}

/// Measures the time between rendered frames.
#[derive(Debug, Clone, Default)]
pub struct FrameClock {
    last: Option<Instant>,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Time elapsed since the previous tick, zero on the first one.
    pub fn tick(&mut self, now: Instant) -> Duration {
        let dt = self
            .last
            .map(|last| now.saturating_duration_since(last))
            .unwrap_or_default();
        self.last = Some(now);
        dt
    }

    pub fn reset(&mut self) {
        self.last = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FRAME: Duration = Duration::from_millis(16);

    #[test]
    fn test_idle_driver_does_not_move() {
        let mut driver = AnimationDriver::new("idle", 3.0_f32, SpringSpec::medium());
        assert!(!driver.step(FRAME));
        assert_eq!(driver.value(), 3.0);
        assert!(!driver.retarget(3.0));
        assert!(!driver.is_running());
    }

    #[test]
    fn test_converges_without_overshoot_from_rest() {
        let mut driver = AnimationDriver::new("position", 0.0_f32, SpringSpec::medium_low());
        assert!(driver.retarget(2.0));

        let mut previous = driver.value();
        let mut frames = 0;
        while driver.step(FRAME) {
            let value = driver.value();
            assert!(value >= previous, "monotonic");
            assert!(value <= 2.0, "no overshoot");
            previous = value;
            frames += 1;
            assert!(frames < 600, "settles");
        }
        assert_eq!(driver.value(), 2.0);
        assert_eq!(driver.velocity(), 0.0);
    }

    #[test]
    fn test_retarget_keeps_value_continuous() {
        let mut driver = AnimationDriver::new("position", 0.0_f32, SpringSpec::medium_low());
        driver.retarget(4.0);
        for _ in 0..5 {
            driver.step(FRAME);
        }

        let (value, velocity) = (driver.value(), driver.velocity());
        assert!(value > 0.0 && value < 4.0);

        driver.retarget(1.0);
        assert_eq!(driver.value(), value);
        assert_eq!(driver.velocity(), velocity);

        let before = driver.value();
        driver.step(Duration::from_millis(1));
        assert!((driver.value() - before).abs() < 0.1);

        while driver.step(FRAME) {}
        assert_eq!(driver.value(), 1.0);
    }

    #[test]
    fn test_snap_to_stops() {
        let mut driver = AnimationDriver::new("radius", 15.0_f32, SpringSpec::medium());
        driver.retarget(50.0);
        driver.step(FRAME);
        driver.snap_to(50.0);
        assert!(!driver.is_running());
        assert_eq!(driver.value(), 50.0);
    }

    #[test]
    fn test_color_animation() {
        let black = Color::new(0.0, 0.0, 0.0, 1.0);
        let white = Color::new(1.0, 1.0, 1.0, 1.0);
        let mut driver = AnimationDriver::new("text", black, SpringSpec::medium());
        driver.retarget(white);
        driver.step(FRAME);

        let mid = driver.value();
        assert!(mid.r > 0.0 && mid.r < 1.0);
        assert_eq!(mid.a, 1.0);

        while driver.step(FRAME) {}
        assert_eq!(driver.value(), white);
    }

    #[test]
    fn test_frame_clock() {
        let start = Instant::now();
        let mut clock = FrameClock::new();
        assert_eq!(clock.tick(start), Duration::ZERO);
        assert_eq!(clock.tick(start + FRAME), FRAME);
        assert_eq!(clock.tick(start + FRAME * 3), FRAME * 2);
    }
}
