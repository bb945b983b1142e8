//! A row of 2 to 5 mutually exclusive options with a highlight that slides
//! between them.
//!
//! The selector is a state machine over the option indices. Selecting an
//! option changes the index at once and retargets three animations: the
//! indicator position (in slots), its corner radii and the text colors. The
//! host steps them once per frame and draws [`SegmentedSelector::layout`].

use crate::{
    Color, ConfigurationError, ControlResult, Rect,
    animation::{AnimationDriver, SpringSpec},
};
use derivative::Derivative;
use derive_setters::Setters;
use std::time::Duration;

pub const MIN_OPTIONS: usize = 2;
pub const MAX_OPTIONS: usize = 5;

/// Corner radius in percent of the indicator's shorter side.
pub const PILL_CORNER_PERCENT: f32 = 50.0;
pub const INNER_CORNER_PERCENT: f32 = 15.0;

#[derive(Debug, Clone, Copy, PartialEq, Derivative, Setters)]
#[derivative(Default)]
#[setters(prefix = "with_")]
#[non_exhaustive]
pub struct SelectorStyle {
    #[derivative(Default(value = "Color::from_rgb8(0x1D, 0x19, 0x2B)"))]
    pub selected_color: Color,

    #[derivative(Default(value = "Color::from_rgb8(0x49, 0x45, 0x4F)"))]
    pub unselected_color: Color,
}

impl SelectorStyle {
    pub fn new() -> Self {
        Self::default()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct OptionLayout<'a> {
    pub label: &'a str,
    pub bounds: Rect,
    pub text_color: Color,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IndicatorLayout {
    pub bounds: Rect,
    /// Radius of the top-start and bottom-start corners, in pixels.
    pub start_radius: f32,
    /// Radius of the top-end and bottom-end corners, in pixels.
    pub end_radius: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SelectorLayout<'a> {
    pub options: Vec<OptionLayout<'a>>,
    pub indicator: IndicatorLayout,
}

#[derive(Debug, Clone)]
pub struct SegmentedSelector {
    options: Vec<String>,
    selected_index: usize,
    style: SelectorStyle,
    position: AnimationDriver<f32>,
    start_corner: AnimationDriver<f32>,
    end_corner: AnimationDriver<f32>,
    text_colors: Vec<AnimationDriver<Color>>,
}

impl SegmentedSelector {
    pub fn new<S: Into<String>>(
        options: impl IntoIterator<Item = S>,
        selected_option: &str,
    ) -> ControlResult<Self> {
        let options: Vec<String> = options.into_iter().map(Into::into).collect();
        validate_options(&options)?;

        let selected_index = options
            .iter()
            .position(|option| option == selected_option)
            .ok_or_else(|| ConfigurationError::UnknownOption(selected_option.to_string()))?;

        let style = SelectorStyle::default();
        let (start, end) = corner_targets(selected_index, options.len());

        let text_colors = (0..options.len())
            .map(|index| {
                AnimationDriver::new(
                    "Button text color",
                    text_color_target(&style, index, selected_index),
                    SpringSpec::medium(),
                )
            })
            .collect();

        Ok(Self {
            options,
            selected_index,
            style,
            position: AnimationDriver::new(
                "Background Position Progress",
                selected_index as f32,
                SpringSpec::medium_low(),
            ),
            start_corner: AnimationDriver::new(
                "Selector start shape",
                start,
                SpringSpec::new(SpringSpec::STIFFNESS_MEDIUM, 0.5),
            ),
            end_corner: AnimationDriver::new(
                "Selector end shape",
                end,
                SpringSpec::new(SpringSpec::STIFFNESS_MEDIUM, 0.5),
            ),
            text_colors,
        })
    }

    pub fn with_style(mut self, style: SelectorStyle) -> Self {
        self.style = style;
        for (index, color) in self.text_colors.iter_mut().enumerate() {
            color.snap_to(text_color_target(&style, index, self.selected_index));
        }
        self
    }

    pub fn options(&self) -> &[String] {
        &self.options
    }

    pub fn selected_index(&self) -> usize {
        self.selected_index
    }

    pub fn selected_option(&self) -> &str {
        &self.options[self.selected_index]
    }

    /// Indicator position in slots, animated toward the selected index.
    pub fn position_progress(&self) -> f32 {
        self.position.value()
    }

    pub fn position_target(&self) -> f32 {
        self.position.target()
    }

    /// Start and end corner radii in percent.
    pub fn corner_percents(&self) -> (f32, f32) {
        (self.start_corner.value(), self.end_corner.value())
    }

    pub fn text_color(&self, index: usize) -> Option<Color> {
        self.text_colors.get(index).map(AnimationDriver::value)
    }

    /// Selects `option`. Returns `Ok(false)` when it already was selected,
    /// in which case nothing is retargeted.
    pub fn select_option(&mut self, option: &str) -> ControlResult<bool> {
        let index = self
            .options
            .iter()
            .position(|o| o == option)
            .ok_or_else(|| ConfigurationError::UnknownOption(option.to_string()))?;

        Ok(self.select_index(index))
    }

    fn select_index(&mut self, index: usize) -> bool {
        if index == self.selected_index {
            return false;
        }

        log::debug!(
            "select [{}] -> [{}]",
            self.options[self.selected_index],
            self.options[index]
        );

        self.selected_index = index;
        self.position.retarget(index as f32);

        let (start, end) = corner_targets(index, self.options.len());
        self.start_corner.retarget(start);
        self.end_corner.retarget(end);

        for (i, color) in self.text_colors.iter_mut().enumerate() {
            color.retarget(text_color_target(&self.style, i, index));
        }

        true
    }

    /// Advances every animation by `dt`. Returns whether any is still running.
    pub fn step(&mut self, dt: Duration) -> bool {
        let mut running = self.position.step(dt);
        running |= self.start_corner.step(dt);
        running |= self.end_corner.step(dt);
        for color in self.text_colors.iter_mut() {
            running |= color.step(dt);
        }
        running
    }

    pub fn is_animating(&self) -> bool {
        self.position.is_running()
            || self.start_corner.is_running()
            || self.end_corner.is_running()
            || self.text_colors.iter().any(AnimationDriver::is_running)
    }

    pub fn layout(&self, width: f32, height: f32) -> SelectorLayout<'_> {
        let slots = slot_bounds(width, height, self.options.len());
        let slot_width = slots.first().map(|slot| slot.width).unwrap_or_default();

        let options = self
            .options
            .iter()
            .zip(slots)
            .zip(self.text_colors.iter())
            .map(|((label, bounds), color)| OptionLayout {
                label,
                bounds,
                text_color: color.value(),
            })
            .collect();

        let shorter_side = slot_width.min(height);
        let indicator = IndicatorLayout {
            bounds: Rect::new(
                self.position.value() * slot_width,
                0.0,
                slot_width,
                height,
            ),
            start_radius: self.start_corner.value() / 100.0 * shorter_side,
            end_radius: self.end_corner.value() / 100.0 * shorter_side,
        };

        SelectorLayout { options, indicator }
    }

    /// The option under a tap at `x` on a track `width` wide.
    pub fn hit_test(&self, x: f32, width: f32) -> Option<&str> {
        slot_bounds(width, 0.0, self.options.len())
            .iter()
            .position(|slot| slot.contains_x(x))
            .map(|index| self.options[index].as_str())
    }
}

/// `count` equal slots side by side across `width`.
pub fn slot_bounds(width: f32, height: f32, count: usize) -> Vec<Rect> {
    if count == 0 {
        return vec![];
    }

    let slot_width = width.max(0.0) / count as f32;
    (0..count)
        .map(|index| Rect::new(index as f32 * slot_width, 0.0, slot_width, height))
        .collect()
}

fn validate_options(options: &[String]) -> ControlResult<()> {
    let count = options.len();
    if count < MIN_OPTIONS {
        return Err(ConfigurationError::TooFewOptions {
            min: MIN_OPTIONS,
            count,
        });
    }

    if count > MAX_OPTIONS {
        return Err(ConfigurationError::TooManyOptions {
            max: MAX_OPTIONS,
            count,
        });
    }

    for (i, option) in options.iter().enumerate() {
        if options[..i].contains(option) {
            return Err(ConfigurationError::DuplicateOption(option.clone()));
        }
    }

    Ok(())
}

fn corner_targets(index: usize, count: usize) -> (f32, f32) {
    let start = if index == 0 {
        PILL_CORNER_PERCENT
    } else {
        INNER_CORNER_PERCENT
    };

    let end = if index + 1 == count {
        PILL_CORNER_PERCENT
    } else {
        INNER_CORNER_PERCENT
    };

    (start, end)
}

fn text_color_target(style: &SelectorStyle, index: usize, selected: usize) -> Color {
    if index == selected {
        style.selected_color
    } else {
        style.unselected_color
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_corner_targets() {
        assert_eq!(corner_targets(0, 3), (50.0, 15.0));
        assert_eq!(corner_targets(1, 3), (15.0, 15.0));
        assert_eq!(corner_targets(2, 3), (15.0, 50.0));
    }

    #[test]
    fn test_slot_bounds() {
        let slots = slot_bounds(300.0, 48.0, 3);
        assert_eq!(slots.len(), 3);
        assert_eq!(slots[1], Rect::new(100.0, 0.0, 100.0, 48.0));
        assert!(slot_bounds(300.0, 48.0, 0).is_empty());
    }

    #[test]
    fn test_initial_state_is_settled() {
        let selector = SegmentedSelector::new(["Day", "Week", "Month"], "Week").unwrap();
        assert_eq!(selector.selected_index(), 1);
        assert_eq!(selector.position_progress(), 1.0);
        assert_eq!(selector.corner_percents(), (15.0, 15.0));
        assert!(!selector.is_animating());
    }

    #[test]
    fn test_unknown_option_keeps_state() {
        let mut selector = SegmentedSelector::new(["Day", "Week"], "Day").unwrap();
        assert_eq!(
            selector.select_option("Year"),
            Err(ConfigurationError::UnknownOption("Year".into()))
        );
        assert_eq!(selector.selected_option(), "Day");
        assert!(!selector.is_animating());
    }

    #[test]
    fn test_with_style_recolors_text() {
        let style = SelectorStyle::new()
            .with_selected_color(Color::new(1.0, 0.0, 0.0, 1.0))
            .with_unselected_color(Color::new(0.0, 0.0, 1.0, 1.0));
        let selector = SegmentedSelector::new(["A", "B"], "B")
            .unwrap()
            .with_style(style);

        assert_eq!(selector.text_color(1), Some(style.selected_color));
        assert_eq!(selector.text_color(0), Some(style.unselected_color));
        assert_eq!(selector.text_color(2), None);
    }
}
