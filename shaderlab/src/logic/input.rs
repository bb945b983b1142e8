//! Input events as the host delivers them to a screen.
//!
//! On the command line an event is `name=value`, optionally prefixed with
//! `@frame:` to deliver it right before that frame is rendered.

use std::{fmt, str::FromStr};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ViewportSize {
    pub width: u32,
    pub height: u32,
}

impl ViewportSize {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

impl From<(u32, u32)> for ViewportSize {
    fn from((width, height): (u32, u32)) -> Self {
        Self::new(width, height)
    }
}

impl fmt::Display for ViewportSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

impl FromStr for ViewportSize {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (width, height) = s
            .trim()
            .split_once(['x', 'X'])
            .ok_or_else(|| format!("expected WxH, got [{s}]"))?;

        let parse = |v: &str| {
            v.trim()
                .parse::<u32>()
                .map_err(|e| format!("invalid size [{s}]: {e}"))
        };

        Ok(Self::new(parse(width)?, parse(height)?))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    /// Severity slider, `[0, 1]`.
    Severity(f32),
    /// Curvature slider, `[1, 10]`.
    Curvature(f32),
    /// Vignette width slider, `[1, 100]`.
    VignetteWidth(f32),
    /// Effect on/off switch.
    Enabled(bool),
    /// Selector option picked by name.
    SelectType(String),
    /// Tap on the selector track at this x coordinate.
    Tap(f32),
    /// The rendered surface was laid out again.
    Resize(ViewportSize),
}

impl FromStr for InputEvent {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (name, value) = s
            .split_once('=')
            .ok_or_else(|| format!("expected NAME=VALUE, got [{s}]"))?;
        let value = value.trim();

        let float = || {
            value
                .parse::<f32>()
                .map_err(|e| format!("invalid value for [{name}]: {e}"))
        };

        match name.trim() {
            "severity" => Ok(InputEvent::Severity(float()?)),
            "curvature" => Ok(InputEvent::Curvature(float()?)),
            "vignetteWidth" | "vignette_width" => Ok(InputEvent::VignetteWidth(float()?)),
            "tap" => Ok(InputEvent::Tap(float()?)),
            "enabled" => Ok(InputEvent::Enabled(parse_switch(value)?)),
            "type" if !value.is_empty() => Ok(InputEvent::SelectType(value.to_string())),
            "size" => Ok(InputEvent::Resize(value.parse()?)),
            other => Err(format!("unknown event [{other}={value}]")),
        }
    }
}

fn parse_switch(value: &str) -> Result<bool, String> {
    match value.to_lowercase().as_str() {
        "true" | "on" | "1" => Ok(true),
        "false" | "off" | "0" => Ok(false),
        _ => Err(format!("invalid switch value [{value}]")),
    }
}

/// An event bound to the frame before which it is delivered.
#[derive(Debug, Clone, PartialEq)]
pub struct ScriptedEvent {
    pub frame: u32,
    pub event: InputEvent,
}

impl FromStr for ScriptedEvent {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();

        let Some(rest) = s.strip_prefix('@') else {
            return Ok(Self {
                frame: 0,
                event: s.parse()?,
            });
        };

        let (frame, event) = rest
            .split_once(':')
            .ok_or_else(|| format!("expected @FRAME:NAME=VALUE, got [{s}]"))?;

        Ok(Self {
            frame: frame
                .trim()
                .parse()
                .map_err(|e| format!("invalid frame in [{s}]: {e}"))?,
            event: event.parse()?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_sliders() {
        assert_eq!("severity=0.35".parse(), Ok(InputEvent::Severity(0.35)));
        assert_eq!("curvature = 4".parse(), Ok(InputEvent::Curvature(4.0)));
        assert_eq!(
            "vignetteWidth=50".parse(),
            Ok(InputEvent::VignetteWidth(50.0))
        );
        assert_eq!(
            "vignette_width=50".parse(),
            Ok(InputEvent::VignetteWidth(50.0))
        );
    }

    #[test]
    fn test_parse_switch_and_selector() {
        assert_eq!("enabled=off".parse(), Ok(InputEvent::Enabled(false)));
        assert_eq!("enabled=TRUE".parse(), Ok(InputEvent::Enabled(true)));
        assert_eq!(
            "type=Protanomaly".parse(),
            Ok(InputEvent::SelectType("Protanomaly".into()))
        );
        assert_eq!("tap=120.5".parse(), Ok(InputEvent::Tap(120.5)));
        assert!("enabled=maybe".parse::<InputEvent>().is_err());
        assert!("type=".parse::<InputEvent>().is_err());
    }

    #[test]
    fn test_parse_size() {
        assert_eq!(
            "size=300x200".parse(),
            Ok(InputEvent::Resize(ViewportSize::new(300, 200)))
        );
        assert_eq!("0X0".parse(), Ok(ViewportSize::default()));
        assert!("300".parse::<ViewportSize>().is_err());
        assert!("ax3".parse::<ViewportSize>().is_err());
        assert_eq!(ViewportSize::new(4, 5).to_string(), "4x5");
    }

    #[test]
    fn test_parse_scripted() {
        assert_eq!(
            "@12:severity=1".parse(),
            Ok(ScriptedEvent {
                frame: 12,
                event: InputEvent::Severity(1.0)
            })
        );
        assert_eq!("severity=1".parse::<ScriptedEvent>().map(|e| e.frame), Ok(0));
        assert!("@x:severity=1".parse::<ScriptedEvent>().is_err());
        assert!("@3severity=1".parse::<ScriptedEvent>().is_err());
        assert!("brightness=1".parse::<ScriptedEvent>().is_err());
    }
}
