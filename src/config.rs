//! Turns the raw string fields of a command line into the single
//! validated `RenderConfig` the engine runs from.  Validation happens
//! exactly once, here; the renderers assume every config they are
//! handed is sound and never re-check it.

use num::Complex;
use std::str::FromStr;

use errors::RenderError;

/// The shape of the run's output: one still image, or a directory of
/// animation frames.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum RenderMode {
    /// A single still of the zoom-zero viewport.
    Image,
    /// A zoom animation, one frame per task.
    Video(Animation),
}

/// The video-only settings.  Keeping them inside `RenderMode::Video`
/// means a still run cannot carry half-filled animation fields.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Animation {
    /// Animation length in seconds.
    pub seconds: u32,
    /// Frames rendered per second of animation.
    pub framerate: u32,
    /// Zoom speed: the viewport halves once every `zoom_factor`
    /// seconds of animation.
    pub zoom_factor: f64,
}

/// The one immutable record every component reads from.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct RenderConfig {
    /// Escape-time iteration budget per sample point.
    pub iterations: u32,
    /// Output width in pixels.
    pub width: u32,
    /// Output height in pixels.
    pub height: u32,
    /// The complex point the viewport is centered on.
    pub focus: Complex<f64>,
    /// Still or animation.
    pub mode: RenderMode,
}

impl RenderConfig {
    /// Builds a validated config.  `iterations`, `width` and `height`
    /// must pass the halving test below; everything else is accepted
    /// as parsed.
    pub fn new(
        iterations: u32,
        width: u32,
        height: u32,
        focus: Complex<f64>,
        mode: RenderMode,
    ) -> Result<RenderConfig, RenderError> {
        if !power_of_two(iterations) {
            return Err(RenderError::ConfigValue {
                field: "iterations",
                value: iterations,
            });
        }
        if !power_of_two(width) {
            return Err(RenderError::ConfigValue {
                field: "size x",
                value: width,
            });
        }
        if !power_of_two(height) {
            return Err(RenderError::ConfigValue {
                field: "size y",
                value: height,
            });
        }
        Ok(RenderConfig {
            iterations,
            width,
            height,
            focus,
            mode,
        })
    }
}

/// The power-of-two test the numeric fields must pass: halve until the
/// value reaches 2 or below, rejecting any odd step along the way.
/// 0, 1 and 2 all survive; dimensions that small are caught later by
/// the coordinate mapper's degenerate-dimension check.
pub fn power_of_two(mut value: u32) -> bool {
    while value > 2 {
        if value % 2 != 0 {
            return false;
        }
        value /= 2;
    }
    true
}

fn parse_pair<T>(s: &str, separator: char) -> Option<(T, T)>
where
    T: FromStr,
{
    match s.find(separator) {
        None => None,
        Some(index) => match (T::from_str(&s[..index]), T::from_str(&s[index + 1..])) {
            (Ok(l), Ok(r)) => Some((l, r)),
            _ => None,
        },
    }
}

/// Parses an unsigned count field such as `iterations`, `seconds` or
/// `framerate`.
pub fn parse_count(field: &'static str, s: &str) -> Result<u32, RenderError> {
    u32::from_str(s).map_err(|_| RenderError::ConfigType {
        field,
        expected: "an integer",
    })
}

/// Parses a float field such as the zoom factor.
pub fn parse_float(field: &'static str, s: &str) -> Result<f64, RenderError> {
    f64::from_str(s).map_err(|_| RenderError::ConfigType {
        field,
        expected: "a float",
    })
}

/// Parses the `WIDTHxHEIGHT` size argument.
pub fn parse_dimensions(s: &str) -> Result<(u32, u32), RenderError> {
    parse_pair(s, 'x').ok_or(RenderError::ConfigType {
        field: "size",
        expected: "a pair of integers such as 512x512",
    })
}

/// Parses the `RE,IM` focus argument.
pub fn parse_focus(s: &str) -> Result<Complex<f64>, RenderError> {
    match parse_pair(s, ',') {
        Some((re, im)) => Ok(Complex { re, im }),
        None => Err(RenderError::ConfigType {
            field: "focus",
            expected: "a pair of floats such as -0.74,0.11",
        }),
    }
}
