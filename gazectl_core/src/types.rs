//! Value types flowing through the per-frame pipeline.

use crate::error::BuildError;

/// Gaze position as screen fractions, nominally in `[0, 1]` per axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ratio {
    pub x: f64,
    pub y: f64,
}

impl Ratio {
    /// Ratio pair mapped to the middle of the screen.
    pub const CENTER: Ratio = Ratio { x: 0.5, y: 0.5 };

    pub const fn new(x: f64, y: f64) -> Self {
        Ratio { x, y }
    }

    /// Build from a source pair; non-finite components make the whole sample absent.
    pub fn from_pair((x, y): (f64, f64)) -> Option<Self> {
        (x.is_finite() && y.is_finite()).then_some(Ratio { x, y })
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

/// One frame's raw estimate; absent when the estimator saw no eyes.
pub type RatioSample = Option<Ratio>;

/// Real-valued target pixel, before rounding at the pointer boundary.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pixel {
    pub x: f64,
    pub y: f64,
}

impl Pixel {
    pub const fn new(x: f64, y: f64) -> Self {
        Pixel { x, y }
    }

    /// Round to the nearest integer pixel (ties away from zero); saturates on overflow.
    pub fn rounded(&self) -> (i32, i32) {
        (self.x.round() as i32, self.y.round() as i32)
    }
}

/// Per-axis sensitivity multipliers.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Gain {
    pub x: f64,
    pub y: f64,
}

impl Gain {
    pub const fn new(x: f64, y: f64) -> Self {
        Gain { x, y }
    }
}

/// Screen size in pixels; both dimensions are at least 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScreenBounds {
    width: u32,
    height: u32,
}

impl ScreenBounds {
    pub fn new(width: u32, height: u32) -> Result<Self, BuildError> {
        if width == 0 || height == 0 {
            return Err(BuildError::InvalidBounds { width, height });
        }
        Ok(ScreenBounds { width, height })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Largest addressable x coordinate.
    pub fn max_x(&self) -> f64 {
        f64::from(self.width - 1)
    }

    /// Largest addressable y coordinate.
    pub fn max_y(&self) -> f64 {
        f64::from(self.height - 1)
    }
}

/// Whether gaze drives the pointer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ControlState {
    #[default]
    Disabled,
    Enabled,
}

impl ControlState {
    pub fn flipped(self) -> Self {
        match self {
            ControlState::Disabled => ControlState::Enabled,
            ControlState::Enabled => ControlState::Disabled,
        }
    }

    pub fn is_enabled(self) -> bool {
        self == ControlState::Enabled
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ControlState::Disabled => "off",
            ControlState::Enabled => "on",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn non_finite_pair_is_absent() {
        assert_eq!(Ratio::from_pair((f64::NAN, 0.5)), None);
        assert_eq!(Ratio::from_pair((0.5, f64::INFINITY)), None);
        assert_eq!(Ratio::from_pair((0.4, 0.6)), Some(Ratio::new(0.4, 0.6)));
    }

    #[test]
    fn rounding_is_to_nearest() {
        assert_eq!(Pixel::new(299.7, 299.2).rounded(), (300, 299));
        assert_eq!(Pixel::new(0.5, 998.5).rounded(), (1, 999));
    }

    #[test]
    fn zero_sized_screen_is_rejected() {
        assert!(ScreenBounds::new(0, 1080).is_err());
        assert!(ScreenBounds::new(1920, 0).is_err());
        let b = ScreenBounds::new(1, 1).unwrap();
        assert_eq!((b.max_x(), b.max_y()), (0.0, 0.0));
    }
}
