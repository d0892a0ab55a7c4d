//! Calibration center + sensitivity gain: ratio space to screen pixels.

use crate::types::{Gain, Pixel, Ratio, ScreenBounds};

/// Map a smoothed ratio onto the screen.
///
/// Per axis: `adj = clamp(0.5 + gain * (ratio - center), 0, 1)`.
/// x is inverted (`(1 - adj) * (width - 1)`) because the camera image is
/// mirrored; y maps straight through (`adj * (height - 1)`).
pub fn map_ratio(ratio: Ratio, center: Ratio, gain: Gain, bounds: ScreenBounds) -> Pixel {
    let adj_x = (0.5 + gain.x * (ratio.x - center.x)).clamp(0.0, 1.0);
    let adj_y = (0.5 + gain.y * (ratio.y - center.y)).clamp(0.0, 1.0);
    Pixel::new((1.0 - adj_x) * bounds.max_x(), adj_y * bounds.max_y())
}

/// Holds the live calibration center and gains.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GazeMapper {
    center: Ratio,
    gain: Gain,
}

impl GazeMapper {
    pub fn new(center: Ratio, gain: Gain) -> Self {
        GazeMapper { center, gain }
    }

    /// `None` until the ratio stage has an estimate.
    pub fn map(&self, ratio: Option<Ratio>, bounds: ScreenBounds) -> Option<Pixel> {
        ratio.map(|r| map_ratio(r, self.center, self.gain, bounds))
    }

    pub fn center(&self) -> Ratio {
        self.center
    }

    pub fn gain(&self) -> Gain {
        self.gain
    }

    pub fn set_center(&mut self, center: Ratio) {
        self.center = center;
    }

    pub fn set_gain(&mut self, gain: Gain) {
        self.gain = gain;
    }
}
