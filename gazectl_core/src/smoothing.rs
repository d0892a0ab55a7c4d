//! Two-stage exponential smoothing.
//!
//! `RatioSmoother` damps the raw estimator output; `PixelSmoother` damps the
//! mapped target so gain changes and clamping do not show up as jumps.
//! Both seed from the first value they see (no blending with zero).

use crate::types::{Pixel, Ratio};

#[inline]
fn ema(alpha: f64, new: f64, prev: f64) -> f64 {
    alpha * new + (1.0 - alpha) * prev
}

/// EMA over the raw ratio pair.
#[derive(Debug, Clone)]
pub struct RatioSmoother {
    alpha: f64,
    state: Option<Ratio>,
}

impl RatioSmoother {
    pub fn new(alpha: f64) -> Self {
        RatioSmoother { alpha, state: None }
    }

    /// Fold one sample into the estimate and return it.
    ///
    /// An absent sample is a pass-through: the stored estimate (or lack of one)
    /// is returned untouched, never decayed.
    pub fn update(&mut self, sample: Option<Ratio>) -> Option<Ratio> {
        let Some(s) = sample else {
            return self.state;
        };
        let next = match self.state {
            None => s,
            Some(prev) => Ratio::new(ema(self.alpha, s.x, prev.x), ema(self.alpha, s.y, prev.y)),
        };
        self.state = Some(next);
        self.state
    }

    pub fn state(&self) -> Option<Ratio> {
        self.state
    }
}

/// EMA over mapped target pixels.
#[derive(Debug, Clone)]
pub struct PixelSmoother {
    beta: f64,
    state: Option<Pixel>,
}

impl PixelSmoother {
    pub fn new(beta: f64) -> Self {
        PixelSmoother { beta, state: None }
    }

    /// `None` in, `None` out, state untouched.
    pub fn update(&mut self, target: Option<Pixel>) -> Option<Pixel> {
        let t = target?;
        let next = match self.state {
            None => t,
            Some(prev) => Pixel::new(ema(self.beta, t.x, prev.x), ema(self.beta, t.y, prev.y)),
        };
        self.state = Some(next);
        self.state
    }

    /// Forget the previous target; the next update seeds from its input.
    pub fn reset(&mut self) {
        self.state = None;
    }

    pub fn state(&self) -> Option<Pixel> {
        self.state
    }
}
