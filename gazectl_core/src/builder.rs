//! Type-state builder for `ControlLoop`.
//!
//! `build()` only exists once a pointer has been supplied; `try_build()` is
//! always available and reports a missing pointer as a typed `BuildError`.
//! Screen bounds are queried from the pointer exactly once, here.

use std::marker::PhantomData;
use std::sync::Arc;

use gazectl_traits::{Clock, MonotonicClock, PointerPort};

use crate::config::{ControlCfg, GainCfg, SmoothingCfg};
use crate::core::ControlLoop;
use crate::error::{BuildError, Result};
use crate::mapper::GazeMapper;
use crate::smoothing::{PixelSmoother, RatioSmoother};
use crate::types::{ControlState, Gain, Ratio, ScreenBounds};

// ── Type-state markers ───────────────────────────────────────────────────────

pub struct Missing;
pub struct Set;

/// Builder for `ControlLoop`. All fields are validated on `build()`.
pub struct ControlLoopBuilder<P, S> {
    pointer: Option<P>,
    smoothing: Option<SmoothingCfg>,
    gain: Option<GainCfg>,
    center: Option<Ratio>,
    control: Option<ControlCfg>,
    clock: Option<Arc<dyn Clock + Send + Sync>>,
    _s: PhantomData<S>,
}

impl<P: PointerPort> Default for ControlLoopBuilder<P, Missing> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P: PointerPort> ControlLoopBuilder<P, Missing> {
    pub fn new() -> Self {
        Self {
            pointer: None,
            smoothing: None,
            gain: None,
            center: None,
            control: None,
            clock: None,
            _s: PhantomData,
        }
    }

    pub fn with_pointer(self, pointer: P) -> ControlLoopBuilder<P, Set> {
        ControlLoopBuilder {
            pointer: Some(pointer),
            smoothing: self.smoothing,
            gain: self.gain,
            center: self.center,
            control: self.control,
            clock: self.clock,
            _s: PhantomData,
        }
    }
}

impl<P: PointerPort, S> ControlLoopBuilder<P, S> {
    pub fn with_smoothing(mut self, smoothing: SmoothingCfg) -> Self {
        self.smoothing = Some(smoothing);
        self
    }

    pub fn with_gain(mut self, gain: GainCfg) -> Self {
        self.gain = Some(gain);
        self
    }

    /// Calibration center used at startup and restored by `ResetAll`.
    pub fn with_center(mut self, center: Ratio) -> Self {
        self.center = Some(center);
        self
    }

    pub fn with_control(mut self, control: ControlCfg) -> Self {
        self.control = Some(control);
        self
    }

    pub fn with_clock<C: Clock + Send + Sync + 'static>(mut self, clock: C) -> Self {
        self.clock = Some(Arc::new(clock));
        self
    }

    /// Configure everything from a validated TOML config.
    pub fn with_config(self, cfg: &gazectl_config::Config) -> Self {
        self.with_smoothing((&cfg.smoothing).into())
            .with_gain((&cfg.gain).into())
            .with_center((&cfg.calibration).into())
            .with_control((&cfg.control).into())
    }

    pub fn try_build(self) -> Result<ControlLoop<P>> {
        let pointer = self
            .pointer
            .ok_or_else(|| eyre::Report::new(BuildError::MissingPointer))?;
        let smoothing = self.smoothing.unwrap_or_default();
        let gain = self.gain.unwrap_or_default();
        let center = self.center.unwrap_or(Ratio::CENTER);
        let control = self.control.unwrap_or_default();

        validate(&smoothing, &gain, center).map_err(eyre::Report::new)?;

        let (width, height) = pointer.screen_bounds();
        let bounds = ScreenBounds::new(width, height).map_err(eyre::Report::new)?;

        let state = if control.start_enabled {
            ControlState::Enabled
        } else {
            ControlState::Disabled
        };
        tracing::debug!(width, height, state = state.as_str(), "control loop built");

        Ok(ControlLoop {
            pointer,
            clock: self.clock.unwrap_or_else(|| Arc::new(MonotonicClock::new())),
            bounds,
            ratio: RatioSmoother::new(smoothing.ratio_alpha),
            pixel: PixelSmoother::new(smoothing.pixel_alpha),
            mapper: GazeMapper::new(center, gain.initial),
            gain_cfg: gain,
            control,
            reset_center: center,
            state,
            last_toggle: None,
            terminated: false,
            last_raw: None,
            last_cursor: None,
            frames: 0,
            moves: 0,
            missing_total: 0,
            missing_streak: 0,
            source_errors: 0,
            source_stale: false,
        })
    }
}

impl<P: PointerPort> ControlLoopBuilder<P, Set> {
    pub fn build(self) -> Result<ControlLoop<P>> {
        self.try_build()
    }
}

fn validate(
    smoothing: &SmoothingCfg,
    gain: &GainCfg,
    center: Ratio,
) -> std::result::Result<(), BuildError> {
    let unit = |a: f64| a > 0.0 && a <= 1.0;
    if !unit(smoothing.ratio_alpha) {
        return Err(BuildError::InvalidConfig("ratio_alpha must be in (0, 1]"));
    }
    if !unit(smoothing.pixel_alpha) {
        return Err(BuildError::InvalidConfig("pixel_alpha must be in (0, 1]"));
    }
    if !(gain.min.is_finite() && gain.max.is_finite() && gain.min > 0.0 && gain.min <= gain.max) {
        return Err(BuildError::InvalidConfig("gain range must satisfy 0 < min <= max"));
    }
    let within = |g: Gain| (gain.min..=gain.max).contains(&g.x) && (gain.min..=gain.max).contains(&g.y);
    if !within(gain.initial) {
        return Err(BuildError::InvalidConfig("initial gain outside [min, max]"));
    }
    if !within(gain.reset) {
        return Err(BuildError::InvalidConfig("reset gain outside [min, max]"));
    }
    if !(gain.step.is_finite() && gain.step > 0.0) {
        return Err(BuildError::InvalidConfig("gain step must be > 0"));
    }
    if !center.is_finite() {
        return Err(BuildError::InvalidConfig("calibration center must be finite"));
    }
    Ok(())
}
