//! Runtime configuration for the control loop.
//!
//! These are separate from the TOML-deserialized structs in `gazectl_config`;
//! see `conversions` for the mapping.

use std::time::Duration;

use crate::types::Gain;

/// Smoothing factors for both EMA stages.
#[derive(Debug, Clone, Copy)]
pub struct SmoothingCfg {
    /// Ratio-stage EMA factor. Range: (0.0, 1.0].
    pub ratio_alpha: f64,
    /// Pixel-stage EMA factor, independent of `ratio_alpha`. Range: (0.0, 1.0].
    pub pixel_alpha: f64,
}

impl Default for SmoothingCfg {
    fn default() -> Self {
        Self {
            ratio_alpha: 0.15,
            pixel_alpha: 0.25,
        }
    }
}

/// Gain limits and presets.
#[derive(Debug, Clone, Copy)]
pub struct GainCfg {
    /// Gains at startup.
    pub initial: Gain,
    /// Gains restored by `ResetAll`; differs from `initial` by default.
    pub reset: Gain,
    pub min: f64,
    pub max: f64,
    /// Per-press adjustment.
    pub step: f64,
}

impl Default for GainCfg {
    fn default() -> Self {
        Self {
            initial: Gain::new(2.2, 2.2),
            reset: Gain::new(2.0, 2.2),
            min: 1.0,
            max: 3.0,
            step: 0.1,
        }
    }
}

/// State-machine behaviour.
#[derive(Debug, Clone, Copy)]
pub struct ControlCfg {
    /// A toggle is accepted only if strictly more than this has elapsed since the last accepted one.
    pub toggle_cooldown: Duration,
    pub start_enabled: bool,
    /// Consecutive absent frames before a stale-source warning (0 disables).
    pub stale_after_frames: u64,
}

impl Default for ControlCfg {
    fn default() -> Self {
        Self {
            toggle_cooldown: Duration::from_millis(500),
            start_enabled: false,
            stale_after_frames: 30,
        }
    }
}
