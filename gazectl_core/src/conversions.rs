//! `From` implementations bridging `gazectl_config` types to `gazectl_core` types.

use std::time::Duration;

use crate::config::{ControlCfg, GainCfg, SmoothingCfg};
use crate::runner::{RunParams, SamplingMode};
use crate::types::{Gain, Ratio};

// ── SmoothingCfg ─────────────────────────────────────────────────────────────

impl From<&gazectl_config::SmoothingCfg> for SmoothingCfg {
    fn from(c: &gazectl_config::SmoothingCfg) -> Self {
        Self {
            ratio_alpha: c.ratio_alpha,
            pixel_alpha: c.pixel_alpha,
        }
    }
}

// ── GainCfg ──────────────────────────────────────────────────────────────────

impl From<&gazectl_config::GainCfg> for GainCfg {
    fn from(c: &gazectl_config::GainCfg) -> Self {
        Self {
            initial: Gain::new(c.initial_x, c.initial_y),
            reset: Gain::new(c.reset_x, c.reset_y),
            min: c.min,
            max: c.max,
            step: c.step,
        }
    }
}

// ── Calibration center ───────────────────────────────────────────────────────

impl From<&gazectl_config::CalibrationCfg> for Ratio {
    fn from(c: &gazectl_config::CalibrationCfg) -> Self {
        Ratio::new(c.center_rx, c.center_ry)
    }
}

// ── ControlCfg ───────────────────────────────────────────────────────────────

impl From<&gazectl_config::ControlCfg> for ControlCfg {
    fn from(c: &gazectl_config::ControlCfg) -> Self {
        Self {
            toggle_cooldown: Duration::from_millis(c.toggle_cooldown_ms),
            start_enabled: c.start_enabled,
            stale_after_frames: c.stale_after_frames,
        }
    }
}

// ── RunParams ────────────────────────────────────────────────────────────────

impl From<&gazectl_config::RunnerCfg> for RunParams {
    fn from(c: &gazectl_config::RunnerCfg) -> Self {
        Self {
            mode: match c.mode {
                gazectl_config::RunMode::Direct => SamplingMode::Direct,
                gazectl_config::RunMode::Threaded => SamplingMode::Threaded,
            },
            frame_rate_hz: c.frame_rate_hz,
            sample_timeout: Duration::from_millis(c.sample_timeout_ms),
            max_frames: None,
        }
    }
}
