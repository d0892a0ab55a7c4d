//! The per-frame gaze control loop (`ControlLoop`).
//!
//! Owns every piece of mutable state: both smoothers, the calibration center,
//! the gains, the enabled flag and the toggle debounce timestamp. One call to
//! [`ControlLoop::tick`] is one frame: run the pipeline when enabled, then
//! apply at most one command.

use std::sync::Arc;
use std::time::Instant;

use eyre::WrapErr;
use gazectl_traits::{Clock, GazeSource, PointerPort};

use crate::builder::{ControlLoopBuilder, Missing};
use crate::command::Command;
use crate::config::{ControlCfg, GainCfg};
use crate::error::Result;
use crate::mapper::GazeMapper;
use crate::port_error::{map_pointer_error, map_source_error};
use crate::smoothing::{PixelSmoother, RatioSmoother};
use crate::status::{CommandEffect, FrameReport};
use crate::types::{ControlState, Gain, Pixel, Ratio, ScreenBounds};

pub struct ControlLoop<P: PointerPort> {
    pub(crate) pointer: P,
    pub(crate) clock: Arc<dyn Clock + Send + Sync>,
    pub(crate) bounds: ScreenBounds,
    pub(crate) ratio: RatioSmoother,
    pub(crate) pixel: PixelSmoother,
    pub(crate) mapper: GazeMapper,
    pub(crate) gain_cfg: GainCfg,
    pub(crate) control: ControlCfg,
    pub(crate) reset_center: Ratio,

    pub(crate) state: ControlState,
    pub(crate) last_toggle: Option<Instant>,
    pub(crate) terminated: bool,
    // Raw sample of the current frame; SetCenter reads it.
    pub(crate) last_raw: Option<Ratio>,
    pub(crate) last_cursor: Option<(i32, i32)>,

    pub(crate) frames: u64,
    pub(crate) moves: u64,
    pub(crate) missing_total: u64,
    pub(crate) missing_streak: u64,
    pub(crate) source_errors: u64,
    pub(crate) source_stale: bool,
}

impl<P: PointerPort> core::fmt::Debug for ControlLoop<P> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ControlLoop")
            .field("state", &self.state)
            .field("center", &self.mapper.center())
            .field("gain", &self.mapper.gain())
            .field("bounds", &self.bounds)
            .field("terminated", &self.terminated)
            .finish()
    }
}

impl<P: PointerPort> ControlLoop<P> {
    /// Start building a loop; the pointer type is fixed by `with_pointer`.
    pub fn builder() -> ControlLoopBuilder<P, Missing> {
        ControlLoopBuilder::new()
    }

    /// Run one frame with an already-acquired sample.
    ///
    /// Absent samples never move the pointer and never touch smoothing state.
    /// Only a failing pointer makes this return `Err`.
    pub fn tick(&mut self, sample: Option<Ratio>, command: Option<Command>) -> Result<FrameReport> {
        if self.terminated {
            return Ok(FrameReport::terminated(self.state));
        }
        let sample = sample.filter(Ratio::is_finite);
        self.frames += 1;
        self.last_raw = sample;
        self.track_presence(sample.is_some());

        let moved_to = if self.state.is_enabled() {
            self.drive_pointer(sample)?
        } else {
            None
        };

        let effect = command.map(|c| self.apply(c));
        tracing::trace!(
            frame = self.frames,
            state = self.state.as_str(),
            ?moved_to,
            "frame"
        );
        Ok(FrameReport {
            moved_to,
            state: self.state,
            command,
            effect,
            terminated: self.terminated,
        })
    }

    /// Acquire one sample from `source`, then [`tick`](Self::tick).
    ///
    /// Acquisition errors are logged and treated as an absent sample.
    pub fn step<G: GazeSource + ?Sized>(
        &mut self,
        source: &mut G,
        command: Option<Command>,
    ) -> Result<FrameReport> {
        if self.terminated {
            return Ok(FrameReport::terminated(self.state));
        }
        let sample = match source.sample() {
            Ok(pair) => pair.and_then(Ratio::from_pair),
            Err(e) => {
                self.source_errors += 1;
                let err = map_source_error(&*e);
                tracing::warn!(error = %err, "gaze acquisition failed; treating frame as absent");
                None
            }
        };
        self.tick(sample, command)
    }

    /// Apply a single command outside of a frame.
    pub fn apply(&mut self, command: Command) -> CommandEffect {
        let effect = match command {
            Command::Toggle => self.toggle(),
            Command::DecreaseGainY => self.adjust_gain(0.0, -self.gain_cfg.step),
            Command::IncreaseGainY => self.adjust_gain(0.0, self.gain_cfg.step),
            Command::DecreaseGainX => self.adjust_gain(-self.gain_cfg.step, 0.0),
            Command::IncreaseGainX => self.adjust_gain(self.gain_cfg.step, 0.0),
            Command::SetCenter => match self.last_raw {
                Some(raw) => {
                    self.mapper.set_center(raw);
                    self.pixel.reset();
                    CommandEffect::CenterSet(raw)
                }
                None => CommandEffect::CenterSkipped,
            },
            Command::ResetAll => {
                self.mapper.set_center(self.reset_center);
                self.mapper.set_gain(self.gain_cfg.reset);
                self.pixel.reset();
                CommandEffect::Reset
            }
            Command::Quit => {
                self.terminated = true;
                tracing::info!(frames = self.frames, "quit requested");
                CommandEffect::Quit
            }
        };
        tracing::debug!(command = command.as_str(), ?effect, "command applied");
        effect
    }

    fn toggle(&mut self) -> CommandEffect {
        let now = self.clock.now();
        let cooled = self
            .last_toggle
            .is_none_or(|t| now.saturating_duration_since(t) > self.control.toggle_cooldown);
        if !cooled {
            return CommandEffect::ToggleDebounced;
        }
        self.state = self.state.flipped();
        self.last_toggle = Some(now);
        tracing::info!(state = self.state.as_str(), "cursor control toggled");
        CommandEffect::Toggled(self.state)
    }

    fn adjust_gain(&mut self, dx: f64, dy: f64) -> CommandEffect {
        let (lo, hi) = (self.gain_cfg.min, self.gain_cfg.max);
        let g = self.mapper.gain();
        let next = Gain::new((g.x + dx).clamp(lo, hi), (g.y + dy).clamp(lo, hi));
        self.mapper.set_gain(next);
        CommandEffect::GainChanged(next)
    }

    fn drive_pointer(&mut self, sample: Option<Ratio>) -> Result<Option<(i32, i32)>> {
        if sample.is_none() {
            return Ok(None);
        }
        let smoothed = self.ratio.update(sample);
        let target = self.mapper.map(smoothed, self.bounds);
        let Some(px) = self.pixel.update(target) else {
            return Ok(None);
        };
        let (x, y) = px.rounded();
        self.pointer
            .move_to(x, y)
            .map_err(|e| eyre::Report::new(map_pointer_error(&*e)))
            .wrap_err("moving pointer")?;
        self.moves += 1;
        self.last_cursor = Some((x, y));
        Ok(Some((x, y)))
    }

    fn track_presence(&mut self, present: bool) {
        if present {
            if self.source_stale {
                tracing::info!(
                    silent_frames = self.missing_streak,
                    "gaze source recovered"
                );
                self.source_stale = false;
            }
            self.missing_streak = 0;
            return;
        }
        self.missing_total += 1;
        self.missing_streak += 1;
        let limit = self.control.stale_after_frames;
        if limit > 0 && self.missing_streak == limit {
            self.source_stale = true;
            tracing::warn!(frames = limit, "no gaze sample for a while; pointer held");
        }
    }

    // ── Accessors ────────────────────────────────────────────────────────────

    pub fn state(&self) -> ControlState {
        self.state
    }

    pub fn is_terminated(&self) -> bool {
        self.terminated
    }

    pub fn center(&self) -> Ratio {
        self.mapper.center()
    }

    pub fn gain(&self) -> Gain {
        self.mapper.gain()
    }

    pub fn bounds(&self) -> ScreenBounds {
        self.bounds
    }

    /// Current ratio-stage estimate.
    pub fn smoothed_ratio(&self) -> Option<Ratio> {
        self.ratio.state()
    }

    /// Current pixel-stage estimate.
    pub fn pixel_state(&self) -> Option<Pixel> {
        self.pixel.state()
    }

    /// Last integer position sent to the pointer.
    pub fn last_cursor(&self) -> Option<(i32, i32)> {
        self.last_cursor
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn moves(&self) -> u64 {
        self.moves
    }

    /// Frames without a usable sample, in total and in the current run of misses.
    pub fn missing_frames(&self) -> (u64, u64) {
        (self.missing_total, self.missing_streak)
    }

    pub fn source_errors(&self) -> u64 {
        self.source_errors
    }

    pub fn is_source_stale(&self) -> bool {
        self.source_stale
    }

    pub fn clock(&self) -> &Arc<dyn Clock + Send + Sync> {
        &self.clock
    }

    pub fn pointer(&self) -> &P {
        &self.pointer
    }

    /// Direct access for click bindings that bypass the frame loop.
    pub fn pointer_mut(&mut self) -> &mut P {
        &mut self.pointer
    }
}
