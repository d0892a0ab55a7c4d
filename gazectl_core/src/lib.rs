#![cfg_attr(all(not(debug_assertions), not(test)), deny(warnings))]
#![cfg_attr(
    all(not(debug_assertions), not(test)),
    deny(clippy::all, clippy::pedantic, clippy::nursery)
)]
#![allow(clippy::module_name_repetitions, clippy::missing_errors_doc)]
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
//! Gaze-to-cursor control logic (hardware-agnostic).
//!
//! Turns a stream of normalized gaze ratios into pointer positions. All I/O
//! goes through `gazectl_traits::GazeSource` and `gazectl_traits::PointerPort`.
//!
//! ## Pipeline
//!
//! Per frame, while control is enabled and a sample is present:
//!
//! 1. **Ratio smoothing**: EMA over the raw pair (`smoothing`)
//! 2. **Mapping**: calibration center + gain, clamped, x mirrored (`mapper`)
//! 3. **Pixel smoothing**: second EMA over the target pixel
//! 4. **Move**: round to integers and hand to the pointer
//!
//! Absent samples skip the pipeline entirely and leave the pointer where it is.
//! Keyboard commands (`command`) are applied after the pipeline, at most one
//! per frame; `runner` drives the loop directly or from a sampler thread.

pub mod builder;
pub mod command;
pub mod config;
mod conversions;
pub mod core;
pub mod error;
pub mod mapper;
pub mod mocks;
pub mod port_error;
pub mod runner;
pub mod sampler;
pub mod smoothing;
pub mod status;
pub mod types;
pub mod util;

pub use crate::builder::{ControlLoopBuilder, Missing, Set};
pub use crate::command::Command;
pub use crate::config::{ControlCfg, GainCfg, SmoothingCfg};
pub use crate::core::ControlLoop;
pub use crate::error::{BuildError, GazeError, Report, Result};
pub use crate::mapper::{GazeMapper, map_ratio};
pub use crate::runner::{ExitReason, RunParams, RunSummary, SamplingMode, replay, run};
pub use crate::status::{CommandEffect, FrameReport};
pub use crate::types::{ControlState, Gain, Pixel, Ratio, RatioSample, ScreenBounds};
