use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use crossbeam_channel::{Receiver, TryRecvError};
use gazectl_traits::{Clock, GazeSource, PointerPort};

use crate::command::Command;
use crate::core::ControlLoop;
use crate::error::Result;
use crate::sampler::{GazeSampler, NextFrame};
use crate::status::FrameReport;
use crate::types::{ControlState, Ratio};

/// Frames the threaded sampler may buffer ahead of the loop.
const SAMPLER_BUFFER: usize = 8;

/// How frames are acquired.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SamplingMode {
    /// Acquire inside the loop, paced by the loop's clock.
    #[default]
    Direct,
    /// Acquire on a background thread; the loop consumes frames in order.
    Threaded,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunParams {
    pub mode: SamplingMode,
    pub frame_rate_hz: u32,
    /// Threaded mode only: waiting longer than this counts as an absent frame.
    pub sample_timeout: Duration,
    /// Stop after this many frames (None = unbounded).
    pub max_frames: Option<u64>,
}

impl Default for RunParams {
    fn default() -> Self {
        Self {
            mode: SamplingMode::Direct,
            frame_rate_hz: 30,
            sample_timeout: Duration::from_millis(100),
            max_frames: None,
        }
    }
}

/// Why a run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitReason {
    Quit,
    SourceExhausted,
    Shutdown,
    FrameLimit,
}

impl ExitReason {
    pub fn as_str(self) -> &'static str {
        match self {
            ExitReason::Quit => "quit",
            ExitReason::SourceExhausted => "source_exhausted",
            ExitReason::Shutdown => "shutdown",
            ExitReason::FrameLimit => "frame_limit",
        }
    }
}

/// Totals at the end of a run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RunSummary {
    pub frames: u64,
    pub moves: u64,
    pub missing: u64,
    pub exit: ExitReason,
    pub final_state: ControlState,
    pub last_cursor: Option<(i32, i32)>,
}

impl RunSummary {
    fn of<P: PointerPort>(ctl: &ControlLoop<P>, exit: ExitReason) -> Self {
        Self {
            frames: ctl.frames(),
            moves: ctl.moves(),
            missing: ctl.missing_frames().0,
            exit,
            final_state: ctl.state(),
            last_cursor: ctl.last_cursor(),
        }
    }
}

/// Drive `ctl` until a quit command, source exhaustion, `shutdown`, or the
/// frame limit. At most one pending command is applied per frame.
///
/// `on_frame` sees every frame's report, in order.
pub fn run<P, G, F>(
    ctl: &mut ControlLoop<P>,
    source: G,
    commands: &Receiver<Command>,
    params: &RunParams,
    shutdown: &AtomicBool,
    on_frame: F,
) -> Result<RunSummary>
where
    P: PointerPort,
    G: GazeSource + Send + 'static,
    F: FnMut(&FrameReport),
{
    match params.mode {
        SamplingMode::Direct => {
            let mut source = source;
            run_direct(ctl, &mut source, commands, params, shutdown, on_frame)
        }
        SamplingMode::Threaded => run_threaded(ctl, source, commands, params, shutdown, on_frame),
    }
}

/// Acquire and process on the caller's thread.
pub fn run_direct<P, G, F>(
    ctl: &mut ControlLoop<P>,
    source: &mut G,
    commands: &Receiver<Command>,
    params: &RunParams,
    shutdown: &AtomicBool,
    mut on_frame: F,
) -> Result<RunSummary>
where
    P: PointerPort,
    G: GazeSource + ?Sized,
    F: FnMut(&FrameReport),
{
    let period = crate::util::frame_period(params.frame_rate_hz);
    let clock = Arc::clone(ctl.clock());
    let start_frames = ctl.frames();
    tracing::info!(hz = params.frame_rate_hz, mode = "direct", "control loop started");

    let exit = loop {
        if let Some(exit) = stop_requested(ctl.frames() - start_frames, params, shutdown) {
            break exit;
        }
        if source.is_exhausted() {
            break ExitReason::SourceExhausted;
        }
        let frame_start = clock.now();
        let report = ctl.step(source, next_command(commands))?;
        on_frame(&report);
        if report.terminated {
            break ExitReason::Quit;
        }
        let spent = clock.now().saturating_duration_since(frame_start);
        clock.sleep(period.saturating_sub(spent));
    };

    let summary = RunSummary::of(ctl, exit);
    tracing::info!(exit = exit.as_str(), frames = summary.frames, moves = summary.moves, "control loop stopped");
    Ok(summary)
}

/// Acquire on a [`GazeSampler`] thread and process frames here, in order.
pub fn run_threaded<P, G, F>(
    ctl: &mut ControlLoop<P>,
    source: G,
    commands: &Receiver<Command>,
    params: &RunParams,
    shutdown: &AtomicBool,
    mut on_frame: F,
) -> Result<RunSummary>
where
    P: PointerPort,
    G: GazeSource + Send + 'static,
    F: FnMut(&FrameReport),
{
    let sampler = GazeSampler::spawn(
        source,
        params.frame_rate_hz,
        SAMPLER_BUFFER,
        Arc::clone(ctl.clock()),
    );
    let start_frames = ctl.frames();
    tracing::info!(hz = params.frame_rate_hz, mode = "threaded", "control loop started");

    let exit = loop {
        if let Some(exit) = stop_requested(ctl.frames() - start_frames, params, shutdown) {
            break exit;
        }
        let sample = match sampler.next_frame(params.sample_timeout) {
            NextFrame::Sample(pair) => pair.and_then(Ratio::from_pair),
            NextFrame::TimedOut => {
                tracing::debug!(
                    stalled_ms = sampler.stalled_for_now(),
                    "no frame within sample timeout"
                );
                None
            }
            NextFrame::Finished => break ExitReason::SourceExhausted,
        };
        let report = ctl.tick(sample, next_command(commands))?;
        on_frame(&report);
        if report.terminated {
            break ExitReason::Quit;
        }
    };
    drop(sampler);

    let summary = RunSummary::of(ctl, exit);
    tracing::info!(exit = exit.as_str(), frames = summary.frames, moves = summary.moves, "control loop stopped");
    Ok(summary)
}

/// Feed pre-recorded frames through `ctl` without pacing.
///
/// Ends at the first quit command or when `frames` runs out.
pub fn replay<P, I, F>(ctl: &mut ControlLoop<P>, frames: I, mut on_frame: F) -> Result<RunSummary>
where
    P: PointerPort,
    I: IntoIterator<Item = (Option<Ratio>, Option<Command>)>,
    F: FnMut(&FrameReport),
{
    for (sample, command) in frames {
        let report = ctl.tick(sample, command)?;
        on_frame(&report);
        if report.terminated {
            return Ok(RunSummary::of(ctl, ExitReason::Quit));
        }
    }
    Ok(RunSummary::of(ctl, ExitReason::SourceExhausted))
}

fn stop_requested(done: u64, params: &RunParams, shutdown: &AtomicBool) -> Option<ExitReason> {
    if shutdown.load(Ordering::Relaxed) {
        return Some(ExitReason::Shutdown);
    }
    match params.max_frames {
        Some(limit) if done >= limit => Some(ExitReason::FrameLimit),
        _ => None,
    }
}

fn next_command(commands: &Receiver<Command>) -> Option<Command> {
    match commands.try_recv() {
        Ok(c) => Some(c),
        Err(TryRecvError::Empty | TryRecvError::Disconnected) => None,
    }
}
