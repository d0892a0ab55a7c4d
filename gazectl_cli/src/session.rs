//! Subcommand bodies: config loading, pointer/source assembly, run and replay.

use std::io::BufRead;
use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::AtomicBool;

use crossbeam_channel::Sender;
use eyre::WrapErr;
use gazectl_config::Config;
use gazectl_core::error::{GazeError, Result as CoreResult};
use gazectl_core::{
    Command, ControlCfg, ControlLoop, FrameReport, Ratio, RunParams, RunSummary, SamplingMode,
};
use gazectl_traits::{GazeSource, ManualClock, PointerPort};

fn config_err(msg: String) -> eyre::Report {
    eyre::Report::new(GazeError::Config(msg))
}

/// Read, parse and validate the config; defaults when no path is given.
pub fn load_config(path: Option<&Path>) -> CoreResult<Config> {
    let Some(path) = path else {
        return Ok(Config::default());
    };
    let text = std::fs::read_to_string(path)
        .map_err(|e| config_err(format!("read {}: {e}", path.display())))?;
    let cfg = gazectl_config::load_toml(&text)
        .map_err(|e| config_err(format!("parse {}: {e}", path.display())))?;
    cfg.validate().map_err(|e| config_err(format!("{e:#}")))?;
    Ok(cfg)
}

/// The live pointer: uinput with the `hardware` feature on Linux, simulated otherwise.
pub fn open_pointer(cfg: &Config) -> CoreResult<Box<dyn PointerPort>> {
    #[cfg(all(feature = "hardware", target_os = "linux"))]
    {
        let p = gazectl_hardware::uinput::UinputPointer::new(cfg.screen.width, cfg.screen.height)
            .map_err(|e| eyre::Report::new(gazectl_core::port_error::map_pointer_error(&e)))
            .wrap_err("open uinput pointer")?;
        tracing::info!(width = cfg.screen.width, height = cfg.screen.height, "uinput pointer ready");
        Ok(Box::new(p))
    }
    #[cfg(not(all(feature = "hardware", target_os = "linux")))]
    {
        tracing::info!(
            width = cfg.screen.width,
            height = cfg.screen.height,
            "using simulated pointer"
        );
        Ok(Box::new(gazectl_hardware::SimulatedPointer::new(
            cfg.screen.width,
            cfg.screen.height,
        )))
    }
}

fn load_frames(trace: &Path) -> CoreResult<Vec<(Option<Ratio>, Option<Command>)>> {
    let rows = gazectl_config::load_trace_csv(trace)
        .wrap_err_with(|| format!("load trace {}", trace.display()))?;
    Ok(rows
        .into_iter()
        .enumerate()
        .map(|(idx, row)| {
            let command = row.key.as_deref().and_then(|k| {
                let c = Command::from_key_name(k);
                if c.is_none() {
                    tracing::warn!(row = idx + 2, key = k, "unbound key in trace; ignored");
                }
                c
            });
            (row.sample.and_then(Ratio::from_pair), command)
        })
        .collect())
}

/// Forward key names typed on stdin, one per line, until EOF.
fn spawn_key_reader(tx: Sender<Command>) {
    std::thread::spawn(move || {
        let stdin = std::io::stdin();
        for line in stdin.lock().lines() {
            let Ok(line) = line else { break };
            match Command::from_key_name(&line) {
                Some(c) => {
                    if tx.send(c).is_err() {
                        break;
                    }
                }
                None if line.trim().is_empty() => {}
                None => tracing::warn!(key = line.trim(), "unbound key; ignored"),
            }
        }
        tracing::debug!("stdin closed, key reader exiting");
    });
}

pub fn run_live(
    cfg: &Config,
    trace: Option<&Path>,
    frames: Option<u64>,
    threaded: bool,
    shutdown: Arc<AtomicBool>,
) -> CoreResult<RunSummary> {
    let source: Box<dyn GazeSource + Send> = match trace {
        Some(path) => {
            let samples = load_frames(path)?
                .into_iter()
                .map(|(s, _)| s.map(|r| (r.x, r.y)));
            tracing::info!(trace = %path.display(), "gaze from trace (trace keys ignored)");
            Box::new(gazectl_hardware::ScriptedGaze::new(samples))
        }
        None => Box::new(gazectl_hardware::SimulatedGaze::default()),
    };

    let mut ctl = ControlLoop::builder()
        .with_pointer(open_pointer(cfg)?)
        .with_config(cfg)
        .build()?;

    let mut params: RunParams = (&cfg.runner).into();
    params.max_frames = frames;
    if threaded {
        params.mode = SamplingMode::Threaded;
    }

    let (tx, rx) = crossbeam_channel::unbounded();
    spawn_key_reader(tx);

    gazectl_core::run(&mut ctl, source, &rx, &params, &shutdown, |report| {
        if let Some(effect) = report.effect {
            tracing::info!(?effect, state = report.state.as_str(), "command");
        }
        if let Some((x, y)) = report.moved_to {
            tracing::trace!(x, y, "move");
        }
    })
}

/// Replay a trace at the configured frame rate on a manual clock, so debounce
/// timing is reproducible.
pub fn replay_trace(cfg: &Config, trace: &Path, enable: bool, json: bool) -> CoreResult<RunSummary> {
    let frames = load_frames(trace)?;
    let clock = ManualClock::new();
    let period = gazectl_core::util::frame_period(cfg.runner.frame_rate_hz);

    let control = ControlCfg {
        start_enabled: enable || cfg.control.start_enabled,
        ..ControlCfg::from(&cfg.control)
    };
    let mut ctl = ControlLoop::builder()
        .with_pointer(gazectl_hardware::SimulatedPointer::new(
            cfg.screen.width,
            cfg.screen.height,
        ))
        .with_config(cfg)
        .with_control(control)
        .with_clock(clock.clone())
        .build()?;

    let paced = frames.into_iter().map(|f| {
        clock.advance(period);
        f
    });
    let mut frame = 0u64;
    gazectl_core::replay(&mut ctl, paced, |report| {
        frame += 1;
        print_frame(frame, report, json);
    })
}

fn print_frame(frame: u64, report: &FrameReport, json: bool) {
    if let Some((x, y)) = report.moved_to {
        if json {
            println!(
                "{}",
                serde_json::json!({ "event": "move", "frame": frame, "x": x, "y": y })
            );
        } else {
            println!("frame {frame}: move ({x}, {y})");
        }
    }
    if let Some(cmd) = report.command {
        if json {
            println!(
                "{}",
                serde_json::json!({
                    "event": "command",
                    "frame": frame,
                    "command": cmd.as_str(),
                    "effect": report.effect.map(|e| format!("{e:?}")),
                    "state": report.state.as_str(),
                })
            );
        } else {
            println!("frame {frame}: {} -> {}", cmd.as_str(), report.state.as_str());
        }
    }
}

pub fn print_summary(label: &str, s: &RunSummary, json: bool) {
    if json {
        let cursor = s.last_cursor.map(|(x, y)| serde_json::json!([x, y]));
        println!(
            "{}",
            serde_json::json!({
                "event": "summary",
                "frames": s.frames,
                "moves": s.moves,
                "missing": s.missing,
                "exit": s.exit.as_str(),
                "state": s.final_state.as_str(),
                "cursor": cursor,
            })
        );
    } else {
        let cursor = s
            .last_cursor
            .map_or_else(|| "none".to_string(), |(x, y)| format!("({x}, {y})"));
        println!(
            "{label} complete: frames={} moves={} missing={} exit={} state={} cursor={cursor}",
            s.frames,
            s.moves,
            s.missing,
            s.exit.as_str(),
            s.final_state.as_str()
        );
    }
}

/// Build a loop against the real pointer and report readiness.
pub fn self_check(cfg: &Config) -> CoreResult<()> {
    let ctl = ControlLoop::builder()
        .with_pointer(open_pointer(cfg)?)
        .with_config(cfg)
        .build()?;
    let pos = ctl
        .pointer()
        .position()
        .map_err(|e| eyre::Report::new(gazectl_core::port_error::map_pointer_error(&*e)))
        .wrap_err("query pointer position")?;
    tracing::info!(bounds = ?ctl.bounds(), ?pos, "self-check passed");
    Ok(())
}
