use std::sync::atomic::AtomicBool;
use std::time::Duration;

use gazectl_core::{
    Command, ControlCfg, ControlLoop, ControlState, ExitReason, Ratio, RunParams, SamplingMode,
    replay, run,
};
use gazectl_hardware::{ScriptedGaze, SimulatedGaze, SimulatedPointer};
use gazectl_traits::ManualClock;

fn enabled_loop() -> ControlLoop<SimulatedPointer> {
    ControlLoop::builder()
        .with_pointer(SimulatedPointer::new(1280, 720))
        .with_clock(ManualClock::new())
        .with_control(ControlCfg {
            start_enabled: true,
            ..ControlCfg::default()
        })
        .build()
        .unwrap()
}

fn script() -> Vec<Option<(f64, f64)>> {
    (0..20)
        .map(|i| {
            if i % 5 == 3 {
                None
            } else {
                let t = f64::from(i) / 20.0;
                Some((0.3 + 0.4 * t, 0.6 - 0.2 * t))
            }
        })
        .collect()
}

fn params(mode: SamplingMode) -> RunParams {
    RunParams {
        mode,
        frame_rate_hz: 1000,
        sample_timeout: Duration::from_secs(2),
        max_frames: None,
    }
}

#[test]
fn direct_run_ends_when_the_source_runs_dry() {
    let mut ctl = enabled_loop();
    let stop = AtomicBool::new(false);
    let mut seen = 0;
    let summary = run(
        &mut ctl,
        ScriptedGaze::new(script()),
        &crossbeam_channel::never(),
        &params(SamplingMode::Direct),
        &stop,
        |_| seen += 1,
    )
    .unwrap();
    assert_eq!(summary.exit, ExitReason::SourceExhausted);
    assert_eq!(summary.frames, 20);
    assert_eq!(summary.missing, 4);
    assert_eq!(summary.moves, 16);
    assert_eq!(seen, 20);
    assert_eq!(summary.last_cursor, ctl.pointer().moves().last().copied());
}

#[test]
fn threaded_run_matches_direct_run() {
    let stop = AtomicBool::new(false);
    let mut direct = enabled_loop();
    run(
        &mut direct,
        ScriptedGaze::new(script()),
        &crossbeam_channel::never(),
        &params(SamplingMode::Direct),
        &stop,
        |_| {},
    )
    .unwrap();

    let mut threaded = enabled_loop();
    let summary = run(
        &mut threaded,
        ScriptedGaze::new(script()),
        &crossbeam_channel::never(),
        &params(SamplingMode::Threaded),
        &stop,
        |_| {},
    )
    .unwrap();

    assert_eq!(summary.exit, ExitReason::SourceExhausted);
    assert_eq!(summary.frames, 20);
    assert_eq!(threaded.pointer().moves(), direct.pointer().moves());
}

#[test]
fn quit_command_stops_the_run() {
    let mut ctl = enabled_loop();
    let (tx, rx) = crossbeam_channel::unbounded();
    tx.send(Command::Quit).unwrap();
    let stop = AtomicBool::new(false);
    let summary = run(
        &mut ctl,
        SimulatedGaze::default(),
        &rx,
        &params(SamplingMode::Direct),
        &stop,
        |_| {},
    )
    .unwrap();
    assert_eq!(summary.exit, ExitReason::Quit);
    assert_eq!(summary.frames, 1);
}

#[test]
fn frame_limit_bounds_an_endless_source() {
    let mut ctl = enabled_loop();
    let stop = AtomicBool::new(false);
    let p = RunParams {
        max_frames: Some(50),
        ..params(SamplingMode::Threaded)
    };
    let summary = run(&mut ctl, SimulatedGaze::new(7), &crossbeam_channel::never(), &p, &stop, |_| {})
        .unwrap();
    assert_eq!(summary.exit, ExitReason::FrameLimit);
    assert_eq!(summary.frames, 50);
}

#[test]
fn shutdown_flag_wins_before_the_first_frame() {
    let mut ctl = enabled_loop();
    let stop = AtomicBool::new(true);
    let summary = run(
        &mut ctl,
        SimulatedGaze::default(),
        &crossbeam_channel::never(),
        &params(SamplingMode::Direct),
        &stop,
        |_| {},
    )
    .unwrap();
    assert_eq!(summary.exit, ExitReason::Shutdown);
    assert_eq!(summary.frames, 0);
}

#[test]
fn replay_applies_commands_in_frame_order() {
    let mut ctl = ControlLoop::builder()
        .with_pointer(SimulatedPointer::new(100, 100))
        .with_clock(ManualClock::new())
        .build()
        .unwrap();
    let frames = vec![
        (Some(Ratio::new(0.5, 0.5)), None),
        (Some(Ratio::new(0.5, 0.5)), Some(Command::Toggle)),
        (Some(Ratio::new(0.5, 0.5)), None),
        (None, Some(Command::Quit)),
        (Some(Ratio::new(0.9, 0.9)), None),
    ];
    let mut moved = Vec::new();
    let summary = replay(&mut ctl, frames, |r| moved.push(r.moved_to)).unwrap();
    assert_eq!(summary.exit, ExitReason::Quit);
    assert_eq!(summary.frames, 4);
    assert_eq!(summary.final_state, ControlState::Enabled);
    assert_eq!(moved, vec![None, None, Some((50, 50)), None]);
}
