//! The sampler thread must exit on drop, on exhaustion, and when blocked on a
//! full channel.

use gazectl_core::mocks::DeadSource;
use gazectl_core::sampler::{GazeSampler, NextFrame};
use gazectl_hardware::{ScriptedGaze, SimulatedGaze};
use gazectl_traits::clock::MonotonicClock;
use std::time::Duration;

#[test]
fn sampler_thread_exits_on_drop() {
    let sampler = GazeSampler::spawn(SimulatedGaze::default(), 100, 4, MonotonicClock::new());
    std::thread::sleep(Duration::from_millis(30));
    drop(sampler);
}

#[test]
fn drop_while_blocked_on_full_channel() {
    // Nobody reads, so the worker fills the buffer and blocks on send.
    let sampler = GazeSampler::spawn(SimulatedGaze::default(), 10_000, 1, MonotonicClock::new());
    std::thread::sleep(Duration::from_millis(50));
    drop(sampler);
}

#[test]
fn frames_arrive_in_order_then_finish() {
    let samples = vec![Some((0.1, 0.1)), None, Some((0.3, 0.3))];
    let sampler = GazeSampler::spawn(ScriptedGaze::new(samples.clone()), 1000, 1, MonotonicClock::new());
    for expected in samples {
        assert_eq!(
            sampler.next_frame(Duration::from_secs(2)),
            NextFrame::Sample(expected)
        );
    }
    assert_eq!(sampler.next_frame(Duration::from_secs(2)), NextFrame::Finished);
}

#[test]
fn failing_source_yields_absent_frames() {
    let sampler = GazeSampler::spawn(DeadSource, 1000, 2, MonotonicClock::new());
    assert_eq!(
        sampler.next_frame(Duration::from_secs(2)),
        NextFrame::Sample(None)
    );
}

#[test]
fn many_samplers_dont_leak_threads() {
    for seed in 0..10 {
        let sampler = GazeSampler::spawn(SimulatedGaze::new(seed), 200, 2, MonotonicClock::new());
        let _ = sampler.next_frame(Duration::from_millis(50));
        drop(sampler);
    }
}
