use gazectl_core::smoothing::{PixelSmoother, RatioSmoother};
use gazectl_core::{
    Command, CommandEffect, ControlLoop, ControlState, Gain, GainCfg, Pixel, Ratio, ScreenBounds,
    map_ratio,
};
use gazectl_hardware::SimulatedPointer;
use gazectl_traits::{ManualClock, PointerPort};
use proptest::prelude::*;
use std::time::Duration;

fn enabled_loop(w: u32, h: u32) -> ControlLoop<SimulatedPointer> {
    let mut ctl = ControlLoop::builder()
        .with_pointer(SimulatedPointer::new(w, h))
        .with_clock(ManualClock::new())
        .build()
        .unwrap();
    ctl.apply(Command::Toggle);
    assert_eq!(ctl.state(), ControlState::Enabled);
    ctl
}

proptest! {
    #[test]
    fn first_move_lands_on_the_first_target(rx in 0.0f64..=1.0, ry in 0.0f64..=1.0) {
        let mut ctl = enabled_loop(1920, 1080);
        let sample = Ratio::new(rx, ry);
        let moved = ctl.tick(Some(sample), None).unwrap().moved_to;
        let target = map_ratio(sample, ctl.center(), ctl.gain(), ctl.bounds());
        prop_assert_eq!(moved, Some(target.rounded()));
        prop_assert_eq!(ctl.smoothed_ratio(), Some(sample));
        prop_assert_eq!(ctl.pixel_state(), Some(target));
    }

    #[test]
    fn ema_distance_shrinks_geometrically(n in 1usize..80, alpha in 0.01f64..=1.0) {
        let mut s = RatioSmoother::new(alpha);
        s.update(Some(Ratio::new(0.0, 0.0)));
        let mut prev = 1.0f64;
        for _ in 0..n {
            let r = s.update(Some(Ratio::new(1.0, 1.0))).unwrap();
            let dist = 1.0 - r.x;
            prop_assert!(dist <= prev + 1e-12);
            prev = dist;
        }
        let expected = (1.0 - alpha).powi(n as i32);
        let r = s.state().unwrap();
        prop_assert!(((1.0 - r.x) - expected).abs() < 1e-9);
        prop_assert!(((1.0 - r.y) - expected).abs() < 1e-9);
    }

    #[test]
    fn absent_sample_never_changes_state(x in 0.0f64..=1.0, y in 0.0f64..=1.0, seeded: bool) {
        let mut s = RatioSmoother::new(0.15);
        if seeded {
            s.update(Some(Ratio::new(x, y)));
        }
        let before = s.state();
        prop_assert_eq!(s.update(None), before);
        prop_assert_eq!(s.state(), before);
    }

    #[test]
    fn gain_stays_within_limits(presses in proptest::collection::vec(0u8..4, 0..120)) {
        let mut ctl = enabled_loop(640, 480);
        for p in presses {
            let cmd = match p {
                0 => Command::IncreaseGainX,
                1 => Command::DecreaseGainX,
                2 => Command::IncreaseGainY,
                _ => Command::DecreaseGainY,
            };
            ctl.apply(cmd);
            let g = ctl.gain();
            prop_assert!((1.0..=3.0).contains(&g.x));
            prop_assert!((1.0..=3.0).contains(&g.y));
        }
    }

    #[test]
    fn moves_always_land_on_screen(rx in -2.0f64..3.0, ry in -2.0f64..3.0) {
        let mut ctl = enabled_loop(800, 600);
        let report = ctl.tick(Some(Ratio::new(rx, ry)), None).unwrap();
        let (x, y) = report.moved_to.unwrap();
        prop_assert!((0..800).contains(&x));
        prop_assert!((0..600).contains(&y));
    }
}

#[test]
fn mapper_inverts_horizontal_axis() {
    let bounds = ScreenBounds::new(1000, 1000).unwrap();
    let unit = Gain::new(1.0, 1.0);
    let p = map_ratio(Ratio::new(0.7, 0.3), Ratio::CENTER, unit, bounds);
    assert!((p.x - 299.7).abs() < 1e-9 && (p.y - 299.7).abs() < 1e-9);
    assert_eq!(map_ratio(Ratio::new(0.0, 0.0), Ratio::CENTER, unit, bounds), Pixel::new(999.0, 0.0));
}

#[test]
fn gain_converges_to_limits() {
    let cfg = GainCfg {
        initial: Gain::new(1.0, 3.0),
        ..GainCfg::default()
    };
    let mut ctl = ControlLoop::builder()
        .with_pointer(SimulatedPointer::new(100, 100))
        .with_gain(cfg)
        .build()
        .unwrap();
    for _ in 0..40 {
        ctl.apply(Command::IncreaseGainX);
        ctl.apply(Command::DecreaseGainY);
        assert!(ctl.gain().x <= 3.0 && ctl.gain().y >= 1.0);
    }
    assert_eq!(ctl.gain(), Gain::new(3.0, 1.0));
}

#[test]
fn reset_restores_asymmetric_presets() {
    let mut ctl = enabled_loop(100, 100);
    assert_eq!(ctl.gain(), Gain::new(2.2, 2.2));
    ctl.tick(Some(Ratio::new(0.3, 0.7)), Some(Command::SetCenter)).unwrap();
    ctl.apply(Command::IncreaseGainY);
    assert_eq!(ctl.apply(Command::ResetAll), CommandEffect::Reset);
    assert_eq!(ctl.gain(), Gain::new(2.0, 2.2));
    assert_eq!(ctl.center(), Ratio::CENTER);
    assert_eq!(ctl.pixel_state(), None);
}

#[test]
fn recenter_discards_stale_pixel_state() {
    let mut ctl = enabled_loop(1000, 1000);
    for _ in 0..5 {
        ctl.tick(Some(Ratio::new(0.9, 0.1)), None).unwrap();
    }
    assert!(ctl.pixel_state().is_some());

    let report = ctl.tick(Some(Ratio::new(0.6, 0.4)), Some(Command::SetCenter)).unwrap();
    assert_eq!(report.effect, Some(CommandEffect::CenterSet(Ratio::new(0.6, 0.4))));
    assert_eq!(ctl.pixel_state(), None);

    ctl.tick(Some(Ratio::new(0.6, 0.4)), None).unwrap();
    let target = map_ratio(ctl.smoothed_ratio().unwrap(), ctl.center(), ctl.gain(), ctl.bounds());
    assert_eq!(ctl.pixel_state(), Some(target));
}

#[test]
fn toggles_inside_cooldown_flip_once() {
    let clock = ManualClock::new();
    let mut ctl = ControlLoop::builder()
        .with_pointer(SimulatedPointer::new(100, 100))
        .with_clock(clock.clone())
        .build()
        .unwrap();

    let first = ctl.tick(None, Some(Command::Toggle)).unwrap();
    assert_eq!(first.effect, Some(CommandEffect::Toggled(ControlState::Enabled)));
    clock.advance(Duration::from_millis(100));
    let second = ctl.tick(None, Some(Command::Toggle)).unwrap();
    assert_eq!(second.effect, Some(CommandEffect::ToggleDebounced));
    assert_eq!(ctl.state(), ControlState::Enabled);

    clock.advance(Duration::from_millis(450));
    let third = ctl.tick(None, Some(Command::Toggle)).unwrap();
    assert_eq!(third.effect, Some(CommandEffect::Toggled(ControlState::Disabled)));
}

#[test]
fn pointer_clamps_out_of_range_moves() {
    let mut p = SimulatedPointer::new(800, 600);
    p.move_to(850, 10).unwrap();
    assert_eq!(p.position().unwrap(), (799, 10));
    p.move_to(-10, 10).unwrap();
    assert_eq!(p.position().unwrap(), (0, 10));
}

#[test]
fn pixel_smoother_seeds_then_blends() {
    let mut p = PixelSmoother::new(0.25);
    assert_eq!(p.update(Some(Pixel::new(0.0, 0.0))), Some(Pixel::new(0.0, 0.0)));
    assert_eq!(p.update(Some(Pixel::new(100.0, 40.0))), Some(Pixel::new(25.0, 10.0)));
}
