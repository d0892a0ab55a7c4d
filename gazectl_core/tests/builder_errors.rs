use gazectl_core::error::BuildError;
use gazectl_core::{ControlLoop, ControlState, Gain, GainCfg, SmoothingCfg};
use gazectl_hardware::SimulatedPointer;
use rstest::rstest;

#[rstest]
fn builder_missing_pointer_yields_typed_build_error() {
    let err = ControlLoop::<SimulatedPointer>::builder()
        .try_build()
        .expect_err("should fail with MissingPointer");

    match err.downcast_ref::<BuildError>() {
        Some(BuildError::MissingPointer) => {}
        other => panic!("expected MissingPointer, got: {other:?}"),
    }
}

#[rstest]
#[case(0, 1080)]
#[case(1920, 0)]
fn zero_sized_screen_is_rejected(#[case] w: u32, #[case] h: u32) {
    let err = ControlLoop::builder()
        .with_pointer(SimulatedPointer::new(w, h))
        .build()
        .expect_err("zero-sized screen");
    match err.downcast_ref::<BuildError>() {
        Some(BuildError::InvalidBounds { width, height }) => assert_eq!((*width, *height), (w, h)),
        other => panic!("expected InvalidBounds, got: {other:?}"),
    }
}

#[rstest]
#[case(SmoothingCfg { ratio_alpha: 0.0, pixel_alpha: 0.25 }, GainCfg::default())]
#[case(SmoothingCfg { ratio_alpha: 0.15, pixel_alpha: 1.5 }, GainCfg::default())]
#[case(SmoothingCfg::default(), GainCfg { min: 3.0, max: 1.0, ..GainCfg::default() })]
#[case(SmoothingCfg::default(), GainCfg { initial: Gain::new(5.0, 2.0), ..GainCfg::default() })]
#[case(SmoothingCfg::default(), GainCfg { step: 0.0, ..GainCfg::default() })]
fn invalid_tuning_is_rejected(#[case] smoothing: SmoothingCfg, #[case] gain: GainCfg) {
    let err = ControlLoop::builder()
        .with_pointer(SimulatedPointer::new(100, 100))
        .with_smoothing(smoothing)
        .with_gain(gain)
        .try_build()
        .expect_err("invalid tuning");
    assert!(matches!(
        err.downcast_ref::<BuildError>(),
        Some(BuildError::InvalidConfig(_))
    ));
}

#[test]
fn builds_from_toml_config() {
    let cfg = gazectl_config::load_toml(
        r#"
        [gain]
        initial_x = 1.5
        initial_y = 1.8

        [control]
        start_enabled = true
        "#,
    )
    .unwrap();
    cfg.validate().unwrap();

    let ctl = ControlLoop::builder()
        .with_pointer(SimulatedPointer::new(1920, 1080))
        .with_config(&cfg)
        .build()
        .unwrap();
    assert_eq!(ctl.state(), ControlState::Enabled);
    assert_eq!(ctl.gain(), Gain::new(1.5, 1.8));
    assert_eq!(ctl.bounds().width(), 1920);
}

#[test]
fn starts_disabled_at_default_center() {
    let ctl = ControlLoop::builder()
        .with_pointer(SimulatedPointer::new(640, 480))
        .build()
        .unwrap();
    assert_eq!(ctl.state(), ControlState::Disabled);
    assert_eq!(ctl.center(), gazectl_core::Ratio::CENTER);
    assert_eq!(ctl.smoothed_ratio(), None);
}
