use gazectl_hardware::{ScriptedGaze, SimulatedPointer};
use gazectl_traits::{GazeSource, PointerPort};
use rstest::rstest;

#[rstest]
#[case(1000 + 50, 20, (999, 20))]
#[case(-10, 20, (0, 20))]
#[case(500, 10_000, (500, 499))]
#[case(i32::MIN, i32::MAX, (0, 499))]
fn out_of_range_moves_clamp(#[case] x: i32, #[case] y: i32, #[case] want: (i32, i32)) {
    let mut p = SimulatedPointer::new(1000, 500);
    p.move_to(x, y).expect("moves never fail on the simulator");
    assert_eq!(p.position().unwrap(), want);
}

#[test]
fn boxed_ports_forward() {
    let mut pointer: Box<dyn PointerPort> = Box::new(SimulatedPointer::new(640, 480));
    assert_eq!(pointer.screen_bounds(), (640, 480));
    pointer.move_to(1, 2).unwrap();
    assert_eq!(pointer.position().unwrap(), (1, 2));

    let mut gaze: Box<dyn GazeSource> = Box::new(ScriptedGaze::new([Some((0.3, 0.7))]));
    assert_eq!(gaze.sample().unwrap(), Some((0.3, 0.7)));
    assert!(gaze.is_exhausted());
}
