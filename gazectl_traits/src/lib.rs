//! Hardware seams for the gaze-to-cursor loop.
//!
//! Nothing in here knows about smoothing or calibration; implementations live in
//! `gazectl_hardware` (or in tests) and the control loop in `gazectl_core` only
//! talks to these traits.

pub mod clock;

pub use clock::{Clock, ManualClock, MonotonicClock};

/// Error type used at the trait boundary.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Per-frame producer of gaze ratios.
///
/// A frame yields either both ratios `(rx, ry)` or nothing at all; there is no
/// way to report one axis without the other.
pub trait GazeSource {
    fn sample(&mut self) -> Result<Option<(f64, f64)>, BoxError>;

    /// True once a finite source (e.g. a recorded trace) has nothing left to replay.
    fn is_exhausted(&self) -> bool {
        false
    }
}

/// Absolute OS pointer.
///
/// `move_to` must clamp out-of-range coordinates into
/// `[0, width - 1] x [0, height - 1]` instead of failing.
pub trait PointerPort {
    fn screen_bounds(&self) -> (u32, u32);
    fn position(&self) -> Result<(i32, i32), BoxError>;
    fn move_to(&mut self, x: i32, y: i32) -> Result<(), BoxError>;
    fn left_click(&mut self) -> Result<(), BoxError>;
    fn right_click(&mut self) -> Result<(), BoxError>;
}

impl<G: GazeSource + ?Sized> GazeSource for Box<G> {
    fn sample(&mut self) -> Result<Option<(f64, f64)>, BoxError> {
        (**self).sample()
    }

    fn is_exhausted(&self) -> bool {
        (**self).is_exhausted()
    }
}

impl<P: PointerPort + ?Sized> PointerPort for Box<P> {
    fn screen_bounds(&self) -> (u32, u32) {
        (**self).screen_bounds()
    }
    fn position(&self) -> Result<(i32, i32), BoxError> {
        (**self).position()
    }
    fn move_to(&mut self, x: i32, y: i32) -> Result<(), BoxError> {
        (**self).move_to(x, y)
    }
    fn left_click(&mut self) -> Result<(), BoxError> {
        (**self).left_click()
    }
    fn right_click(&mut self) -> Result<(), BoxError> {
        (**self).right_click()
    }
}

/// Clamp a pointer coordinate into the visible screen.
///
/// Zero-sized dimensions are treated as 1 pixel so the result is always `(0, 0)`
/// rather than a negative coordinate.
#[inline]
pub fn clamp_to_screen(x: i32, y: i32, width: u32, height: u32) -> (i32, i32) {
    let max_x = i32::try_from(width.max(1) - 1).unwrap_or(i32::MAX);
    let max_y = i32::try_from(height.max(1) - 1).unwrap_or(i32::MAX);
    (x.clamp(0, max_x), y.clamp(0, max_y))
}
