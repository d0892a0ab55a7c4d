//! Test and helper mocks for gazectl_core

use gazectl_traits::{BoxError, GazeSource, PointerPort};

/// A gaze source whose camera is gone: every read fails.
pub struct DeadSource;

impl GazeSource for DeadSource {
    fn sample(&mut self) -> Result<Option<(f64, f64)>, BoxError> {
        Err(Box::new(std::io::Error::other("camera disconnected")))
    }
}

/// A pointer that lost OS access: reports a screen but every move fails.
pub struct BrokenPointer {
    pub width: u32,
    pub height: u32,
}

impl PointerPort for BrokenPointer {
    fn screen_bounds(&self) -> (u32, u32) {
        (self.width, self.height)
    }
    fn position(&self) -> Result<(i32, i32), BoxError> {
        Err(Box::new(std::io::Error::other("pointer unavailable")))
    }
    fn move_to(&mut self, _x: i32, _y: i32) -> Result<(), BoxError> {
        Err(Box::new(std::io::Error::other("pointer unavailable")))
    }
    fn left_click(&mut self) -> Result<(), BoxError> {
        Err(Box::new(std::io::Error::other("pointer unavailable")))
    }
    fn right_click(&mut self) -> Result<(), BoxError> {
        Err(Box::new(std::io::Error::other("pointer unavailable")))
    }
}
