pub mod error;
#[cfg(all(feature = "hardware", target_os = "linux"))]
pub mod uinput;

use gazectl_traits::{BoxError, GazeSource, PointerPort, clamp_to_screen};
use std::collections::VecDeque;

/// Simulated pointer: clamps like a real one and remembers what it was asked to do.
#[derive(Debug, Clone)]
pub struct SimulatedPointer {
    width: u32,
    height: u32,
    pos: (i32, i32),
    moves: Vec<(i32, i32)>,
    left_clicks: u32,
    right_clicks: u32,
}

impl SimulatedPointer {
    pub fn new(width: u32, height: u32) -> Self {
        let (cx, cy) = clamp_to_screen((width / 2) as i32, (height / 2) as i32, width, height);
        SimulatedPointer {
            width,
            height,
            pos: (cx, cy),
            moves: Vec::new(),
            left_clicks: 0,
            right_clicks: 0,
        }
    }

    /// Every clamped position passed to the OS so far, oldest first.
    pub fn moves(&self) -> &[(i32, i32)] {
        &self.moves
    }

    pub fn clicks(&self) -> (u32, u32) {
        (self.left_clicks, self.right_clicks)
    }
}

impl PointerPort for SimulatedPointer {
    fn screen_bounds(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn position(&self) -> Result<(i32, i32), BoxError> {
        Ok(self.pos)
    }

    fn move_to(&mut self, x: i32, y: i32) -> Result<(), BoxError> {
        let p = clamp_to_screen(x, y, self.width, self.height);
        tracing::trace!(x = p.0, y = p.1, "pointer move (simulated)");
        self.pos = p;
        self.moves.push(p);
        Ok(())
    }

    fn left_click(&mut self) -> Result<(), BoxError> {
        self.left_clicks += 1;
        tracing::debug!("left click (simulated)");
        Ok(())
    }

    fn right_click(&mut self) -> Result<(), BoxError> {
        self.right_clicks += 1;
        tracing::debug!("right click (simulated)");
        Ok(())
    }
}

/// Replays a fixed sequence of samples, then reports exhaustion.
#[derive(Debug, Clone, Default)]
pub struct ScriptedGaze {
    samples: VecDeque<Option<(f64, f64)>>,
}

impl ScriptedGaze {
    pub fn new(samples: impl IntoIterator<Item = Option<(f64, f64)>>) -> Self {
        ScriptedGaze {
            samples: samples.into_iter().collect(),
        }
    }

    pub fn remaining(&self) -> usize {
        self.samples.len()
    }
}

impl GazeSource for ScriptedGaze {
    fn sample(&mut self) -> Result<Option<(f64, f64)>, BoxError> {
        Ok(self.samples.pop_front().flatten())
    }

    fn is_exhausted(&self) -> bool {
        self.samples.is_empty()
    }
}

/// Synthetic gaze: a slow figure-eight around the screen center with jitter
/// and a short blink every `blink_every` frames.
#[derive(Debug, Clone)]
pub struct SimulatedGaze {
    frame: u64,
    rng: u32,
    amplitude: f64,
    jitter: f64,
    blink_every: u64,
    blink_len: u64,
}

impl SimulatedGaze {
    pub fn new(seed: u32) -> Self {
        SimulatedGaze {
            frame: 0,
            rng: seed.max(1),
            amplitude: 0.15,
            jitter: 0.01,
            blink_every: 90,
            blink_len: 4,
        }
    }

    // xorshift32 in [-1, 1)
    fn noise(&mut self) -> f64 {
        let mut x = self.rng;
        x ^= x << 13;
        x ^= x >> 17;
        x ^= x << 5;
        self.rng = x;
        (f64::from(x) / (f64::from(u32::MAX) + 1.0)) * 2.0 - 1.0
    }
}

impl Default for SimulatedGaze {
    fn default() -> Self {
        Self::new(0x9E37_79B9)
    }
}

impl GazeSource for SimulatedGaze {
    fn sample(&mut self) -> Result<Option<(f64, f64)>, BoxError> {
        let n = self.frame;
        self.frame = self.frame.wrapping_add(1);
        if self.blink_every > 0 && n % self.blink_every < self.blink_len {
            return Ok(None);
        }
        let t = n as f64 / 60.0;
        let rx = 0.5 + self.amplitude * t.sin() + self.jitter * self.noise();
        let ry = 0.5 + self.amplitude * (2.0 * t).sin() * 0.5 + self.jitter * self.noise();
        Ok(Some((rx.clamp(0.0, 1.0), ry.clamp(0.0, 1.0))))
    }
}
