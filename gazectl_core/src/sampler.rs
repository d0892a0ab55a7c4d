//! Background gaze acquisition.
//!
//! Spawns a thread that owns the `GazeSource` and pushes every frame's sample
//! through a bounded channel, so the consumer sees frames in acquisition order
//! and none are skipped. The thread stops when the source is exhausted, when
//! the consumer goes away, or when the `GazeSampler` is dropped.
use crossbeam_channel as xch;
use gazectl_traits::GazeSource;
use gazectl_traits::clock::Clock;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::{Duration, Instant};

use crate::port_error::map_source_error;

/// How long a blocked send waits before re-checking for shutdown.
const SEND_RETRY: Duration = Duration::from_millis(20);

/// Result of waiting for the next frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NextFrame {
    /// A frame arrived; the inner value is the (possibly absent) sample.
    Sample(Option<(f64, f64)>),
    /// Nothing arrived within the timeout.
    TimedOut,
    /// The worker has finished (source exhausted or thread gone).
    Finished,
}

pub struct GazeSampler {
    rx: xch::Receiver<Option<(f64, f64)>>,
    last_ok: Arc<AtomicU64>,
    epoch: Instant,
    shutdown: Arc<AtomicBool>,
    join_handle: Option<std::thread::JoinHandle<()>>,
}

impl GazeSampler {
    /// Spawn the worker, pacing acquisitions at `hz` with `clock`.
    pub fn spawn<G, C>(mut source: G, hz: u32, capacity: usize, clock: C) -> Self
    where
        G: GazeSource + Send + 'static,
        C: Clock + Send + Sync + 'static,
    {
        let (tx, rx) = xch::bounded(capacity.max(1));
        let shutdown = Arc::new(AtomicBool::new(false));
        let shutdown_clone = shutdown.clone();
        let last_ok = Arc::new(AtomicU64::new(0));
        let last_ok_clone = last_ok.clone();
        let period = crate::util::frame_period(hz);
        let epoch = Instant::now();

        let join_handle = std::thread::spawn(move || {
            loop {
                if shutdown_clone.load(Ordering::Relaxed) {
                    tracing::debug!("gaze sampler received shutdown signal");
                    break;
                }
                if source.is_exhausted() {
                    tracing::debug!("gaze source exhausted, sampler exiting");
                    break;
                }

                let sample = match source.sample() {
                    Ok(s) => {
                        last_ok_clone.store(millis_since(epoch), Ordering::Relaxed);
                        s
                    }
                    Err(e) => {
                        let err = map_source_error(&*e);
                        tracing::warn!(error = %err, "gaze acquisition failed; sending absent frame");
                        None
                    }
                };

                if !send_until_shutdown(&tx, sample, &shutdown_clone) {
                    break;
                }
                clock.sleep(period);
            }
            tracing::trace!("gaze sampler thread exiting cleanly");
        });

        Self {
            rx,
            last_ok,
            epoch,
            shutdown,
            join_handle: Some(join_handle),
        }
    }

    /// Wait up to `timeout` for the next frame, in order.
    pub fn next_frame(&self, timeout: Duration) -> NextFrame {
        match self.rx.recv_timeout(timeout) {
            Ok(s) => NextFrame::Sample(s),
            Err(xch::RecvTimeoutError::Timeout) => NextFrame::TimedOut,
            Err(xch::RecvTimeoutError::Disconnected) => NextFrame::Finished,
        }
    }

    /// Wall-clock milliseconds since the source last produced a frame without error.
    pub fn stalled_for_now(&self) -> u64 {
        millis_since(self.epoch).saturating_sub(self.last_ok.load(Ordering::Relaxed))
    }
}

fn millis_since(epoch: Instant) -> u64 {
    let ms = Instant::now().saturating_duration_since(epoch).as_millis();
    ms.min(u128::from(u64::MAX)) as u64
}

// Returns false when the worker should stop.
fn send_until_shutdown(
    tx: &xch::Sender<Option<(f64, f64)>>,
    mut sample: Option<(f64, f64)>,
    shutdown: &AtomicBool,
) -> bool {
    loop {
        match tx.send_timeout(sample, SEND_RETRY) {
            Ok(()) => return true,
            Err(xch::SendTimeoutError::Timeout(s)) => {
                if shutdown.load(Ordering::Relaxed) {
                    return false;
                }
                sample = s;
            }
            Err(xch::SendTimeoutError::Disconnected(_)) => {
                tracing::debug!("gaze sampler consumer disconnected, exiting thread");
                return false;
            }
        }
    }
}

impl Drop for GazeSampler {
    fn drop(&mut self) {
        self.shutdown.store(true, Ordering::Relaxed);

        // The worker exits after its current sample() returns: either at the
        // shutdown check, or within SEND_RETRY if it is blocked on a full channel.
        if let Some(handle) = self.join_handle.take() {
            match handle.join() {
                Ok(()) => {
                    tracing::trace!("gaze sampler thread joined successfully");
                }
                Err(e) => {
                    tracing::warn!(?e, "gaze sampler thread panicked during shutdown");
                }
            }
        }
    }
}
