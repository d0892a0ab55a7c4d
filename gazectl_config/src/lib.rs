#![cfg_attr(all(not(debug_assertions), not(test)), deny(warnings))]
#![cfg_attr(
    all(not(debug_assertions), not(test)),
    deny(clippy::all, clippy::pedantic, clippy::nursery)
)]
#![allow(clippy::module_name_repetitions, clippy::missing_errors_doc)]
//! Config schemas and gaze trace parsing for the gaze cursor controller.
//!
//! - `Config` and sub-structs are deserialized from TOML and validated.
//!   Every section is optional; omitted values fall back to the reference tuning.
//! - The trace CSV loader enforces headers and the "both ratios or neither" rule.
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone, Copy)]
#[serde(default)]
pub struct SmoothingCfg {
    /// EMA factor for the ratio stage. Range: (0.0, 1.0].
    pub ratio_alpha: f64,
    /// EMA factor for the pixel stage. Range: (0.0, 1.0].
    pub pixel_alpha: f64,
}

impl Default for SmoothingCfg {
    fn default() -> Self {
        Self {
            ratio_alpha: 0.15,
            pixel_alpha: 0.25,
        }
    }
}

#[derive(Debug, Deserialize, Clone, Copy)]
#[serde(default)]
pub struct GainCfg {
    pub initial_x: f64,
    pub initial_y: f64,
    /// Gains restored by the reset command (x and y differ by default).
    pub reset_x: f64,
    pub reset_y: f64,
    pub min: f64,
    pub max: f64,
    /// Increment applied per gain hotkey press.
    pub step: f64,
}

impl Default for GainCfg {
    fn default() -> Self {
        Self {
            initial_x: 2.2,
            initial_y: 2.2,
            reset_x: 2.0,
            reset_y: 2.2,
            min: 1.0,
            max: 3.0,
            step: 0.1,
        }
    }
}

#[derive(Debug, Deserialize, Clone, Copy)]
#[serde(default)]
pub struct CalibrationCfg {
    /// Ratio pair that maps to the screen center at startup and after reset.
    pub center_rx: f64,
    pub center_ry: f64,
}

impl Default for CalibrationCfg {
    fn default() -> Self {
        Self {
            center_rx: 0.5,
            center_ry: 0.5,
        }
    }
}

#[derive(Debug, Deserialize, Clone, Copy)]
#[serde(default)]
pub struct ControlCfg {
    /// Minimum time between two accepted toggles.
    pub toggle_cooldown_ms: u64,
    /// Start with cursor control already on.
    pub start_enabled: bool,
    /// Consecutive absent frames before the source is reported as stale (0 disables).
    pub stale_after_frames: u64,
}

impl Default for ControlCfg {
    fn default() -> Self {
        Self {
            toggle_cooldown_ms: 500,
            start_enabled: false,
            stale_after_frames: 30,
        }
    }
}

#[derive(Debug, Deserialize, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum RunMode {
    /// Acquire gaze samples on the loop thread.
    #[default]
    Direct,
    /// Acquire on a worker thread and hand samples over a channel.
    Threaded,
}

#[derive(Debug, Deserialize, Clone, Copy)]
#[serde(default)]
pub struct RunnerCfg {
    pub frame_rate_hz: u32,
    pub mode: RunMode,
    /// How long the threaded runner waits for a sample before counting the frame as absent.
    pub sample_timeout_ms: u64,
}

impl Default for RunnerCfg {
    fn default() -> Self {
        Self {
            frame_rate_hz: 30,
            mode: RunMode::Direct,
            sample_timeout_ms: 100,
        }
    }
}

#[derive(Debug, Deserialize, Clone, Copy)]
#[serde(default)]
pub struct ScreenCfg {
    /// Screen size used by pointers that cannot query the display themselves.
    pub width: u32,
    pub height: u32,
}

impl Default for ScreenCfg {
    fn default() -> Self {
        Self {
            width: 1920,
            height: 1080,
        }
    }
}

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(default)]
pub struct Logging {
    pub file: Option<String>,  // path to .log (JSON lines)
    pub level: Option<String>, // "info","debug"
    /// Log rotation policy: "never" | "daily" | "hourly" (default: never)
    pub rotation: Option<String>,
}

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(default)]
pub struct Config {
    pub smoothing: SmoothingCfg,
    pub gain: GainCfg,
    pub calibration: CalibrationCfg,
    pub control: ControlCfg,
    pub runner: RunnerCfg,
    pub screen: ScreenCfg,
    pub logging: Logging,
}

pub fn load_toml(s: &str) -> Result<Config, toml::de::Error> {
    toml::from_str::<Config>(s)
}

impl Config {
    pub fn validate(&self) -> eyre::Result<()> {
        // Smoothing
        if !unit_open_closed(self.smoothing.ratio_alpha) {
            eyre::bail!("smoothing.ratio_alpha must be in (0.0, 1.0]");
        }
        if !unit_open_closed(self.smoothing.pixel_alpha) {
            eyre::bail!("smoothing.pixel_alpha must be in (0.0, 1.0]");
        }

        // Gain
        let g = &self.gain;
        if !(g.min.is_finite() && g.min > 0.0) {
            eyre::bail!("gain.min must be > 0");
        }
        if !(g.max.is_finite() && g.min <= g.max) {
            eyre::bail!("gain.max must be >= gain.min");
        }
        for (name, v) in [
            ("gain.initial_x", g.initial_x),
            ("gain.initial_y", g.initial_y),
            ("gain.reset_x", g.reset_x),
            ("gain.reset_y", g.reset_y),
        ] {
            if !(v.is_finite() && (g.min..=g.max).contains(&v)) {
                eyre::bail!("{name} must be within [gain.min, gain.max]");
            }
        }
        if !(g.step.is_finite() && g.step > 0.0) {
            eyre::bail!("gain.step must be > 0");
        }

        // Calibration
        if !(0.0..=1.0).contains(&self.calibration.center_rx) {
            eyre::bail!("calibration.center_rx must be in [0.0, 1.0]");
        }
        if !(0.0..=1.0).contains(&self.calibration.center_ry) {
            eyre::bail!("calibration.center_ry must be in [0.0, 1.0]");
        }

        // Control
        if self.control.toggle_cooldown_ms > 60_000 {
            eyre::bail!("control.toggle_cooldown_ms is unreasonably large (>60s)");
        }

        // Runner
        if self.runner.frame_rate_hz == 0 {
            eyre::bail!("runner.frame_rate_hz must be > 0");
        }
        if self.runner.sample_timeout_ms == 0 {
            eyre::bail!("runner.sample_timeout_ms must be >= 1");
        }

        // Screen
        if self.screen.width == 0 || self.screen.height == 0 {
            eyre::bail!("screen.width and screen.height must be >= 1");
        }

        // Logging
        if let Some(rot) = self.logging.rotation.as_deref() {
            if !matches!(rot, "never" | "daily" | "hourly") {
                eyre::bail!("logging.rotation must be one of never|daily|hourly, got {rot}");
            }
        }

        Ok(())
    }
}

#[inline]
fn unit_open_closed(v: f64) -> bool {
    v > 0.0 && v <= 1.0
}

/// Gaze trace CSV schema.
///
/// Expected headers:
/// rx,ry,key
///
/// Example:
/// rx,ry,key
/// 0.52,0.48,space
/// ,,
/// 0.55,0.47,c
#[derive(Debug, Deserialize, Clone)]
pub struct TraceRow {
    pub rx: Option<f64>,
    pub ry: Option<f64>,
    pub key: Option<String>,
}

/// One validated trace frame.
#[derive(Debug, Clone, PartialEq)]
pub struct TraceFrame {
    /// Ratio pair, or `None` for a frame where the estimator saw nothing.
    pub sample: Option<(f64, f64)>,
    /// Key pressed during this frame, by name.
    pub key: Option<String>,
}

impl TryFrom<TraceRow> for TraceFrame {
    type Error = eyre::Report;
    fn try_from(row: TraceRow) -> Result<Self, Self::Error> {
        let sample = match (row.rx, row.ry) {
            (Some(rx), Some(ry)) => {
                if !(rx.is_finite() && ry.is_finite()) {
                    eyre::bail!("ratios must be finite, got ({rx}, {ry})");
                }
                Some((rx, ry))
            }
            (None, None) => None,
            _ => eyre::bail!("rx and ry must both be present or both be empty"),
        };
        // A cell holding only spaces is the space bar, not an empty key.
        let key = row.key.and_then(|k| match k.trim() {
            "" if k.contains(' ') => Some(" ".to_string()),
            "" => None,
            t => Some(t.to_string()),
        });
        Ok(TraceFrame { sample, key })
    }
}

pub fn load_trace_csv(path: &std::path::Path) -> eyre::Result<Vec<TraceFrame>> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_path(path)
        .map_err(|e| eyre::eyre!("open trace CSV {:?}: {}", path, e))?;

    // Enforce exact headers
    let headers = rdr
        .headers()
        .map_err(|e| eyre::eyre!("read CSV headers {:?}: {}", path, e))?
        .clone();
    let expected = ["rx", "ry", "key"];
    let actual: Vec<String> = headers.iter().map(|s| s.trim().to_string()).collect();
    if actual != expected {
        eyre::bail!(
            "trace CSV must have headers 'rx,ry,key', got: {}",
            actual.join(",")
        );
    }

    let mut frames = Vec::new();
    for (idx, rec) in rdr.deserialize::<TraceRow>().enumerate() {
        let row = rec.map_err(|e| eyre::eyre!("invalid CSV row {}: {}", idx + 2, e))?;
        let frame = TraceFrame::try_from(row)
            .map_err(|e| eyre::eyre!("invalid CSV row {}: {}", idx + 2, e))?;
        frames.push(frame);
    }
    Ok(frames)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_yields_reference_tuning() {
        let cfg = load_toml("").expect("empty toml parses");
        assert!((cfg.smoothing.ratio_alpha - 0.15).abs() < 1e-12);
        assert!((cfg.smoothing.pixel_alpha - 0.25).abs() < 1e-12);
        assert!((cfg.gain.initial_x - 2.2).abs() < 1e-12);
        assert!((cfg.gain.reset_x - 2.0).abs() < 1e-12);
        assert!((cfg.gain.reset_y - 2.2).abs() < 1e-12);
        assert_eq!(cfg.control.toggle_cooldown_ms, 500);
        assert_eq!(cfg.runner.mode, RunMode::Direct);
        cfg.validate().expect("defaults are valid");
    }

    #[test]
    fn half_present_row_is_rejected() {
        let row = TraceRow {
            rx: Some(0.4),
            ry: None,
            key: None,
        };
        assert!(TraceFrame::try_from(row).is_err());
    }

    #[test]
    fn key_cell_normalisation() {
        let frame = |key: &str| {
            TraceFrame::try_from(TraceRow {
                rx: None,
                ry: None,
                key: Some(key.into()),
            })
            .expect("valid row")
        };
        assert_eq!(frame("  ").key.as_deref(), Some(" "));
        assert_eq!(frame("\t").key, None);
        assert_eq!(frame("").key, None);
        assert_eq!(frame(" esc ").key.as_deref(), Some("esc"));
    }
}
