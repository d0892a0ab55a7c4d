#![no_main]
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &str| {
    // Arbitrary TOML must either fail to parse or validate without panicking.
    if let Ok(cfg) = gazectl_config::load_toml(data) {
        if cfg.validate().is_ok() {
            // Accepted configs keep the invariants the control loop relies on.
            assert!(cfg.smoothing.ratio_alpha > 0.0 && cfg.smoothing.ratio_alpha <= 1.0);
            assert!(cfg.gain.min > 0.0 && cfg.gain.min <= cfg.gain.max);
            assert!(cfg.screen.width >= 1 && cfg.screen.height >= 1);
        }
    }
});
