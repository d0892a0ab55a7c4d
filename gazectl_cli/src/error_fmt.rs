//! Human-readable error descriptions and structured JSON error formatting.

use gazectl_core::error::{BuildError, GazeError};

/// Map an eyre::Report to a human-readable explanation with likely causes and fix hints.
pub fn humanize(err: &eyre::Report) -> String {
    // Typed matches first
    if let Some(be) = err.downcast_ref::<BuildError>() {
        return match be {
            BuildError::MissingPointer => {
                "What happened: No pointer was provided to the control loop.\nLikely causes: The pointer backend failed to initialize or was not passed to the builder.\nHow to fix: Ensure the pointer is created successfully and passed via with_pointer(...).".to_string()
            }
            BuildError::InvalidBounds { width, height } => format!(
                "What happened: The pointer reported an unusable screen size ({width}x{height}).\nLikely causes: [screen] width or height is 0, or the display could not be queried.\nHow to fix: Set [screen] width/height to the real resolution and rerun."
            ),
            BuildError::InvalidConfig(msg) => format!(
                "What happened: Invalid tuning ({msg}).\nLikely causes: Out-of-range smoothing or gain values.\nHow to fix: Edit [smoothing] / [gain] in the config, then rerun. See etc/gazectl.toml for a sample."
            ),
        };
    }

    if let Some(ge) = err.downcast_ref::<GazeError>() {
        return match ge {
            GazeError::Config(msg) => format!(
                "What happened: Configuration is invalid ({msg}).\nLikely causes: A missing file, a TOML syntax error, or an out-of-range value.\nHow to fix: Edit the TOML config and try again. See etc/gazectl.toml for a sample."
            ),
            GazeError::PointerFault(msg) if msg.contains("uinput") => format!(
                "What happened: Could not drive the uinput pointer ({msg}).\nLikely causes: /dev/uinput is missing or not writable by this user.\nHow to fix: Load the uinput module (modprobe uinput) and grant access, e.g. via a udev rule or the input group."
            ),
            GazeError::Pointer(msg) | GazeError::PointerFault(msg) => format!(
                "What happened: The pointer rejected a move ({msg}).\nLikely causes: The display session ended or the input device went away.\nHow to fix: Restart the session; check pointer permissions."
            ),
            // Only reachable if a caller propagates `map_source_error` itself.
            GazeError::Source(msg) => format!(
                "What happened: The input device stopped responding ({msg}).\nLikely causes: Device disconnected or the system is overloaded.\nHow to fix: Reconnect the device and rerun."
            ),
        };
    }

    // String-based heuristics for errors coming from trace loading
    let msg = format!("{err:#}");
    let lower = msg.to_ascii_lowercase();

    if lower.contains("trace csv must have headers") {
        return "Invalid headers in trace CSV. Expected 'rx,ry,key'.".to_string();
    }

    if lower.contains("open trace csv") {
        return format!(
            "What happened: The trace file could not be opened.\nLikely causes: Wrong path or missing read permission.\nHow to fix: Check the --trace argument. Original: {msg}"
        );
    }

    if lower.contains("invalid csv row") {
        return format!(
            "What happened: A trace row could not be parsed.\nLikely causes: Non-numeric rx/ry, or only one of rx and ry present.\nHow to fix: Fix the row named below; leave both rx and ry empty for a frame without a sample. Original: {msg}"
        );
    }

    // Generic fallback
    let mut cause = String::new();
    if let Some(src) = err.source() {
        cause = format!(" Cause: {src}");
    }
    format!(
        "Something went wrong.{cause}\nHow to fix: Re-run with --log-level=debug for details. Original: {msg}"
    )
}

/// Stable exit codes: 2 for config/build errors, 3 for fatal pointer errors, 1 otherwise.
pub fn exit_code_for_error(err: &eyre::Report) -> i32 {
    if err.downcast_ref::<BuildError>().is_some() {
        return 2;
    }
    match err.downcast_ref::<GazeError>() {
        Some(GazeError::Config(_)) => 2,
        // Acquisition errors never escape the loop, so any other GazeError came from the pointer.
        Some(_) => 3,
        None => 1,
    }
}

/// Machine-readable name for the error class.
fn reason_name(err: &eyre::Report) -> &'static str {
    if let Some(be) = err.downcast_ref::<BuildError>() {
        return match be {
            BuildError::MissingPointer => "MissingPointer",
            BuildError::InvalidBounds { .. } => "InvalidBounds",
            BuildError::InvalidConfig(_) => "InvalidConfig",
        };
    }
    match err.downcast_ref::<GazeError>() {
        Some(GazeError::Config(_)) => "Config",
        Some(GazeError::Pointer(_)) => "Pointer",
        Some(GazeError::PointerFault(_)) => "PointerFault",
        Some(GazeError::Source(_)) => "Source",
        None => "Error",
    }
}

/// Structured JSON for errors when --json is enabled.
pub fn format_error_json(err: &eyre::Report) -> String {
    serde_json::json!({
        "reason": reason_name(err),
        "exit_code": exit_code_for_error(err),
        "message": humanize(err),
    })
    .to_string()
}
