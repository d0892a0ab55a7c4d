//! Maps `Box<dyn Error>` from trait boundaries to typed `GazeError`.
//!
//! The traits in `gazectl_traits` use `Box<dyn Error + Send + Sync>`; this
//! module converts those to our typed error enum, with an optional
//! feature-gated path for `gazectl_hardware::HwError` downcasting.

use crate::error::GazeError;

/// Map a pointer-side error to a typed `GazeError`.
pub fn map_pointer_error(e: &(dyn std::error::Error + 'static)) -> GazeError {
    #[cfg(feature = "hardware-errors")]
    {
        use gazectl_hardware::error::HwError;
        if let Some(hw) = e.downcast_ref::<HwError>() {
            return GazeError::PointerFault(hw.to_string());
        }
    }

    GazeError::Pointer(e.to_string())
}

/// Map a gaze-source error to a typed `GazeError`.
pub fn map_source_error(e: &(dyn std::error::Error + 'static)) -> GazeError {
    GazeError::Source(e.to_string())
}
