use thiserror::Error;

#[derive(Debug, Error, Clone)]
pub enum GazeError {
    #[error("pointer error: {0}")]
    Pointer(String),
    #[error("pointer fault: {0}")]
    PointerFault(String),
    /// Acquisition failure. Logged per frame and turned into an absent
    /// sample; the loop never returns it.
    #[error("gaze source error: {0}")]
    Source(String),
    #[error("configuration error: {0}")]
    Config(String),
}

#[derive(Debug, Error, Clone)]
pub enum BuildError {
    #[error("missing pointer")]
    MissingPointer,
    #[error("invalid screen bounds {width}x{height}")]
    InvalidBounds { width: u32, height: u32 },
    #[error("invalid config: {0}")]
    InvalidConfig(&'static str),
}

pub type Result<T> = eyre::Result<T>;
pub use eyre::Report;
