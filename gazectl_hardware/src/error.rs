use thiserror::Error;

#[derive(Debug, Error)]
pub enum HwError {
    #[error("uinput error: {0}")]
    Uinput(String),
    #[error("opening /dev/uinput: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, HwError>;
