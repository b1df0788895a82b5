//! Error handling for GPIO access.
use std::{io, path::PathBuf};

use thiserror::Error;

use crate::gpio::KernelNumber;

/// Error type for everything in this crate that touches a pin.
#[derive(Debug, Error)]
pub enum GpioError {
    /// The board label is not part of the pin table.
    #[error("board pin {label} does not exist on the {board} header")]
    UnknownPin { label: u32, board: &'static str },

    /// The kernel refused to export a GPIO.
    #[error("couldn't export GPIO {number}: {source}")]
    Export {
        number: KernelNumber,
        #[source]
        source: io::Error,
    },

    /// Opening, reading or writing a pin attribute failed.
    #[error("I/O failed on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The kernel returned a token outside the attribute's domain.
    #[error("unexpected value `{found}` in {}", path.display())]
    UnexpectedValue { path: PathBuf, found: String },
}

pub type Result<T> = std::result::Result<T, GpioError>;
