//! Crate-wide error type.
//!
//! OS-level failures are carried unchanged in [`Error::Io`]; its `Display` and
//! `source()` are those of the underlying [`std::io::Error`]. The remaining
//! variants cover conditions that have no errno of their own.

use std::io;
use thiserror::Error;

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// Open, write, or read failed at the OS level.
    #[error(transparent)]
    Io(#[from] io::Error),

    /// The device handle was closed.
    ///
    /// Returned by `write` after `close`, and recorded as the terminal read
    /// error when `close` stops the read pump.
    #[error("device is closed")]
    Closed,

    /// A device read returned zero bytes.
    #[error("device returned end of file")]
    Eof,

    /// The device accepted only part of an output report.
    #[error("short write: {written} of {len} report bytes")]
    ShortWrite { written: usize, len: usize },

    /// The configuration file could not be parsed.
    #[error("invalid configuration file: {0}")]
    Config(#[from] toml::de::Error),

    /// A configuration value is out of range.
    #[error("invalid configuration: {0}")]
    InvalidConfig(&'static str),
}

impl Error {
    /// The underlying OS error, if this is one.
    pub fn as_io(&self) -> Option<&io::Error> {
        match self {
            Error::Io(e) => Some(e),
            _ => None,
        }
    }
}
