//! Gadget configuration.
//!
//! [`GadgetConfig`] names the device node to open and carries the
//! [`ReadOptions`] for its read stream. It is usually loaded from TOML:
//!
//! ```toml
//! path = "/dev/hidg0"
//!
//! [read]
//! queue_capacity = 64
//! report_len = 64
//! poll_interval_ms = 50
//! ```
//!
//! Every key under `[read]` is optional and defaults to the value shown.

use crate::backends::gadget::HidgDevice;
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Default capacity of the inbound report queue.
pub const DEFAULT_QUEUE_CAPACITY: usize = 64;

/// Default read buffer length; the largest inbound report that is delivered whole.
pub const DEFAULT_REPORT_LEN: usize = 64;

/// Default upper bound on how long the read pump takes to notice `close`.
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 50;

/// Read-stream tuning for one device.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ReadOptions {
    /// Reports held before new ones are dropped.
    pub queue_capacity: usize,
    /// Bytes requested per device read.
    pub report_len: usize,
    /// Poll wait between checks of the closed flag, in milliseconds.
    pub poll_interval_ms: u64,
}

impl Default for ReadOptions {
    fn default() -> Self {
        Self {
            queue_capacity: DEFAULT_QUEUE_CAPACITY,
            report_len: DEFAULT_REPORT_LEN,
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
        }
    }
}

impl ReadOptions {
    pub fn validate(&self) -> Result<()> {
        if self.queue_capacity == 0 {
            return Err(Error::InvalidConfig("queue_capacity must be at least 1"));
        }
        if self.report_len == 0 {
            return Err(Error::InvalidConfig("report_len must be at least 1"));
        }
        if self.poll_interval_ms == 0 {
            return Err(Error::InvalidConfig("poll_interval_ms must be at least 1"));
        }
        Ok(())
    }

    #[inline]
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}

/// A device node plus its read options.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GadgetConfig {
    /// Gadget character device, e.g. `/dev/hidg0`.
    pub path: PathBuf,
    #[serde(default)]
    pub read: ReadOptions,
}

impl GadgetConfig {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            read: ReadOptions::default(),
        }
    }

    /// Parse and validate a TOML document.
    pub fn from_toml_str(s: &str) -> Result<Self> {
        let cfg: GadgetConfig = toml::from_str(s)?;
        cfg.read.validate()?;
        Ok(cfg)
    }

    /// Read, parse, and validate a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    /// Open the configured device.
    pub fn open(&self) -> Result<HidgDevice> {
        HidgDevice::open_with(&self.path, self.read.clone())
    }
}
