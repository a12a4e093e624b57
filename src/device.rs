//! The device abstraction.
//!
//! [`Device`] is what applications program against; the gadget backend
//! ([`HidgDevice`](crate::backends::gadget::HidgDevice)) is the concrete
//! implementation. Keeping it a trait lets consumers substitute their own
//! implementation in tests.
//!
//! # Read stream lifecycle
//! ```text
//! NotStarted --first read_ch()--> Running --read failure or close()--> Terminated
//! ```
//! `Terminated` is permanent. After it, the queue returned by `read_ch` yields
//! whatever it still holds and then ends, and `read_error` returns the cause.

use crate::error::{Error, Result};
use crate::queue::{ReadStats, Reports};

/// State of a device's background read pump.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PumpState {
    /// `read_ch` has not been called yet.
    NotStarted,
    /// The pump is reading from the device.
    Running,
    /// The pump has stopped; see `read_error`.
    Terminated,
}

/// A HID gadget device.
pub trait Device {
    /// Write one output report.
    ///
    /// The first byte must be the report number, or zero if the gadget does
    /// not use numbered reports. Blocks until the write completes; OS errors
    /// are returned unchanged.
    fn write(&self, report: &[u8]) -> Result<()>;

    /// Close the device and release its file.
    ///
    /// The read pump, if running, stops on its own shortly after. Calling this
    /// more than once has no further effect.
    fn close(&self);

    /// The inbound report stream.
    ///
    /// The first call starts the read pump; later calls return handles to the
    /// same queue. If the gadget uses numbered reports, the first byte of each
    /// report is the report number.
    fn read_ch(&self) -> Reports;

    /// Why the read stream ended, or `None` if it has not.
    ///
    /// Guaranteed to be set once a consumer has seen the stream end.
    fn read_error(&self) -> Option<&Error>;

    /// Where the read pump is in its lifecycle.
    fn state(&self) -> PumpState;

    /// Delivery counters; all zero before the stream starts.
    fn stats(&self) -> ReadStats;
}
