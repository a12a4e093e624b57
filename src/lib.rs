//! hidg — Linux USB HID gadget device access.
//!
//! Writes output reports to a gadget character device (`/dev/hidgN`) and
//! delivers its input reports through a bounded, lossy queue fed by a
//! background read thread.
//!
//! ```no_run
//! use hidg::Device;
//!
//! let dev = hidg::open("/dev/hidg0")?;
//! dev.write(&[0x00, 0x01, 0x02])?;
//! for report in dev.read_ch() {
//!     println!("report {:?}: {:02x?}", report.report_number(), report.as_bytes());
//! }
//! if let Some(err) = dev.read_error() {
//!     eprintln!("read stream ended: {err}");
//! }
//! # Ok::<(), hidg::Error>(())
//! ```
//!
//! The queue holds 64 reports by default. When it is full, newly read reports
//! are dropped; the reader never waits for consumers.

pub mod backends;
pub mod config;
pub mod device;
pub mod error;
mod pump;
pub mod queue;
pub mod report;

pub use backends::gadget::{open, HidgDevice};
pub use config::{GadgetConfig, ReadOptions};
pub use device::*;
pub use error::{Error, Result};
pub use queue::{ReadStats, Reports};
pub use report::Report;
