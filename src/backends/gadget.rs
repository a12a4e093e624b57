//! Linux USB HID gadget device.
//!
//! [`HidgDevice`] wraps the gadget's character device (`/dev/hidgN`) opened
//! read-write. It is responsible for:
//! - writing each output report with exactly one `write(2)`
//! - lazily starting the background read pump on the first `read_ch`
//! - closing the file, which also stops the pump
//!
//! This module does **not**:
//! - create or configure the gadget (configfs, report descriptors)
//! - interpret report contents beyond the leading report-number byte
//! - retry failed reads or writes, or reopen a failed device

use crate::config::ReadOptions;
use crate::device::{Device, PumpState};
use crate::error::{Error, Result};
use crate::pump::{self, FileSource};
use crate::queue::{ReadStats, ReportQueue, Reports};
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, OnceLock};

/// Open a gadget device with default [`ReadOptions`].
pub fn open(path: impl AsRef<Path>) -> Result<HidgDevice> {
    HidgDevice::open(path)
}

/// An open HID gadget device.
///
/// Dropping the device closes it.
pub struct HidgDevice {
    path: PathBuf,
    /// `None` once closed. The read pump holds its own reference while it runs.
    file: Mutex<Option<Arc<File>>>,
    closed: Arc<AtomicBool>,
    options: ReadOptions,
    queue: OnceLock<Arc<ReportQueue>>,
}

impl HidgDevice {
    /// Open `path` read-write with default [`ReadOptions`].
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        Self::open_with(path, ReadOptions::default())
    }

    /// Open `path` read-write with explicit read options.
    ///
    /// The options are validated before the device is touched.
    pub fn open_with(path: impl AsRef<Path>, options: ReadOptions) -> Result<Self> {
        options.validate()?;
        let path = path.as_ref().to_path_buf();
        let file = OpenOptions::new().read(true).write(true).open(&path)?;

        log::debug!("[hidg/open] path={}", path.display());

        Ok(Self {
            path,
            file: Mutex::new(Some(Arc::new(file))),
            closed: Arc::new(AtomicBool::new(false)),
            options,
            queue: OnceLock::new(),
        })
    }

    /// The path this device was opened from.
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn options(&self) -> &ReadOptions {
        &self.options
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }

    fn file(&self) -> MutexGuard<'_, Option<Arc<File>>> {
        self.file.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Create the queue and start the pump. Runs at most once per device.
    fn start_pump(&self) -> Arc<ReportQueue> {
        let queue = Arc::new(ReportQueue::new(self.options.queue_capacity));
        let file = self.file().clone();
        match file {
            Some(file) => {
                let source =
                    FileSource::new(file, self.closed.clone(), self.options.poll_interval());
                pump::spawn(source, queue.clone(), self.options.report_len);
            }
            None => queue.terminate(Error::Closed),
        }
        queue
    }
}

/// Issue exactly one write for `report`; a partial write is an error.
fn write_report(mut out: impl Write, report: &[u8]) -> Result<()> {
    let written = out.write(report)?;
    if written != report.len() {
        return Err(Error::ShortWrite {
            written,
            len: report.len(),
        });
    }
    Ok(())
}

impl Device for HidgDevice {
    fn write(&self, report: &[u8]) -> Result<()> {
        // Clone the handle out so a concurrent close() never waits on a write.
        let file = self.file().clone().ok_or(Error::Closed)?;
        write_report(&*file, report)
    }

    fn close(&self) {
        self.closed.store(true, Ordering::Release);
        if self.file().take().is_some() {
            log::debug!("[hidg/close] path={}", self.path.display());
        }
    }

    fn read_ch(&self) -> Reports {
        Reports::new(self.queue.get_or_init(|| self.start_pump()).clone())
    }

    fn read_error(&self) -> Option<&Error> {
        self.queue.get().and_then(|q| q.error())
    }

    fn state(&self) -> PumpState {
        match self.queue.get() {
            None => PumpState::NotStarted,
            Some(q) if q.is_closed() => PumpState::Terminated,
            Some(_) => PumpState::Running,
        }
    }

    fn stats(&self) -> ReadStats {
        self.queue.get().map(|q| q.stats()).unwrap_or_default()
    }
}

impl Drop for HidgDevice {
    fn drop(&mut self) {
        self.close();
    }
}

impl std::fmt::Debug for HidgDevice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HidgDevice")
            .field("path", &self.path)
            .field("closed", &self.is_closed())
            .field("state", &self.state())
            .finish()
    }
}
