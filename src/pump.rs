//! Background read pump.
//!
//! One pump thread per device, started by the first
//! [`Device::read_ch`](crate::device::Device::read_ch) call. It reads reports
//! from a [`ReportSource`] and offers each to the device's [`ReportQueue`]
//! until the source fails. The failure is recorded as the terminal error, the
//! queue is closed, and the thread exits. It is never restarted.
//!
//! The thread is not joined. Closing the device is enough to stop it: the
//! file source checks the shared closed flag between poll waits.

use crate::error::{Error, Result};
use crate::queue::ReportQueue;
use crate::report::Report;
use std::fs::File;
use std::io::{self, Read};
use std::os::unix::io::AsRawFd;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

/// Something the pump can pull reports from.
pub(crate) trait ReportSource: Send {
    /// Block until one report has been read into `buf`, returning its length.
    ///
    /// Any error ends the stream.
    fn read_report(&mut self, buf: &mut [u8]) -> Result<usize>;
}

/// Reads from the gadget device file.
///
/// Waits for readability with `poll(2)` so the closed flag is observed within
/// one `interval` even when the device never produces data.
pub(crate) struct FileSource {
    file: Arc<File>,
    closed: Arc<AtomicBool>,
    interval: Duration,
}

impl FileSource {
    pub(crate) fn new(file: Arc<File>, closed: Arc<AtomicBool>, interval: Duration) -> Self {
        Self {
            file,
            closed,
            interval,
        }
    }

    /// `Ok(true)` when the file is readable (or has a pending error/hangup
    /// that the following read will surface).
    fn wait_readable(&self) -> io::Result<bool> {
        let mut pfd = libc::pollfd {
            fd: self.file.as_raw_fd(),
            events: libc::POLLIN,
            revents: 0,
        };
        let timeout_ms = self.interval.as_millis().min(libc::c_int::MAX as u128) as libc::c_int;
        let ret = unsafe { libc::poll(&mut pfd, 1, timeout_ms) };
        if ret < 0 {
            return Err(io::Error::last_os_error());
        }
        Ok(ret > 0)
    }
}

impl ReportSource for FileSource {
    fn read_report(&mut self, buf: &mut [u8]) -> Result<usize> {
        loop {
            if self.closed.load(Ordering::Acquire) {
                return Err(Error::Closed);
            }
            match self.wait_readable() {
                Ok(false) => continue,
                Ok(true) => {}
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into()),
            }
            if self.closed.load(Ordering::Acquire) {
                return Err(Error::Closed);
            }
            match (&*self.file).read(buf) {
                Ok(0) => return Err(Error::Eof),
                Ok(n) => return Ok(n),
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into()),
            }
        }
    }
}

/// Run the pump loop on the current thread until `source` fails.
pub(crate) fn run(mut source: impl ReportSource, queue: &ReportQueue, report_len: usize) {
    let mut buf = vec![0u8; report_len];
    loop {
        match source.read_report(&mut buf) {
            Ok(n) => {
                let slice = &buf[..n];
                #[cfg(feature = "debug-log")]
                log::trace!("[hidg/read] n={} bytes: {:02x?}", n, slice);
                if !queue.offer(Report::from(slice)) {
                    log::trace!("[hidg/read] queue full, dropped {n}-byte report");
                }
            }
            Err(e) => {
                match &e {
                    Error::Closed => log::debug!("[hidg/read] device closed, pump exiting"),
                    Error::Eof => log::debug!("[hidg/read] end of file, pump exiting"),
                    other => log::warn!("[hidg/read] read failed: {other}"),
                }
                queue.terminate(e);
                return;
            }
        }
    }
}

/// Start the pump on a dedicated, unjoined thread.
///
/// If the thread cannot be spawned the queue is terminated with that error.
pub(crate) fn spawn(
    source: impl ReportSource + 'static,
    queue: Arc<ReportQueue>,
    report_len: usize,
) {
    let worker_queue = queue.clone();
    let spawned = thread::Builder::new()
        .name("hidg-read".into())
        .spawn(move || run(source, &worker_queue, report_len));
    match spawned {
        Ok(_detached) => log::debug!("[hidg/read] pump started"),
        Err(e) => {
            log::warn!("[hidg/read] could not start pump: {e}");
            queue.terminate(e.into());
        }
    }
}
