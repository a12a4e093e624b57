//! Bounded, lossy delivery queue between the read pump and its consumers.
//!
//! The producer never waits for a consumer: [`ReportQueue::offer`] pushes into
//! a fixed capacity [`ArrayQueue`] and, when it is full, drops the *new*
//! report. Consumers block on a condition variable until a report arrives or
//! the queue is closed.
//!
//! After a successful push the producer takes the wakeup mutex to notify, so
//! it may briefly contend with a consumer inside `recv`. Consumers hold that
//! mutex only between a pop attempt and their condvar wait.
//!
//! The terminal error is stored in a write-once slot that is filled before the
//! queue is closed, under the same mutex that publishes the closure. A consumer
//! that observed closure is therefore guaranteed to see the error.

use crate::error::Error;
use crate::report::Report;
use crossbeam_queue::ArrayQueue;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Condvar, Mutex, MutexGuard, OnceLock};
use std::time::{Duration, Instant};

/// Delivery counters for one device's read stream.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReadStats {
    /// Reports successfully read from the device.
    pub reports_read: u64,
    /// Reports placed in the queue.
    pub reports_queued: u64,
    /// Reports discarded because the queue was full.
    pub reports_dropped: u64,
}

pub(crate) struct ReportQueue {
    buf: ArrayQueue<Report>,
    closed: Mutex<bool>,
    ready: Condvar,
    error: OnceLock<Error>,
    read: AtomicU64,
    queued: AtomicU64,
    dropped: AtomicU64,
}

impl ReportQueue {
    pub(crate) fn new(capacity: usize) -> Self {
        Self {
            buf: ArrayQueue::new(capacity),
            closed: Mutex::new(false),
            ready: Condvar::new(),
            error: OnceLock::new(),
            read: AtomicU64::new(0),
            queued: AtomicU64::new(0),
            dropped: AtomicU64::new(0),
        }
    }

    /// Push without waiting for space. Returns `false` if the report was dropped.
    pub(crate) fn offer(&self, report: Report) -> bool {
        self.read.fetch_add(1, Ordering::Relaxed);
        match self.buf.push(report) {
            Ok(()) => {
                self.queued.fetch_add(1, Ordering::Relaxed);
                // Taking the lock orders this wakeup after any consumer that
                // has just seen an empty buffer and is about to wait.
                let _closed = self.lock();
                self.ready.notify_one();
                true
            }
            Err(_rejected) => {
                self.dropped.fetch_add(1, Ordering::Relaxed);
                false
            }
        }
    }

    /// Record the terminal error and close the queue. Only the first call has
    /// any effect.
    pub(crate) fn terminate(&self, error: Error) {
        let mut closed = self.lock();
        if *closed {
            return;
        }
        let _ = self.error.set(error);
        *closed = true;
        self.ready.notify_all();
    }

    pub(crate) fn error(&self) -> Option<&Error> {
        self.error.get()
    }

    pub(crate) fn is_closed(&self) -> bool {
        *self.lock()
    }

    pub(crate) fn stats(&self) -> ReadStats {
        ReadStats {
            reports_read: self.read.load(Ordering::Relaxed),
            reports_queued: self.queued.load(Ordering::Relaxed),
            reports_dropped: self.dropped.load(Ordering::Relaxed),
        }
    }

    fn lock(&self) -> MutexGuard<'_, bool> {
        // The guarded flag is a plain bool; a poisoned lock still holds a
        // meaningful value.
        self.closed.lock().unwrap_or_else(|e| e.into_inner())
    }
}

/// Consumer side of a device's inbound report queue.
///
/// Returned by [`Device::read_ch`](crate::device::Device::read_ch). Every
/// handle for a device, including clones, reads from the same queue; each
/// report is delivered to exactly one of them. The stream ends (`recv` returns
/// `None`) once the read pump has terminated and all queued reports have been
/// taken. After that, [`Device::read_error`](crate::device::Device::read_error)
/// reports why.
#[derive(Clone)]
pub struct Reports {
    queue: Arc<ReportQueue>,
}

impl Reports {
    pub(crate) fn new(queue: Arc<ReportQueue>) -> Self {
        Self { queue }
    }

    /// Block until a report is available or the stream has ended.
    pub fn recv(&self) -> Option<Report> {
        let mut closed = self.queue.lock();
        loop {
            if let Some(report) = self.queue.buf.pop() {
                return Some(report);
            }
            if *closed {
                return None;
            }
            closed = self
                .queue
                .ready
                .wait(closed)
                .unwrap_or_else(|e| e.into_inner());
        }
    }

    /// Take a queued report without blocking.
    pub fn try_recv(&self) -> Option<Report> {
        self.queue.buf.pop()
    }

    /// Like [`recv`](Self::recv), giving up after `timeout`.
    ///
    /// Returns `None` both on timeout and at end of stream; use
    /// [`is_closed`](Self::is_closed) to tell them apart. A timeout too large
    /// to represent as a deadline waits like `recv`.
    pub fn recv_timeout(&self, timeout: Duration) -> Option<Report> {
        let Some(deadline) = Instant::now().checked_add(timeout) else {
            return self.recv();
        };
        let mut closed = self.queue.lock();
        loop {
            if let Some(report) = self.queue.buf.pop() {
                return Some(report);
            }
            if *closed {
                return None;
            }
            let now = Instant::now();
            if now >= deadline {
                return None;
            }
            closed = self
                .queue
                .ready
                .wait_timeout(closed, deadline - now)
                .map(|(guard, _)| guard)
                .unwrap_or_else(|e| e.into_inner().0);
        }
    }

    /// `true` once the read pump has terminated. Reports queued before that
    /// may still be pending.
    pub fn is_closed(&self) -> bool {
        self.queue.is_closed()
    }

    /// Reports currently waiting in the queue.
    pub fn len(&self) -> usize {
        self.queue.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.buf.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.queue.buf.capacity()
    }
}

impl Iterator for Reports {
    type Item = Report;

    /// Blocking; ends when the stream ends.
    fn next(&mut self) -> Option<Report> {
        self.recv()
    }
}

impl std::fmt::Debug for Reports {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Reports")
            .field("len", &self.len())
            .field("capacity", &self.capacity())
            .field("closed", &self.is_closed())
            .finish()
    }
}
