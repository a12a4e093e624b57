//! Shared fixtures for the integration tests.

#![allow(dead_code)]

use hidg::ReadOptions;
use std::ffi::CString;
use std::io;
use std::os::unix::ffi::OsStrExt;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// A FIFO opened read-write behaves as a loopback gadget: every report written
/// to it comes back out of the read stream.
pub struct Loopback {
    _dir: TempDir,
    pub path: PathBuf,
}

impl Loopback {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("hidg0");
        mkfifo(&path).expect("mkfifo");
        Self { _dir: dir, path }
    }
}

fn mkfifo(path: &Path) -> io::Result<()> {
    let c_path = CString::new(path.as_os_str().as_bytes())
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))?;
    let ret = unsafe { libc::mkfifo(c_path.as_ptr(), 0o600) };
    if ret < 0 {
        return Err(io::Error::last_os_error());
    }
    Ok(())
}

/// Default options with a short poll interval so close is noticed quickly.
pub fn fast() -> ReadOptions {
    ReadOptions {
        poll_interval_ms: 5,
        ..ReadOptions::default()
    }
}
